//! Rendering capabilities the tree view needs from its host.
//!
//! The renderer only ever asks for a panel header, a collapsible block, a
//! spinner frame, an icon, or a piece of toned text. Swapping the toolkit
//! swaps the look without touching view logic.

use crate::utils::output::OutputStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Collapsed,
    Expanded,
    Library,
    Bullet,
}

/// Semantic colour roles for body text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Group,
    RuleNumber,
    Shape,
    Formula,
    FormulaOpen,
    Title,
    ExampleNumber,
    Note,
    SimpleRule,
    Muted,
}

pub trait Toolkit {
    /// One line for a topic panel's header
    fn panel(&self, title: &str, badge: Option<&str>, expanded: bool) -> String;

    /// Body lines of a collapsible block; nothing when closed
    fn collapsible(&self, open: bool, body: Vec<String>) -> Vec<String>;

    /// Progress indicator for the given animation frame
    fn spinner(&self, frame: usize, label: &str) -> String;

    fn icon(&self, icon: Icon) -> &'static str;

    fn paint(&self, tone: Tone, text: &str) -> String;
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Text toolkit for terminals, with or without ANSI colour
#[derive(Debug, Clone, Copy)]
pub struct TerminalToolkit {
    color: bool,
}

impl TerminalToolkit {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }
}

impl Toolkit for TerminalToolkit {
    fn panel(&self, title: &str, badge: Option<&str>, expanded: bool) -> String {
        let icon = if expanded {
            self.icon(Icon::Expanded)
        } else {
            self.icon(Icon::Collapsed)
        };

        let title = if !self.color {
            title.to_string()
        } else if expanded {
            OutputStyle::title(title).to_string()
        } else {
            OutputStyle::header(title).to_string()
        };

        let mut line = format!("{} {}", self.paint(Tone::Formula, icon), title);
        if let Some(badge) = badge {
            let badge = format!("[{}]", badge);
            line.push_str("  ");
            line.push_str(&self.paint(Tone::Formula, &badge));
        }
        line
    }

    fn collapsible(&self, open: bool, body: Vec<String>) -> Vec<String> {
        if !open {
            return Vec::new();
        }
        let border = self.paint(Tone::Muted, "│");
        body.into_iter()
            .map(|line| format!("{} {}", border, line))
            .collect()
    }

    fn spinner(&self, frame: usize, label: &str) -> String {
        let glyph = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
        format!("{} {}", self.paint(Tone::Formula, glyph), self.paint(Tone::Muted, label))
    }

    fn icon(&self, icon: Icon) -> &'static str {
        match icon {
            Icon::Collapsed => "▸",
            Icon::Expanded => "▾",
            Icon::Library => "📚",
            Icon::Bullet => "•",
        }
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = match tone {
            Tone::Group => OutputStyle::group(text),
            Tone::RuleNumber | Tone::ExampleNumber => OutputStyle::number(text),
            Tone::Shape => OutputStyle::shape(text),
            Tone::Formula => OutputStyle::info(text),
            Tone::FormulaOpen => OutputStyle::highlight(text),
            Tone::Title => OutputStyle::italic(text),
            Tone::Note => OutputStyle::success(text),
            Tone::SimpleRule => OutputStyle::accent(text),
            Tone::Muted => OutputStyle::muted(text),
        };
        styled.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_panel_header() {
        let kit = TerminalToolkit::plain();
        assert_eq!(kit.panel("Past Simple", None, false), "▸ Past Simple");
        assert_eq!(
            kit.panel("Present Simple", Some("S + V(s)"), true),
            "▾ Present Simple  [S + V(s)]"
        );
    }

    #[test]
    fn test_closed_collapsible_renders_nothing() {
        let kit = TerminalToolkit::plain();
        assert!(kit.collapsible(false, vec!["hidden".to_string()]).is_empty());
        assert_eq!(kit.collapsible(true, vec!["shown".to_string()]), vec!["│ shown"]);
    }

    #[test]
    fn test_spinner_cycles() {
        let kit = TerminalToolkit::plain();
        assert_eq!(kit.spinner(0, "Loading"), kit.spinner(10, "Loading"));
        assert_ne!(kit.spinner(0, "Loading"), kit.spinner(1, "Loading"));
    }
}
