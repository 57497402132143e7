//! Turns a [`ViewState`] into lines of text.
//!
//! Each line may carry the interaction target it represents, so an
//! interactive host can place a cursor on headers and formula rows.

use crate::core::data::{Formula, Rule, Topic};
use crate::view::key::FormulaKey;
use crate::view::state::{Phase, ViewState};
use crate::view::toolkit::{Icon, Tone, Toolkit};

pub const LOADING_LABEL: &str = "Loading topics...";
pub const EMPTY_LABEL: &str = "No topics yet";
pub const SIMPLE_RULES_LABEL: &str = "Rules:";

const BODY_INDENT: &str = "    ";
const RULE_INDENT: &str = "       ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Topic(String),
    Formula(FormulaKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub target: Option<Target>,
}

impl Line {
    fn plain(text: String) -> Self {
        Self { text, target: None }
    }

    fn target(text: String, target: Target) -> Self {
        Self {
            text,
            target: Some(target),
        }
    }
}

pub fn render_lines(state: &ViewState, kit: &dyn Toolkit, spinner_frame: usize) -> Vec<Line> {
    match state.phase() {
        Phase::Loading => vec![loading_line(kit, spinner_frame)],
        Phase::Empty => vec![Line::plain(format!(
            "{} {}",
            kit.icon(Icon::Library),
            kit.paint(Tone::Muted, EMPTY_LABEL)
        ))],
        Phase::Populated(topics) => {
            let mut lines = Vec::new();
            for topic in topics {
                render_topic(state, kit, topic, &mut lines);
            }
            lines
        }
    }
}

pub fn loading_line(kit: &dyn Toolkit, spinner_frame: usize) -> Line {
    Line::plain(kit.spinner(spinner_frame, LOADING_LABEL))
}

/// Whole view as one string, one rendered line per row
pub fn render(state: &ViewState, kit: &dyn Toolkit) -> String {
    let mut out = String::new();
    for line in render_lines(state, kit, 0) {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Targets in display order, for cursor navigation
pub fn targets(lines: &[Line]) -> Vec<&Target> {
    lines.iter().filter_map(|line| line.target.as_ref()).collect()
}

/// Header and body lines of one topic panel
pub fn topic_section<'a>(lines: &'a [Line], topic_id: &str) -> &'a [Line] {
    let is_header = |line: &Line| matches!(line.target, Some(Target::Topic(_)));
    let Some(start) = lines
        .iter()
        .position(|line| matches!(&line.target, Some(Target::Topic(id)) if id == topic_id))
    else {
        return &[];
    };
    let end = lines[start + 1..]
        .iter()
        .position(is_header)
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    &lines[start..end]
}

fn render_topic(state: &ViewState, kit: &dyn Toolkit, topic: &Topic, lines: &mut Vec<Line>) {
    let expanded = state.is_expanded(&topic.id);
    lines.push(Line::target(
        kit.panel(&topic.theme, topic.theme_formula.as_deref(), expanded),
        Target::Topic(topic.id.clone()),
    ));

    // Collapsed panels keep no body at all
    if !expanded {
        return;
    }

    if let Some(group) = &topic.group_name {
        lines.push(Line::plain(format!(
            "{}{}",
            BODY_INDENT,
            kit.paint(Tone::Group, &format!("┃ {}", group))
        )));
    }

    for (rule_index, rule) in topic.rules.iter().enumerate() {
        render_rule(state, kit, &topic.id, rule_index, rule, lines);
    }

    if !topic.simple_rules.is_empty() {
        lines.push(Line::plain(format!(
            "{}{}",
            BODY_INDENT,
            kit.paint(Tone::SimpleRule, SIMPLE_RULES_LABEL)
        )));
        for simple in &topic.simple_rules {
            lines.push(Line::plain(format!(
                "{}  {} {}",
                BODY_INDENT,
                kit.paint(Tone::SimpleRule, kit.icon(Icon::Bullet)),
                simple
            )));
        }
    }
}

fn render_rule(
    state: &ViewState,
    kit: &dyn Toolkit,
    topic_id: &str,
    rule_index: usize,
    rule: &Rule,
    lines: &mut Vec<Line>,
) {
    let number = format!("{:<3}", format!("{}.", rule_index + 1));
    lines.push(Line::plain(format!(
        "{}{}{}",
        BODY_INDENT,
        kit.paint(Tone::RuleNumber, &number),
        rule.text
    )));

    if let Some(shape) = &rule.shape {
        lines.push(Line::plain(format!(
            "{}{}",
            RULE_INDENT,
            kit.paint(Tone::Shape, shape)
        )));
    }

    for (formula_index, formula) in rule.formulas.iter().enumerate() {
        let key = FormulaKey::new(topic_id, rule_index, formula_index);
        render_formula(state, kit, key, formula, lines);
    }
}

fn render_formula(
    state: &ViewState,
    kit: &dyn Toolkit,
    key: FormulaKey,
    formula: &Formula,
    lines: &mut Vec<Line>,
) {
    let open = state.is_formula_open(&key);
    let (icon, tone) = if open {
        (Icon::Expanded, Tone::FormulaOpen)
    } else {
        (Icon::Collapsed, Tone::Formula)
    };

    lines.push(Line::target(
        format!(
            "{}{} {}",
            RULE_INDENT,
            kit.paint(tone, kit.icon(icon)),
            kit.paint(tone, &formula.formula)
        ),
        Target::Formula(key),
    ));

    let mut detail = Vec::new();
    if let Some(title) = &formula.title {
        detail.push(kit.paint(Tone::Title, title));
    }
    for (index, example) in formula.examples.iter().enumerate() {
        detail.push(format!(
            "{} {}",
            kit.paint(Tone::ExampleNumber, &format!("{}.", index + 1)),
            example
        ));
    }
    if let Some(note) = &formula.note {
        detail.push(kit.paint(Tone::Note, note));
    }

    for line in kit.collapsible(open, detail) {
        lines.push(Line::plain(format!("{}  {}", RULE_INDENT, line)));
    }
}
