use crate::utils::error::{AppError, AppResult};
use crate::view::render::{Line, Target};
use crossterm::{
    cursor,
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute, queue, style,
    terminal::{self, ClearType},
};
use std::io::{self, Write};

pub fn prompt_input(prompt: &str) -> AppResult<String> {
    print!("{}", prompt);
    io::stdout().flush().map_err(|e| AppError::Io(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| AppError::Io(e.to_string()))?;

    Ok(input.trim().to_string())
}

pub fn prompt_yes_no(prompt: &str) -> AppResult<bool> {
    loop {
        let input = prompt_input(&format!("{} [y/N]: ", prompt))?;
        match input.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// What a key press asks the browser to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Home,
    End,
    Toggle,
    Quit,
    Ignore,
}

pub fn map_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Home | KeyCode::Char('g') => Action::Home,
        KeyCode::End | KeyCode::Char('G') => Action::End,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
        _ => Action::Ignore,
    }
}

/// Raw mode plus alternate screen for as long as the guard lives
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> AppResult<Self> {
        terminal::enable_raw_mode().map_err(|e| AppError::Io(e.to_string()))?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )
        .map_err(|e| AppError::Io(e.to_string()))?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Index of the target to select after a re-render.
///
/// Stays on `previous` when it is still visible, otherwise clamps `fallback`.
pub fn reselect(targets: &[&Target], previous: Option<&Target>, fallback: usize) -> usize {
    if let Some(previous) = previous
        && let Some(index) = targets.iter().position(|t| *t == previous)
    {
        return index;
    }
    fallback.min(targets.len().saturating_sub(1))
}

/// First visible line so that `selected_line` stays on screen
pub fn adjust_scroll(scroll: usize, selected_line: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    if selected_line < scroll {
        selected_line
    } else if selected_line >= scroll + visible_rows {
        selected_line + 1 - visible_rows
    } else {
        scroll
    }
}

/// Redraw the whole screen; the last row is the status bar
pub fn draw_screen(
    out: &mut impl Write,
    lines: &[Line],
    selected_line: Option<usize>,
    scroll: usize,
    rows: u16,
    status: &str,
) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;

    let body_rows = usize::from(rows.saturating_sub(1));
    for (row, (index, line)) in lines
        .iter()
        .enumerate()
        .skip(scroll)
        .take(body_rows)
        .enumerate()
    {
        let marker = if Some(index) == selected_line { "›" } else { " " };
        queue!(
            out,
            cursor::MoveTo(0, row as u16),
            style::Print(marker),
            style::Print(" "),
            style::Print(&line.text)
        )?;
    }

    queue!(
        out,
        cursor::MoveTo(0, rows.saturating_sub(1)),
        style::SetAttribute(style::Attribute::Dim),
        style::Print(status),
        style::SetAttribute(style::Attribute::Reset)
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::FormulaKey;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(map_key(&key(KeyCode::Up)), Action::Up);
        assert_eq!(map_key(&key(KeyCode::Char('j'))), Action::Down);
        assert_eq!(map_key(&key(KeyCode::Enter)), Action::Toggle);
        assert_eq!(map_key(&key(KeyCode::Char(' '))), Action::Toggle);
        assert_eq!(map_key(&key(KeyCode::Esc)), Action::Quit);
        assert_eq!(map_key(&key(KeyCode::Char('x'))), Action::Ignore);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_reselect_follows_target() {
        let a = Target::Topic("a".to_string());
        let b = Target::Topic("b".to_string());
        let f = Target::Formula(FormulaKey::new("a", 0, 0));

        assert_eq!(reselect(&[&a, &f, &b], Some(&b), 0), 2);
        assert_eq!(reselect(&[&a, &b], Some(&f), 5), 1);
        assert_eq!(reselect(&[], None, 3), 0);
    }

    #[test]
    fn test_adjust_scroll_keeps_selection_visible() {
        assert_eq!(adjust_scroll(0, 3, 10), 0);
        assert_eq!(adjust_scroll(0, 12, 10), 3);
        assert_eq!(adjust_scroll(5, 2, 10), 2);
        assert_eq!(adjust_scroll(4, 7, 0), 0);
    }

    #[test]
    fn test_draw_marks_selected_line() {
        let lines = vec![
            Line { text: "▸ Past Simple".to_string(), target: None },
            Line { text: "▸ Present Simple".to_string(), target: None },
        ];
        let mut out = Vec::new();
        draw_screen(&mut out, &lines, Some(1), 0, 10, "q quit").unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("  ▸ Past Simple"));
        assert!(text.contains("› ▸ Present Simple"));
        assert!(text.contains("q quit"));
    }
}
