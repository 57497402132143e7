use crate::cli::BrowseArgs;
use crate::config::Config;
use crate::core::traits::TopicRepository;
use crate::store::open_repository;
use crate::utils::error::{AppError, AppResult};
use crate::utils::format::truncate_string;
use crate::utils::interactive::{
    Action, TerminalGuard, adjust_scroll, draw_screen, map_key, reselect,
};
use crate::utils::pagination::get_terminal_size;
use crate::utils::{FlowResult, handle_flow, report_error};
use crate::view::render::{loading_line, render_lines, targets};
use crate::view::{MountOutcome, Target, TerminalToolkit, TopicView, ViewState};
use anyhow::{Result, bail};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(80);
const LOADING_STATUS: &str = "q quit";
const BROWSE_STATUS: &str = "↑/↓ move · enter toggle · q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseExit {
    Closed,
    Cancelled,
}

pub async fn handle_browse_command(config: Config, file: Option<&Path>, args: &BrowseArgs) -> Result<()> {
    if !io::stdout().is_terminal() {
        bail!("browse needs an interactive terminal; try `grammarbook list` instead");
    }

    let repository = open_repository(&config, file)?;
    let initial = args
        .expand
        .clone()
        .or_else(|| config.general.initial_topic.clone());
    let state = ViewState::new(config.general.formula_policy).with_initial_topic(initial);
    let mut view = TopicView::new(repository, state);
    let kit = TerminalToolkit::new(config.general.color);

    let exit = {
        let _guard = TerminalGuard::enter()?;
        run_browser(&mut view, &kit).await?
    };

    // Anything logged on the alternate screen is gone by now
    if let Some(err) = view.failure() {
        report_error(err);
    }

    if exit == BrowseExit::Cancelled {
        handle_flow(FlowResult::Cancelled("Loading cancelled".to_string()));
    }
    Ok(())
}

async fn run_browser<R: TopicRepository>(
    view: &mut TopicView<R>,
    kit: &TerminalToolkit,
) -> AppResult<BrowseExit> {
    let mut events = EventStream::new();

    if view.mount_until(spin_until_quit(&mut events, kit)).await == MountOutcome::Cancelled {
        return Ok(BrowseExit::Cancelled);
    }

    let mut stdout = io::stdout();
    let mut selected = 0usize;
    let mut current: Option<Target> = None;
    let mut scroll = 0usize;

    loop {
        let lines = render_lines(view.state(), kit, 0);
        let visible = targets(&lines);
        selected = reselect(&visible, current.as_ref(), selected);
        current = visible.get(selected).map(|target| (*target).clone());

        let selected_line = current
            .as_ref()
            .and_then(|c| lines.iter().position(|line| line.target.as_ref() == Some(c)));
        let (rows, cols) = get_terminal_size()?;
        let body_rows = usize::from(rows.saturating_sub(1));
        scroll = selected_line
            .map(|line| adjust_scroll(scroll, line, body_rows))
            .unwrap_or(0);

        let status = truncate_string(&status_line(current.as_ref()), usize::from(cols));
        draw_screen(&mut stdout, &lines, selected_line, scroll, rows, &status)
            .map_err(|e| AppError::Io(e.to_string()))?;

        let Some(event) = events.next().await else {
            break;
        };
        let event = event.map_err(|e| AppError::Io(e.to_string()))?;

        // Anything other than a key press (resize included) just redraws
        let Event::Key(key) = event else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match map_key(&key) {
            Action::Up => {
                selected = selected.saturating_sub(1);
                current = None;
            }
            Action::Down => {
                selected = (selected + 1).min(visible.len().saturating_sub(1));
                current = None;
            }
            Action::Home => {
                selected = 0;
                current = None;
            }
            Action::End => {
                selected = visible.len().saturating_sub(1);
                current = None;
            }
            Action::Toggle => match &current {
                Some(Target::Topic(id)) => {
                    view.toggle_topic(id);
                }
                Some(Target::Formula(key)) => {
                    view.toggle_formula(key);
                }
                None => {}
            },
            Action::Quit => break,
            Action::Ignore => {}
        }
    }

    Ok(BrowseExit::Closed)
}

/// Animate the spinner until the user quits; never resolves otherwise.
async fn spin_until_quit(events: &mut EventStream, kit: &TerminalToolkit) {
    let mut ticker = tokio::time::interval(SPINNER_TICK);
    let mut stdout = io::stdout();
    let mut frame = 0usize;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let rows = get_terminal_size().map(|(rows, _)| rows).unwrap_or(24);
                let line = loading_line(kit, frame);
                if let Err(e) = draw_screen(&mut stdout, &[line], None, 0, rows, LOADING_STATUS) {
                    tracing::warn!(error = %e, "failed to draw loading screen");
                }
                frame = frame.wrapping_add(1);
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key)))
                    if key.kind == KeyEventKind::Press && map_key(&key) == Action::Quit =>
                {
                    return;
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal event stream failed");
                    return;
                }
                None => return,
                Some(Ok(_)) => {}
            },
        }
    }
}

fn status_line(current: Option<&Target>) -> String {
    match current {
        Some(Target::Formula(key)) => format!("{} · {}", BROWSE_STATUS, key),
        Some(Target::Topic(id)) => format!("{} · {}", BROWSE_STATUS, id),
        None => LOADING_STATUS.to_string(),
    }
}
