use crate::cli::{ListArgs, ListFormat};
use crate::config::Config;
use crate::store::open_repository;
use crate::utils::pagination::print_or_page;
use crate::utils::print_warning;
use crate::view::{TerminalToolkit, TopicView, ViewState, render};
use anyhow::{Context, Result};
use std::path::Path;

pub async fn handle_list_command(config: Config, file: Option<&Path>, args: &ListArgs) -> Result<()> {
    let repository = open_repository(&config, file)?;
    let initial = args
        .expand
        .clone()
        .or_else(|| config.general.initial_topic.clone());
    let state = ViewState::new(config.general.formula_policy).with_initial_topic(initial);
    let mut view = TopicView::new(repository, state);

    if !super::mount_interruptible(&mut view).await {
        return Ok(());
    }

    if let Some(id) = unknown_topic(view.state(), args.expand.as_deref()) {
        print_warning(&format!("No topic '{}'", id));
    }

    match args.format {
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(view.state().topics())
                .context("Failed to serialize topics to JSON")?;
            println!("{}", json);
        }
        ListFormat::Tree => {
            for key in &args.open {
                if !view.toggle_formula(key) {
                    print_warning(&format!("No formula at '{}'", key));
                }
            }

            let kit = TerminalToolkit::new(config.general.color);
            print_or_page(&render(view.state(), &kit), config.general.pager)?;
        }
    }

    Ok(())
}

/// `requested` when it names no loaded topic
fn unknown_topic<'a>(state: &ViewState, requested: Option<&'a str>) -> Option<&'a str> {
    requested.filter(|id| state.topic(id).is_none())
}
