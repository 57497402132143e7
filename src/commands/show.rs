use crate::cli::ShowArgs;
use crate::config::{Config, FormulaPolicy};
use crate::store::open_repository;
use crate::utils::pagination::print_or_page;
use crate::utils::{FlowResult, handle_flow};
use crate::view::render::{render_lines, topic_section};
use crate::view::{FormulaKey, TerminalToolkit, TopicView, ViewState};
use anyhow::Result;
use std::path::Path;

pub async fn handle_show_command(config: Config, file: Option<&Path>, args: &ShowArgs) -> Result<()> {
    let repository = open_repository(&config, file)?;
    let state = ViewState::new(FormulaPolicy::Multi).with_initial_topic(Some(args.id.clone()));
    let mut view = TopicView::new(repository, state);

    if !super::mount_interruptible(&mut view).await {
        return Ok(());
    }

    let Some(topic) = view.state().topic(&args.id).cloned() else {
        handle_flow(FlowResult::NotFound {
            item_type: "Topic".to_string(),
            search_term: args.id.clone(),
        });
        return Ok(());
    };

    for (rule_index, rule) in topic.rules.iter().enumerate() {
        for formula_index in 0..rule.formulas.len() {
            view.toggle_formula(&FormulaKey::new(&topic.id, rule_index, formula_index));
        }
    }

    let kit = TerminalToolkit::new(config.general.color);
    let lines = render_lines(view.state(), &kit, 0);
    let mut output = String::new();
    for line in topic_section(&lines, &topic.id) {
        output.push_str(&line.text);
        output.push('\n');
    }

    print_or_page(&output, config.general.pager)?;
    Ok(())
}
