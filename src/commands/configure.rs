use crate::cli::ConfigCommands;
use crate::config::{API_KEY_ENV, Config};
use crate::utils::interactive::prompt_yes_no;
use crate::utils::{OutputStyle, print_success};
use anyhow::Result;

pub fn handle_config_command(mut config: Config, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) => handle_show_command(&config),
        Some(ConfigCommands::Path) => {
            println!("{}", Config::config_file_path().display());
            Ok(())
        }
        Some(ConfigCommands::Reset) => handle_reset_command(&mut config),
        None => handle_config_help(),
    }
}

fn handle_show_command(config: &Config) -> Result<()> {
    OutputStyle::print_header("⚙️  Grammarbook Configuration");

    println!("General:");
    OutputStyle::print_field("Color", &config.general.color.to_string());
    OutputStyle::print_field("Formulas", &format!("{:?}", config.general.formula_policy).to_lowercase());
    OutputStyle::print_field("Pager", &config.general.pager.to_string());
    if let Some(topic) = &config.general.initial_topic {
        OutputStyle::print_field("Expand", topic);
    }

    let store = &config.firestore;
    println!("Firestore:");
    OutputStyle::print_field("Project", &store.project_id);
    OutputStyle::print_field("Database", &store.database);
    OutputStyle::print_field("Collection", &store.collection);
    OutputStyle::print_field("Base URL", &store.base_url);
    let key_state = if store.api_key.is_some() {
        "✓ (config)".to_string()
    } else if store.resolved_api_key().is_some() {
        format!("✓ ({})", API_KEY_ENV)
    } else {
        "not set".to_string()
    };
    OutputStyle::print_field("API key", &key_state);
    OutputStyle::print_field("Page size", &store.page_size.to_string());
    OutputStyle::print_field("Timeout", &format!("{}s", store.timeout_secs));

    Ok(())
}

fn handle_config_help() -> Result<()> {
    println!("⚙️  Configuration Management");
    println!("==========================");
    println!("Available configuration commands:");
    println!("  grammarbook config show    - Show current configuration");
    println!("  grammarbook config path    - Print the configuration file location");
    println!("  grammarbook config reset   - Reset configuration to defaults");
    println!();
    println!("Configuration file location: {}", Config::config_file_path().display());
    Ok(())
}

fn handle_reset_command(config: &mut Config) -> Result<()> {
    if prompt_yes_no("Reset configuration to defaults? This overwrites your current settings.")? {
        *config = Config::default();
        config.save()?;
        print_success("Configuration reset to defaults");
    } else {
        println!("Reset cancelled.");
    }
    Ok(())
}
