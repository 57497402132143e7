use crate::commands::{browse, configure, list, show};
use crate::config::{Config, FormulaPolicy};
use crate::view::FormulaKey;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grammarbook")]
#[command(about = "Browse grammar topics, rules and formulas from Firestore")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable debug logging on stderr")]
    pub debug: bool,

    #[arg(long, value_name = "JSON", help = "Read topics from a JSON export instead of Firestore")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "Disable coloured output")]
    pub no_color: bool,

    #[arg(long, value_enum, help = "How many formulas may be open at once (overrides config)")]
    pub formula_policy: Option<FormulaPolicy>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Fold command-line overrides into the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.no_color {
            config.general.color = false;
        }
        if let Some(policy) = self.formula_policy {
            config.general.formula_policy = policy;
        }
    }
}

impl Commands {
    pub async fn execute(self, config: Config, file: Option<&Path>) -> Result<()> {
        match self {
            Commands::Browse(args) => {
                browse::handle_browse_command(config, file, &args).await?;
            }
            Commands::List(args) => {
                list::handle_list_command(config, file, &args).await?;
            }
            Commands::Show(args) => {
                show::handle_show_command(config, file, &args).await?;
            }
            Commands::Config(args) => {
                configure::handle_config_command(config, args.command)?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse topics interactively (default)
    Browse(BrowseArgs),

    /// Print the topic list once
    List(ListArgs),

    /// Print one topic with every formula open
    Show(ShowArgs),

    /// Configuration management
    Config(ConfigArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Browse(BrowseArgs::default())
    }
}

#[derive(Args, Default)]
pub struct BrowseArgs {
    #[arg(short, long, value_name = "TOPIC_ID", help = "Topic expanded once loaded")]
    pub expand: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, value_name = "TOPIC_ID", help = "Topic expanded once loaded")]
    pub expand: Option<String>,

    #[arg(
        short,
        long = "open",
        value_name = "TOPIC-RULE-FORMULA",
        help = "Toggle a formula open, e.g. t1-0-0 (repeatable)"
    )]
    pub open: Vec<FormulaKey>,

    #[arg(short, long, value_enum, default_value_t = ListFormat::Tree)]
    pub format: ListFormat,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(help = "Topic id")]
    pub id: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListFormat {
    Tree,
    Json,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_browse() {
        let cli = Cli::try_parse_from(["grammarbook"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Commands::default(), Commands::Browse(BrowseArgs { expand: None })));
    }

    #[test]
    fn test_list_args_parse_formula_keys() {
        let cli = Cli::try_parse_from([
            "grammarbook", "list", "--expand", "t1", "--open", "t1-0-0", "--open", "t1-1-2",
        ])
        .unwrap();

        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.expand.as_deref(), Some("t1"));
        assert_eq!(
            args.open,
            vec![FormulaKey::new("t1", 0, 0), FormulaKey::new("t1", 1, 2)]
        );
        assert_eq!(args.format, ListFormat::Tree);
    }

    #[test]
    fn test_bad_formula_key_is_rejected() {
        assert!(Cli::try_parse_from(["grammarbook", "list", "--open", "t1"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "grammarbook", "--no-color", "--formula-policy", "multi", "list",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert!(!config.general.color);
        assert_eq!(config.general.formula_policy, FormulaPolicy::Multi);
    }
}
