/*!
 * Configuration handling for itemview
 */

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::Result;
use crate::report::ReportFormat;
use crate::sql::DEFAULT_EXPORT_FILE;
use crate::{bail, ensure};

/// Command-line arguments for itemview
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "itemview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse FFXI item XML exports and export item_basic SQL rows",
    long_about = "Loads an item XML export, lets you search items, shows decoded attributes (skill, element, slots, flags, jobs) and exports rows as item_basic SQL INSERT statements."
)]
pub struct Args {
    /// Report format
    #[clap(long, value_enum, global = true, default_value_t = ReportFormat::default())]
    pub format: ReportFormat,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List usable items, optionally filtered by id or name
    List {
        /// Item XML export
        file: PathBuf,

        /// Case-insensitive text to match against item ids and names
        #[clap(long, short)]
        query: Option<String>,
    },

    /// Show the decoded details of one item
    Show {
        /// Item XML export
        file: PathBuf,

        /// Item id, or item name
        key: String,

        /// Write the item icon to this image file
        #[clap(long, value_name = "PATH")]
        save_icon: Option<PathBuf>,

        /// Disable colored element names
        #[clap(long)]
        no_color: bool,
    },

    /// Print the item_basic INSERT statement for one item
    Sql {
        /// Item XML export
        file: PathBuf,

        /// Item id, or item name
        key: String,

        /// Copy the statement to the system clipboard
        #[clap(long, help = "Copy the statement to the system clipboard")]
        clip: bool,
    },

    /// Write INSERT statements for every usable item
    Export {
        /// Item XML export
        file: PathBuf,

        /// Output SQL file
        #[clap(default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
}

/// What the application should do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Print shell completions
    Completions(Shell),
    /// Browse or search
    List { query: Option<String> },
    /// Render item details
    Show {
        key: String,
        save_icon: Option<PathBuf>,
        color: bool,
    },
    /// Single-item SQL export
    Sql { key: String, clip: bool },
    /// Full SQL export
    Export { output_file: PathBuf },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Item export to load (absent for completions)
    pub input_file: Option<PathBuf>,

    /// Requested action
    pub action: Action,

    /// Report format
    pub format: ReportFormat,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let (input_file, action) = match (args.generate, args.command) {
            (Some(shell), _) => (None, Action::Completions(shell)),
            (None, Some(Command::List { file, query })) => (Some(file), Action::List { query }),
            (
                None,
                Some(Command::Show {
                    file,
                    key,
                    save_icon,
                    no_color,
                }),
            ) => (
                Some(file),
                Action::Show {
                    key,
                    save_icon,
                    color: !no_color,
                },
            ),
            (None, Some(Command::Sql { file, key, clip })) => (Some(file), Action::Sql { key, clip }),
            (None, Some(Command::Export { file, output })) => {
                (Some(file), Action::Export { output_file: output })
            }
            (None, None) => bail!(Config, "a subcommand is required (see --help)"),
        };

        Ok(Self {
            input_file,
            action,
            format: args.format,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input_file {
            ensure!(
                input.is_file(),
                FileNotFound,
                "{}",
                input.display()
            );
        }

        let output_dirs = match &self.action {
            Action::Export { output_file } => vec![output_file],
            Action::Show {
                save_icon: Some(path),
                ..
            } => vec![path],
            _ => Vec::new(),
        };

        for path in output_dirs {
            if let Some(parent) = path.parent() {
                ensure!(
                    parent.as_os_str().is_empty() || parent.is_dir(),
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemViewError;

    fn config(argv: &[&str]) -> Result<Config> {
        Config::from_args(Args::parse_from(argv))
    }

    #[test]
    fn test_list_args() {
        let config = config(&["itemview", "list", "items.xml", "--query", "crystal"]).unwrap();
        assert_eq!(config.input_file, Some(PathBuf::from("items.xml")));
        assert_eq!(
            config.action,
            Action::List {
                query: Some("crystal".to_string())
            }
        );
        assert_eq!(config.format, ReportFormat::ConsoleTable);
    }

    #[test]
    fn test_export_default_output() {
        let config = config(&["itemview", "--format", "json", "export", "items.xml"]).unwrap();
        assert_eq!(
            config.action,
            Action::Export {
                output_file: PathBuf::from("item_basic_export.sql")
            }
        );
        assert_eq!(config.format, ReportFormat::Json);
    }

    #[test]
    fn test_show_and_sql_args() {
        let show = config(&["itemview", "show", "items.xml", "16385", "--no-color"]).unwrap();
        assert_eq!(
            show.action,
            Action::Show {
                key: "16385".to_string(),
                save_icon: None,
                color: false
            }
        );

        let sql = config(&["itemview", "sql", "items.xml", "Cesti", "--clip"]).unwrap();
        assert_eq!(
            sql.action,
            Action::Sql {
                key: "Cesti".to_string(),
                clip: true
            }
        );
    }

    #[test]
    fn test_completions_need_no_input() {
        let config = config(&["itemview", "--generate", "bash"]).unwrap();
        assert_eq!(config.action, Action::Completions(Shell::Bash));
        assert!(config.input_file.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(matches!(config(&["itemview"]), Err(ItemViewError::Config(_))));
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("items.xml");
        std::fs::write(&input, "<things/>").unwrap();
        let input = input.to_string_lossy().to_string();

        let missing = config(&["itemview", "list", "nope/items.xml"]).unwrap();
        assert!(matches!(
            missing.validate(),
            Err(ItemViewError::FileNotFound(_))
        ));

        let bad_output = config(&["itemview", "export", &input, "no/such/dir/out.sql"]).unwrap();
        assert!(matches!(bad_output.validate(), Err(ItemViewError::Config(_))));

        let ok = config(&["itemview", "export", &input, "out.sql"]).unwrap();
        ok.validate().unwrap();
    }
}
