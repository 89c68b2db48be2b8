use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::query::Query;
use crate::types::{Complexity, FieldFilter, SortBy, ViewTab};

/// Script Hub - browse, upload and share automation scripts
#[derive(Parser)]
#[command(name = "scripthub")]
#[command(about = "Browse the curated script catalog and manage your own uploads")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the directory the user store is kept in
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog entries, filtered and sorted
    List(ListArgs),
    /// Show details and source of one entry
    Show {
        id: u64,
    },
    /// Upload a script file
    Upload(UploadArgs),
    /// Delete one of your uploads
    Delete {
        id: u64,
    },
    /// Print the script source (terminal clipboard)
    Copy {
        id: u64,
    },
    /// Save the script under its original file name
    Download {
        id: u64,
        /// Target directory (defaults to the configured download_dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Print a shareable link to an entry
    Share {
        id: u64,
    },
    /// Validate a configuration file
    ValidateConfig {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive search over title, description and tags
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact language, or "all"
    #[arg(short, long, default_value = "all")]
    pub language: FieldFilter<String>,

    /// Beginner, Intermediate, Advanced, or "all"
    #[arg(short = 'x', long, default_value = "all")]
    pub complexity: FieldFilter<Complexity>,

    /// Exact category, or "all"
    #[arg(short, long, default_value = "all")]
    pub category: FieldFilter<String>,

    /// newest, oldest, alphabetical, complexity
    #[arg(long, default_value = "newest")]
    pub sort: SortBy,

    /// all, mine, curated
    #[arg(short, long, default_value = "all")]
    pub tab: ViewTab,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn to_query(&self) -> Query {
        Query {
            search_term: self.search.clone(),
            language: self.language.clone(),
            complexity: self.complexity.clone(),
            category: self.category.clone(),
            sort_by: self.sort,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Script file to upload
    pub file: PathBuf,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub language: String,

    /// Beginner, Intermediate or Advanced
    #[arg(long)]
    pub complexity: String,

    #[arg(long)]
    pub category: String,

    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["scripthub"]).is_err());
    }

    #[test]
    fn test_cli_list_defaults() {
        let cli = Cli::try_parse_from(["scripthub", "list"]).unwrap();
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.to_query(), Query::default());
                assert_eq!(args.tab, ViewTab::All);
                assert!(!args.json);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_list_with_filters() {
        let cli = Cli::try_parse_from([
            "scripthub",
            "list",
            "--search",
            "csv",
            "--language",
            "Python",
            "--complexity",
            "advanced",
            "--sort",
            "alphabetical",
            "--tab",
            "curated",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else {
            panic!("Expected List command");
        };
        let query = args.to_query();
        assert_eq!(query.search_term, "csv");
        assert_eq!(query.language, FieldFilter::Only("Python".to_string()));
        assert_eq!(query.complexity, FieldFilter::Only(Complexity::Advanced));
        assert_eq!(query.category, FieldFilter::All);
        assert_eq!(query.sort_by, SortBy::Alphabetical);
        assert_eq!(args.tab, ViewTab::Curated);
    }

    #[test]
    fn test_cli_list_rejects_unknown_complexity() {
        assert!(Cli::try_parse_from(["scripthub", "list", "--complexity", "expert"]).is_err());
        assert!(Cli::try_parse_from(["scripthub", "list", "--sort", "random"]).is_err());
    }

    #[test]
    fn test_cli_upload() {
        let cli = Cli::try_parse_from([
            "scripthub",
            "upload",
            "cleanup.sh",
            "--title",
            "Cleanup",
            "--description",
            "Removes temp files",
            "--language",
            "Bash",
            "--complexity",
            "Intermediate",
            "--category",
            "Automation",
            "--tags",
            "tmp, disk",
        ])
        .unwrap();

        let Commands::Upload(args) = cli.command else {
            panic!("Expected Upload command");
        };
        assert_eq!(args.file, PathBuf::from("cleanup.sh"));
        assert_eq!(args.complexity, "Intermediate");
        assert_eq!(args.tags, "tmp, disk");
    }

    #[test]
    fn test_cli_upload_requires_complexity() {
        let result = Cli::try_parse_from([
            "scripthub",
            "upload",
            "cleanup.sh",
            "--title",
            "Cleanup",
            "--description",
            "Removes temp files",
            "--language",
            "Bash",
            "--category",
            "Automation",
        ]);
        let err = result.err().expect("upload without --complexity should be rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "scripthub",
            "delete",
            "42",
            "--data-dir",
            "/tmp/hub",
            "--config",
            "/etc/scripthub.json",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/hub")));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/scripthub.json")));
        assert!(matches!(cli.command, Commands::Delete { id: 42 }));
    }

    #[test]
    fn test_cli_download_dir() {
        let cli = Cli::try_parse_from(["scripthub", "download", "1", "-d", "out"]).unwrap();
        match cli.command {
            Commands::Download { id, dir } => {
                assert_eq!(id, 1);
                assert_eq!(dir, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected Download command"),
        }
    }

    #[test]
    fn test_cli_validate_config_command() {
        let cli = Cli::try_parse_from(["scripthub", "validate-config", "hub.json"]).unwrap();
        assert!(matches!(cli.command, Commands::ValidateConfig { .. }));
    }
}
