//! CLI module - Command-line interface for Quill

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::{cmd_list_posts, cmd_list_users};

/// Quill - a small server-rendered blog
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the usual search paths)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// List registered accounts
    Users,

    /// List published posts
    Posts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["quill"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["quill", "users", "--config", "blog.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Users));
        assert_eq!(cli.config, Some(PathBuf::from("blog.toml")));
    }
}
