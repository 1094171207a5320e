//! CLI module for Finn.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Finn - Azure AI Search assistant
///
/// Ask an LLM assistant questions it answers by searching an Azure AI Search index.
/// The name "Finn" comes from the Norwegian word for "find."
#[derive(Parser, Debug)]
#[command(name = "finn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FINN_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a chat in which the assistant answers using search retrieval
    Chat {
        /// Message to send (defaults to the configured question)
        message: Option<String>,

        /// Maximum automatic replies from the user proxy
        #[arg(long)]
        max_auto_replies: Option<usize>,
    },

    /// Run the search_retrieval tool directly and print its output
    Retrieve {
        /// Search query
        query: String,
    },

    /// Run a hybrid search and show documents, captions and answers
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        top: Option<u32>,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage the completion cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove all cached completions for the configured seed
    Clear,

    /// Show the cache database path
    Path,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_with_default_message() {
        let cli = Cli::try_parse_from(["finn", "chat"]).unwrap();
        match cli.command {
            Commands::Chat { message, max_auto_replies } => {
                assert!(message.is_none());
                assert!(max_auto_replies.is_none());
            }
            other => panic!("Expected chat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["finn", "retrieve", "venue", "-vv", "-c", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("/tmp/x.toml"));
        assert!(matches!(cli.command, Commands::Retrieve { .. }));
    }
}
