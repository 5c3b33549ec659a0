//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bearer client CLI
#[derive(Parser, Debug)]
#[command(name = "bearer-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// File holding the stored token (JSON)
    #[arg(short, long, global = true, default_value = ".bearer-token.json")]
    pub token_file: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a token for future requests
    Login {
        /// Bearer token
        #[arg(long)]
        token: String,
    },

    /// Discard the stored token
    Logout,

    /// Show whether a token is stored
    Status,

    /// Send a GET request
    Get {
        /// URL or path relative to the configured base URL
        url: String,
    },

    /// Send a POST request with a JSON body
    Post {
        /// URL or path relative to the configured base URL
        url: String,

        /// Inline JSON body
        #[arg(long, default_value = "{}")]
        data: String,
    },

    /// Send a DELETE request
    Delete {
        /// URL or path relative to the configured base URL
        url: String,
    },
}
