//! CLI module
//!
//! Command-line interface for calling APIs with a stored bearer token.
//!
//! # Commands
//!
//! - `login` - Store a token
//! - `logout` - Discard the stored token
//! - `status` - Show whether a token is stored
//! - `get` / `post` / `delete` - Send a request with the stored token

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
