//! CLI runner - executes commands

use crate::auth::{FileTokenStore, LogNavigator, Navigator, TokenStore, TokenSupplier};
use crate::cli::commands::{Cli, Commands};
use crate::config::{load_settings, ClientSettings};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use reqwest::Response;
use serde_json::Value;
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let store = Arc::new(FileTokenStore::new(&self.cli.token_file));
        let client = self.build_client(Arc::clone(&store))?;

        match &self.cli.command {
            Commands::Login { token } => {
                if token.is_empty() {
                    return Err(Error::invalid_value("token", "cannot be empty"));
                }
                store.set_token(token)?;
                client.update_bearer_token();
                println!("Logged in, token saved to {}", store.path().display());
                Ok(())
            }
            Commands::Logout => {
                store.clear_token();
                client.update_bearer_token();
                println!("Logged out");
                Ok(())
            }
            Commands::Status => {
                match store.load()? {
                    Some(stored) if !stored.token.is_empty() => {
                        println!("Logged in since {}", stored.saved_at.to_rfc3339());
                    }
                    _ => println!("Logged out"),
                }
                Ok(())
            }
            Commands::Get { url } => print_body(client.get(url).await?).await,
            Commands::Post { url, data } => {
                let body: Value = serde_json::from_str(data)?;
                print_body(client.post(url, body).await?).await
            }
            Commands::Delete { url } => print_body(client.delete(url).await?).await,
        }
    }

    /// Build a client wired to the token file
    fn build_client(&self, store: Arc<FileTokenStore>) -> Result<HttpClient> {
        let settings = match &self.cli.config {
            Some(path) => load_settings(path)?,
            None => ClientSettings::default(),
        };

        let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
        HttpClient::with_bearer_auth(settings.into_config(), store, Some(navigator))
    }
}

/// Print a response body, pretty-printing JSON
async fn print_body(response: Response) -> Result<()> {
    let text = response.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }
    Ok(())
}
