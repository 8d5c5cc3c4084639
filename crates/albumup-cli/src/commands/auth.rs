use std::process::ExitCode;

use albumup_auth::{CredentialStore, KeyringStore, ACCESS_TOKEN_ENV, ACCESS_TOKEN_KEY};
use albumup_core::config::AlbumupConfig;
use clap::Subcommand;
use console::Term;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store an OAuth access token in the OS keychain
    SetToken {
        /// Access token (will prompt if not provided)
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the stored access token
    Clear,
    /// Show where the token comes from and check it against the library
    Status,
}

pub async fn run(action: AuthAction) -> anyhow::Result<ExitCode> {
    let store = KeyringStore::new();
    match action {
        AuthAction::SetToken { token } => {
            let token = match token {
                Some(t) => t,
                None => {
                    let term = Term::stderr();
                    term.write_str("Enter access token: ")?;
                    term.read_secure_line()?
                }
            };
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("Token cannot be empty");
            }

            store.store(ACCESS_TOKEN_KEY, token)?;
            println!("Token stored in OS keychain as '{ACCESS_TOKEN_KEY}'");
            Ok(ExitCode::SUCCESS)
        }
        AuthAction::Clear => {
            store.delete(ACCESS_TOKEN_KEY)?;
            println!("Stored token removed");
            Ok(ExitCode::SUCCESS)
        }
        AuthAction::Status => {
            if std::env::var(ACCESS_TOKEN_ENV).is_ok() {
                println!("Token source:   {ACCESS_TOKEN_ENV}");
            } else if store.get(ACCESS_TOKEN_KEY)?.is_some() {
                println!("Token source:   OS keychain ({ACCESS_TOKEN_KEY})");
            } else {
                println!("No access token configured.");
                return Ok(ExitCode::FAILURE);
            }

            let config = AlbumupConfig::load()?;
            let library = super::connect(&config)?;
            match library.list_albums().await {
                Ok(albums) => {
                    println!("Token is valid: {} albums visible", albums.len());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("Token check failed: {e}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
