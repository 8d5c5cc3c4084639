pub mod albums;
pub mod auth;
pub mod config;
pub mod upload;

use std::process::ExitCode;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Upload a folder as one album
    Album(upload::UploadArgs),
    /// Upload each subfolder of a main folder as its own album
    MainDir(upload::UploadArgs),
    /// Inspect albums in the photo library
    Albums {
        #[command(subcommand)]
        action: albums::AlbumsAction,
    },
    /// Manage the photo library access token
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Initialize and show albumup configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

pub async fn run(cmd: Command) -> anyhow::Result<ExitCode> {
    match cmd {
        Command::Album(args) => upload::run_album(args).await,
        Command::MainDir(args) => upload::run_main_dir(args).await,
        Command::Albums { action } => albums::run(action).await,
        Command::Auth { action } => auth::run(action).await,
        Command::Config { action } => config::run(action),
    }
}

/// Build the photo library client from config and the stored access token.
pub fn connect(
    config: &albumup_core::config::AlbumupConfig,
) -> anyhow::Result<Box<dyn albumup_remote::PhotoLibrary>> {
    use albumup_auth::{resolve_access_token, KeyringStore, ACCESS_TOKEN_ENV};

    let store = KeyringStore::new();
    let token = resolve_access_token(&store)?.ok_or_else(|| {
        anyhow::anyhow!(
            "No access token found. Use `albumup auth set-token` or set {ACCESS_TOKEN_ENV}."
        )
    })?;
    Ok(albumup_remote::create_library(
        &config.api_url,
        &token,
        config.album_page_size,
    )?)
}
