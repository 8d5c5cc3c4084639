use std::process::ExitCode;

use albumup_core::config::AlbumupConfig;
use clap::Subcommand;
use comfy_table::{Cell, Color, Table};

#[derive(Subcommand)]
pub enum AlbumsAction {
    /// List albums in the photo library
    List {
        /// Only show albums albumup may add items to
        #[arg(long)]
        writable: bool,
    },
}

pub async fn run(action: AlbumsAction) -> anyhow::Result<ExitCode> {
    match action {
        AlbumsAction::List { writable } => {
            let config = AlbumupConfig::load()?;
            let library = super::connect(&config)?;

            let mut albums = library.list_albums().await?;
            albums.retain(|a| !writable || a.is_writeable);
            albums.sort_by(|a, b| a.title.cmp(&b.title));

            if albums.is_empty() {
                println!("No albums found.");
                return Ok(ExitCode::SUCCESS);
            }

            let mut table = Table::new();
            table.set_header(vec!["TITLE", "ITEMS", "WRITABLE", "ID"]);
            for album in &albums {
                let (flag, color) = if album.is_writeable {
                    ("yes", Color::Green)
                } else {
                    ("no", Color::Yellow)
                };
                table.add_row(vec![
                    Cell::new(&album.title),
                    Cell::new(
                        album
                            .media_items_count
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "—".to_string()),
                    ),
                    Cell::new(flag).fg(color),
                    Cell::new(&album.id),
                ]);
            }

            println!("{table}");
            println!("{} albums", albums.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}
