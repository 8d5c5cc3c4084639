use std::process::ExitCode;

use albumup_core::config::AlbumupConfig;
use albumup_core::models::directive::UploadDirective;
use albumup_core::models::outcome::BatchResult;
use albumup_upload::{BatchOrchestrator, UploadOptions};
use clap::Args;

use crate::prompt::{path_or_ask, ConsoleConfirm};

#[derive(Args)]
pub struct UploadArgs {
    /// Folder to upload (asked for when left out)
    path: Option<String>,
    /// Add missing files to albums that already exist (yes, no). Asks when unset
    #[arg(long, value_parser = clap::value_parser!(UploadDirective))]
    add_if_exists: Option<UploadDirective>,
}

impl UploadArgs {
    fn directive(&self, config: &AlbumupConfig) -> UploadDirective {
        self.add_if_exists.unwrap_or_else(|| config.default_directive())
    }
}

fn print_summary(batch: &BatchResult) {
    println!();
    println!();
    print!("{}", batch.render_summary());
    println!();
}

pub async fn run_album(args: UploadArgs) -> anyhow::Result<ExitCode> {
    let config = AlbumupConfig::load()?;
    let directive = args.directive(&config);
    let path = path_or_ask(
        args.path,
        "# Upload Folder as Album into Google Photos",
        "What folder do you want to upload?",
    )?;

    if !path.is_dir() {
        tracing::error!("the file path could not be found: '{}'", path.display());
        println!("The folder could not be found. Please try again.");
        return Ok(ExitCode::FAILURE);
    }

    let library = super::connect(&config)?;
    let orchestrator =
        BatchOrchestrator::new(library.as_ref(), &ConsoleConfirm, UploadOptions::from(&config));

    let outcome = orchestrator.process_single_album(&path, directive).await?;
    let success = outcome.success();

    let mut batch = BatchResult::new();
    batch.push(outcome);
    print_summary(&batch);

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn run_main_dir(args: UploadArgs) -> anyhow::Result<ExitCode> {
    let config = AlbumupConfig::load()?;
    let directive = args.directive(&config);
    let path = path_or_ask(
        args.path,
        "# Upload Child Folders in main Folder as Albums into Google Photos",
        "What is the path to the main Folder?",
    )?;

    if !path.is_dir() {
        println!(
            "The folder '{}' could not be found. Please try again.",
            path.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    let library = super::connect(&config)?;
    let orchestrator =
        BatchOrchestrator::new(library.as_ref(), &ConsoleConfirm, UploadOptions::from(&config));

    let batch = orchestrator.process_main_directory(&path, directive).await?;
    for outcome in batch.outcomes().iter().filter(|o| !o.success()) {
        println!("Upload failed of Album '{}'", outcome.album_title());
    }
    print_summary(&batch);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: UploadArgs,
    }

    #[test]
    fn test_add_if_exists_parsed_by_clap() {
        let cli =
            TestCli::try_parse_from(["albumup", "/tmp/Trip", "--add-if-exists", "yes"]).unwrap();
        assert_eq!(cli.args.add_if_exists, Some(UploadDirective::Yes));
        assert_eq!(cli.args.path.as_deref(), Some("/tmp/Trip"));
    }

    #[test]
    fn test_add_if_exists_rejects_unknown_value() {
        let err = TestCli::try_parse_from(["albumup", "--add-if-exists", "maybe"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_directive_falls_back_to_config() {
        let cli = TestCli::try_parse_from(["albumup"]).unwrap();
        let config = AlbumupConfig {
            add_if_exists: Some(false),
            ..AlbumupConfig::default()
        };
        assert_eq!(cli.args.directive(&config), UploadDirective::No);
    }
}
