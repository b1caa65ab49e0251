use crate::cli::args::{Command, SyncArgs};
use crate::cli::params::SyncParams;
use crate::config::{Config, load_config};
use crate::error::ZimSyncError;
use crate::transfer::Denylist;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Verify(SyncParams),
    Download(SyncParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, ZimSyncError> {
    match command {
        Command::Verify(args) => Ok(ResolvedCommand::Verify(resolve_sync_args(args)?)),
        Command::Download(args) => Ok(ResolvedCommand::Download(resolve_sync_args(args)?)),
    }
}

/// Merges command line arguments over the optional config file.
fn resolve_sync_args(args: SyncArgs) -> Result<SyncParams, ZimSyncError> {
    let app_config = match &args.config_path {
        Some(config_path) => load_config(config_path)?,
        None => Config::default(),
    };

    let raw_url = args
        .source_url
        .or(app_config.source_url)
        .ok_or_else(|| ZimSyncError::CliArgumentValidation {
            details: "No index URL provided. Pass --url or configure source_url.".to_string(),
        })?;
    let source_url = Url::parse(&raw_url).map_err(|e| ZimSyncError::InvalidUrl {
        url: raw_url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(source_url.scheme(), "http" | "https") {
        return Err(ZimSyncError::InvalidUrl {
            url: raw_url,
            reason: "only http and https index pages are supported".to_string(),
        });
    }

    let output_dir = args
        .output_dir
        .map(PathBuf::from)
        .or(app_config.output.path)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut http = app_config.http;
    if let Some(secs) = args.connect_timeout_secs {
        http.connect_timeout_secs = secs;
    }
    if let Some(secs) = args.read_timeout_secs {
        http.read_timeout_secs = secs;
    }
    for (name, value) in [
        ("connect-timeout", http.connect_timeout_secs),
        ("read-timeout", http.read_timeout_secs),
    ] {
        if value == 0 {
            return Err(ZimSyncError::CliArgumentValidation {
                details: format!("{name} must be greater than 0."),
            });
        }
    }

    let denylist = Denylist::compile(app_config.denylist.iter().chain(args.deny.iter()))?;

    Ok(SyncParams {
        source_url,
        output_dir,
        denylist,
        http,
        dry_run: args.dry_run,
    })
}
