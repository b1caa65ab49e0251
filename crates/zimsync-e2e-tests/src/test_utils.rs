use eyre::Result;
use std::path::Path;
use tempfile::TempDir;
use zimsync_lib::cli::{Command, ResolvedCommand, SyncArgs, SyncParams, resolve_command};
use zimsync_lib::config::{Config, HttpConfig, OutputConfig};
use zimsync_lib::transfer::MatcherDef;

pub fn create_test_config(source_url: &str, output_dir: &Path) -> Config {
    Config {
        source_url: Some(source_url.to_string()),
        output: OutputConfig {
            path: Some(output_dir.to_path_buf()),
        },
        denylist: vec![MatcherDef::Contains("survivorlibrary".to_string())],
        http: HttpConfig {
            connect_timeout_secs: 5,
            read_timeout_secs: 5,
            user_agent: Some("zimsync-e2e".to_string()),
        },
    }
}

/// Creates a temporary directory holding `config.json` for `config`.
pub fn setup_test_environment(config: &Config) -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;

    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(config)?)?;

    Ok(temp_dir)
}

/// Resolves `args` the same way the binary does for `zimsync verify`.
pub fn build_sync_params(args: SyncArgs) -> SyncParams {
    match resolve_command(Command::Verify(args)).expect("Failed to resolve sync command") {
        ResolvedCommand::Verify(params) => params,
        ResolvedCommand::Download(_) => unreachable!("Resolved command type mismatch"),
    }
}

/// Arguments for a pass over `index_url` into `output_dir` with short
/// timeouts.
pub fn sync_args(index_url: &str, output_dir: &Path) -> SyncArgs {
    SyncArgs {
        source_url: Some(index_url.to_string()),
        output_dir: Some(output_dir.to_string_lossy().into_owned()),
        connect_timeout_secs: Some(5),
        read_timeout_secs: Some(5),
        ..SyncArgs::default()
    }
}

pub fn file_size(dir: &Path, name: &str) -> Option<u64> {
    std::fs::metadata(dir.join(name)).ok().map(|m| m.len())
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("zimsync_lib=debug,zimsync_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
