use zimsync_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_download, run_verify};
use zimsync_lib::error::ZimSyncError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), ZimSyncError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Verify(params) => run_verify(params).await?,
        ResolvedCommand::Download(params) => run_download(params).await?,
    }

    Ok(())
}
