use crate::cli::SyncParams;
use crate::cli::console::ConsoleReporter;
use crate::error::ZimSyncError;
use crate::reconcile::{ReconcileMode, ReconcileOptions, ReconcileReport, Reconciler, Reporter};
use crate::remote::HttpRemote;
use crate::transfer::TransferEngine;
use itertools::Itertools;

/// Checks every listed archive and refetches missing or incomplete ones.
pub async fn run_verify(params: SyncParams) -> Result<(), ZimSyncError> {
    let report = run_sync(params, ReconcileMode::Verify, &mut ConsoleReporter::new()).await?;
    ensure_no_failures(&report)
}

/// Fetches listed archives that have no local copy yet.
pub async fn run_download(params: SyncParams) -> Result<(), ZimSyncError> {
    let report = run_sync(params, ReconcileMode::FetchMissing, &mut ConsoleReporter::new()).await?;
    ensure_no_failures(&report)
}

/// Runs one reconciliation pass over HTTP. Per-archive failures are part
/// of the returned report, not an error.
pub async fn run_sync(
    params: SyncParams,
    mode: ReconcileMode,
    reporter: &mut impl Reporter,
) -> Result<ReconcileReport, ZimSyncError> {
    let SyncParams {
        source_url,
        output_dir,
        denylist,
        http,
        dry_run,
    } = params;

    tracing::info!("Fetching content from: {}", source_url);
    tracing::debug!(
        output = %output_dir.display(),
        ?mode,
        dry_run,
        "Reconciliation settings"
    );
    if !denylist.is_empty() {
        tracing::info!("Excluding URLs matching: {}", denylist.matchers().iter().join(", "));
    }

    let remote = HttpRemote::new(&http)?;
    let reconciler = Reconciler::new(
        remote,
        TransferEngine::new(denylist),
        ReconcileOptions {
            output_dir,
            mode,
            dry_run,
        },
    );

    reconciler.run_index(&source_url, reporter).await
}

fn ensure_no_failures(report: &ReconcileReport) -> Result<(), ZimSyncError> {
    if report.summary.has_failures() {
        return Err(ZimSyncError::EntriesFailed {
            failed: report.summary.failed,
            total: report.summary.total(),
        });
    }
    Ok(())
}
