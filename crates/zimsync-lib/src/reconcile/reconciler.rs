use super::outcome::{EntryReport, ReconcileReport, Summary, TransferOutcome};
use super::plan::{Plan, ReconcileMode, SkipReason, plan_fetch_missing, plan_verify};
use super::reporter::{ReconcileEvent, Reporter};
use crate::discovery::fetch_listing;
use crate::error::{EntryError, ZimSyncError};
use crate::local::LocalFile;
use crate::naming::checked_file_name;
use crate::remote::Remote;
use crate::transfer::{TransferEngine, Transferred};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub output_dir: PathBuf,
    pub mode: ReconcileMode,
    /// Plan only: nothing is deleted or downloaded.
    pub dry_run: bool,
}

/// Brings a local directory in line with a remote archive listing.
///
/// Entries are handled one at a time in listing order and every failure is
/// confined to its entry. No state is kept between runs: the listing and
/// the files on disk are the whole truth, so an interrupted run is simply
/// picked up by the next one.
pub struct Reconciler<R> {
    remote: R,
    engine: TransferEngine,
    options: ReconcileOptions,
}

impl<R: Remote> Reconciler<R> {
    pub fn new(remote: R, engine: TransferEngine, options: ReconcileOptions) -> Self {
        Self {
            remote,
            engine,
            options,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Discovers the archives linked from `index_url` and reconciles them.
    ///
    /// Only a missing output directory or an unobtainable listing fail the
    /// whole pass.
    pub async fn run_index(
        &self,
        index_url: &Url,
        reporter: &mut impl Reporter,
    ) -> Result<ReconcileReport, ZimSyncError> {
        if !self.options.dry_run {
            tokio::fs::create_dir_all(&self.options.output_dir)
                .await
                .map_err(|e| ZimSyncError::DownloadDirectoryCreation {
                    path: self.options.output_dir.clone(),
                    reason: e.to_string(),
                })?;
        }

        let listing = fetch_listing(&self.remote, index_url).await?;
        reporter.report(ReconcileEvent::ListingFetched {
            index: index_url,
            entries: listing.len(),
        });

        Ok(self.run(&listing, reporter).await)
    }

    pub async fn run(&self, listing: &[Url], reporter: &mut impl Reporter) -> ReconcileReport {
        let mut claims: HashMap<String, Url> = HashMap::new();
        let mut entries = Vec::with_capacity(listing.len());
        let mut summary = Summary::default();

        for url in listing {
            let (file_name, outcome) = self.resolve_entry(url, &mut claims, reporter).await;

            reporter.report(ReconcileEvent::EntryResolved {
                url,
                file_name: file_name.as_deref(),
                outcome: &outcome,
            });
            summary.record(&outcome);
            entries.push(EntryReport {
                url: url.clone(),
                file_name,
                outcome,
            });
        }

        reporter.report(ReconcileEvent::Completed { summary: &summary });
        ReconcileReport { entries, summary }
    }

    async fn resolve_entry(
        &self,
        url: &Url,
        claims: &mut HashMap<String, Url>,
        reporter: &mut impl Reporter,
    ) -> (Option<String>, TransferOutcome) {
        if let Some(matcher) = self.engine.excluded(url) {
            let outcome = TransferOutcome::Skipped(SkipReason::Excluded {
                matcher: matcher.to_string(),
            });
            return (checked_file_name(url).ok(), outcome);
        }

        let file_name = match checked_file_name(url) {
            Ok(name) => name,
            Err(err) => return (None, TransferOutcome::Failed(err)),
        };

        // First URL to claim a name keeps it; later distinct URLs would
        // otherwise overwrite each other on every run.
        match claims.entry(file_name.clone()) {
            Entry::Occupied(claim) if claim.get() != url => {
                reporter.report(ReconcileEvent::NameConflict {
                    file_name: &file_name,
                    kept: claim.get(),
                    rejected: url,
                });
                let outcome = TransferOutcome::Skipped(SkipReason::NameConflict {
                    claimed_by: claim.get().clone(),
                });
                return (Some(file_name), outcome);
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(url.clone());
            }
        }

        let outcome = self.resolve_named(url, &file_name, reporter).await;
        (Some(file_name), outcome)
    }

    async fn resolve_named(
        &self,
        url: &Url,
        file_name: &str,
        reporter: &mut impl Reporter,
    ) -> TransferOutcome {
        let dest = self.options.output_dir.join(file_name);

        let remote_size = match self.options.mode {
            ReconcileMode::Verify => Some(self.remote.content_length(url).await),
            ReconcileMode::FetchMissing => None,
        };

        let local = match LocalFile::probe(&dest).await {
            Ok(local) => local,
            Err(err) => return TransferOutcome::Failed(err),
        };

        let plan = match &remote_size {
            Some(size) => plan_verify(&local, size),
            None => plan_fetch_missing(&local),
        };
        reporter.report(ReconcileEvent::EntryPlanned {
            url,
            file_name,
            local: &local,
            plan: &plan,
        });

        match plan {
            Plan::Skip(reason) => TransferOutcome::Skipped(reason),
            Plan::UpToDate => TransferOutcome::UpToDate,
            plan @ Plan::Fetch { .. } if self.options.dry_run => {
                TransferOutcome::Skipped(SkipReason::DryRun(Box::new(plan)))
            }
            Plan::Fetch { expected, stale } => {
                self.fetch(url, file_name, &dest, expected, stale.is_some(), reporter)
                    .await
            }
        }
    }

    async fn fetch(
        &self,
        url: &Url,
        file_name: &str,
        dest: &Path,
        expected: Option<u64>,
        replace: bool,
        reporter: &mut impl Reporter,
    ) -> TransferOutcome {
        if replace {
            if let Err(source) = tokio::fs::remove_file(dest).await {
                if source.kind() != ErrorKind::NotFound {
                    return TransferOutcome::Failed(EntryError::RemoveStale {
                        path: dest.to_path_buf(),
                        source,
                    });
                }
            }
        }

        reporter.report(ReconcileEvent::TransferStarted {
            url,
            file_name,
            expected,
        });

        let transferred = self
            .engine
            .transfer(&self.remote, url, dest, expected, |progress| {
                reporter.report(ReconcileEvent::TransferProgress {
                    file_name,
                    progress,
                })
            })
            .await;

        match transferred {
            Transferred::Completed(written) if replace => TransferOutcome::Redownloaded(written),
            Transferred::Completed(written) => TransferOutcome::Downloaded(written),
            Transferred::Excluded(matcher) => TransferOutcome::Skipped(SkipReason::Excluded {
                matcher: matcher.to_string(),
            }),
            Transferred::Failed(err) => TransferOutcome::Failed(err.into()),
        }
    }
}
