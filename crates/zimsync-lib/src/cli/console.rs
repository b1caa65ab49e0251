//! Terminal presentation of reconciliation events.
//!
//! Status lines go through `tracing`; transfers get an `indicatif` bar when
//! stderr is a terminal, and 10% milestones in the log otherwise.

use crate::reconcile::{Plan, ReconcileEvent, Reporter, SkipReason, TransferOutcome};
use crate::transfer::TransferProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use tracing::{error, info, warn};

const BAR_TEMPLATE: &str =
    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {bytes_per_sec}, eta {eta}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes} ({bytes_per_sec})";

pub struct ConsoleReporter {
    draw_bars: bool,
    bar: Option<ProgressBar>,
    last_milestone: u64,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::with_bars(std::io::stderr().is_terminal())
    }

    pub fn with_bars(draw_bars: bool) -> Self {
        Self {
            draw_bars,
            bar: None,
            last_milestone: 0,
        }
    }

    fn start_transfer(&mut self, file_name: &str, expected: Option<u64>) {
        self.last_milestone = 0;
        if !self.draw_bars {
            return;
        }

        let bar = match expected {
            Some(total) => ProgressBar::new(total).with_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            ),
            None => ProgressBar::new_spinner().with_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            ),
        };
        bar.set_message(file_name.to_string());
        self.bar = Some(bar);
    }

    fn progress(&mut self, file_name: &str, progress: TransferProgress) {
        if let Some(bar) = &self.bar {
            if let (Some(total), None) = (progress.total, bar.length()) {
                bar.set_length(total);
            }
            bar.set_position(progress.downloaded);
            return;
        }

        // Silent accumulation when the total is unknown.
        let Some(percent) = progress.percent() else {
            return;
        };
        let milestone = (percent / 10.0).floor() as u64;
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            info!("Downloading {}: {:.2}%", file_name, percent);
        }
    }

    fn finish_transfer(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: ReconcileEvent<'_>) {
        match event {
            ReconcileEvent::ListingFetched { index, entries: 0 } => {
                info!(index = %index, "No .zim files found on the index page");
            }
            ReconcileEvent::ListingFetched { index, entries } => {
                info!(index = %index, "Found {} .zim files", entries);
            }
            ReconcileEvent::NameConflict {
                file_name,
                kept,
                rejected,
            } => {
                warn!(
                    kept = %kept,
                    rejected = %rejected,
                    "CONFLICT: {} is claimed by more than one URL, keeping the first",
                    file_name
                );
            }
            ReconcileEvent::EntryPlanned {
                url,
                file_name,
                plan,
                ..
            } => match plan {
                Plan::Fetch {
                    expected: Some(expected),
                    stale: Some(stale),
                } => info!(
                    url = %url,
                    "INCOMPLETE: {} (local: {}, remote: {}), redownloading",
                    file_name, stale, expected
                ),
                Plan::Fetch { stale: Some(_), .. } => {
                    info!(url = %url, "INCOMPLETE: {}, redownloading", file_name)
                }
                Plan::Fetch { stale: None, .. } => {
                    info!(url = %url, "MISSING: {}, downloading", file_name)
                }
                Plan::UpToDate | Plan::Skip(_) => {
                    tracing::debug!(url = %url, file = file_name, plan = %plan, "Planned")
                }
            },
            ReconcileEvent::TransferStarted {
                file_name,
                expected,
                ..
            } => self.start_transfer(file_name, expected),
            ReconcileEvent::TransferProgress {
                file_name,
                progress,
            } => self.progress(file_name, progress),
            ReconcileEvent::EntryResolved {
                url,
                file_name,
                outcome,
            } => {
                self.finish_transfer();
                let name = file_name.unwrap_or(url.as_str());
                match outcome {
                    TransferOutcome::UpToDate => info!("OK: {}", name),
                    TransferOutcome::Downloaded(bytes) => {
                        info!("Downloaded {} ({} bytes)", name, bytes)
                    }
                    TransferOutcome::Redownloaded(bytes) => {
                        info!("Redownloaded {} ({} bytes)", name, bytes)
                    }
                    TransferOutcome::Skipped(reason @ SkipReason::SizeUnknown { .. }) => {
                        warn!(url = %url, "Skipping {}: {}", name, reason)
                    }
                    TransferOutcome::Skipped(reason) => info!("Skipping {}: {}", name, reason),
                    TransferOutcome::Failed(err) => error!(url = %url, "Failed {}: {}", name, err),
                }
            }
            ReconcileEvent::Completed { summary } => {
                if summary.has_failures() {
                    warn!("Reconciliation finished with failures: {}", summary);
                } else {
                    info!("Reconciliation finished: {}", summary);
                }
            }
        }
    }
}
