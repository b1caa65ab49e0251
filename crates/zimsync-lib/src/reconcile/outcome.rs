use super::plan::SkipReason;
use crate::error::EntryError;
use itertools::Itertools;
use std::fmt;
use url::Url;

/// How a single archive ended up after a reconciliation pass.
#[derive(Debug)]
pub enum TransferOutcome {
    Skipped(SkipReason),
    UpToDate,
    /// An incomplete local copy was replaced; carries bytes written.
    Redownloaded(u64),
    Downloaded(u64),
    Failed(EntryError),
}

impl TransferOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn bytes_written(&self) -> u64 {
        match self {
            Self::Redownloaded(n) | Self::Downloaded(n) => *n,
            _ => 0,
        }
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::UpToDate => write!(f, "up to date"),
            Self::Redownloaded(n) => write!(f, "redownloaded {n} bytes"),
            Self::Downloaded(n) => write!(f, "downloaded {n} bytes"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

#[derive(Debug)]
pub struct EntryReport {
    pub url: Url,
    /// `None` when no usable local name could be derived.
    pub file_name: Option<String>,
    pub outcome: TransferOutcome,
}

#[derive(Debug)]
pub struct ReconcileReport {
    pub entries: Vec<EntryReport>,
    pub summary: Summary,
}

/// Per-kind outcome counters. Independent of processing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub downloaded: usize,
    pub redownloaded: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_written: u64,
}

impl Summary {
    pub fn record(&mut self, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Skipped(_) => self.skipped += 1,
            TransferOutcome::UpToDate => self.up_to_date += 1,
            TransferOutcome::Redownloaded(_) => self.redownloaded += 1,
            TransferOutcome::Downloaded(_) => self.downloaded += 1,
            TransferOutcome::Failed(_) => self.failed += 1,
        }
        self.bytes_written += outcome.bytes_written();
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.redownloaded + self.up_to_date + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl<'a> FromIterator<&'a TransferOutcome> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a TransferOutcome>>(iter: I) -> Self {
        let mut summary = Summary::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "no archives processed");
        }
        let parts = [
            (self.downloaded, "downloaded"),
            (self.redownloaded, "redownloaded"),
            (self.up_to_date, "up to date"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .join(", ");

        write!(f, "{parts} ({} bytes written)", self.bytes_written)
    }
}
