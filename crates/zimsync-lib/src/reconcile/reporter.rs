use super::outcome::{Summary, TransferOutcome};
use super::plan::Plan;
use crate::local::LocalFile;
use crate::transfer::TransferProgress;
use url::Url;

/// Structured progress emitted while reconciling.
#[derive(Debug, Clone, Copy)]
pub enum ReconcileEvent<'a> {
    ListingFetched {
        index: &'a Url,
        entries: usize,
    },
    NameConflict {
        file_name: &'a str,
        kept: &'a Url,
        rejected: &'a Url,
    },
    EntryPlanned {
        url: &'a Url,
        file_name: &'a str,
        local: &'a LocalFile,
        plan: &'a Plan,
    },
    TransferStarted {
        url: &'a Url,
        file_name: &'a str,
        expected: Option<u64>,
    },
    TransferProgress {
        file_name: &'a str,
        progress: TransferProgress,
    },
    EntryResolved {
        url: &'a Url,
        file_name: Option<&'a str>,
        outcome: &'a TransferOutcome,
    },
    Completed {
        summary: &'a Summary,
    },
}

pub trait Reporter {
    fn report(&mut self, event: ReconcileEvent<'_>);
}

impl<F> Reporter for F
where
    F: FnMut(ReconcileEvent<'_>),
{
    fn report(&mut self, event: ReconcileEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: ReconcileEvent<'_>) {}
}
