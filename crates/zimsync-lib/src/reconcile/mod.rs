mod outcome;
mod plan;
mod reconciler;
mod reporter;

pub use outcome::{EntryReport, ReconcileReport, Summary, TransferOutcome};
pub use plan::{Plan, ReconcileMode, SkipReason, plan_fetch_missing, plan_verify};
pub use reconciler::{ReconcileOptions, Reconciler};
pub use reporter::{NullReporter, ReconcileEvent, Reporter};
