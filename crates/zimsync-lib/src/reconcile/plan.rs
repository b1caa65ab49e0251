use crate::local::LocalFile;
use crate::remote::RemoteSize;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileMode {
    /// Compare every local copy against the remote size and refetch the
    /// incomplete ones.
    #[default]
    Verify,
    /// Only fetch archives that have no local copy at all. Existing files
    /// are trusted without a size query.
    FetchMissing,
}

/// Action chosen for a single entry before anything is changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Skip(SkipReason),
    UpToDate,
    Fetch {
        /// Size the finished file must have, if known.
        expected: Option<u64>,
        /// Size of an incomplete local copy that has to be removed first.
        stale: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Excluded { matcher: String },
    SizeUnknown { reason: String },
    AlreadyPresent { size: u64 },
    NameConflict { claimed_by: Url },
    DryRun(Box<Plan>),
}

/// Completeness is exact size equality; unknown remote size never leads to
/// a delete or a transfer.
pub fn plan_verify(local: &LocalFile, remote: &RemoteSize) -> Plan {
    let remote_size = match remote {
        RemoteSize::Known(size) => *size,
        RemoteSize::Unknown { reason } => {
            return Plan::Skip(SkipReason::SizeUnknown {
                reason: reason.clone(),
            });
        }
    };

    match local.size {
        None => Plan::Fetch {
            expected: Some(remote_size),
            stale: None,
        },
        Some(local_size) if local_size == remote_size => Plan::UpToDate,
        Some(local_size) => Plan::Fetch {
            expected: Some(remote_size),
            stale: Some(local_size),
        },
    }
}

pub fn plan_fetch_missing(local: &LocalFile) -> Plan {
    match local.size {
        Some(size) => Plan::Skip(SkipReason::AlreadyPresent { size }),
        None => Plan::Fetch {
            expected: None,
            stale: None,
        },
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Skip(reason) => write!(f, "skip ({reason})"),
            Plan::UpToDate => write!(f, "up to date"),
            Plan::Fetch {
                expected,
                stale: Some(stale),
            } => match expected {
                Some(expected) => write!(f, "redownload (local {stale} bytes, remote {expected} bytes)"),
                None => write!(f, "redownload (local {stale} bytes)"),
            },
            Plan::Fetch {
                expected: Some(expected),
                stale: None,
            } => write!(f, "download ({expected} bytes)"),
            Plan::Fetch {
                expected: None,
                stale: None,
            } => write!(f, "download"),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded { matcher } => write!(f, "excluded by denylist entry {matcher}"),
            SkipReason::SizeUnknown { reason } => {
                write!(f, "could not determine remote size: {reason}")
            }
            SkipReason::AlreadyPresent { size } => write!(f, "already present ({size} bytes)"),
            SkipReason::NameConflict { claimed_by } => {
                write!(f, "local name already claimed by {claimed_by}")
            }
            SkipReason::DryRun(plan) => write!(f, "dry run, would {plan}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn local(size: Option<u64>) -> LocalFile {
        LocalFile {
            path: PathBuf::from("a.zim"),
            size,
        }
    }

    #[test]
    fn test_equal_size_is_up_to_date() {
        assert_eq!(plan_verify(&local(Some(100)), &RemoteSize::Known(100)), Plan::UpToDate);
        assert_eq!(plan_verify(&local(Some(0)), &RemoteSize::Known(0)), Plan::UpToDate);
    }

    #[test]
    fn test_smaller_or_larger_is_incomplete() {
        for local_size in [0, 99, 101, 10_000] {
            assert_eq!(
                plan_verify(&local(Some(local_size)), &RemoteSize::Known(100)),
                Plan::Fetch {
                    expected: Some(100),
                    stale: Some(local_size)
                },
                "local size {local_size}"
            );
        }
    }

    #[test]
    fn test_missing_is_fetched() {
        assert_eq!(
            plan_verify(&local(None), &RemoteSize::Known(7)),
            Plan::Fetch {
                expected: Some(7),
                stale: None
            }
        );
    }

    #[test]
    fn test_unknown_size_always_skips() {
        for size in [None, Some(0), Some(100)] {
            assert!(matches!(
                plan_verify(&local(size), &RemoteSize::unknown("HEAD failed")),
                Plan::Skip(SkipReason::SizeUnknown { .. })
            ));
        }
    }

    #[test]
    fn test_fetch_missing_trusts_existing_files() {
        assert_eq!(
            plan_fetch_missing(&local(Some(3))),
            Plan::Skip(SkipReason::AlreadyPresent { size: 3 })
        );
        assert_eq!(
            plan_fetch_missing(&local(None)),
            Plan::Fetch {
                expected: None,
                stale: None
            }
        );
    }

    #[test]
    fn test_display() {
        let plan = Plan::Fetch {
            expected: Some(200),
            stale: Some(50),
        };
        assert_eq!(
            plan.to_string(),
            "redownload (local 50 bytes, remote 200 bytes)"
        );
        assert_eq!(
            SkipReason::DryRun(Box::new(plan)).to_string(),
            "dry run, would redownload (local 50 bytes, remote 200 bytes)"
        );
    }
}
