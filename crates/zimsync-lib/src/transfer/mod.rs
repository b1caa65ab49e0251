//! Streams remote archives to disk.

mod denylist;

pub use denylist::{Denylist, Matcher, MatcherDef};

use crate::error::TransferError;
use crate::remote::{Remote, RemoteBody};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

impl TransferProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some(self.downloaded as f64 / total as f64 * 100.0),
        }
    }
}

#[derive(Debug)]
pub enum Transferred {
    Completed(u64),
    Excluded(Matcher),
    Failed(TransferError),
}

#[derive(Debug, Clone, Default)]
pub struct TransferEngine {
    denylist: Denylist,
}

impl TransferEngine {
    pub fn new(denylist: Denylist) -> Self {
        Self { denylist }
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    pub fn excluded(&self, url: &Url) -> Option<&Matcher> {
        self.denylist.first_match(url)
    }

    /// Downloads `url` into `dest`, replacing whatever is there.
    ///
    /// Denied URLs return [`Transferred::Excluded`] without touching the
    /// network. When `expected` is given the written length must match it.
    /// A failed transfer leaves the partial file in place.
    pub async fn transfer<R: Remote>(
        &self,
        remote: &R,
        url: &Url,
        dest: &Path,
        expected: Option<u64>,
        on_progress: impl FnMut(TransferProgress),
    ) -> Transferred {
        if let Some(matcher) = self.excluded(url) {
            tracing::debug!(url = %url, matcher = %matcher, "Transfer excluded by denylist");
            return Transferred::Excluded(matcher.clone());
        }

        match stream_to_file(remote, url, dest, expected, on_progress).await {
            Ok(written) => Transferred::Completed(written),
            Err(err) => Transferred::Failed(err),
        }
    }
}

async fn stream_to_file<R: Remote>(
    remote: &R,
    url: &Url,
    dest: &Path,
    expected: Option<u64>,
    mut on_progress: impl FnMut(TransferProgress),
) -> Result<u64, TransferError> {
    let mut body = remote.open(url).await?;
    let total = expected.or(body.declared_len());

    let file = tokio::fs::File::create(dest)
        .await
        .map_err(|source| TransferError::CreateFile {
            path: dest.to_path_buf(),
            source,
        })?;
    let mut writer = BufWriter::new(file);

    let mut downloaded = 0u64;
    on_progress(TransferProgress { downloaded, total });

    while let Some(chunk) = body.next_chunk().await? {
        writer
            .write_all(&chunk)
            .await
            .map_err(|source| TransferError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
        downloaded += chunk.len() as u64;
        on_progress(TransferProgress { downloaded, total });
    }

    writer.flush().await.map_err(|source| TransferError::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    if let Some(expected) = expected {
        if downloaded != expected {
            return Err(TransferError::SizeMismatch {
                path: dest.to_path_buf(),
                expected,
                actual: downloaded,
            });
        }
    }
    Ok(downloaded)
}
