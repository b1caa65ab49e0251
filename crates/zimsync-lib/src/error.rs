use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ZimSyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to obtain archive listing from {url}: {reason}")]
    Discovery { url: Url, reason: String },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid denylist pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Download directory creation failed at {path}: {reason}")]
    DownloadDirectoryCreation { path: PathBuf, reason: String },

    #[error("Invalid command line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("{failed} of {total} archives failed to synchronize")]
    EntriesFailed { failed: usize, total: usize },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

/// Transport-level failure talking to the remote server.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for {url}")]
    Status { url: Url, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: Url,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Failed to create output file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Size mismatch for {path}: expected {expected} bytes, wrote {actual}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Failure confined to a single archive; recorded as that entry's outcome.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Cannot derive a usable file name from {url} (got {name:?})")]
    NormalizationAnomaly { url: Url, name: String },

    #[error("Failed to inspect local file {path}: {source}")]
    LocalProbe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} exists but is not a regular file")]
    NotAFile { path: PathBuf },

    #[error("Failed to remove incomplete file {path}: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
