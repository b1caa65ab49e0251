//! The HTTP capability consumed by discovery and reconciliation.
//!
//! [`Remote`] is the seam between the reconciler and the network: the
//! production implementation is [`HttpRemote`], tests substitute in-memory
//! fakes.

mod http;

pub use http::HttpRemote;

use crate::error::RemoteError;
use bytes::Bytes;
use std::fmt;
use url::Url;

/// Byte length the server declares for a resource.
///
/// A missing `Content-Length` is `Unknown`, never `Known(0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSize {
    Known(u64),
    Unknown { reason: String },
}

impl RemoteSize {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn known(&self) -> Option<u64> {
        match self {
            Self::Known(size) => Some(*size),
            Self::Unknown { .. } => None,
        }
    }
}

impl fmt::Display for RemoteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(size) => write!(f, "{size} bytes"),
            Self::Unknown { reason } => write!(f, "unknown ({reason})"),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Remote {
    type Body: RemoteBody;

    /// GET a page and return its body as text.
    async fn fetch_page(&self, url: &Url) -> Result<String, RemoteError>;

    /// Metadata-only query for the resource length. Failures are folded
    /// into [`RemoteSize::Unknown`].
    async fn content_length(&self, url: &Url) -> RemoteSize;

    /// Start a streaming GET.
    async fn open(&self, url: &Url) -> Result<Self::Body, RemoteError>;
}

/// A response body being streamed.
#[allow(async_fn_in_trait)]
pub trait RemoteBody {
    fn declared_len(&self) -> Option<u64>;

    /// Next chunk of the body, `None` once the body is exhausted.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, RemoteError>;
}

#[cfg(test)]
pub(crate) mod fake;
