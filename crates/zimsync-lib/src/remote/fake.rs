//! In-memory [`Remote`] for unit tests.

use super::{Remote, RemoteBody, RemoteSize};
use crate::error::RemoteError;
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use url::Url;

const CHUNK: usize = 16;

#[derive(Clone, Debug)]
pub struct FakeResource {
    pub body: Vec<u8>,
    /// Length reported to HEAD; `None` omits the header.
    pub head_size: Option<u64>,
    /// Length declared by GET; `None` omits the header.
    pub get_size: Option<u64>,
    /// Break the stream after this many bytes.
    pub fail_after: Option<usize>,
    pub status: Option<u16>,
}

impl FakeResource {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let len = body.len() as u64;
        Self {
            body,
            head_size: Some(len),
            get_size: Some(len),
            fail_after: None,
            status: None,
        }
    }

    pub fn sized(len: usize) -> Self {
        Self::new(vec![b'z'; len])
    }

    pub fn without_head_length(mut self) -> Self {
        self.head_size = None;
        self
    }

    pub fn without_get_length(mut self) -> Self {
        self.get_size = None;
        self
    }

    pub fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
}

#[derive(Default)]
pub struct FakeRemote {
    pages: HashMap<String, String>,
    resources: HashMap<String, FakeResource>,
    log: RefCell<Vec<Request>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_resource(mut self, url: &str, resource: FakeResource) -> Self {
        self.resources.insert(url.to_string(), resource);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.borrow().clone()
    }

    pub fn count(&self, method: &str, url: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    fn record(&self, method: &'static str, url: &Url) {
        self.log.borrow_mut().push(Request {
            method,
            url: url.to_string(),
        });
    }

    fn not_found(url: &Url) -> RemoteError {
        RemoteError::Status {
            url: url.clone(),
            status: 404,
        }
    }
}

impl Remote for FakeRemote {
    type Body = FakeBody;

    async fn fetch_page(&self, url: &Url) -> Result<String, RemoteError> {
        self.record("GET", url);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }

    async fn content_length(&self, url: &Url) -> RemoteSize {
        self.record("HEAD", url);
        match self.resources.get(url.as_str()) {
            None => RemoteSize::unknown("404"),
            Some(FakeResource {
                status: Some(status),
                ..
            }) => RemoteSize::unknown(status.to_string()),
            Some(FakeResource {
                head_size: Some(size),
                ..
            }) => RemoteSize::Known(*size),
            Some(_) => RemoteSize::unknown("no Content-Length"),
        }
    }

    async fn open(&self, url: &Url) -> Result<FakeBody, RemoteError> {
        self.record("GET", url);
        let resource = self
            .resources
            .get(url.as_str())
            .ok_or_else(|| Self::not_found(url))?;
        if let Some(status) = resource.status {
            return Err(RemoteError::Status {
                url: url.clone(),
                status,
            });
        }

        let served = match resource.fail_after {
            Some(limit) => &resource.body[..limit.min(resource.body.len())],
            None => &resource.body[..],
        };
        Ok(FakeBody {
            url: url.clone(),
            chunks: served
                .chunks(CHUNK)
                .map(Bytes::copy_from_slice)
                .collect(),
            declared: resource.get_size,
            fails: resource.fail_after.is_some(),
        })
    }
}

pub struct FakeBody {
    url: Url,
    chunks: VecDeque<Bytes>,
    declared: Option<u64>,
    fails: bool,
}

impl RemoteBody for FakeBody {
    fn declared_len(&self) -> Option<u64> {
        self.declared
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, RemoteError> {
        match self.chunks.pop_front() {
            Some(chunk) => Ok(Some(chunk)),
            None if self.fails => Err(RemoteError::Body {
                url: self.url.clone(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )),
            }),
            None => Ok(None),
        }
    }
}
