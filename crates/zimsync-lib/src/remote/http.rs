use super::{Remote, RemoteBody, RemoteSize};
use crate::config::HttpConfig;
use crate::error::RemoteError;
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

#[derive(Clone, Debug)]
pub struct HttpRemote {
    client: Client,
}

impl HttpRemote {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("zimsync/{}", env!("CARGO_PKG_VERSION")));

        // No overall request timeout: archives can take hours. A stalled
        // connection is caught by the read timeout instead.
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|source| RemoteError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Reads `Content-Length` from the headers. `Response::content_length` is
/// not usable here: for HEAD responses it reports the (empty) body.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

impl Remote for HttpRemote {
    type Body = HttpBody;

    async fn fetch_page(&self, url: &Url) -> Result<String, RemoteError> {
        tracing::debug!(url = %url, "GET page");
        let response = self.send(self.client.get(url.clone()), url).await?;
        response.text().await.map_err(|e| RemoteError::Body {
            url: url.clone(),
            source: Box::new(e),
        })
    }

    async fn content_length(&self, url: &Url) -> RemoteSize {
        tracing::debug!(url = %url, "HEAD");
        let response = match self.send(self.client.head(url.clone()), url).await {
            Ok(response) => response,
            Err(err) => return RemoteSize::unknown(err.to_string()),
        };

        match declared_length(response.headers()) {
            Some(size) => RemoteSize::Known(size),
            None => RemoteSize::unknown("server did not declare a Content-Length"),
        }
    }

    async fn open(&self, url: &Url) -> Result<HttpBody, RemoteError> {
        tracing::debug!(url = %url, "GET body");
        let response = self.send(self.client.get(url.clone()), url).await?;
        let declared = declared_length(response.headers());
        Ok(HttpBody {
            url: url.clone(),
            response,
            declared,
        })
    }
}

pub struct HttpBody {
    url: Url,
    response: Response,
    declared: Option<u64>,
}

impl RemoteBody for HttpBody {
    fn declared_len(&self) -> Option<u64> {
        self.declared
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, RemoteError> {
        self.response.chunk().await.map_err(|e| RemoteError::Body {
            url: self.url.clone(),
            source: Box::new(e),
        })
    }
}
