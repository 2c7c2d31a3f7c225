//! Appliance connection handle and the single-request transport primitive.
//!
//! Every entity wrapper and the upload protocol funnel through
//! [`Client::request`], which overlays caller headers on the base set held
//! by the handle and honours the optional deadline and cancellation token.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, ETAG, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ApiError, Error};
use crate::routes::Route;

/// Version prefix every resource path is rooted at.
pub const API_PREFIX: &str = "api/v1.3";

/// Strict-consistency marker sent with every API request.
pub const ENDPOINT_CONSISTENCY: &str = "Endpoint-Consistency";

/// Connection settings for a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root that route segments are joined onto. Always ends with `/`.
    pub base_url: Url,
    /// OAuth bearer token.
    pub token: String,
    /// Deadline applied to each request, including reading the body.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Settings for the appliance at `host` (`share.example.com`), rooted
    /// at `https://<host>/api/v1.3/`.
    pub fn new(host: &str, token: &str) -> Result<Self, Error> {
        if host.is_empty() || host.contains('/') {
            return Err(Error::InvalidRequest(format!("invalid appliance host {host:?}")));
        }
        Self::with_base_url(&format!("https://{host}/{API_PREFIX}/"), token)
    }

    /// Settings rooted at an explicit URL, e.g. a local test server.
    pub fn with_base_url(url: &str, token: &str) -> Result<Self, Error> {
        let mut base_url =
            Url::parse(url).map_err(|e| Error::InvalidRequest(format!("invalid base URL {url:?}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            token: token.to_string(),
            timeout: None,
        })
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Conditional-request validators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub if_match: Vec<String>,
    pub if_none_match: Vec<String>,
}

impl Preconditions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn if_match<S: AsRef<str>>(etags: &[S]) -> Self {
        Self {
            if_match: etags.iter().map(|e| e.as_ref().to_string()).collect(),
            if_none_match: Vec::new(),
        }
    }

    pub fn if_none_match<S: AsRef<str>>(etags: &[S]) -> Self {
        Self {
            if_match: Vec::new(),
            if_none_match: etags.iter().map(|e| e.as_ref().to_string()).collect(),
        }
    }

    /// Renders the validators as request headers, one value per tag.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        for tag in &self.if_match {
            headers.append(reqwest::header::IF_MATCH, header_value(tag)?);
        }
        for tag in &self.if_none_match {
            headers.append(reqwest::header::IF_NONE_MATCH, header_value(tag)?);
        }
        Ok(headers)
    }
}

/// A fully read response with a status below 300.
#[derive(Debug, Clone)]
pub struct Unpacked {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Unpacked {
    /// First value of header `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `ETag` response header.
    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// A decoded response value paired with the resource version it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub value: T,
    pub etag: Option<String>,
}

impl<T> Tagged<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Drains `response` and classifies it. Any status of 300 or above is an
/// [`Error::Status`] that still carries the headers and body.
pub async fn unpack(response: reqwest::Response) -> Result<Unpacked, Error> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    if status.as_u16() >= 300 {
        return Err(ApiError {
            status,
            headers,
            body,
        }
        .into());
    }

    Ok(Unpacked {
        status,
        headers,
        body,
    })
}

/// Serialises a request body.
pub fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Bytes, Error> {
    Ok(Bytes::from(serde_json::to_vec(body)?))
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::InvalidRequest(format!("invalid header value {value:?}")))
}

/// Handle to one appliance, bound to one bearer token.
///
/// Handles are immutable. [`Client::with_token`] and friends derive new
/// handles that share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    base_headers: HeaderMap,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_headers: base_headers(&config.token)?,
            base_url: config.base_url,
            timeout: config.timeout,
            cancel: None,
        })
    }

    /// A handle for another user on the same appliance.
    pub fn with_token(&self, token: &str) -> Result<Self, Error> {
        Ok(Self {
            base_headers: base_headers(token)?,
            ..self.clone()
        })
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self.clone()
        }
    }

    /// A handle whose requests abort with [`Error::Cancelled`] once `token`
    /// is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `route` with `query` appended.
    pub fn url(&self, route: &Route<'_>, query: &[(&str, String)]) -> Result<Url, Error> {
        let mut url = route.url(&self.base_url)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends exactly one request and returns the raw response.
    ///
    /// `overlay` values are appended to the base headers, except
    /// `Content-Type` which replaces the default. Without a body and
    /// without an explicit content type, no `Content-Type` is sent.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        overlay: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<reqwest::Response, Error> {
        self.guard(self.send(method, url, overlay, body)).await
    }

    /// [`Client::request`] followed by [`unpack`], under one deadline.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        overlay: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Unpacked, Error> {
        self.guard(async {
            let response = self.send(method, url, overlay, body).await?;
            unpack(response).await
        })
        .await
    }

    /// Build route, send, unpack.
    pub async fn call(
        &self,
        method: Method,
        route: Route<'_>,
        query: &[(&str, String)],
        overlay: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Unpacked, Error> {
        let url = self.url(&route, query)?;
        self.execute(method, url, &overlay, body).await
    }

    /// [`Client::call`], then decode the body as `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        route: Route<'_>,
        query: &[(&str, String)],
        overlay: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Tagged<T>, Error> {
        let unpacked = self.call(method, route, query, overlay, body).await?;
        Ok(Tagged {
            value: unpacked.json()?,
            etag: unpacked.etag().map(String::from),
        })
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        overlay: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<reqwest::Response, Error> {
        let headers = merge_headers(&self.base_headers, overlay, body.is_some());
        debug!(%method, %url, "appliance request");

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder.send().await?)
    }

    /// Applies the handle's deadline and cancellation token to `fut`.
    async fn guard<T, F>(&self, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let timed = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .unwrap_or(Err(Error::Timeout)),
                None => fut.await,
            }
        };

        match &self.cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled),
                result = timed => result,
            },
            None => timed.await,
        }
    }
}

fn base_headers(token: &str) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| Error::InvalidRequest("invalid token".into()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("endpoint-consistency"),
        HeaderValue::from_static("strict"),
    );
    Ok(headers)
}

fn merge_headers(base: &HeaderMap, overlay: &HeaderMap, has_body: bool) -> HeaderMap {
    let mut headers = base.clone();
    for (name, value) in overlay {
        if *name != CONTENT_TYPE {
            headers.append(name, value.clone());
        }
    }
    match overlay.get(CONTENT_TYPE) {
        Some(content_type) => {
            headers.insert(CONTENT_TYPE, content_type.clone());
        }
        None if !has_body => {
            headers.remove(CONTENT_TYPE);
        }
        None => {}
    }
    headers
}
