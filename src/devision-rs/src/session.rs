//! Pooled HTTP session shared by every endpoint call.
//!
//! `HttpSession` owns a single `reqwest::Client` (and with it the connection
//! pool) for the lifetime of the `Client` façade. Requests are described as
//! plain data (`Request`) and come back fully buffered (`Reply`), so the
//! response stream is released before the caller inspects the status.

use bytes::Bytes;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{ClientError, Result};
use devision_core::Config;

const USER_AGENT: &str = concat!("devision-rs/", env!("CARGO_PKG_VERSION"));

/// Request payload
#[derive(Debug, Clone)]
pub enum Body {
    /// Raw bytes, sent as-is
    Bytes(Bytes),
    /// URL-encoded form fields
    Form(Vec<(String, String)>),
}

/// An HTTP request described as plain data.
///
/// `path` is either relative to the session's base URL or an absolute
/// `http(s)://` URL for resources hosted elsewhere. `segments` are appended
/// after it, each percent-encoded as exactly one path segment.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn bytes(mut self, body: Bytes) -> Self {
        self.body = Some(Body::Bytes(body));
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(Body::Form(fields));
        self
    }
}

/// A fully buffered response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Long-lived HTTP session bound to one API origin
#[derive(Debug)]
pub struct HttpSession {
    http: reqwest::Client,
    base_url: Url,
    token: Option<HeaderValue>,
    raise_for_status: bool,
}

impl HttpSession {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = parse_base_url(config.origin())?;

        let token = match config.token() {
            Some(token) => {
                let mut value = HeaderValue::from_str(token)?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if config.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            token,
            raise_for_status: config.raise_for_status,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Resolve a request path against the base URL
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let resolved = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else {
            self.base_url.join(path.trim_start_matches('/'))
        };
        resolved.map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Full URL for `request`: resolved path plus encoded segments
    pub fn target(&self, request: &Request) -> Result<Url> {
        let mut url = self.resolve(&request.path)?;
        if !request.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(format!("{}: cannot be a base", request.path)))?
                .pop_if_empty()
                .extend(&request.segments);
        }
        Ok(url)
    }

    /// Perform one round trip and buffer the whole body.
    ///
    /// The token is only attached to requests on the session's own origin.
    #[tracing::instrument(level = "debug", skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: Request) -> Result<Reply> {
        let url = self.target(&request)?;
        let authorized = self.token.is_some() && url.origin() == self.base_url.origin();
        tracing::debug!(%url, authorized, "Sending request");

        let mut builder = self.http.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let (Some(token), true) = (&self.token, authorized) {
            builder = builder.header(AUTHORIZATION, token.clone());
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(Body::Bytes(bytes)) => builder.body(bytes),
            Some(Body::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        Ok(Reply { status, body })
    }

    /// Apply strict mode: non-2xx becomes `ClientError::Server`
    pub fn check(&self, reply: Reply) -> Result<Reply> {
        if self.raise_for_status && !reply.is_success() {
            return Err(ClientError::Server {
                status: reply.status.as_u16(),
                message: reply.text(),
            });
        }
        Ok(reply)
    }

    pub async fn fetch(&self, request: Request) -> Result<Reply> {
        let reply = self.send(request).await?;
        self.check(reply)
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        self.fetch(request).await?.json()
    }
}

fn parse_base_url(origin: &str) -> Result<Url> {
    let mut url = Url::parse(origin).map_err(|e| ClientError::InvalidUrl(format!("{origin}: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(format!("{origin}: not an http(s) base URL")));
    }
    // join() replaces the last segment unless the path ends in a slash
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
