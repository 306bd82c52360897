use crate::session::{HttpSession, Request};
use crate::{ClientError, Result};
use bytes::Bytes;
use devision_core::models::OcrResponse;
use devision_core::{
    CdnStats, CdnUpload, Config, Confirmation, ImageFormat, Rtfm, Rtfs, RtfsFormat, UploadStats, Xkcd,
};
use reqwest::{Method, StatusCode};
use std::collections::HashMap;

/// idevision REST API Client
///
/// Cheap to share across tasks: every call borrows the client and the
/// underlying connection pool is safe for concurrent use.
#[derive(Debug)]
pub struct Client {
    session: HttpSession,
    config: Config,
}

impl Client {
    /// Create a client for the production deployment
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_config(Config {
            token: token.map(String::from),
            ..Config::default()
        })
    }

    /// Create a client for the beta deployment
    pub fn beta(token: Option<&str>) -> Result<Self> {
        Self::with_config(Config {
            token: token.map(String::from),
            beta: true,
            ..Config::default()
        })
    }

    /// Create a client from an explicit configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let session = HttpSession::new(&config)?;
        Ok(Self { session, config })
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Base URL of the deployment in use
    pub fn base_url(&self) -> &str {
        self.session.base_url().as_str()
    }

    /// Whether a non-blank token was supplied
    pub fn has_token(&self) -> bool {
        self.session.has_token()
    }

    /// Release the connection pool
    pub fn close(self) {
        drop(self.session);
    }

    /// Search a library's source for symbols matching `query`
    ///
    /// Without a query the service returns its default result set.
    pub async fn lookup_source(
        &self,
        query: Option<&str>,
        library: &str,
        format: RtfsFormat,
    ) -> Result<Rtfs> {
        if !self.config.supports_library(library) {
            return Err(ClientError::UnsupportedLibrary {
                library: library.to_string(),
                supported: self.config.libraries.clone(),
            });
        }

        let mut request = Request::get("api/public/rtfs")
            .query("library", library)
            .query("format", format.as_str());
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            request = request.query("query", query);
        }

        let reply = self.session.send(request).await?;
        if reply.status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(ClientError::InternalServer {
                endpoint: "rtfs",
                message: reply.text(),
            });
        }

        self.session.check(reply)?.json()
    }

    /// Search a Sphinx documentation site
    ///
    /// The site's `objects.inv` is fetched first; a 404 there means the
    /// location is not Sphinx documentation and the search is skipped.
    pub async fn lookup_docs(&self, query: Option<&str>, doc_url: &str) -> Result<Rtfm> {
        let doc_url = doc_url.trim().trim_end_matches('/');
        if !(doc_url.starts_with("http://") || doc_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(format!(
                "{doc_url}: documentation location must be an http(s) URL"
            )));
        }

        let manifest = self
            .session
            .send(Request::get(format!("{doc_url}/objects.inv")))
            .await?;
        if manifest.status == StatusCode::NOT_FOUND {
            return Err(ClientError::InvalidDocumentation(doc_url.to_string()));
        }
        self.session.check(manifest)?;

        let mut request = Request::get("api/public/rtfm").query("location", doc_url);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            request = request.query("query", query);
        }

        self.session.fetch_json(request).await
    }

    /// Extract text from an image
    pub async fn ocr(&self, image: impl Into<Bytes>) -> Result<String> {
        self.require_token()?;

        let image = image.into();
        let format = ImageFormat::sniff(&image).ok_or(ClientError::InvalidImage)?;

        let request = Request::get("api/public/ocr")
            .query("filetype", format.as_str())
            .bytes(image);

        let reply = self.session.send(request).await?;
        if reply.status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(ClientError::InternalServer {
                endpoint: "ocr",
                message: reply.text(),
            });
        }

        let ocr: OcrResponse = self.session.check(reply)?.json()?;
        Ok(ocr.data)
    }

    /// Find the xkcd comic best matching `query`
    pub async fn lookup_xkcd(&self, query: &str) -> Result<Xkcd> {
        let request = Request::get("api/public/xkcd").query("query", query);
        let reply = self.session.fetch(request).await?;
        Ok(Xkcd::from_response(&reply.body)?)
    }

    /// Attach a search tag to comic `num`
    pub async fn tag_xkcd(&self, word: &str, num: u32) -> Result<Confirmation> {
        let request = Request::put("api/public/xkcd/tags")
            .form([("tag", word.to_string()), ("num", num.to_string())]);

        let reply = self.session.fetch(request).await?;
        Ok(Confirmation {
            status: reply.status.as_u16(),
            message: "Successfully added tag to xkcd comic",
        })
    }

    /// Configure the account's homepage
    pub async fn submit_homepage(&self, payload: &HashMap<String, String>) -> Result<Confirmation> {
        if self.config.homepage_requires_token {
            self.require_token()?;
        }

        let request = Request::post("api/homepage").form(
            payload
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let reply = self.session.fetch(request).await?;
        Ok(Confirmation {
            status: reply.status.as_u16(),
            message: "Successfully set up homepage",
        })
    }

    /// Upload an image to the CDN
    pub async fn cdn_upload(&self, image: impl Into<Bytes>) -> Result<CdnUpload> {
        self.require_token()?;

        let image = image.into();
        let format = ImageFormat::sniff(&image).ok_or(ClientError::InvalidImage)?;
        let file_name = format!("{}.{}", self.config.upload_name_prefix, format.extension());

        let request = Request::post("api/cdn")
            .header("File-Name", file_name)
            .bytes(image);

        self.session.fetch_json(request).await
    }

    /// Get aggregate CDN counters
    pub async fn cdn_stats(&self) -> Result<CdnStats> {
        self.session.fetch_json(Request::get("api/cdn")).await
    }

    /// Get metadata for a single upload
    pub async fn get_upload_stats(&self, node: &str, slug: &str) -> Result<UploadStats> {
        self.require_token()?;
        let request = upload_request(Method::GET, node, slug)?;
        self.session.fetch_json(request).await
    }

    /// Delete a single upload
    pub async fn delete_upload(&self, node: &str, slug: &str) -> Result<Confirmation> {
        self.require_token()?;

        let request = upload_request(Method::DELETE, node, slug)?;
        let reply = self.session.fetch(request).await?;
        Ok(Confirmation {
            status: reply.status.as_u16(),
            message: "Successfully deleted upload",
        })
    }

    fn require_token(&self) -> Result<()> {
        if self.session.has_token() {
            Ok(())
        } else {
            Err(ClientError::TokenRequired)
        }
    }
}

/// `api/cdn/{node}/{slug}`, with node and slug each encoded as one segment
fn upload_request(method: Method, node: &str, slug: &str) -> Result<Request> {
    let mut request = Request::new(method, "api/cdn");
    for value in [node, slug] {
        let segment = value.trim_matches('/');
        if matches!(segment, "" | "." | "..") {
            return Err(ClientError::InvalidUrl(format!(
                "{value:?} is not a valid upload node or slug"
            )));
        }
        request = request.segment(segment);
    }
    Ok(request)
}
