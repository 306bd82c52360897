use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::coerce;

/// Rtfs represents a source lookup: symbol name → GitHub link, or
/// symbol name → source text when `RtfsFormat::Source` was requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rtfs {
    pub nodes: HashMap<String, String>,
    #[serde(deserialize_with = "coerce::float")]
    pub query_time: f64, // Seconds
}

/// RtfsFormat selects what an Rtfs lookup returns per symbol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RtfsFormat {
    #[default]
    Links,
    Source,
}

impl RtfsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RtfsFormat::Links => "links",
            RtfsFormat::Source => "source",
        }
    }
}

impl fmt::Display for RtfsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rtfm represents a documentation lookup against a Sphinx site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rtfm {
    pub nodes: HashMap<String, String>,
    #[serde(deserialize_with = "coerce::float")]
    pub query_time: f64,
    /// When the service last indexed the documentation (server-side cache)
    #[serde(rename = "_cache_indexed", deserialize_with = "coerce::timestamp")]
    pub cache_indexed: DateTime<Utc>,
    /// When the service will re-index it
    #[serde(rename = "_cache_expires", deserialize_with = "coerce::timestamp")]
    pub cache_expires: DateTime<Utc>,
}

/// Xkcd represents the best matching comic for a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Xkcd {
    #[serde(deserialize_with = "coerce::integer")]
    pub num: u32,
    pub safe_title: String,
    pub title: String,
    #[serde(deserialize_with = "coerce::timestamp")]
    pub posted: DateTime<Utc>,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<String>,
    pub image_url: String,
    pub url: String,
    #[serde(deserialize_with = "coerce::float")]
    pub query_time: f64,
}

/// The xkcd endpoint wraps its matches: `{"nodes": .., "query_time": ..}`
#[derive(Deserialize)]
struct XkcdEnvelope {
    nodes: serde_json::Value,
    query_time: serde_json::Value,
}

impl Xkcd {
    /// Decode an xkcd search response, keeping the best (first) match
    pub fn from_response(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: XkcdEnvelope = serde_json::from_slice(body)?;

        let mut node = match envelope.nodes {
            serde_json::Value::Array(matches) => matches
                .into_iter()
                .next()
                .ok_or_else(|| serde_json::Error::custom("xkcd search returned no comics"))?,
            other => other,
        };

        let Some(fields) = node.as_object_mut() else {
            return Err(serde_json::Error::custom("xkcd `nodes` is not an object"));
        };
        fields.insert("query_time".to_string(), envelope.query_time);

        serde_json::from_value(node)
    }
}

/// CdnUpload identifies a file stored on the CDN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnUpload {
    pub url: String,
    pub slug: String,
    pub node: String,
}

/// CdnStats represents aggregate CDN counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnStats {
    #[serde(deserialize_with = "coerce::integer")]
    pub upload_count: u64,
    #[serde(deserialize_with = "coerce::integer")]
    pub uploaded_today: u64,
    #[serde(deserialize_with = "coerce::timestamp")]
    pub last_uploaded: DateTime<Utc>,
}

/// UploadStats represents metadata for a single CDN upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStats {
    pub url: String,
    #[serde(deserialize_with = "coerce::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub author: String,
    #[serde(deserialize_with = "coerce::integer")]
    pub views: u64,
    pub node: String,
    #[serde(deserialize_with = "coerce::integer")]
    pub size: u64, // Bytes
}

/// Confirmation is returned by endpoints that acknowledge without a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub status: u16,
    pub message: &'static str,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// OcrResponse is the raw OCR payload; only `data` is surfaced
#[derive(Debug, Deserialize)]
pub struct OcrResponse {
    pub data: String,
}
