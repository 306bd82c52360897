//! Devision Client Library
//!
//! Async HTTP client for the idevision API: source and documentation
//! lookups, OCR, xkcd search and the file CDN.
//!
//! ```rust,no_run
//! use devision_rs::{Client, RtfsFormat};
//!
//! # async fn run() -> devision_rs::Result<()> {
//! let client = Client::new(None)?;
//! let rtfs = client
//!     .lookup_source(Some("Client.connect"), "wavelink", RtfsFormat::Links)
//!     .await?;
//! for (symbol, link) in &rtfs.nodes {
//!     println!("{symbol}: {link}");
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```

mod client;
pub mod session;

pub use client::Client;
pub use devision_core::{
    CdnStats, CdnUpload, Config, Confirmation, ImageFormat, Rtfm, Rtfs, RtfsFormat, UploadStats, Xkcd,
};

/// Where internal server errors should be reported
pub const SUPPORT_URL: &str = "https://discord.gg/D3Nfau4ThK";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("The {endpoint} endpoint hit an internal server error ({message}); please report it at {}", SUPPORT_URL)]
    InternalServer { endpoint: &'static str, message: String },

    #[error("Library `{library}` cannot be queried; supported libraries: {}", .supported.join(", "))]
    UnsupportedLibrary { library: String, supported: Vec<String> },

    #[error("A token is required to access this endpoint")]
    TokenRequired,

    #[error("The image provided is not in a recognized image format")]
    InvalidImage,

    #[error("No Sphinx documentation (objects.inv) found at {0}")]
    InvalidDocumentation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

/// Broad failure categories of `ClientError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent
    Validation,
    /// A preliminary check against an external resource failed
    Precondition,
    /// The service answered with a failure status
    Remote,
    /// The response body did not match the expected shape
    Decoding,
    /// The request never completed
    Transport,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::UnsupportedLibrary { .. }
            | ClientError::TokenRequired
            | ClientError::InvalidImage
            | ClientError::InvalidUrl(_)
            | ClientError::InvalidToken(_) => ErrorKind::Validation,
            ClientError::InvalidDocumentation(_) => ErrorKind::Precondition,
            ClientError::Server { .. } | ClientError::InternalServer { .. } => ErrorKind::Remote,
            ClientError::Decode(_) => ErrorKind::Decoding,
            ClientError::Request(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status for remote failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::InternalServer { .. } => Some(500),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
