//! Devision Core Library
//!
//! Shared building blocks for the idevision API client:
//! - Result types decoded from the service's JSON payloads
//! - Lenient value coercion for numbers and timestamps
//! - Image format sniffing for the OCR and CDN endpoints
//! - Client configuration

pub mod coerce;
pub mod config;
pub mod image;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use image::ImageFormat;
pub use models::*;
