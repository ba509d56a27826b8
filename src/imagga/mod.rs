//! Imagga API integration
//!
//! One client per endpoint: content upload, tagging and color extraction.
//! All three share an [`ImaggaHttpClient`] that carries the base URL,
//! credentials and connection pool.

pub mod client;
pub mod colors;
pub mod content;
pub mod mock;
pub mod tagging;
pub mod types;

pub use client::ImaggaHttpClient;
pub use colors::ImaggaColorClient;
pub use content::ImaggaContentClient;
pub use mock::{MockColorClient, MockContentClient, MockTaggingClient};
pub use tagging::ImaggaTaggingClient;

use crate::models::{ContentId, PhotoColor};
use crate::progress::ProgressReporter;
use crate::Result;
use async_trait::async_trait;

pub const CONTENT_ENDPOINT: &str = "content";
pub const TAGGING_ENDPOINT: &str = "tagging";
pub const COLORS_ENDPOINT: &str = "colors";

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Uploads JPEG bytes and returns the vendor's content ID.
    async fn upload(&self, jpeg: Vec<u8>, progress: ProgressReporter) -> Result<ContentId>;
}

#[async_trait]
pub trait TaggingService: Send + Sync {
    async fn fetch_tags(&self, content_id: &ContentId) -> Result<Vec<String>>;
}

#[async_trait]
pub trait ColorService: Send + Sync {
    async fn fetch_colors(&self, content_id: &ContentId) -> Result<Vec<PhotoColor>>;
}
