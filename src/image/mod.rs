//! Image preparation before upload
//!
//! Photos are re-encoded as JPEG at a reduced quality so the upload stays
//! small regardless of the source format.

pub mod mock;
pub mod processor;

pub use mock::MockImageProcessor;
pub use processor::JpegProcessor;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Decodes `image_data` and returns it encoded as JPEG.
    async fn encode_jpeg(&self, image_data: &[u8]) -> Result<Vec<u8>>;
}
