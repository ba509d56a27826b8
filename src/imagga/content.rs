use super::client::ImaggaHttpClient;
use super::types::UploadResponse;
use super::{ContentService, CONTENT_ENDPOINT};
use crate::models::{ContentId, DEFAULT_UPLOAD_CHUNK_SIZE};
use crate::progress::{progress_stream, ProgressReporter};
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Body;

const UPLOAD_FIELD_NAME: &str = "imagefile";
const UPLOAD_FILE_NAME: &str = "image.jpg";
const UPLOAD_MIME_TYPE: &str = "image/jpeg";

/// Uploads photos to `POST /content`.
pub struct ImaggaContentClient {
    http: ImaggaHttpClient,
    chunk_size: usize,
}

impl ImaggaContentClient {
    pub fn new(http: ImaggaHttpClient) -> Self {
        Self {
            http,
            chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        }
    }

    /// Granularity of progress updates, in bytes.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[async_trait]
impl ContentService for ImaggaContentClient {
    async fn upload(&self, jpeg: Vec<u8>, progress: ProgressReporter) -> Result<ContentId> {
        let total = jpeg.len() as u64;
        tracing::info!("Uploading {} bytes to Imagga", total);

        let stream = progress_stream(Bytes::from(jpeg), self.chunk_size, progress);
        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME_TYPE)?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let response: UploadResponse = self
            .http
            .post_multipart(CONTENT_ENDPOINT, "/content", form)
            .await?;

        let content_id = response.into_content_id()?;
        tracing::info!("Content uploaded with ID: {}", content_id);
        Ok(content_id)
    }
}
