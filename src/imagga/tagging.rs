use super::client::ImaggaHttpClient;
use super::types::TaggingResponse;
use super::{TaggingService, TAGGING_ENDPOINT};
use crate::models::ContentId;
use crate::Result;
use async_trait::async_trait;

/// Fetches keyword tags from `GET /tagging`.
pub struct ImaggaTaggingClient {
    http: ImaggaHttpClient,
}

impl ImaggaTaggingClient {
    pub fn new(http: ImaggaHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TaggingService for ImaggaTaggingClient {
    async fn fetch_tags(&self, content_id: &ContentId) -> Result<Vec<String>> {
        let response: TaggingResponse = self
            .http
            .get(
                TAGGING_ENDPOINT,
                "/tagging",
                &[("content", content_id.as_str())],
            )
            .await?;

        let tags = response.into_tags()?;
        tracing::info!("Fetched {} tags for content {}", tags.len(), content_id);
        Ok(tags)
    }
}
