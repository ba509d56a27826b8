use super::client::ImaggaHttpClient;
use super::types::ColorsResponse;
use super::{ColorService, COLORS_ENDPOINT};
use crate::models::{ContentId, PhotoColor};
use crate::Result;
use async_trait::async_trait;

/// Fetches the dominant image colors from `GET /colors`.
pub struct ImaggaColorClient {
    http: ImaggaHttpClient,
}

impl ImaggaColorClient {
    pub fn new(http: ImaggaHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ColorService for ImaggaColorClient {
    async fn fetch_colors(&self, content_id: &ContentId) -> Result<Vec<PhotoColor>> {
        // Object (foreground/background) colors are not needed
        let response: ColorsResponse = self
            .http
            .get(
                COLORS_ENDPOINT,
                "/colors",
                &[
                    ("content", content_id.as_str()),
                    ("extract_object_colors", "0"),
                ],
            )
            .await?;

        let colors = response.into_colors()?;
        tracing::info!("Fetched {} colors for content {}", colors.len(), content_id);
        Ok(colors)
    }
}
