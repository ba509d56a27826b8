use super::{ColorService, ContentService, TaggingService};
use crate::models::{ContentId, PhotoColor};
use crate::progress::ProgressReporter;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

fn mock_failure() -> Error {
    Error::Vendor {
        status: 500,
        body: "Mock failure".to_string(),
    }
}

#[derive(Clone)]
pub struct MockContentClient {
    content_id: Arc<Mutex<String>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockContentClient {
    pub fn new() -> Self {
        Self {
            content_id: Arc::new(Mutex::new("mock-content-id".to_string())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_content_id(self, content_id: String) -> Self {
        *self.content_id.lock().unwrap() = content_id;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockContentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentService for MockContentClient {
    async fn upload(&self, jpeg: Vec<u8>, progress: ProgressReporter) -> Result<ContentId> {
        *self.call_count.lock().unwrap() += 1;

        let total = jpeg.len() as u64;
        progress.report(total / 2, total);

        if *self.should_fail.lock().unwrap() {
            return Err(mock_failure());
        }

        progress.report(total, total);
        ContentId::new(self.content_id.lock().unwrap().clone())
    }
}

#[derive(Clone)]
pub struct MockTaggingClient {
    tags: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
    last_content_id: Arc<Mutex<Option<String>>>,
}

impl MockTaggingClient {
    pub fn new() -> Self {
        Self {
            tags: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
            last_content_id: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_tag(self, tag: &str) -> Self {
        self.tags.lock().unwrap().push(tag.to_string());
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_last_content_id(&self) -> Option<String> {
        self.last_content_id.lock().unwrap().clone()
    }
}

impl Default for MockTaggingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaggingService for MockTaggingClient {
    async fn fetch_tags(&self, content_id: &ContentId) -> Result<Vec<String>> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_content_id.lock().unwrap() = Some(content_id.to_string());

        if *self.should_fail.lock().unwrap() {
            return Err(mock_failure());
        }

        Ok(self.tags.lock().unwrap().clone())
    }
}

#[derive(Clone)]
pub struct MockColorClient {
    colors: Arc<Mutex<Vec<PhotoColor>>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
    last_content_id: Arc<Mutex<Option<String>>>,
}

impl MockColorClient {
    pub fn new() -> Self {
        Self {
            colors: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
            last_content_id: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_color(self, color: PhotoColor) -> Self {
        self.colors.lock().unwrap().push(color);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_last_content_id(&self) -> Option<String> {
        self.last_content_id.lock().unwrap().clone()
    }
}

impl Default for MockColorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ColorService for MockColorClient {
    async fn fetch_colors(&self, content_id: &ContentId) -> Result<Vec<PhotoColor>> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_content_id.lock().unwrap() = Some(content_id.to_string());

        if *self.should_fail.lock().unwrap() {
            return Err(mock_failure());
        }

        Ok(self.colors.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_content_client_reports_progress() {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = values.clone();
        let client = MockContentClient::new().with_content_id("abc123".to_string());

        let id = client
            .upload(
                vec![0; 10],
                ProgressReporter::new(move |v| sink.lock().unwrap().push(v)),
            )
            .await
            .unwrap();

        assert_eq!(id.as_str(), "abc123");
        assert_eq!(*values.lock().unwrap(), vec![0.5, 1.0]);
        assert_eq!(client.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_tagging_client_custom_tags() {
        let client = MockTaggingClient::new().with_tag("cat").with_tag("pet");
        let id = ContentId::new("abc123".to_string()).unwrap();

        let tags = client.fetch_tags(&id).await.unwrap();

        assert_eq!(tags, vec!["cat", "pet"]);
        assert_eq!(client.get_last_content_id().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_mock_color_client_failure() {
        let client = MockColorClient::new().with_failure(true);
        let id = ContentId::new("abc123".to_string()).unwrap();

        assert!(client.fetch_colors(&id).await.is_err());
        assert_eq!(client.get_call_count(), 1);
    }
}
