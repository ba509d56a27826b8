use crate::models::Config;
use crate::{Error, Result};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Imagga REST client shared by the content, tagging and color
/// clients.
#[derive(Clone)]
pub struct ImaggaHttpClient {
    client: Client,
    api_key: String,
    api_secret: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl ImaggaHttpClient {
    pub fn new(
        api_key: String,
        api_secret: String,
        base_url: String,
        timeout: Option<Duration>,
    ) -> Self {
        Self::new_with_client(api_key, api_secret, base_url, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        api_secret: String,
        base_url: String,
        timeout: Option<Duration>,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            api_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new_with_client(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.base_url.clone(),
            config.timeout,
            client,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.basic_auth(&self.api_key, Some(&self.api_secret));
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// `GET {base_url}{path}?{query}` decoded as `Resp`.
    pub async fn get<Q, Resp>(&self, endpoint: &'static str, path: &str, query: &Q) -> Result<Resp>
    where
        Q: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Sending {} request to Imagga: GET {}", endpoint, url);

        let response = self
            .request(self.client.get(&url))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send {} request to Imagga: {}", endpoint, e);
                e
            })?;

        Self::parse_response(endpoint, response).await
    }

    /// `POST {base_url}{path}` with a multipart body, decoded as `Resp`.
    pub async fn post_multipart<Resp: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        form: Form,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Sending {} request to Imagga: POST {}", endpoint, url);

        let response = self
            .request(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send {} request to Imagga: {}", endpoint, e);
                e
            })?;

        Self::parse_response(endpoint, response).await
    }

    async fn parse_response<Resp: DeserializeOwned>(
        endpoint: &'static str,
        response: Response,
    ) -> Result<Resp> {
        if !response.status().is_success() {
            let status = response.status();
            // A failed body read still reports the status
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "Imagga {} error (status {}): {}",
                endpoint,
                status,
                error_text
            );
            return Err(Error::Vendor {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse Imagga {} response: {}\nBody: {}",
                endpoint,
                e,
                body
            );
            Error::schema(endpoint, e.to_string())
        })
    }
}
