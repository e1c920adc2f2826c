use super::PaintingApi;
use crate::models::{
    DescriptionRequest, DescriptionResponse, ErrorBody, ImageRequest, ImageResponse, Theme,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Calls a running studio server's JSON routes.
pub struct StudioClient {
    client: Client,
    base_url: String,
}

impl StudioClient {
    pub fn new(base_url: String) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: String, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(Error::Studio(format!("{} (status {})", message, status)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PaintingApi for StudioClient {
    async fn describe(&self, theme: Theme) -> Result<String> {
        let request = DescriptionRequest {
            theme: theme.as_str().to_string(),
        };
        let response: DescriptionResponse = self.post("/api/description", &request).await?;
        Ok(response.description)
    }

    async fn paint(&self, request: &ImageRequest) -> Result<String> {
        let response: ImageResponse = self.post("/api/image", request).await?;
        Ok(response.image_url)
    }
}
