use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::models::ImageRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(60), client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: request.description.clone(),
            n: 1,
            size: request.size.clone(),
            quality: request.quality.clone(),
            style: request.style.clone(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        let image_data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No image data in OpenAI response".to_string()))?;

        match image_data.url {
            Some(url) => Ok(url),
            None if image_data.b64_json.is_some() => Err(Error::AiProvider(
                "OpenAI returned inline image data instead of a URL".to_string(),
            )),
            None => Err(Error::AiProvider("No image URL in OpenAI response".to_string())),
        }
    }
}
