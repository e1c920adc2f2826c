use super::PaintingApi;
use crate::models::{ImageRequest, Theme};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockPaintingApi {
    description: String,
    image_url: String,
    fail_describe: bool,
    themes: Arc<Mutex<Vec<Theme>>>,
    paint_requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockPaintingApi {
    pub fn new() -> Self {
        Self {
            description: "A mock painting description".to_string(),
            image_url: "https://mock-images.example.com/painting.png".to_string(),
            fail_describe: false,
            themes: Arc::new(Mutex::new(Vec::new())),
            paint_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_image_url(mut self, url: String) -> Self {
        self.image_url = url;
        self
    }

    pub fn with_describe_failure(mut self) -> Self {
        self.fail_describe = true;
        self
    }

    pub fn get_themes(&self) -> Vec<Theme> {
        self.themes.lock().unwrap().clone()
    }

    pub fn get_paint_requests(&self) -> Vec<ImageRequest> {
        self.paint_requests.lock().unwrap().clone()
    }
}

impl Default for MockPaintingApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaintingApi for MockPaintingApi {
    async fn describe(&self, theme: Theme) -> Result<String> {
        self.themes.lock().unwrap().push(theme);
        if self.fail_describe {
            return Err(Error::Studio("Failed to generate description".to_string()));
        }
        Ok(self.description.clone())
    }

    async fn paint(&self, request: &ImageRequest) -> Result<String> {
        self.paint_requests.lock().unwrap().push(request.clone());
        Ok(self.image_url.clone())
    }
}
