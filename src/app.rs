//! Application orchestration for provisioning, describing and painting.

use crate::ai::{
    AssistantSpec, AssistantsApi, ImageGenerationService, OpenAiAssistantsClient,
    OpenAiImageClient,
};
use crate::models::{Config, ImageRequest};
use crate::poll::{wait_for_run, PollPolicy};
use crate::{prompts, Error, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Coordinates the provider calls behind each studio route.
pub struct App {
    assistants: Box<dyn AssistantsApi>,
    images: Box<dyn ImageGenerationService>,
    assistant_id: RwLock<Option<String>>,
    assistant_model: String,
    poll: PollPolicy,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub assistants: Box<dyn AssistantsApi>,
    pub images: Box<dyn ImageGenerationService>,
}

/// Non-service settings of an [`App`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub assistant_id: Option<String>,
    pub assistant_model: String,
    pub poll: PollPolicy,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            assistant_id: config.assistant_id.clone(),
            assistant_model: config.assistant_model.clone(),
            poll: config.poll,
        }
    }
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, settings: AppSettings) -> Self {
        Self {
            assistants: services.assistants,
            images: services.images,
            assistant_id: RwLock::new(settings.assistant_id),
            assistant_model: settings.assistant_model,
            poll: settings.poll,
        }
    }

    /// Construct the OpenAI-backed app described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let api_key = config.openai_api_key.clone().unwrap_or_else(|| {
            warn!("OPENAI_API_KEY is not set; provider calls will be rejected");
            String::new()
        });

        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        info!(
            "Provider: OpenAI at {} (assistant model: {}, image model: {})",
            config.openai_base_url, config.assistant_model, config.image_model
        );

        let assistants =
            OpenAiAssistantsClient::new_with_client(api_key.clone(), http_client.clone())
                .with_base_url(config.openai_base_url.clone());
        let images =
            OpenAiImageClient::new_with_client(api_key, config.image_model.clone(), http_client)
                .with_base_url(config.openai_base_url.clone());

        if config.assistant_id.is_none() {
            warn!("ASSISTANT_ID is not set; descriptions are unavailable until one is provisioned");
        }

        Self::with_services(
            AppServices {
                assistants: Box::new(assistants),
                images: Box::new(images),
            },
            AppSettings::from(config),
        )
    }

    /// The persona registered by [`App::provision_assistant`].
    pub fn assistant_spec(&self) -> AssistantSpec {
        AssistantSpec {
            name: prompts::ASSISTANT_NAME.to_string(),
            instructions: prompts::ASSISTANT_INSTRUCTIONS.trim().to_string(),
            model: self.assistant_model.clone(),
        }
    }

    pub async fn assistant_id(&self) -> Option<String> {
        self.assistant_id.read().await.clone()
    }

    /// Register the painting assistant with the provider.
    ///
    /// When no identifier is configured yet, the new one is adopted for
    /// subsequent descriptions in this process.
    pub async fn provision_assistant(&self) -> Result<String> {
        let id = self.assistants.create_assistant(&self.assistant_spec()).await?;
        info!("Provisioned assistant {}", id);

        let mut slot = self.assistant_id.write().await;
        match slot.as_deref() {
            None => {
                info!(
                    "Using assistant {} for descriptions; set ASSISTANT_ID={} to keep it",
                    id, id
                );
                *slot = Some(id.clone());
            }
            Some(current) if current != id => {
                info!("Keeping configured assistant {}", current);
            }
            Some(_) => {}
        }

        Ok(id)
    }

    /// Ask the assistant to describe a painting for `theme`.
    pub async fn describe(&self, theme: &str) -> Result<String> {
        let assistant_id = self
            .assistant_id()
            .await
            .ok_or_else(|| Error::Config("ASSISTANT_ID is not configured".to_string()))?;

        info!("Generating description for theme '{}'", theme);

        let thread_id = self.assistants.create_thread().await?;
        let content = prompts::render(prompts::DESCRIPTION_USER, &[("theme", theme)]);
        self.assistants
            .add_user_message(&thread_id, &content)
            .await?;

        let run = self.assistants.create_run(&thread_id, &assistant_id).await?;
        wait_for_run(self.assistants.as_ref(), &thread_id, &run.id, &self.poll).await?;

        let messages = self.assistants.list_messages(&thread_id).await?;
        messages
            .into_iter()
            .next()
            .and_then(|message| message.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::AiProvider("No reply text in thread".to_string()))
    }

    /// Render `request.description` and return the provider-hosted image URL.
    pub async fn paint(&self, request: &ImageRequest) -> Result<String> {
        info!(
            "Generating image ({}, {}, {})",
            request.size, request.quality, request.style
        );
        self.images.generate_image(request).await
    }
}
