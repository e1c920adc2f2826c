//! AI service integration for painting descriptions and images
//!
//! Provides interfaces to OpenAI's Assistants API (assistants, threads,
//! messages and runs) and its Image API, plus in-memory mocks of both.

pub mod mock;
pub mod openai;

pub use mock::{MockAssistantsClient, MockImageGenerationClient};
pub use openai::{OpenAiAssistantsClient, OpenAiHttpClient, OpenAiImageClient};

use crate::models::ImageRequest;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Persona registered with the provider by the provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

/// Lifecycle states of an assistant run as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }

    /// True for states the run can no longer leave without completing.
    ///
    /// `requires_action` counts as terminal: the studio never submits tool
    /// outputs, so such a run would wait forever.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::RequiresAction
                | RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Incomplete
                | RunStatus::Expired
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    pub last_error: Option<String>,
}

/// A thread message reduced to its role and first text part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub role: String,
    pub text: Option<String>,
}

#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Register an assistant and return its identifier.
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String>;
    /// Open an empty conversation thread and return its identifier.
    async fn create_thread(&self) -> Result<String>;
    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<()>;
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;
    /// Messages on the thread in provider order (newest first).
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Render one image and return the provider-hosted URL.
    async fn generate_image(&self, request: &ImageRequest) -> Result<String>;
}
