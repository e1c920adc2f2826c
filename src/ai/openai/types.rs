//! OpenAI-specific request/response payloads used by provider modules.

use crate::ai::{Run, RunStatus, ThreadMessage};
use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/assistants`.
#[derive(Debug, Serialize)]
pub struct CreateAssistantRequest {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

/// Any object the provider identifies only by `id` for our purposes
/// (assistants, threads, created messages).
#[derive(Debug, Deserialize)]
pub struct ObjectRef {
    pub id: String,
}

/// Request body for `POST /v1/threads/{thread_id}/messages`.
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest {
    pub role: String,
    pub content: String,
}

/// Request body for `POST /v1/threads/{thread_id}/runs`.
#[derive(Debug, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RunObject {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

#[derive(Debug, Deserialize)]
pub struct RunLastError {
    pub code: String,
    pub message: String,
}

impl From<RunObject> for Run {
    fn from(run: RunObject) -> Self {
        Run {
            id: run.id,
            status: run.status,
            last_error: run
                .last_error
                .map(|e| format!("{}: {}", e.code, e.message)),
        }
    }
}

/// Response of `GET /v1/threads/{thread_id}/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageList {
    pub data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
pub struct MessageObject {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

/// Message content union; only text parts are read.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: MessageText },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct MessageText {
    pub value: String,
}

impl From<MessageObject> for ThreadMessage {
    fn from(message: MessageObject) -> Self {
        let text = message.content.into_iter().find_map(|part| match part {
            MessageContent::Text { text } => Some(text.value),
            MessageContent::Other => None,
        });
        ThreadMessage {
            role: message.role,
            text,
        }
    }
}

/// Request body for image generation.
#[derive(Debug, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
    pub style: String,
}

/// Top-level image generation response.
#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    pub data: Vec<ImageData>,
}

/// One generated image item (URL or base64).
#[derive(Debug, Deserialize)]
pub struct ImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}
