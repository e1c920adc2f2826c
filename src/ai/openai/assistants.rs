use super::client::OpenAiHttpClient;
use super::types::{
    CreateAssistantRequest, CreateMessageRequest, CreateRunRequest, MessageList, ObjectRef,
    RunObject,
};
use crate::ai::{AssistantSpec, AssistantsApi, Run, ThreadMessage};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// OpenAI Assistants API (v2) client.
pub struct OpenAiAssistantsClient {
    http: OpenAiHttpClient,
}

impl OpenAiAssistantsClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(30), client)
                .with_header("OpenAI-Beta", "assistants=v2"),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl AssistantsApi for OpenAiAssistantsClient {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String> {
        let request = CreateAssistantRequest {
            name: spec.name.clone(),
            instructions: spec.instructions.clone(),
            model: spec.model.clone(),
        };

        let assistant: ObjectRef = self.http.post("/v1/assistants", &request).await?;
        Ok(assistant.id)
    }

    async fn create_thread(&self) -> Result<String> {
        let thread: ObjectRef = self.http.post_empty("/v1/threads").await?;
        tracing::debug!("Created thread {}", thread.id);
        Ok(thread.id)
    }

    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<()> {
        let request = CreateMessageRequest {
            role: "user".to_string(),
            content: content.to_string(),
        };

        let _: ObjectRef = self
            .http
            .post(&format!("/v1/threads/{}/messages", thread_id), &request)
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let request = CreateRunRequest {
            assistant_id: assistant_id.to_string(),
        };

        let run: RunObject = self
            .http
            .post(&format!("/v1/threads/{}/runs", thread_id), &request)
            .await?;
        Ok(run.into())
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let run: RunObject = self
            .http
            .get(&format!("/v1/threads/{}/runs/{}", thread_id, run_id))
            .await?;
        Ok(run.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let list: MessageList = self
            .http
            .get(&format!("/v1/threads/{}/messages", thread_id))
            .await?;
        Ok(list.data.into_iter().map(ThreadMessage::from).collect())
    }
}
