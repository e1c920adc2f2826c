use super::{AssistantSpec, AssistantsApi, ImageGenerationService, Run, RunStatus, ThreadMessage};
use crate::models::ImageRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the Assistants API.
///
/// Every call is recorded by operation name. Run statuses are served from a
/// script in order; once the script is exhausted the run reports `completed`.
#[derive(Clone)]
pub struct MockAssistantsClient {
    assistant_id: String,
    run_statuses: Arc<Mutex<Vec<RunStatus>>>,
    messages: Arc<Mutex<Vec<ThreadMessage>>>,
    fail_on: Option<&'static str>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    user_messages: Arc<Mutex<Vec<String>>>,
    created_assistants: Arc<Mutex<Vec<AssistantSpec>>>,
}

impl MockAssistantsClient {
    pub fn new() -> Self {
        Self {
            assistant_id: "asst_mock".to_string(),
            run_statuses: Arc::new(Mutex::new(Vec::new())),
            messages: Arc::new(Mutex::new(vec![ThreadMessage {
                role: "assistant".to_string(),
                text: Some("A mock painting of soft light over still water".to_string()),
            }])),
            fail_on: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            user_messages: Arc::new(Mutex::new(Vec::new())),
            created_assistants: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_assistant_id(mut self, id: String) -> Self {
        self.assistant_id = id;
        self
    }

    /// Queue the statuses returned by successive `retrieve_run` calls.
    pub fn with_run_statuses(self, statuses: Vec<RunStatus>) -> Self {
        *self.run_statuses.lock().unwrap() = statuses;
        self
    }

    /// Replace the thread contents returned by `list_messages`.
    pub fn with_messages(self, messages: Vec<ThreadMessage>) -> Self {
        *self.messages.lock().unwrap() = messages;
        self
    }

    pub fn with_reply(self, text: &str) -> Self {
        self.with_messages(vec![ThreadMessage {
            role: "assistant".to_string(),
            text: Some(text.to_string()),
        }])
    }

    /// Make the named operation (e.g. `"create_run"`) fail.
    pub fn with_failure(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_of(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub fn get_user_messages(&self) -> Vec<String> {
        self.user_messages.lock().unwrap().clone()
    }

    pub fn get_created_assistants(&self) -> Vec<AssistantSpec> {
        self.created_assistants.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation);
        if self.fail_on == Some(operation) {
            return Err(Error::AiProvider(format!("mock failure in {}", operation)));
        }
        Ok(())
    }
}

impl Default for MockAssistantsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantsApi for MockAssistantsClient {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String> {
        self.record("create_assistant")?;
        self.created_assistants.lock().unwrap().push(spec.clone());
        Ok(self.assistant_id.clone())
    }

    async fn create_thread(&self) -> Result<String> {
        self.record("create_thread")?;
        Ok("thread_mock".to_string())
    }

    async fn add_user_message(&self, _thread_id: &str, content: &str) -> Result<()> {
        self.record("add_user_message")?;
        self.user_messages.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run> {
        self.record("create_run")?;
        Ok(Run {
            id: "run_mock".to_string(),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        self.record("retrieve_run")?;
        let mut statuses = self.run_statuses.lock().unwrap();
        let status = if statuses.is_empty() {
            RunStatus::Completed
        } else {
            statuses.remove(0)
        };
        Ok(Run {
            id: run_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.record("list_messages")?;
        Ok(self.messages.lock().unwrap().clone())
    }
}

/// In-memory image generator that records every request it receives.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    image_url: String,
    fail: bool,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            image_url: "https://mock-images.example.com/painting.png".to_string(),
            fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_url(mut self, url: String) -> Self {
        self.image_url = url;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(Error::AiProvider("mock image failure".to_string()));
        }
        Ok(self.image_url.clone())
    }
}
