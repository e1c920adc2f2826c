use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use painting_studio::{
    ai::{MockAssistantsClient, MockImageGenerationClient, RunStatus},
    app::{App, AppServices, AppSettings},
    models::{Config, ImageRequest, Theme},
    poll::PollPolicy,
    server,
    studio::{Phase, Studio},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_app(
    assistants: &MockAssistantsClient,
    images: &MockImageGenerationClient,
    assistant_id: Option<&str>,
) -> Arc<App> {
    Arc::new(App::with_services(
        AppServices {
            assistants: Box::new(assistants.clone()),
            images: Box::new(images.clone()),
        },
        AppSettings {
            assistant_id: assistant_id.map(str::to_string),
            assistant_model: "gpt-4-1106-preview".to_string(),
            poll: PollPolicy::default(),
        },
    ))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_assistant_route_rejects_other_methods() {
    let assistants = MockAssistantsClient::new();
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), None);

    for verb in ["GET", "PUT", "DELETE", "PATCH"] {
        let request = Request::builder()
            .method(verb)
            .uri("/api/assistant")
            .body(Body::empty())
            .unwrap();
        let response = server::router(app.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", verb);
        assert_eq!(response.headers()[header::ALLOW], "POST");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, format!("Method {} Not Allowed", verb));
    }

    assert_eq!(assistants.get_call_count(), 0);
}

#[tokio::test]
async fn test_assistant_route_returns_identifier() {
    let assistants = MockAssistantsClient::new().with_assistant_id("asst_painter".to_string());
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), None);

    let (status, body) = send(server::router(app), "POST", "/api/assistant", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "assistantId": "asst_painter" }));
}

#[tokio::test]
async fn test_assistant_route_reports_provider_message() {
    let assistants = MockAssistantsClient::new().with_failure("create_assistant");
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), None);

    let (status, body) = send(server::router(app), "POST", "/api/assistant", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("mock failure in create_assistant"));
}

#[tokio::test]
async fn test_description_without_assistant_is_config_error() {
    let assistants = MockAssistantsClient::new();
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), None);

    for theme in Theme::ALL {
        let (status, body) = send(
            server::router(app.clone()),
            "POST",
            "/api/description",
            Some(json!({ "theme": theme.as_str() })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "ASSISTANT_ID is not configured" }));
    }

    assert_eq!(assistants.get_call_count(), 0);
}

#[tokio::test]
async fn test_description_for_nature() {
    let assistants = MockAssistantsClient::new().with_reply("Wildflowers under a storm sky");
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), Some("asst_1"));

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/description",
        Some(json!({ "theme": "Nature" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "description": "Wildflowers under a storm sky" }));
    assert_eq!(
        assistants.get_user_messages(),
        vec!["Describe a painting with the theme: Nature".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_description_failure_hides_cause() {
    let assistants =
        MockAssistantsClient::new().with_run_statuses(vec![RunStatus::Queued, RunStatus::Expired]);
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), Some("asst_1"));

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/description",
        Some(json!({ "theme": "Urban" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to generate description" }));
}

#[tokio::test]
async fn test_description_requires_theme_field() {
    let assistants = MockAssistantsClient::new();
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), Some("asst_1"));

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/description",
        Some(json!({ "topic": "Nature" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request body" }));
    assert_eq!(assistants.get_call_count(), 0);
}

#[tokio::test]
async fn test_provisioning_enables_descriptions() {
    let assistants = MockAssistantsClient::new().with_assistant_id("asst_fresh".to_string());
    let app = mock_app(&assistants, &MockImageGenerationClient::new(), None);

    let (status, _) = send(server::router(app.clone()), "POST", "/api/assistant", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/description",
        Some(json!({ "theme": "Abstract" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["description"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_image_route_forwards_exact_parameters() {
    let images =
        MockImageGenerationClient::new().with_image_url("https://img.test/barn.png".to_string());
    let app = mock_app(&MockAssistantsClient::new(), &images, None);

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/image",
        Some(json!({
            "description": "A red barn at sunset",
            "size": "512x512",
            "quality": "standard",
            "style": "vivid"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imageUrl": "https://img.test/barn.png" }));
    assert_eq!(
        images.get_requests(),
        vec![ImageRequest {
            description: "A red barn at sunset".to_string(),
            size: "512x512".to_string(),
            quality: "standard".to_string(),
            style: "vivid".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_image_route_failure_is_generic() {
    let images = MockImageGenerationClient::new().with_failure();
    let app = mock_app(&MockAssistantsClient::new(), &images, None);

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/image",
        Some(json!({
            "description": "A red barn at sunset",
            "size": "2048x2048",
            "quality": "ultra",
            "style": "vivid"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to generate image" }));
    assert_eq!(images.get_call_count(), 1);
}

#[tokio::test]
async fn test_image_route_requires_all_fields() {
    let images = MockImageGenerationClient::new();
    let app = mock_app(&MockAssistantsClient::new(), &images, None);

    let (status, _) = send(
        server::router(app),
        "POST",
        "/api/image",
        Some(json!({ "description": "A red barn at sunset", "size": "512x512" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(images.get_call_count(), 0);
}

#[tokio::test]
async fn test_studio_page_is_served() {
    let app = mock_app(
        &MockAssistantsClient::new(),
        &MockImageGenerationClient::new(),
        None,
    );
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = server::router(app).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("AI Painting Generator"));
    assert!(html.contains("/api/description"));
}

#[tokio::test]
async fn test_studio_drives_app_in_process() {
    let assistants = MockAssistantsClient::new().with_reply("Ruins wrapped in ivy");
    let images = MockImageGenerationClient::new();
    let app = mock_app(&assistants, &images, Some("asst_1"));

    let mut studio = Studio::new();
    studio.select_theme(Some(Theme::Historical));
    studio.generate_description(app.as_ref()).await.unwrap();
    studio.edit_description("Ruins wrapped in ivy, at dawn");
    studio.generate_painting(app.as_ref()).await.unwrap();

    assert_eq!(studio.phase(), Phase::PaintingReady);
    assert_eq!(
        images.get_requests()[0].description,
        "Ruins wrapped in ivy, at dawn"
    );
}

/// Full stack against a fake OpenAI: run completes on the third status check.
#[tokio::test]
async fn test_end_to_end_against_fake_provider() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "thread_9" })))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_9/messages"))
        .and(body_json(json!({
            "role": "user",
            "content": "Describe a painting with the theme: Landscape"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_9/runs"))
        .and(body_json(json!({ "assistant_id": "asst_env" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "run_9", "status": "queued" })),
        )
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_9/runs/run_9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "run_9", "status": "in_progress" })),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_9/runs/run_9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "run_9", "status": "completed" })),
        )
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_9/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "msg_2",
                "role": "assistant",
                "content": [{ "type": "text", "text": { "value": "Rolling hills in amber light", "annotations": [] } }]
            }]
        })))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_json(json!({
            "model": "dall-e-2",
            "prompt": "Rolling hills in amber light",
            "n": 1,
            "size": "1024x1024",
            "quality": "standard",
            "style": "vivid"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": "https://images.test/hills.png" }]
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let env: HashMap<&str, String> = HashMap::from([
        ("OPENAI_API_KEY", "sk-test".to_string()),
        ("ASSISTANT_ID", "asst_env".to_string()),
        ("OPENAI_BASE_URL", provider.uri()),
        ("RUN_POLL_INTERVAL_MS", "10".to_string()),
    ]);
    let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();
    let app = Arc::new(App::from_config(&config));

    let (status, body) = send(
        server::router(app.clone()),
        "POST",
        "/api/description",
        Some(json!({ "theme": "Landscape" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let description = body["description"].as_str().unwrap().to_string();
    assert_eq!(description, "Rolling hills in amber light");

    let (status, body) = send(
        server::router(app),
        "POST",
        "/api/image",
        Some(json!({
            "description": description,
            "size": "1024x1024",
            "quality": "standard",
            "style": "vivid"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imageUrl": "https://images.test/hills.png" }));
}
