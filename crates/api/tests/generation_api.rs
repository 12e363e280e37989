//! Generation and enhancement endpoints against mocked vendors.
//!
//! None of these endpoints touch the database, so the app runs over a lazy
//! pool that never connects.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, expect_error, lazy_pool, post_json,
    post_multipart, post_raw, test_config, with_openai, with_replicate, Part,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCHNELL_PATH: &str = "/models/black-forest-labs/flux-schnell/predictions";
const FLUX_DEV_PATH: &str = "/models/black-forest-labs/flux-dev/predictions";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

fn prediction(id: &str, status: &str) -> serde_json::Value {
    json!({ "id": id, "status": status, "output": null, "error": null })
}

fn app_for(server: &MockServer) -> axum::Router {
    build_test_app_with(lazy_pool(), with_replicate(test_config(), server.uri()))
}

// ---------------------------------------------------------------------------
// POST /generate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_polls_until_succeeded_and_returns_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCHNELL_PATH))
        .and(header("Authorization", "Token r8_test"))
        .and(body_partial_json(json!({
            "input": { "prompt": "a lighthouse at dusk", "num_outputs": 1 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("p1", "starting")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/predictions/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction("p1", "processing")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/predictions/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "status": "succeeded",
            "output": "https://cdn.example.com/p1.webp",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "  a lighthouse at dusk ", "model": "schnell" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "imageUrl": ["https://cdn.example.com/p1.webp"] }));
}

#[tokio::test]
async fn generate_appends_style_fragments() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCHNELL_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p2",
            "status": "succeeded",
            "output": ["https://cdn.example.com/a.webp", "https://cdn.example.com/b.webp"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a castle", "model": "schnell", "styles": ["anime"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["imageUrl"].as_array().unwrap().len(), 2);

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["input"]["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("a castle, "), "prompt was {prompt}");
}

#[tokio::test]
async fn generate_rejects_missing_prompt_without_vendor_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("x", "starting")))
        .expect(0)
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "   ", "model": "schnell" }),
    )
    .await;
    let message = expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert_eq!(message, "Prompt is required");
}

#[tokio::test]
async fn unreadable_json_bodies_use_the_error_shape() {
    let app = build_test_app(lazy_pool());
    let json = Some("application/json");

    // Malformed syntax.
    let response = post_raw(app.clone(), "/api/v1/generate", json, "{\"prompt\": ").await;
    expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    // Well-formed but the wrong type.
    let response = post_raw(
        app.clone(),
        "/api/v1/generate",
        json,
        r#"{"prompt": 42}"#,
    )
    .await;
    expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    // No content type.
    let response = post_raw(
        app.clone(),
        "/api/v1/enhance-prompt",
        None,
        r#"{"prompt": "a"}"#,
    )
    .await;
    expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    let response = post_raw(app, "/api/v1/auth/login", json, "not json").await;
    expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
}

#[tokio::test]
async fn generate_rejects_missing_and_unknown_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("x", "starting")))
        .expect(0)
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a cat" }),
    )
    .await;
    let message = expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert_eq!(message, "Model is required");

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "dall-e" }),
    )
    .await;
    expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn generate_rejects_unknown_style() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("x", "starting")))
        .expect(0)
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "flux", "styles": ["baroque-noir"] }),
    )
    .await;
    expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn generate_without_token_is_configuration_error() {
    let app = build_test_app(lazy_pool());

    let response = post_json(
        app,
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "schnell" }),
    )
    .await;
    let message =
        expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR").await;
    assert_eq!(message, "API configuration error");
}

#[tokio::test]
async fn generate_validates_before_checking_configuration() {
    let app = build_test_app(lazy_pool());

    let response = post_json(app, "/api/v1/generate", json!({ "model": "schnell" })).await;
    expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn rejected_submission_surfaces_vendor_detail_and_never_polls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCHNELL_PATH))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "Invalid input: width" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction("x", "processing")))
        .expect(0)
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "schnell" }),
    )
    .await;
    let message = expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR").await;
    assert_eq!(message, "Invalid input: width");
}

#[tokio::test]
async fn rejected_submission_without_detail_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCHNELL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "schnell" }),
    )
    .await;
    let message = expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR").await;
    assert_eq!(message, "Failed to generate image. Status: 503");
}

#[tokio::test]
async fn failed_prediction_surfaces_vendor_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCHNELL_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("p3", "starting")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/predictions/p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p3",
            "status": "failed",
            "error": "NSFW content detected. Try running it again, or try a different prompt.",
        })))
        .mount(&server)
        .await;

    let response = post_json(
        app_for(&server),
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "schnell" }),
    )
    .await;
    let message =
        expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_FAILED").await;
    assert!(message.starts_with("NSFW content detected"));
}

#[tokio::test]
async fn timed_out_prediction_is_cancelled_at_vendor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCHNELL_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("p4", "starting")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/predictions/p4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction("p4", "processing")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predictions/p4/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction("p4", "canceled")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = with_replicate(test_config(), server.uri());
    config.replicate.poll.timeout = Some(Duration::from_millis(60));
    let app = build_test_app_with(lazy_pool(), config);

    let response = post_json(
        app,
        "/api/v1/generate",
        json!({ "prompt": "a cat", "model": "schnell" }),
    )
    .await;
    let message =
        expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_TIMEOUT").await;
    assert_eq!(message, "Image generation timed out");
}

// ---------------------------------------------------------------------------
// Multipart endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_to_image_requires_image_and_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("x", "starting")))
        .expect(0)
        .mount(&server)
        .await;

    let response = post_multipart(
        app_for(&server),
        "/api/v1/image-to-image",
        &[Part::Text("prompt", "make it snowy")],
        None,
    )
    .await;
    let message = expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    assert_eq!(message, "Image and prompt are required");

    let response = post_multipart(
        app_for(&server),
        "/api/v1/transform-furniture",
        &[Part::File {
            name: "image",
            filename: "room.png",
            content_type: "image/png",
            bytes: PNG_BYTES,
        }],
        None,
    )
    .await;
    let message = expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    assert_eq!(message, "Image and prompt are required");
}

#[tokio::test]
async fn generate_image_to_image_requires_image() {
    let app = build_test_app(lazy_pool());

    let response = post_multipart(
        app,
        "/api/v1/generate-image-to-image",
        &[Part::Text("prompt", "a modern villa")],
        None,
    )
    .await;
    let message = expect_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    assert_eq!(message, "Image is required");
}

#[tokio::test]
async fn generate_image_to_image_joins_styles_and_sends_data_uri() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLUX_DEV_PATH))
        .and(header("Prefer", "wait"))
        .and(body_partial_json(json!({
            "input": { "prompt": "a modern villa, brutalist, night" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p5",
            "status": "succeeded",
            "output": ["https://cdn.example.com/villa.jpg"],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction("p5", "processing")))
        .expect(0)
        .mount(&server)
        .await;

    let response = post_multipart(
        app_for(&server),
        "/api/v1/generate-image-to-image",
        &[
            Part::File {
                name: "image",
                filename: "sketch.png",
                content_type: "image/png",
                bytes: PNG_BYTES,
            },
            Part::Text("prompt", "a modern villa"),
            Part::Text("styles", "brutalist"),
            Part::Text("styles", "night"),
        ],
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["imageUrl"], json!(["https://cdn.example.com/villa.jpg"]));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let image = sent["input"]["image"].as_str().unwrap();
    assert!(image.starts_with("data:image/png;base64,"), "image was {image}");
}

#[tokio::test]
async fn transform_furniture_wraps_style_in_instruction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLUX_DEV_PATH))
        .and(header("Prefer", "wait"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p6",
            "status": "succeeded",
            "output": "https://cdn.example.com/room.jpg",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = post_multipart(
        app_for(&server),
        "/api/v1/transform-furniture",
        &[
            Part::File {
                name: "image",
                filename: "room.jpg",
                content_type: "image/jpeg",
                bytes: PNG_BYTES,
            },
            Part::Text("prompt", "Scandinavian"),
        ],
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["imageUrl"], json!(["https://cdn.example.com/room.jpg"]));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["input"]["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("Transform this room into Scandinavian style"));
}

#[tokio::test]
async fn image_to_image_polls_without_prefer_wait() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLUX_DEV_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction("p7", "starting")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/predictions/p7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p7",
            "status": "succeeded",
            "output": ["https://cdn.example.com/out.webp"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = post_multipart(
        app_for(&server),
        "/api/v1/image-to-image",
        &[
            Part::File {
                name: "image",
                filename: "in.png",
                content_type: "image/png",
                bytes: PNG_BYTES,
            },
            Part::Text("prompt", "make it snowy"),
        ],
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("prefer").is_none());
}

// ---------------------------------------------------------------------------
// POST /enhance-prompt
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enhance_prompt_returns_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  A luminous koi pond at dawn.  " } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = build_test_app_with(lazy_pool(), with_openai(test_config(), server.uri()));
    let response = post_json(app, "/api/v1/enhance-prompt", json!({ "prompt": "koi pond" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "enhancedPrompt": "A luminous koi pond at dawn." }));
}

#[tokio::test]
async fn enhance_prompt_validation_and_configuration() {
    let app = build_test_app(lazy_pool());
    let response = post_json(app, "/api/v1/enhance-prompt", json!({})).await;
    expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let app = build_test_app(lazy_pool());
    let response = post_json(app, "/api/v1/enhance-prompt", json!({ "prompt": "koi" })).await;
    expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR").await;
}

#[tokio::test]
async fn enhance_prompt_upstream_failure_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached" }
        })))
        .mount(&server)
        .await;

    let app = build_test_app_with(lazy_pool(), with_openai(test_config(), server.uri()));
    let response = post_json(app, "/api/v1/enhance-prompt", json!({ "prompt": "koi" })).await;
    let message = expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR").await;
    assert_eq!(message, "Failed to enhance prompt");
}
