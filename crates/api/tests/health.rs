mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, get, lazy_pool, test_config, with_replicate,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_ok_with_database(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["replicate_configured"], false);
    assert_eq!(json["openai_configured"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_degrades_without_database() {
    let config = with_replicate(test_config(), "http://127.0.0.1:1".into());
    let app = build_test_app_with(lazy_pool(), config);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["replicate_configured"], true);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_test_app(lazy_pool());

    let response = get(app, "/api/v1/styles").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_test_app(lazy_pool());
    let response = get(app, "/api/v1/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
