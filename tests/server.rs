use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tastehub_engine::server::{router, AppState};
use tastehub_engine::{FakeRunner, FeatureOrderLoader, ModelError, PredictionService};
use tower::ServiceExt;

fn app(runner: &FakeRunner) -> Router {
    let service = PredictionService::new(
        Arc::new(runner.clone()),
        Arc::new(FeatureOrderLoader::new(None)),
    );
    router(AppState::new(service))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn health_is_ok() {
    let runner = FakeRunner::prediction(0.05);
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let response = app(&runner).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn predict_returns_result() {
    let runner = FakeRunner::prediction(5.1);
    let (status, body) = post_json(
        app(&runner),
        "/api/predict",
        json!({
            "platform": "instagram",
            "date": "2024-02-14",
            "title": "Valentine special",
            "description": "Order now #love #dessert",
            "postsLast7Days": 3,
            "followerCount": 12000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["provider"], "external-model");
    assert_eq!(value["modelVersion"], "tastehub-engagement-rate-v1");
    assert_eq!(value["percent"], 5.1);
    assert_eq!(value["features"]["campaign"], "Valentine");
    assert_eq!(value["features"]["hashtags_count"], 2);
    assert_eq!(value["features"]["follower_count"], 12000);
    assert_eq!(value["features"]["day_of_week"], "Wed");
}

#[tokio::test]
async fn predict_reports_fallback_warning() {
    let runner = FakeRunner::failing(ModelError::MissingPrediction);
    let (status, body) = post_json(
        app(&runner),
        "/api/predict",
        json!({ "platform": "twitter", "description": "Quick thoughts" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["provider"], "heuristic-fallback");
    assert_eq!(value["warning"], "Model output is missing a numeric prediction.");
    assert_eq!(value["features"]["day_of_week"], "Mon");
}

#[tokio::test]
async fn batch_predicts_in_order() {
    let runner = FakeRunner::predictions(&[0.02, 0.03]);
    let (status, body) = post_json(
        app(&runner),
        "/api/predict/batch",
        json!({
            "posts": [
                { "platform": "facebook", "description": "Weekend brunch" },
                { "platform": "twitter", "description": "A thread on coffee" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    let predictions = value["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["features"]["platform"], "Facebook");
    assert_eq!(predictions[1]["features"]["format"], "thread");
    assert_eq!(predictions[1]["rate"], 0.03);
}

#[tokio::test]
async fn calendar_requires_company_and_objective() {
    let runner = FakeRunner::predictions(&[]);
    let (status, body) = post_json(
        app(&runner),
        "/api/generate-calendar",
        json!({ "companyName": "  ", "objective": "sales" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8_lossy(&body), "companyName is required");

    let (status, body) = post_json(
        app(&runner),
        "/api/generate-calendar",
        json!({ "companyName": "TasteHub" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8_lossy(&body), "objective is required");
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn calendar_returns_scored_items() {
    let runner = FakeRunner::failing(ModelError::Spawn("offline".to_string()));
    let (status, body) = post_json(
        app(&runner),
        "/api/generate-calendar",
        json!({
            "companyName": "TasteHub",
            "objective": "Grow awareness",
            "platforms": ["TWITTER", "facebook", "tiktok"],
            "days": 4,
            "startDate": "2024-03-04",
            "requirements": { "dailyThemes": false }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["meta"]["companyName"], "TasteHub");
    assert_eq!(value["meta"]["days"], 4);
    assert!(value["meta"]["generatedAt"].is_string());

    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["platform"], "twitter");
    assert_eq!(items[1]["platform"], "facebook");
    assert_eq!(items[0]["theme"], "Reach Expansion");
    assert_eq!(items[0]["cta"], "Share this post");
    assert_eq!(items[3]["date"], "2024-03-07");
    assert_eq!(items[0]["modelProvider"], "heuristic-fallback");
    assert!(items[0]["modelWarning"].as_str().unwrap().contains("offline"));
}

#[tokio::test]
async fn calendar_rejects_bad_start_date() {
    let runner = FakeRunner::predictions(&[]);
    let (status, _) = post_json(
        app(&runner),
        "/api/generate-calendar",
        json!({ "companyName": "TasteHub", "objective": "sales", "startDate": "March 4" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
