use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{
    ApiBatchRequest, ApiBatchResponse, ApiCalendarMeta, ApiCalendarRequest, ApiCalendarResponse,
};
use crate::calendar::plan_calendar;
use crate::features::build_features;
use crate::predictor::PredictionService;
use crate::{PostInput, PredictionResult};

#[derive(Clone)]
pub struct AppState {
    service: Arc<PredictionService>,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/predict", post(predict_handler))
        .route("/api/predict/batch", post(predict_batch_handler))
        .route("/api/generate-calendar", post(generate_calendar_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn predict_handler(
    State(state): State<AppState>,
    Json(post): Json<PostInput>,
) -> Json<PredictionResult> {
    let features = build_features(&post);
    Json(state.service.predict(&features).await)
}

async fn predict_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiBatchRequest>,
) -> Json<ApiBatchResponse> {
    let features = request.posts.iter().map(build_features).collect::<Vec<_>>();
    let predictions = state.service.predict_batch(&features).await;
    Json(ApiBatchResponse { predictions })
}

async fn generate_calendar_handler(
    State(state): State<AppState>,
    Json(body): Json<ApiCalendarRequest>,
) -> Result<Json<ApiCalendarResponse>, (StatusCode, String)> {
    let (request, follower_count, recent_post_count) = body
        .into_request()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let items = plan_calendar(&state.service, &request, follower_count, recent_post_count).await;

    Ok(Json(ApiCalendarResponse {
        meta: ApiCalendarMeta {
            company_name: request.company_name.clone(),
            objective: request.objective.clone(),
            days: request.effective_days(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        items,
    }))
}
