use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tuition_board::board::catalog::{CLASS_LEVELS, SUBJECTS};
use tuition_board::board::{
    board_router, BoardApi, BoardSession, Eligibility, Gender, PostId, SessionError, ViewerId,
    VIEWER_HEADER,
};
use tuition_board::error::AppError;

#[derive(Debug, Serialize)]
pub(crate) struct CatalogResponse {
    pub(crate) class_levels: &'static [&'static str],
    pub(crate) subjects: &'static [&'static str],
    pub(crate) genders: [Gender; 3],
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibilityResponse {
    pub(crate) post_id: PostId,
    #[serde(flatten)]
    pub(crate) eligibility: Eligibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notice: Option<&'static str>,
}

pub(crate) fn with_board_routes<A>(api: Arc<A>) -> Router
where
    A: BoardApi + 'static,
{
    let lookups = Router::new()
        .route(
            "/api/v1/board/posts/:post_id/eligibility",
            get(eligibility_endpoint::<A>),
        )
        .with_state(api.clone());

    board_router(api)
        .merge(lookups)
        .route("/api/v1/board/catalog", get(catalog_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_endpoint() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        class_levels: CLASS_LEVELS,
        subjects: SUBJECTS,
        genders: [Gender::Male, Gender::Female, Gender::Any],
    })
}

pub(crate) async fn eligibility_endpoint<A>(
    State(api): State<Arc<A>>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<EligibilityResponse>, AppError>
where
    A: BoardApi + 'static,
{
    let viewer = headers
        .get(VIEWER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ViewerId::new);

    let mut session = BoardSession::with_identity(api, viewer);
    session.load().await;

    let post_id = PostId::new(post_id);
    let eligibility = session
        .eligibility_for(&post_id)
        .ok_or_else(|| SessionError::UnknownPost(post_id.clone()))?;

    Ok(Json(EligibilityResponse {
        post_id,
        notice: eligibility.state.notice(),
        eligibility,
    }))
}
