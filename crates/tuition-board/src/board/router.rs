use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::api::{ApiError, BoardApi};
use super::domain::{Gender, PostId, UnknownGender, ViewerId};
use super::eligibility::EligibilityState;
use super::filter::FilterCriteria;
use super::session::{BoardSession, SessionError};

/// Header carrying the identity resolved by the upstream auth provider.
pub const VIEWER_HEADER: &str = "x-viewer-id";

/// Router builder exposing the board view and apply submission.
pub fn board_router<A>(api: Arc<A>) -> Router
where
    A: BoardApi + 'static,
{
    Router::new()
        .route("/api/v1/board", get(board_handler::<A>))
        .route(
            "/api/v1/board/posts/:post_id/apply",
            post(apply_handler::<A>),
        )
        .with_state(api)
}

/// Filter form fields as query parameters. Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl BoardQuery {
    pub fn into_criteria(self) -> Result<FilterCriteria, UnknownGender> {
        let gender = match self.gender.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Gender>()?),
        };

        Ok(FilterCriteria {
            search: self.search,
            class_level: self.class,
            subject: self.subject,
            location: self.location,
            gender,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyBody {
    #[serde(default)]
    pub message: String,
}

fn viewer_from_headers(headers: &HeaderMap) -> Option<ViewerId> {
    headers
        .get(VIEWER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ViewerId::new)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn board_handler<A>(
    State(api): State<Arc<A>>,
    headers: HeaderMap,
    Query(query): Query<BoardQuery>,
) -> Response
where
    A: BoardApi + 'static,
{
    let criteria = match query.into_criteria() {
        Ok(criteria) => criteria,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let mut session = BoardSession::with_identity(api, viewer_from_headers(&headers));
    session.load().await;
    session.set_criteria(criteria);

    (StatusCode::OK, axum::Json(session.view())).into_response()
}

pub(crate) async fn apply_handler<A>(
    State(api): State<Arc<A>>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<ApplyBody>,
) -> Response
where
    A: BoardApi + 'static,
{
    let Some(viewer) = viewer_from_headers(&headers) else {
        return error_response(
            StatusCode::UNAUTHORIZED,
            SessionError::NotLoggedIn.user_message(),
        );
    };

    let mut session = BoardSession::with_identity(api, Some(viewer));
    session.load().await;

    if let Some(banner) = session.banner() {
        return error_response(StatusCode::BAD_GATEWAY, banner.to_string());
    }

    match session.apply(&PostId::new(post_id), &body.message).await {
        Ok(confirmation) => (StatusCode::CREATED, axum::Json(confirmation)).into_response(),
        Err(err) => error_response(status_for(&err), err.user_message()),
    }
}

fn status_for(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NotLoggedIn => StatusCode::UNAUTHORIZED,
        SessionError::UnknownPost(_) => StatusCode::NOT_FOUND,
        SessionError::NotEligible {
            state: EligibilityState::AlreadyApplied,
            ..
        } => StatusCode::CONFLICT,
        SessionError::NotEligible {
            state: EligibilityState::RequiresLogin,
            ..
        } => StatusCode::UNAUTHORIZED,
        SessionError::NotEligible { .. } => StatusCode::FORBIDDEN,
        SessionError::Api(ApiError::DuplicateApplication(_)) => StatusCode::CONFLICT,
        SessionError::Api(ApiError::Status { status: 404, .. }) => StatusCode::NOT_FOUND,
        SessionError::Api(ApiError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Api(_) => StatusCode::BAD_GATEWAY,
    }
}
