use serde::{Deserialize, Serialize};

use super::domain::{Post, PostId, ViewerId, ViewerRole};

/// Backend operations the board depends on.
#[async_trait::async_trait]
pub trait BoardApi: Send + Sync {
    /// Every published post.
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;

    /// Subset of `post_ids` the viewer has already applied to, in one round trip.
    async fn applied_post_ids(
        &self,
        viewer: &ViewerId,
        post_ids: &[PostId],
    ) -> Result<Vec<PostId>, ApiError>;

    async fn viewer_role(&self, viewer: &ViewerId) -> Result<ViewerRole, ApiError>;

    /// Record an application for (`post_id`, `applicant`).
    async fn apply(
        &self,
        post_id: &PostId,
        applicant: &ViewerId,
        message: &str,
    ) -> Result<ApplyConfirmation, ApiError>;
}

/// Backend acknowledgement of a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyConfirmation {
    pub post_id: PostId,
    pub message: String,
}

/// Errors raised while talking to the board backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend returned status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },
    #[error("{0}")]
    Rejected(String),
    #[error("duplicate application: {0}")]
    DuplicateApplication(String),
    #[error("unexpected backend payload: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for a page banner or notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected(message) | ApiError::DuplicateApplication(message) => {
                message.clone()
            }
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}
