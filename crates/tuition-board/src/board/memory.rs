use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use super::api::{ApiError, ApplyConfirmation, BoardApi};
use super::domain::{Post, PostId, ViewerId, ViewerRole};

/// Stored application, kept for inspection by demos and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredApplication {
    pub post_id: PostId,
    pub applicant: ViewerId,
    pub message: String,
}

#[derive(Default)]
struct State {
    posts: Vec<Post>,
    roles: HashMap<ViewerId, String>,
    applications: Vec<StoredApplication>,
    applied: BTreeSet<(PostId, ViewerId)>,
    posts_outage: Option<String>,
    status_outage: Option<String>,
}

/// In-process [`BoardApi`] used by the demo command and tests.
#[derive(Default, Clone)]
pub struct InMemoryBoardApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryBoardApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let api = Self::default();
        api.state.lock().expect("board state mutex poisoned").posts = posts;
        api
    }

    pub fn register_profile(&self, viewer: ViewerId, role: impl Into<String>) {
        self.state
            .lock()
            .expect("board state mutex poisoned")
            .roles
            .insert(viewer, role.into());
    }

    /// Seed an application as if it had been submitted earlier.
    pub fn record_application(&self, post_id: PostId, applicant: ViewerId) {
        let mut state = self.state.lock().expect("board state mutex poisoned");
        state.applied.insert((post_id.clone(), applicant.clone()));
        state.applications.push(StoredApplication {
            post_id,
            applicant,
            message: String::new(),
        });
    }

    /// Make `list_posts` fail with `message` until cleared with `None`.
    pub fn set_posts_outage(&self, message: Option<&str>) {
        self.state
            .lock()
            .expect("board state mutex poisoned")
            .posts_outage = message.map(str::to_string);
    }

    /// Make `applied_post_ids` fail with `message` until cleared with `None`.
    pub fn set_status_outage(&self, message: Option<&str>) {
        self.state
            .lock()
            .expect("board state mutex poisoned")
            .status_outage = message.map(str::to_string);
    }

    pub fn applications(&self) -> Vec<StoredApplication> {
        self.state
            .lock()
            .expect("board state mutex poisoned")
            .applications
            .clone()
    }
}

#[async_trait::async_trait]
impl BoardApi for InMemoryBoardApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let state = self.state.lock().expect("board state mutex poisoned");
        if let Some(message) = &state.posts_outage {
            return Err(ApiError::Transport(message.clone()));
        }
        Ok(state.posts.clone())
    }

    async fn applied_post_ids(
        &self,
        viewer: &ViewerId,
        post_ids: &[PostId],
    ) -> Result<Vec<PostId>, ApiError> {
        let state = self.state.lock().expect("board state mutex poisoned");
        if let Some(message) = &state.status_outage {
            return Err(ApiError::Transport(message.clone()));
        }
        Ok(post_ids
            .iter()
            .filter(|id| state.applied.contains(&((*id).clone(), viewer.clone())))
            .cloned()
            .collect())
    }

    async fn viewer_role(&self, viewer: &ViewerId) -> Result<ViewerRole, ApiError> {
        let state = self.state.lock().expect("board state mutex poisoned");
        state
            .roles
            .get(viewer)
            .map(|role| ViewerRole::from_profile(role))
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: Some("Profile not found".to_string()),
            })
    }

    async fn apply(
        &self,
        post_id: &PostId,
        applicant: &ViewerId,
        message: &str,
    ) -> Result<ApplyConfirmation, ApiError> {
        let mut state = self.state.lock().expect("board state mutex poisoned");

        if !state.posts.iter().any(|post| post.id == *post_id) {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Post not found".to_string()),
            });
        }

        if !state.applied.insert((post_id.clone(), applicant.clone())) {
            return Err(ApiError::DuplicateApplication(
                "You have already applied to this post.".to_string(),
            ));
        }

        state.applications.push(StoredApplication {
            post_id: post_id.clone(),
            applicant: applicant.clone(),
            message: message.to_string(),
        });

        Ok(ApplyConfirmation {
            post_id: post_id.clone(),
            message: "Application submitted successfully".to_string(),
        })
    }
}
