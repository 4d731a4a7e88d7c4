use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::api::{ApiError, ApplyConfirmation, BoardApi};
use super::domain::{Post, PostId, Viewer, ViewerId, ViewerRole};
use super::eligibility::{self, ClickAction, Eligibility, EligibilityState};
use super::filter::{filter_indices, FilterCriteria};
use super::view::{found_summary, BoardView, BoardWarning, PostCard};

/// Page-lifetime state of the board for a single viewer.
///
/// Every mutation goes through a discrete event: `load`, `on_auth_changed`,
/// `set_criteria`/`clear_filters`, or a successful `apply`. Filtering is
/// recomputed eagerly on those events; eligibility is computed when a view is
/// built.
pub struct BoardSession<A> {
    api: Arc<A>,
    posts: Vec<Post>,
    visible: Vec<usize>,
    criteria: FilterCriteria,
    viewer: Viewer,
    loading: bool,
    banner: Option<String>,
    warnings: Vec<BoardWarning>,
}

impl<A> BoardSession<A>
where
    A: BoardApi + 'static,
{
    pub fn new(api: Arc<A>) -> Self {
        Self::with_identity(api, None)
    }

    pub fn with_identity(api: Arc<A>, identity: Option<ViewerId>) -> Self {
        Self {
            api,
            posts: Vec::new(),
            visible: Vec::new(),
            criteria: FilterCriteria::default(),
            viewer: Viewer {
                identity,
                ..Viewer::default()
            },
            loading: true,
            banner: None,
            warnings: Vec::new(),
        }
    }

    /// Fetch posts, the viewer's role, and the viewer's applied posts.
    ///
    /// Failures never abort the load: a post-list failure becomes the page
    /// banner, and lookup failures become warnings.
    pub async fn load(&mut self) {
        self.loading = true;
        self.banner = None;
        self.warnings.clear();

        if let Some(identity) = self.viewer.identity.clone() {
            self.refresh_role(&identity).await;
        }

        match self.api.list_posts().await {
            Ok(posts) => {
                debug!(count = posts.len(), "posts loaded");
                self.posts = posts;
                self.refilter();
                self.refresh_applied().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to load posts");
                self.banner = Some(match err {
                    ApiError::Rejected(message)
                    | ApiError::Status {
                        message: Some(message),
                        ..
                    } => message,
                    _ => "Failed to load posts".to_string(),
                });
            }
        }

        self.loading = false;
    }

    /// Handle an authentication change: reset the viewer and reload.
    pub async fn on_auth_changed(&mut self, identity: Option<ViewerId>) {
        info!(
            viewer_id = identity.as_ref().map(ViewerId::as_str).unwrap_or("anonymous"),
            "viewer changed"
        );
        self.viewer = Viewer {
            identity,
            ..Viewer::default()
        };
        self.load().await;
    }

    /// Follow identity changes until the auth provider drops its sender.
    ///
    /// The current value is applied first if it differs from the session's
    /// viewer. Returning drops the receiver, which ends the subscription.
    pub async fn follow_auth(&mut self, mut changes: watch::Receiver<Option<ViewerId>>) {
        loop {
            let identity = changes.borrow_and_update().clone();
            if identity != self.viewer.identity {
                self.on_auth_changed(identity).await;
            }

            if changes.changed().await.is_err() {
                debug!("auth provider closed, ending subscription");
                break;
            }
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.refilter();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn warnings(&self) -> &[BoardWarning] {
        &self.warnings
    }

    pub fn visible_posts(&self) -> Vec<&Post> {
        self.visible.iter().map(|index| &self.posts[*index]).collect()
    }

    pub fn post(&self, post_id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == *post_id)
    }

    pub fn eligibility_for(&self, post_id: &PostId) -> Option<Eligibility> {
        self.post(post_id)
            .map(|post| eligibility::eligibility(post, &self.viewer))
    }

    /// Resolve a click on a post's apply button.
    pub fn click_apply(&self, post_id: &PostId) -> Result<ClickAction, SessionError> {
        self.eligibility_for(post_id)
            .map(|eligibility| eligibility::click(&eligibility))
            .ok_or_else(|| SessionError::UnknownPost(post_id.clone()))
    }

    /// Submit an application for `post_id`.
    ///
    /// The post must currently be applicable. On success, and on a duplicate
    /// rejection, the post joins the viewer's applied set.
    pub async fn apply(
        &mut self,
        post_id: &PostId,
        message: &str,
    ) -> Result<ApplyConfirmation, SessionError> {
        let identity = self
            .viewer
            .identity
            .clone()
            .ok_or(SessionError::NotLoggedIn)?;
        let post = self
            .post(post_id)
            .ok_or_else(|| SessionError::UnknownPost(post_id.clone()))?;

        let state = eligibility::decide_state(post, &self.viewer);
        if state != EligibilityState::Applicable {
            return Err(SessionError::NotEligible {
                post_id: post_id.clone(),
                state,
            });
        }

        match self.api.apply(post_id, &identity, message).await {
            Ok(confirmation) => {
                info!(post_id = %post_id, viewer_id = %identity, "application submitted");
                self.viewer.applied.insert(post_id.clone());
                Ok(confirmation)
            }
            Err(ApiError::DuplicateApplication(detail)) => {
                warn!(post_id = %post_id, viewer_id = %identity, "backend reports duplicate application");
                self.viewer.applied.insert(post_id.clone());
                Err(SessionError::Api(ApiError::DuplicateApplication(detail)))
            }
            Err(err) => {
                warn!(post_id = %post_id, error = %err, "application failed");
                Err(SessionError::Api(err))
            }
        }
    }

    pub fn view(&self) -> BoardView {
        let posts: Vec<PostCard> = self
            .visible_posts()
            .into_iter()
            .map(|post| PostCard::new(post, eligibility::eligibility(post, &self.viewer)))
            .collect();

        BoardView {
            loading: self.loading,
            total: self.posts.len(),
            found: posts.len(),
            summary: found_summary(posts.len()),
            banner: self.banner.clone(),
            warnings: self.warnings.clone(),
            posts,
        }
    }

    fn refilter(&mut self) {
        self.visible = filter_indices(&self.posts, &self.criteria);
    }

    async fn refresh_role(&mut self, identity: &ViewerId) {
        match self.api.viewer_role(identity).await {
            Ok(role) => self.viewer.role = role,
            Err(err) => {
                warn!(viewer_id = %identity, error = %err, "profile lookup failed");
                self.viewer.role = ViewerRole::Unknown;
                self.warnings.push(BoardWarning::ProfileUnavailable {
                    detail: err.user_message(),
                });
            }
        }
    }

    async fn refresh_applied(&mut self) {
        let Some(identity) = self.viewer.identity.clone() else {
            self.viewer.applied.clear();
            return;
        };

        let ids: Vec<PostId> = self.posts.iter().map(|post| post.id.clone()).collect();
        match self.api.applied_post_ids(&identity, &ids).await {
            Ok(applied) => {
                debug!(applied = applied.len(), "applied posts loaded");
                self.viewer.applied.merge(applied);
            }
            Err(err) => {
                warn!(viewer_id = %identity, error = %err, "applied-status lookup failed");
                self.warnings.push(BoardWarning::AppliedStatusUnavailable {
                    detail: err.user_message(),
                });
            }
        }
    }
}

/// Error raised by board session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please login first")]
    NotLoggedIn,
    #[error("post {0} not found")]
    UnknownPost(PostId),
    #[error("cannot apply to post {post_id}: {}", .state.notice().unwrap_or("not eligible"))]
    NotEligible {
        post_id: PostId,
        state: EligibilityState,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// Message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::NotEligible { state, .. } => state
                .notice()
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
            SessionError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
