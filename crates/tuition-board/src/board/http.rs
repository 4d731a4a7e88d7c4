use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::api::{ApiError, ApplyConfirmation, BoardApi};
use super::domain::{Post, PostId, ViewerId, ViewerRole};
use crate::config::BackendConfig;

/// [`BoardApi`] backed by the marketplace REST service.
#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBoardApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and decodes the JSON body, mapping non-2xx statuses to [`ApiError`].
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            #[derive(Deserialize)]
            struct ThrownError {
                #[serde(default)]
                message: Option<String>,
                #[serde(default)]
                error: Option<String>,
            }

            let message = response
                .json::<ThrownError>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error));

            if status == StatusCode::CONFLICT {
                return Err(ApiError::DuplicateApplication(
                    message.unwrap_or_else(|| DUPLICATE_MESSAGE.to_string()),
                ));
            }
            if let Some(message) = message.as_deref().filter(|m| mentions_duplicate(m)) {
                return Err(ApiError::DuplicateApplication(message.to_string()));
            }

            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

const DUPLICATE_MESSAGE: &str = "You have already applied to this post.";

#[derive(Deserialize)]
struct PostsResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    posts: Vec<serde_json::Value>,
}

/// Decodes each post independently; rows that do not fit [`Post`] are logged and skipped.
fn decode_posts(rows: Vec<serde_json::Value>) -> Vec<Post> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Post>(row) {
            Ok(post) => Some(post),
            Err(err) => {
                warn!(error = %err, "skipping undecodable post");
                None
            }
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppliedStatusRequest<'a> {
    applicant_id: &'a ViewerId,
    post_ids: &'a [PostId],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppliedStatusResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    applied_post_ids: Vec<PostId>,
}

#[derive(Deserialize)]
struct ProfileResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    profile: Option<Profile>,
}

#[derive(Deserialize)]
struct Profile {
    role: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyRequest<'a> {
    applicant_id: &'a ViewerId,
    message: &'a str,
}

#[derive(Deserialize)]
struct ApplyResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

fn rejected(message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Rejected(message.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait::async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let response: PostsResponse = self
            .call(self.client.get(self.url("/api/posts/all")))
            .await?;

        if !response.success {
            return Err(rejected(response.message, "Failed to load posts"));
        }

        let posts = decode_posts(response.posts);
        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }

    async fn applied_post_ids(
        &self,
        viewer: &ViewerId,
        post_ids: &[PostId],
    ) -> Result<Vec<PostId>, ApiError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let body = AppliedStatusRequest {
            applicant_id: viewer,
            post_ids,
        };
        let response: AppliedStatusResponse = self
            .call(
                self.client
                    .post(self.url("/api/posts/check-applications"))
                    .json(&body),
            )
            .await?;

        if !response.success {
            return Err(rejected(
                response.message,
                "Failed to check application status",
            ));
        }

        Ok(response.applied_post_ids)
    }

    async fn viewer_role(&self, viewer: &ViewerId) -> Result<ViewerRole, ApiError> {
        let response: ProfileResponse = self
            .call(
                self.client
                    .get(self.url(&format!("/api/auth/profile/{viewer}"))),
            )
            .await?;

        match (response.success, response.profile) {
            (true, Some(profile)) => Ok(ViewerRole::from_profile(&profile.role)),
            (true, None) => Err(ApiError::Decode("profile missing from response".to_string())),
            (false, _) => Err(rejected(response.message, "Failed to load profile")),
        }
    }

    async fn apply(
        &self,
        post_id: &PostId,
        applicant: &ViewerId,
        message: &str,
    ) -> Result<ApplyConfirmation, ApiError> {
        let body = ApplyRequest {
            applicant_id: applicant,
            message,
        };
        let response: ApplyResponse = self
            .call(
                self.client
                    .post(self.url(&format!("/api/posts/apply/{post_id}")))
                    .json(&body),
            )
            .await?;

        if response.success {
            return Ok(ApplyConfirmation {
                post_id: post_id.clone(),
                message: response
                    .message
                    .unwrap_or_else(|| "Application submitted".to_string()),
            });
        }

        Err(apply_rejection(response.message))
    }
}

fn mentions_duplicate(message: &str) -> bool {
    message.to_lowercase().contains("already applied")
}

fn apply_rejection(message: Option<String>) -> ApiError {
    match message {
        Some(message) if mentions_duplicate(&message) => {
            ApiError::DuplicateApplication(message)
        }
        message => rejected(message, "Failed to submit application"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let api = HttpBoardApi::new("http://localhost:5000/", Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(
            api.url("/api/posts/all"),
            "http://localhost:5000/api/posts/all"
        );
    }

    #[test]
    fn posts_response_decodes_backend_field_names() {
        let payload = r#"{
            "success": true,
            "posts": [{
                "id": 7,
                "class_level": "Class-8",
                "subject": "Mathematics",
                "location": "Mirpur, Dhaka",
                "gender": "Any",
                "salary": 5000,
                "group": null,
                "requirement": "Weekly tests",
                "user_id": "guardian-1",
                "is_booked": false,
                "created_at": "2025-08-01T10:00:00Z"
            }]
        }"#;

        let response: PostsResponse = serde_json::from_str(payload).expect("decodes");
        assert!(response.success);
        let posts = decode_posts(response.posts);
        let post = &posts[0];
        assert_eq!(post.id, PostId::new("7"));
        assert_eq!(post.owner, ViewerId::new("guardian-1"));
        assert!(!post.booked);
        assert_eq!(post.group, None);
    }

    #[test]
    fn applied_status_request_uses_camel_case() {
        let viewer = ViewerId::new("tutor-1");
        let ids = vec![PostId::new("1"), PostId::new("2")];
        let body = serde_json::to_value(AppliedStatusRequest {
            applicant_id: &viewer,
            post_ids: &ids,
        })
        .expect("serializes");
        assert_eq!(
            body,
            serde_json::json!({ "applicantId": "tutor-1", "postIds": ["1", "2"] })
        );
    }

    #[test]
    fn apply_rejection_detects_duplicates_by_message() {
        assert_eq!(
            apply_rejection(Some("You have ALREADY APPLIED to this post".to_string())),
            ApiError::DuplicateApplication("You have ALREADY APPLIED to this post".to_string())
        );
        assert_eq!(
            apply_rejection(Some("Post is closed".to_string())),
            ApiError::Rejected("Post is closed".to_string())
        );
        assert_eq!(
            apply_rejection(None),
            ApiError::Rejected("Failed to submit application".to_string())
        );
    }

    mod live {
        use super::*;
        use crate::board::session::BoardSession;
        use axum::http::StatusCode as ReplyStatus;
        use axum::routing::{get, post};
        use axum::{Json, Router};
        use serde_json::json;
        use std::sync::Arc;

        async fn backend(router: Router) -> HttpBoardApi {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("listener binds");
            let addr = listener.local_addr().expect("local addr");
            tokio::spawn(async move {
                axum::serve(listener, router).await.expect("backend serves");
            });
            HttpBoardApi::new(format!("http://{addr}"), Duration::from_secs(5))
                .expect("client builds")
        }

        fn reply(
            status: ReplyStatus,
            body: serde_json::Value,
        ) -> impl Fn() -> std::future::Ready<(ReplyStatus, Json<serde_json::Value>)> + Clone {
            move || std::future::ready((status, Json(body.clone())))
        }

        #[tokio::test]
        async fn conflict_status_is_a_duplicate_application() {
            let api = backend(Router::new().route(
                "/api/posts/apply/:id",
                post(reply(ReplyStatus::CONFLICT, json!({ "success": false }))),
            ))
            .await;

            let err = api
                .apply(&PostId::new("7"), &ViewerId::new("tutor-1"), "hello")
                .await
                .expect_err("conflict is an error");

            assert_eq!(err, ApiError::DuplicateApplication(DUPLICATE_MESSAGE.to_string()));
        }

        #[tokio::test]
        async fn bad_request_mentioning_already_applied_is_a_duplicate_application() {
            let api = backend(Router::new().route(
                "/api/posts/apply/:id",
                post(reply(
                    ReplyStatus::BAD_REQUEST,
                    json!({ "success": false, "message": "You have already applied to this post" }),
                )),
            ))
            .await;

            let err = api
                .apply(&PostId::new("7"), &ViewerId::new("tutor-1"), "hello")
                .await
                .expect_err("bad request is an error");

            assert_eq!(
                err,
                ApiError::DuplicateApplication("You have already applied to this post".to_string())
            );
        }

        #[tokio::test]
        async fn other_failures_keep_status_and_message() {
            let api = backend(Router::new().route(
                "/api/posts/apply/:id",
                post(reply(
                    ReplyStatus::BAD_REQUEST,
                    json!({ "success": false, "message": "Message too long" }),
                )),
            ))
            .await;

            let err = api
                .apply(&PostId::new("7"), &ViewerId::new("tutor-1"), "hello")
                .await
                .expect_err("bad request is an error");

            assert_eq!(
                err,
                ApiError::Status {
                    status: 400,
                    message: Some("Message too long".to_string()),
                }
            );
        }

        #[tokio::test]
        async fn server_error_message_becomes_the_banner() {
            let api = backend(Router::new().route(
                "/api/posts/all",
                get(reply(
                    ReplyStatus::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Database unavailable" }),
                )),
            ))
            .await;

            let mut session = BoardSession::new(Arc::new(api));
            session.load().await;

            assert_eq!(session.banner(), Some("Database unavailable"));
        }

        #[tokio::test]
        async fn server_error_without_body_uses_generic_banner() {
            let api = backend(Router::new().route(
                "/api/posts/all",
                get(|| async { ReplyStatus::INTERNAL_SERVER_ERROR }),
            ))
            .await;

            let mut session = BoardSession::new(Arc::new(api));
            session.load().await;

            assert_eq!(session.banner(), Some("Failed to load posts"));
        }

        #[tokio::test]
        async fn duplicate_reply_marks_post_applied_in_session() {
            let api = backend(
                Router::new()
                    .route(
                        "/api/posts/all",
                        get(reply(
                            ReplyStatus::OK,
                            json!({ "success": true, "posts": [{
                                "id": 7,
                                "class_level": "Class-8",
                                "subject": "Mathematics",
                                "location": "Mirpur, Dhaka",
                                "gender": "Any",
                                "salary": 5000,
                                "user_id": "guardian-1",
                                "created_at": "2025-08-01T10:00:00Z"
                            }] }),
                        )),
                    )
                    .route(
                        "/api/posts/check-applications",
                        post(reply(
                            ReplyStatus::OK,
                            json!({ "success": true, "appliedPostIds": [] }),
                        )),
                    )
                    .route(
                        "/api/auth/profile/:id",
                        get(reply(
                            ReplyStatus::OK,
                            json!({ "success": true, "profile": { "role": "tutor" } }),
                        )),
                    )
                    .route(
                        "/api/posts/apply/:id",
                        post(reply(
                            ReplyStatus::BAD_REQUEST,
                            json!({ "success": false, "message": "You have already applied to this post" }),
                        )),
                    ),
            )
            .await;

            let mut session =
                BoardSession::with_identity(Arc::new(api), Some(ViewerId::new("tutor-1")));
            session.load().await;
            let post_id = PostId::new("7");

            let err = session
                .apply(&post_id, "hello")
                .await
                .expect_err("duplicate is surfaced");

            assert_eq!(err.user_message(), "You have already applied to this post");
            assert!(session.viewer().applied.contains(&post_id));
        }

        #[tokio::test]
        async fn undecodable_rows_are_skipped_not_fatal() {
            let api = backend(Router::new().route(
                "/api/posts/all",
                get(reply(
                    ReplyStatus::OK,
                    json!({ "success": true, "posts": [
                        {
                            "id": 1,
                            "class_level": "Class-8",
                            "subject": "Mathematics",
                            "location": "Mirpur, Dhaka",
                            "gender": "any",
                            "salary": 5000,
                            "user_id": "guardian-1",
                            "created_at": "2025-08-01T10:00:00Z"
                        },
                        {
                            "id": 2,
                            "class_level": "Class-5",
                            "subject": "English",
                            "location": "Agrabad, Chattogram",
                            "gender": "Female",
                            "salary": 3500,
                            "user_id": "guardian-2",
                            "created_at": "2025-08-02T10:00:00Z"
                        }
                    ] }),
                )),
            ))
            .await;

            let posts = api.list_posts().await.expect("list still loads");

            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].id, PostId::new("2"));
        }
    }
}
