use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::board::domain::{Gender, Post, PostId, Viewer, ViewerId, ViewerRole};
use crate::board::memory::InMemoryBoardApi;
use crate::board::session::BoardSession;

pub(super) fn post(id: &str, class_level: &str, subject: &str, location: &str) -> Post {
    Post {
        id: PostId::new(id),
        class_level: class_level.to_string(),
        subject: subject.to_string(),
        location: location.to_string(),
        gender: Gender::Any,
        salary: 5000.0,
        group: None,
        requirement: None,
        owner: ViewerId::new("guardian-1"),
        booked: false,
        created_at: Utc
            .with_ymd_and_hms(2025, 8, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn board_posts() -> Vec<Post> {
    let mut physics = post("p-2", "HSC 1st Year", "Physics", "Dhanmondi, Dhaka");
    physics.requirement = Some("Needs basic math revision".to_string());
    physics.gender = Gender::Male;
    physics.group = Some("Science".to_string());

    let mut english = post("p-3", "Class-5", "English", "Agrabad, Chattogram");
    english.gender = Gender::Female;
    english.salary = 3500.0;

    let mut booked = post("p-4", "Class-8", "Mathematics", "Mirpur, Dhaka");
    booked.booked = true;

    let mut own = post("p-5", "O'Level", "Chemistry", "Gulshan, Dhaka");
    own.owner = tutor_id();

    vec![
        post("p-1", "Class-8", "Mathematics", "Mirpur, Dhaka"),
        physics,
        english,
        booked,
        own,
    ]
}

pub(super) fn tutor_id() -> ViewerId {
    ViewerId::new("tutor-7")
}

pub(super) fn guardian_id() -> ViewerId {
    ViewerId::new("guardian-9")
}

pub(super) fn tutor() -> Viewer {
    Viewer::signed_in(tutor_id(), ViewerRole::Tutor)
}

pub(super) fn seeded_api() -> Arc<InMemoryBoardApi> {
    let api = InMemoryBoardApi::with_posts(board_posts());
    api.register_profile(tutor_id(), "tutor");
    api.register_profile(guardian_id(), "guardian");
    Arc::new(api)
}

pub(super) async fn loaded_session(
    api: Arc<InMemoryBoardApi>,
    identity: Option<ViewerId>,
) -> BoardSession<InMemoryBoardApi> {
    let mut session = BoardSession::with_identity(api, identity);
    session.load().await;
    session
}

pub(super) fn ids(posts: &[&Post]) -> Vec<String> {
    posts.iter().map(|post| post.id.0.clone()).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
