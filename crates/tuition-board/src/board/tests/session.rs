use std::sync::Arc;

use tokio::sync::watch;

use super::common::*;
use crate::board::api::ApiError;
use crate::board::domain::{Gender, PostId, ViewerRole};
use crate::board::eligibility::{ClickAction, EligibilityState};
use crate::board::filter::FilterCriteria;
use crate::board::memory::InMemoryBoardApi;
use crate::board::session::{BoardSession, SessionError};
use crate::board::view::BoardWarning;

#[tokio::test]
async fn load_populates_posts_role_and_applied_set() {
    let api = seeded_api();
    api.record_application(PostId::new("p-2"), tutor_id());

    let session = loaded_session(api, Some(tutor_id())).await;

    assert_eq!(session.posts().len(), 5);
    assert_eq!(session.viewer().role, ViewerRole::Tutor);
    assert!(session.viewer().applied.contains(&PostId::new("p-2")));
    assert!(session.banner().is_none());
    assert!(session.warnings().is_empty());

    let view = session.view();
    assert!(!view.loading);
    assert_eq!(view.found, 5);
    assert_eq!(view.summary, "5 Tuitions found");
}

#[tokio::test]
async fn view_reports_per_post_eligibility() {
    let api = seeded_api();
    api.record_application(PostId::new("p-2"), tutor_id());
    let session = loaded_session(api, Some(tutor_id())).await;

    let states: Vec<EligibilityState> = session
        .view()
        .posts
        .iter()
        .map(|card| card.apply.state)
        .collect();

    assert_eq!(
        states,
        vec![
            EligibilityState::Applicable,
            EligibilityState::AlreadyApplied,
            EligibilityState::Applicable,
            EligibilityState::Booked,
            EligibilityState::OwnPost,
        ]
    );
}

#[tokio::test]
async fn criteria_changes_recompute_visible_posts() {
    let mut session = loaded_session(seeded_api(), None).await;

    session.set_criteria(FilterCriteria::default().with_gender(Gender::Female));
    assert_eq!(ids(&session.visible_posts()), vec!["p-3"]);
    assert_eq!(session.view().summary, "1 Tuitions found");

    session.clear_filters();
    assert_eq!(session.visible_posts().len(), 5);
    assert!(session.criteria().is_empty());
}

#[tokio::test]
async fn post_list_failure_becomes_banner() {
    let api = seeded_api();
    api.set_posts_outage(Some("connection refused"));

    let session = loaded_session(api, Some(tutor_id())).await;

    assert_eq!(session.banner(), Some("Failed to load posts"));
    let view = session.view();
    assert!(view.is_empty());
    assert_eq!(view.banner.as_deref(), Some("Failed to load posts"));
}

#[tokio::test]
async fn applied_status_failure_is_a_warning_not_an_error() {
    let api = seeded_api();
    api.record_application(PostId::new("p-1"), tutor_id());
    api.set_status_outage(Some("timeout"));

    let session = loaded_session(api, Some(tutor_id())).await;

    assert!(session.banner().is_none());
    assert!(session.viewer().applied.is_empty());
    assert!(matches!(
        session.warnings(),
        [BoardWarning::AppliedStatusUnavailable { .. }]
    ));
    assert_eq!(
        session.eligibility_for(&PostId::new("p-1")).map(|e| e.state),
        Some(EligibilityState::Applicable)
    );
}

#[tokio::test]
async fn missing_profile_leaves_role_unknown() {
    let api = Arc::new(InMemoryBoardApi::with_posts(board_posts()));

    let session = loaded_session(api, Some(tutor_id())).await;

    assert_eq!(session.viewer().role, ViewerRole::Unknown);
    assert!(matches!(
        session.warnings(),
        [BoardWarning::ProfileUnavailable { .. }]
    ));
    assert_eq!(
        session.eligibility_for(&PostId::new("p-1")).map(|e| e.state),
        Some(EligibilityState::RoleBlocked)
    );
}

#[tokio::test]
async fn apply_moves_post_to_already_applied() {
    let api = seeded_api();
    let mut session = loaded_session(api.clone(), Some(tutor_id())).await;
    let post_id = PostId::new("p-1");

    assert_eq!(
        session.click_apply(&post_id).expect("known post"),
        ClickAction::OpenApplyDialog
    );

    let confirmation = session
        .apply(&post_id, "I have taught Class-8 maths for 3 years")
        .await
        .expect("application accepted");

    assert_eq!(confirmation.post_id, post_id);
    assert_eq!(
        session.eligibility_for(&post_id).map(|e| e.state),
        Some(EligibilityState::AlreadyApplied)
    );
    let stored = api.applications();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].applicant, tutor_id());
}

#[tokio::test]
async fn duplicate_rejection_is_surfaced_and_marks_post_applied() {
    let api = seeded_api();
    api.set_status_outage(Some("timeout"));
    api.record_application(PostId::new("p-1"), tutor_id());
    let mut session = loaded_session(api, Some(tutor_id())).await;
    let post_id = PostId::new("p-1");

    let err = session
        .apply(&post_id, "hello")
        .await
        .expect_err("backend rejects the second application");

    assert!(matches!(
        err,
        SessionError::Api(ApiError::DuplicateApplication(_))
    ));
    assert!(session.viewer().applied.contains(&post_id));
}

#[tokio::test]
async fn apply_requires_login() {
    let mut session = loaded_session(seeded_api(), None).await;
    let post_id = PostId::new("p-1");

    assert!(matches!(
        session.click_apply(&post_id),
        Ok(ClickAction::PromptLogin(_))
    ));
    assert_eq!(
        session.apply(&post_id, "hi").await,
        Err(SessionError::NotLoggedIn)
    );
}

#[tokio::test]
async fn apply_rejects_ineligible_and_unknown_posts() {
    let mut session = loaded_session(seeded_api(), Some(tutor_id())).await;

    let booked = session.apply(&PostId::new("p-4"), "hi").await;
    assert!(matches!(
        booked,
        Err(SessionError::NotEligible {
            state: EligibilityState::Booked,
            ..
        })
    ));

    let own = session.apply(&PostId::new("p-5"), "hi").await;
    let err = own.expect_err("own post is rejected");
    assert_eq!(err.user_message(), "You cannot apply to your own post.");

    let missing = session.apply(&PostId::new("p-404"), "hi").await;
    assert_eq!(
        missing,
        Err(SessionError::UnknownPost(PostId::new("p-404")))
    );
}

#[tokio::test]
async fn auth_change_resets_viewer_and_reloads() {
    let api = seeded_api();
    api.record_application(PostId::new("p-1"), tutor_id());
    let mut session = loaded_session(api, Some(tutor_id())).await;
    assert!(session.viewer().applied.contains(&PostId::new("p-1")));

    session.on_auth_changed(Some(guardian_id())).await;
    assert_eq!(session.viewer().identity, Some(guardian_id()));
    assert!(session.viewer().applied.is_empty());
    assert!(!session.viewer().role.is_tutor());

    session.on_auth_changed(None).await;
    assert_eq!(session.viewer().role, ViewerRole::Unknown);
    assert_eq!(
        session.eligibility_for(&PostId::new("p-1")).map(|e| e.state),
        Some(EligibilityState::RequiresLogin)
    );
}

#[tokio::test]
async fn follow_auth_applies_latest_identity_and_ends_with_sender() {
    let api = seeded_api();
    let mut session = BoardSession::new(api);
    let (sender, receiver) = watch::channel(None);

    sender.send(Some(tutor_id())).expect("receiver alive");
    drop(sender);
    session.follow_auth(receiver).await;

    assert_eq!(session.viewer().identity, Some(tutor_id()));
    assert_eq!(session.viewer().role, ViewerRole::Tutor);
    assert_eq!(session.posts().len(), 5);
}
