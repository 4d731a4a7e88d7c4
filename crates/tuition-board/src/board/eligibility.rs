use serde::{Deserialize, Serialize};

use super::domain::{Post, Viewer};

/// Mutually exclusive apply-button states, listed in evaluation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityState {
    Booked,
    OwnPost,
    RequiresLogin,
    RoleBlocked,
    AlreadyApplied,
    Applicable,
}

impl EligibilityState {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityState::Booked => "Booked",
            EligibilityState::OwnPost | EligibilityState::RoleBlocked => "Apply now",
            EligibilityState::RequiresLogin | EligibilityState::Applicable => "Apply Now",
            EligibilityState::AlreadyApplied => "Applied",
        }
    }

    pub const fn icon(self) -> Option<ButtonIcon> {
        match self {
            EligibilityState::Booked | EligibilityState::AlreadyApplied => {
                Some(ButtonIcon::Confirmation)
            }
            EligibilityState::RequiresLogin => Some(ButtonIcon::Lock),
            _ => None,
        }
    }

    /// Whether the button accepts clicks at all.
    pub const fn is_clickable(self) -> bool {
        matches!(
            self,
            EligibilityState::RequiresLogin | EligibilityState::Applicable
        )
    }

    /// Message shown when the viewer tries to apply from this state.
    pub const fn notice(self) -> Option<&'static str> {
        match self {
            EligibilityState::Booked => Some("This tuition has already been booked."),
            EligibilityState::OwnPost => Some("You cannot apply to your own post."),
            EligibilityState::RequiresLogin => {
                Some("Please login first to apply for tuition posts.")
            }
            EligibilityState::RoleBlocked => {
                Some("Only tutors can apply to posts. Please register as a tutor.")
            }
            EligibilityState::AlreadyApplied => Some("You have already applied to this post."),
            EligibilityState::Applicable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonIcon {
    Confirmation,
    Lock,
}

/// Rendered decision for one post's apply button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub state: EligibilityState,
    pub label: &'static str,
    pub clickable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<ButtonIcon>,
}

impl From<EligibilityState> for Eligibility {
    fn from(state: EligibilityState) -> Self {
        Self {
            state,
            label: state.label(),
            clickable: state.is_clickable(),
            icon: state.icon(),
        }
    }
}

/// What a click on the apply button resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    PromptLogin(&'static str),
    OpenApplyDialog,
    Blocked(&'static str),
}

/// Decide the apply-button state for `post` as seen by `viewer`.
///
/// Rules are evaluated in `EligibilityState` order and the first match wins:
/// booking outranks ownership, and login outranks role.
pub fn eligibility(post: &Post, viewer: &Viewer) -> Eligibility {
    decide_state(post, viewer).into()
}

pub(crate) fn decide_state(post: &Post, viewer: &Viewer) -> EligibilityState {
    if post.booked {
        return EligibilityState::Booked;
    }

    let identity = match &viewer.identity {
        Some(identity) if *identity == post.owner => return EligibilityState::OwnPost,
        Some(identity) => identity,
        None => return EligibilityState::RequiresLogin,
    };

    if !viewer.role.is_tutor() {
        return EligibilityState::RoleBlocked;
    }

    if viewer.applied.contains(&post.id) {
        tracing::trace!(post_id = %post.id, viewer_id = %identity, "post already applied");
        return EligibilityState::AlreadyApplied;
    }

    EligibilityState::Applicable
}

/// Resolve a click on the apply button.
pub fn click(eligibility: &Eligibility) -> ClickAction {
    let notice = eligibility.state.notice().unwrap_or_default();
    match eligibility.state {
        EligibilityState::Applicable => ClickAction::OpenApplyDialog,
        EligibilityState::RequiresLogin => ClickAction::PromptLogin(notice),
        _ => ClickAction::Blocked(notice),
    }
}
