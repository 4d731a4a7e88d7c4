//! Tuition post board: filtering, apply eligibility, and the page session.

pub mod api;
pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod filter;
pub mod http;
pub mod memory;
pub mod router;
pub mod session;
pub mod view;

#[cfg(test)]
mod tests;

pub use api::{ApiError, ApplyConfirmation, BoardApi};
pub use domain::{
    AppliedSet, Gender, Post, PostId, UnknownGender, Viewer, ViewerId, ViewerRole,
};
pub use eligibility::{click, eligibility, ButtonIcon, ClickAction, Eligibility, EligibilityState};
pub use filter::{filter_posts, FilterCriteria};
pub use http::HttpBoardApi;
pub use memory::{InMemoryBoardApi, StoredApplication};
pub use router::{board_router, BoardQuery, VIEWER_HEADER};
pub use session::{BoardSession, SessionError};
pub use view::{BoardView, BoardWarning, PostCard};
