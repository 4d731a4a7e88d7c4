use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{Gender, Post, PostId};
use super::eligibility::Eligibility;

/// Non-fatal conditions the viewer should know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardWarning {
    /// Applied-status lookup failed; every post is shown as not yet applied.
    AppliedStatusUnavailable { detail: String },
    /// Profile lookup failed; the viewer is treated as a non-tutor.
    ProfileUnavailable { detail: String },
}

impl BoardWarning {
    pub fn summary(&self) -> String {
        match self {
            BoardWarning::AppliedStatusUnavailable { detail } => {
                format!("could not check previous applications ({detail})")
            }
            BoardWarning::ProfileUnavailable { detail } => {
                format!("could not load your profile ({detail})")
            }
        }
    }
}

/// One post as rendered on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: PostId,
    pub class_level: String,
    pub gender: Gender,
    pub group: String,
    pub salary: String,
    pub subject: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    pub posted_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub apply: Eligibility,
}

impl PostCard {
    pub fn new(post: &Post, apply: Eligibility) -> Self {
        Self {
            id: post.id.clone(),
            class_level: post.class_level.clone(),
            gender: post.gender,
            group: post
                .group
                .as_deref()
                .filter(|group| !group.is_empty())
                .unwrap_or("Not specified")
                .to_string(),
            salary: format_salary(post.salary),
            subject: post.subject.clone(),
            location: post.location.clone(),
            requirement: post
                .requirement
                .clone()
                .filter(|requirement| !requirement.is_empty()),
            posted_on: post.created_at.date_naive(),
            created_at: post.created_at,
            apply,
        }
    }
}

/// Snapshot of the board for one viewer and one set of criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub loading: bool,
    pub total: usize,
    pub found: usize,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<BoardWarning>,
    pub posts: Vec<PostCard>,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

pub(crate) fn found_summary(found: usize) -> String {
    format!("{found} Tuitions found")
}

/// Salaries are stored in taka; whole amounts print without decimals.
pub fn format_salary(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("৳{amount:.0}")
    } else {
        format!("৳{amount:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_formats_whole_and_fractional_amounts() {
        assert_eq!(format_salary(5000.0), "৳5000");
        assert_eq!(format_salary(4500.5), "৳4500.50");
    }

    #[test]
    fn warning_summaries_include_detail() {
        let warning = BoardWarning::AppliedStatusUnavailable {
            detail: "timeout".to_string(),
        };
        assert!(warning.summary().contains("timeout"));
    }
}
