use super::super::domain::Post;
use super::criteria::FilterCriteria;

/// Lowercased needles, computed once per filter pass.
pub(crate) struct Needles {
    search: Option<String>,
    location: Option<String>,
}

impl Needles {
    pub(crate) fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            search: criteria.search().map(str::to_lowercase),
            location: criteria.location().map(str::to_lowercase),
        }
    }
}

pub(crate) fn matches(post: &Post, criteria: &FilterCriteria, needles: &Needles) -> bool {
    if let Some(term) = needles.search.as_deref() {
        if !matches_search(post, term) {
            return false;
        }
    }

    if let Some(class_level) = criteria.class_level() {
        if post.class_level != class_level {
            return false;
        }
    }

    if let Some(subject) = criteria.subject() {
        if post.subject != subject {
            return false;
        }
    }

    if let Some(location) = needles.location.as_deref() {
        if !contains_folded(&post.location, location) {
            return false;
        }
    }

    if let Some(gender) = criteria.gender {
        if post.gender != gender {
            return false;
        }
    }

    true
}

fn matches_search(post: &Post, term: &str) -> bool {
    contains_folded(&post.class_level, term)
        || contains_folded(&post.subject, term)
        || contains_folded(&post.location, term)
        || post
            .requirement
            .as_deref()
            .map(|requirement| contains_folded(requirement, term))
            .unwrap_or(false)
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
