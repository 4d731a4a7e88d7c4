use serde::{Deserialize, Serialize};

use super::super::domain::Gender;

/// Filter form state. Unset or empty fields place no constraint on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub class_level: Option<String>,
    pub subject: Option<String>,
    pub location: Option<String>,
    pub gender: Option<Gender>,
}

impl FilterCriteria {
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..self
        }
    }

    pub fn with_class_level(self, class_level: impl Into<String>) -> Self {
        Self {
            class_level: Some(class_level.into()),
            ..self
        }
    }

    pub fn with_subject(self, subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..self
        }
    }

    pub fn with_location(self, location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..self
        }
    }

    pub fn with_gender(self, gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..self
        }
    }

    /// Reset every field, matching the form's "Clear Filters" action.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.search().is_none()
            && self.class_level().is_none()
            && self.subject().is_none()
            && self.location().is_none()
            && self.gender.is_none()
    }

    pub(crate) fn search(&self) -> Option<&str> {
        active(&self.search)
    }

    pub(crate) fn class_level(&self) -> Option<&str> {
        active(&self.class_level)
    }

    pub(crate) fn subject(&self) -> Option<&str> {
        active(&self.subject)
    }

    pub(crate) fn location(&self) -> Option<&str> {
        active(&self.location)
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
