use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for tuition posts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(#[serde(deserialize_with = "deserialize_id")] pub String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity issued by the authentication provider for the current viewer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewerId(#[serde(deserialize_with = "deserialize_id")] pub String);

impl ViewerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend ids are either database integers or uuid strings.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Integer(value) => value.to_string(),
    })
}

/// Preferred tutor gender advertised on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Any,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Any => "Any",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender '{0}', expected Male, Female, or Any")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Any" => Ok(Gender::Any),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

/// A tuition opportunity as published by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub class_level: String,
    pub subject: String,
    pub location: String,
    pub gender: Gender,
    pub salary: f64,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(rename = "user_id")]
    pub owner: ViewerId,
    #[serde(rename = "is_booked", default)]
    pub booked: bool,
    pub created_at: DateTime<Utc>,
}

/// Role attached to the viewer's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerRole {
    Tutor,
    Other(String),
    #[default]
    Unknown,
}

impl ViewerRole {
    pub fn from_profile(role: &str) -> Self {
        match role {
            "tutor" => ViewerRole::Tutor,
            other => ViewerRole::Other(other.to_string()),
        }
    }

    pub fn is_tutor(&self) -> bool {
        matches!(self, ViewerRole::Tutor)
    }

    pub fn label(&self) -> &str {
        match self {
            ViewerRole::Tutor => "tutor",
            ViewerRole::Other(role) => role,
            ViewerRole::Unknown => "unknown",
        }
    }
}

/// Post ids the viewer has already submitted applications for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedSet(BTreeSet<PostId>);

impl AppliedSet {
    pub fn contains(&self, id: &PostId) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: PostId) -> bool {
        self.0.insert(id)
    }

    pub fn merge(&mut self, other: impl IntoIterator<Item = PostId>) {
        self.0.extend(other);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PostId> for AppliedSet {
    fn from_iter<I: IntoIterator<Item = PostId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The current user of the board, possibly unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub identity: Option<ViewerId>,
    pub role: ViewerRole,
    pub applied: AppliedSet,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: ViewerId, role: ViewerRole) -> Self {
        Self {
            identity: Some(identity),
            role,
            applied: AppliedSet::default(),
        }
    }

    pub fn with_applied(mut self, applied: impl IntoIterator<Item = PostId>) -> Self {
        self.applied.merge(applied);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
