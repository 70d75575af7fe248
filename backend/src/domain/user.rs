//! Users as supplied by the external identity provider.
//!
//! The helpdesk never creates or edits users; it only reads them to validate
//! team members, ticket requestors, and assignees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Role reported by the identity provider.
///
/// Only `support` carries meaning here; every other value is preserved
/// verbatim so it round-trips through storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Support staff who can join teams and accept tickets.
    Support,
    /// Any other role, typically ticket requestors.
    Other(String),
}

impl UserRole {
    /// Storage and wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Support => "support",
            Self::Other(role) => role.as_str(),
        }
    }

    /// Whether the role is `support`.
    pub const fn is_support(&self) -> bool {
        matches!(self, Self::Support)
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        if value == "support" {
            Self::Support
        } else {
            Self::Other(value.to_owned())
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// A user record mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity provider identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role used to gate team membership and ticket acceptance.
    pub role: UserRole,
    /// Avatar URL, when the provider has one.
    pub image: Option<String>,
}

impl User {
    /// Name and avatar projection used by rosters.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Identifier, name, and avatar of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Identity provider identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub image: Option<String>,
}
