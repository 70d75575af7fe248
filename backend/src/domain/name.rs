//! Validated display names for teams and catalogue entries.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;

/// Maximum length of a name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Validation errors for [`EntityName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameValidationError {
    /// The name was empty once trimmed.
    #[error("name must not be empty")]
    Empty,
    /// The trimmed name exceeded [`NAME_MAX_CHARS`].
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Permitted maximum.
        max: usize,
    },
}

/// Trimmed, non-empty name of a team, category, sub-category, or support
/// type.
///
/// # Examples
/// ```
/// use helpdesk::domain::EntityName;
///
/// let name = EntityName::new("  Network ").expect("valid name");
/// assert_eq!(name.as_ref(), "Network");
/// assert!(EntityName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Trim and validate a candidate name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NameValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NameValidationError::Empty);
        }
        if trimmed.chars().count() > NAME_MAX_CHARS {
            return Err(NameValidationError::TooLong {
                max: NAME_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Consume the wrapper.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityName {
    type Error = NameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityName> for String {
    fn from(value: EntityName) -> Self {
        value.0
    }
}

impl NameValidationError {
    /// Machine-readable code placed in error details.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_name",
            Self::TooLong { .. } => "name_too_long",
        }
    }

    /// Convert into an `invalid_request` error naming the `name` field.
    pub(crate) fn into_domain_error(self) -> Error {
        Error::invalid_request(self.to_string()).with_details(json!({
            "field": "name",
            "code": self.code(),
        }))
    }
}

/// Normalise an optional free-text description: blank becomes absent.
#[must_use]
pub fn normalise_description(raw: Option<String>) -> Option<String> {
    raw.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
