//! Reference data tickets are classified by: categories, their
//! sub-categories, and support types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EntityName, normalise_description};

/// Top-level ticket category, owned by at most one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Build a new category stamped with `now`.
    #[must_use]
    pub fn new(name: EntityName, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            description: normalise_description(description),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sub-category belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    /// Sub-category identifier.
    pub id: Uuid,
    /// Parent category.
    pub category_id: Uuid,
    /// Name, unique within the parent.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SubCategory {
    /// Build a new sub-category under `category_id`.
    #[must_use]
    pub fn new(
        category_id: Uuid,
        name: EntityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            name: name.into_inner(),
            description: normalise_description(description),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sub-category joined with its parent category's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryListing {
    /// Sub-category identifier.
    pub id: Uuid,
    /// Sub-category name.
    pub name: String,
    /// Parent category name.
    pub category: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Kind of help requested, e.g. "Hardware" or "Access request".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportType {
    /// Support type identifier.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl SupportType {
    /// Build a new support type stamped with `now`.
    #[must_use]
    pub fn new(name: EntityName, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            description: normalise_description(description),
            created_at: now,
        }
    }
}
