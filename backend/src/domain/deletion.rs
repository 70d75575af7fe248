//! Outcome of a delete that tolerates missing rows.

use serde::{Deserialize, Serialize};

/// Whether a delete removed a row.
///
/// Deleting something that does not exist is not an error; callers receive
/// [`DeleteOutcome::NoRowsAffected`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// A row was removed.
    Deleted,
    /// Nothing matched the identifier.
    NoRowsAffected,
}

impl DeleteOutcome {
    /// Build an outcome from an affected-row count.
    #[must_use]
    pub const fn from_affected_rows(rows: usize) -> Self {
        if rows == 0 {
            Self::NoRowsAffected
        } else {
            Self::Deleted
        }
    }

    /// Human-readable status reported to clients.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::NoRowsAffected => "no rows affected",
        }
    }
}
