//! Response body shared by the delete endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DeleteOutcome;

/// Reports whether the delete removed anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponseBody {
    /// `deleted` or `no rows affected`.
    #[schema(example = "deleted")]
    pub status: String,
}

impl From<DeleteOutcome> for DeleteResponseBody {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            status: outcome.message().to_owned(),
        }
    }
}
