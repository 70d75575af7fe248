//! Identity provider user seeds for the in-memory store.
//!
//! Without a database there is no users table to mirror, so the server can
//! read a JSON array of users at startup instead:
//!
//! ```json
//! [{ "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427", "name": "Ada", "role": "support" }]
//! ```

use std::path::Path;

use crate::domain::User;

/// Reading or decoding a user seed file failed.
#[derive(Debug, thiserror::Error)]
pub enum UserSeedError {
    /// The file could not be read.
    #[error("failed to read user seed {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The contents were not a JSON array of users.
    #[error("failed to decode user seed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decode a JSON array of users.
///
/// # Examples
/// ```
/// use helpdesk::outbound::memory::parse_user_seed;
///
/// let users = parse_user_seed(
///     r#"[{"id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427", "name": "Ada", "role": "support"}]"#,
/// )
/// .expect("valid seed");
/// assert_eq!(users[0].name, "Ada");
/// ```
pub fn parse_user_seed(raw: &str) -> Result<Vec<User>, UserSeedError> {
    Ok(serde_json::from_str(raw)?)
}

/// Read and decode the seed file at `path`.
pub fn load_user_seed(path: &Path) -> Result<Vec<User>, UserSeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| UserSeedError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_user_seed(&raw)
}
