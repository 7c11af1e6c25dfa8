use thiserror::Error;

/// Failures surfaced by the remote directory client.
///
/// One variant per collection operation. Whatever went wrong underneath
/// (transport failure, non-success status, undecodable body) is flattened
/// into the message text; the UI keeps at most one of these as the current
/// error and overwrites it when a newer failure arrives.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch users: {0}")]
    Fetch(String),
    #[error("Failed to add user: {0}")]
    Create(String),
    #[error("Failed to update user: {0}")]
    Update(String),
    #[error("Failed to delete user: {0}")]
    Delete(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
