use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    /// A dependent service answered the existence lookup with a non-success
    /// status; the upstream code and body pass through to the caller verbatim.
    #[error("dependency rejected with status {code}: {body}")]
    Dependency { code: u16, body: String },
    /// A dependent service could not be reached at all (connect error or
    /// timeout). Reported as service-unavailable, never fatal to the process.
    #[error("dependency unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}
