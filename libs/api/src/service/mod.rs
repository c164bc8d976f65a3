use gemini::GeminiError;
use repository::RepositoryError;

pub mod block;
pub mod page;

pub use block::BlockService;
pub use page::PageService;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad request input. The message is safe to show to the caller.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal failure: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { entity, .. } => {
                ServiceError::NotFound(entity)
            }
            e => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<GeminiError> for ServiceError {
    fn from(value: GeminiError) -> Self {
        match value {
            GeminiError::Config => ServiceError::Internal(value.to_string()),
            GeminiError::Upstream(_) | GeminiError::Parse(_) => {
                ServiceError::Upstream(value.to_string())
            }
        }
    }
}

pub(crate) fn require(value: &str, message: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(message.to_string()));
    }
    Ok(())
}
