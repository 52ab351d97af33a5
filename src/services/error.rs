use thiserror::Error;

/// Failure taxonomy for the matching core. Transport failures degrade the
/// view (empty/loading state plus a log line); validation failures are
/// rejected before any store call; an absent profile is "no profile yet",
/// not an error.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store/transport failure: {0}")]
    Transport(String),

    #[error("{0}")]
    Validation(&'static str),

    #[error("not found")]
    NotFound,
}

impl ServiceError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ServiceError::NotFound,
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
