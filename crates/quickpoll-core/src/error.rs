use quickpoll_db::DbError;
use quickpoll_util::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    /// Terminal: the voter already has a vote on this poll.
    #[error("already voted in this poll")]
    DuplicateVote,
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl From<ValidationError> for CoreError {
    fn from(e: ValidationError) -> Self {
        CoreError::Validation(e.to_string())
    }
}
