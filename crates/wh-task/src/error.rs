use thiserror::Error;

use wh_core::WhError;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("invalid goal strategy parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Config(#[from] WhError),
}

pub type TaskResult<T> = Result<T, TaskError>;
