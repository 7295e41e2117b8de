use thiserror::Error;

pub type DashResult<T> = Result<T, DashError>;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("invalid display timezone offset: {hours} hours")]
    InvalidOffset { hours: i32 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
