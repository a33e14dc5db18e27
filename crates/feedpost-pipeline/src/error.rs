use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("assembled post is {length} characters, platform limit is {limit}")]
    LengthExceeded { length: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid forbidden pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
