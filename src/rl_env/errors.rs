use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("environment must be reset before execute")]
    NotReset,
    #[error("environment error: {0}")]
    EnvError(#[from] Box<dyn std::error::Error + Send + Sync>),
}
