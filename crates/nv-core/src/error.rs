use thiserror::Error;

pub type NvResult<T> = Result<T, NvError>;

#[derive(Debug, Error)]
pub enum NvError {
    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
