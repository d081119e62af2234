use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Credential missing or rejected, quota exhausted, or a malformed query.
    /// Never retried.
    #[error("YouTube API error: {0}")]
    FatalApi(String),

    /// Network failure or rate limiting that outlasted the retry budget.
    #[error("YouTube API unavailable after {attempts} attempt(s): {message}")]
    TransientFetch { attempts: u32, message: String },

    #[error("Export failed: {0}")]
    ExportWrite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
