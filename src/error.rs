/// Boxed error used for transport failures so fakes can raise them too
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single page fetch.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The request never produced a response body.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The response body is not a JSON document.
    #[error("decoding failure: {0}")]
    Decoding(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

/// Failure to locate the entity collection inside a raw page.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("entity collection missing at `{0}`")]
    MissingEntities(&'static str),
}

/// Failure to persist records.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
