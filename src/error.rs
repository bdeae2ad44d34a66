use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or HTTP failure while fetching a page.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Expected element or attribute missing from a page.
    #[error("page structure: {0}")]
    Structure(String),

    /// Extracted value does not satisfy a normalization rule.
    #[error("invalid value: {0}")]
    Validation(String),

    #[error("configuration: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization")]
    Json(#[from] serde_json::Error),

    #[error("profile task: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ScrapeError {
    pub fn structure(msg: impl Into<String>) -> Self {
        ScrapeError::Structure(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ScrapeError::Validation(msg.into())
    }

    /// Prefix page-level errors with the page they came from.
    pub fn at(self, url: &str) -> Self {
        match self {
            ScrapeError::Structure(msg) => ScrapeError::Structure(format!("{}: {}", url, msg)),
            ScrapeError::Validation(msg) => ScrapeError::Validation(format!("{}: {}", url, msg)),
            other => other,
        }
    }
}

impl From<config::ConfigError> for ScrapeError {
    fn from(e: config::ConfigError) -> Self {
        ScrapeError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
