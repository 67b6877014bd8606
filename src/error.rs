use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("unknown application: {0}")]
    UnknownApplication(String),

    #[error("lookup url {url} failed with status {status}: {body}")]
    LookupFailed {
        url: String,
        status: u16,
        body: String,
    },

    #[error("malformed nested configuration under key '{key}': {reason}")]
    MalformedNestedConfig { key: String, reason: String },

    #[error("failed to write report to {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("missing environment variables: {}", .names.join(", "))]
    MissingEnv { names: Vec<String> },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
