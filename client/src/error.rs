use thiserror::Error;

/// Failures surfaced by the upload and search operations.
///
/// Construction failures of the generated client are deliberately not
/// here: those are swallowed by transport selection and never reach a
/// caller.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Response received with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),

    /// No response received at all
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured API root is missing or not a valid URL
    #[error("invalid API root: {0}")]
    Endpoint(String),
}

/// Why the generated client could not be built. Only ever logged.
#[derive(Error, Debug)]
pub enum ConstructError {
    #[error("no API key configured")]
    MissingKey,

    #[error("no API root configured")]
    MissingRoot,

    #[error("API root is not a valid URL")]
    InvalidRoot,

    #[error("API key is not a valid header value")]
    InvalidKey,

    #[error("client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}
