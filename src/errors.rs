use thiserror::Error;

/// APNs dispatch error types.
///
/// Only the configuration class (`MissingConfig`, `Config`, `InvalidKey`,
/// `HttpClient`) escapes as `Err` from constructors. Everything the gateway
/// or the transport throws at a live dispatch is absorbed into a failed
/// [`DispatchResult`](crate::models::DispatchResult) instead.
#[derive(Error, Debug)]
pub enum ApnsError {
    #[error("missing required configuration: {0}")]
    MissingConfig(String),

    #[error("APNs configuration error: {0}")]
    Config(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("failed to sign provider token: {0}")]
    TokenSign(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("device registry lookup failed: {0}")]
    Registry(String),

    #[error("no device registered")]
    NoDeviceRegistered,
}

impl From<ApnsError> for String {
    fn from(err: ApnsError) -> Self {
        err.to_string()
    }
}
