use thiserror::Error;

/// Failures of the inbox REST calls.
///
/// Nothing in this crate propagates these to the host UI; callers log them
/// and keep whatever state they already had.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}
