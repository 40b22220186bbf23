use thiserror::Error;

/// Errors surfaced by profile analysis.
///
/// `UnsupportedPlatform` and `InvalidProfileUrl` indicate caller misuse and
/// abort the call. `UpstreamFetch` and `MalformedResponse` are
/// data-availability failures: callers recover by substituting neutral
/// metrics so that a valid input always yields a `ScoreResult`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("invalid profile URL for {platform}: expected a link containing {expected}")]
    InvalidProfileUrl { platform: String, expected: String },

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl AnalysisError {
    /// Whether the caller may recover by degrading to neutral metrics.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::UpstreamFetch(_) | AnalysisError::MalformedResponse(_)
        )
    }
}
