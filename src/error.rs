//! Error type shared by keyframe construction and sheet loading.

use thiserror::Error;

/// Errors raised while building keyframe rules.
#[derive(Error, Debug)]
pub enum KeyframeError {
    /// Stage label is not `from`, `to`, or an `N%` offset
    #[error("Invalid keyframe stage: {0:?}")]
    InvalidStage(String),

    /// A description could not be converted to or from JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A keyframe sheet could not be parsed
    #[cfg(feature = "toml")]
    #[error("Invalid keyframe sheet: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_stage_message() {
        let err = KeyframeError::InvalidStage("halfway".into());
        assert_eq!(err.to_string(), "Invalid keyframe stage: \"halfway\"");
    }
}
