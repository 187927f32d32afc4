//! Error types for word-bounded text chunking
//!
//! Splitting itself never fails; only building a chunker from an invalid or
//! unreadable configuration does.

/// Error types for chunking configuration
#[derive(thiserror::Error, Debug)]
pub enum ChunkingError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment configuration error: {0}")]
    Environment(#[from] envy::Error),
}

/// Result type for chunking operations
pub type Result<T> = std::result::Result<T, ChunkingError>;

impl ChunkingError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Environment(_) => "environment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ChunkingError::configuration("min_chunk_words too large");
        assert!(matches!(error, ChunkingError::Configuration(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: min_chunk_words too large"
        );
        assert_eq!(error.category(), "configuration");
    }

    #[test]
    fn test_error_from_envy() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Probe {
            value: u32,
        }

        let envy_error =
            envy::from_iter::<_, Probe>(vec![("VALUE".to_string(), "not a number".to_string())])
                .unwrap_err();
        let error: ChunkingError = envy_error.into();
        assert!(matches!(error, ChunkingError::Environment(_)));
        assert_eq!(error.category(), "environment");
    }
}
