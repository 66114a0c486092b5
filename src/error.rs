// Error handling module
// Defines error types and chat reply conversion

use thiserror::Error;

/// Errors that can occur while serving chat commands
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    #[allow(dead_code)]
    Config(String),

    /// A reply could not be delivered to the channel
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// A workload panicked while running
    #[error("Benchmark '{keyword}' failed: {message}")]
    Workload { keyword: String, message: String },

    /// Unexpected internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BotError {
    /// Text shown to the chat user for this error.
    ///
    /// Internal detail stays in the logs; the channel only ever sees a
    /// short generic line.
    pub fn user_reply(&self) -> String {
        match self {
            BotError::Config(_) => "The bot is not configured correctly.".to_string(),
            BotError::Delivery(_) => "Reply could not be delivered.".to_string(),
            BotError::Workload { .. } => {
                "Benchmark failed unexpectedly. Please try again.".to_string()
            }
            BotError::Internal(err) => {
                // Log internal errors
                tracing::error!("Internal error: {:?}", err);
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BotError::Config("missing access token".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing access token");

        let err = BotError::Delivery("peer disconnected".to_string());
        assert_eq!(err.to_string(), "Delivery failed: peer disconnected");

        let err = BotError::Workload {
            keyword: "cpu".to_string(),
            message: "index out of bounds".to_string(),
        };
        assert_eq!(err.to_string(), "Benchmark 'cpu' failed: index out of bounds");
    }

    #[test]
    fn test_internal_error_message() {
        let err = BotError::Internal(anyhow::anyhow!("something went wrong"));
        assert_eq!(err.to_string(), "Internal error: something went wrong");
    }

    #[test]
    fn test_workload_user_reply_is_generic() {
        let err = BotError::Workload {
            keyword: "cpu".to_string(),
            message: "index out of bounds".to_string(),
        };

        // The panic detail must never reach the channel
        let reply = err.user_reply();
        assert_eq!(reply, "Benchmark failed unexpectedly. Please try again.");
        assert!(!reply.contains("index out of bounds"));
    }

    #[test]
    fn test_every_variant_has_a_user_reply() {
        let errors = vec![
            BotError::Config("x".to_string()),
            BotError::Delivery("x".to_string()),
            BotError::Workload {
                keyword: "x".to_string(),
                message: "x".to_string(),
            },
            BotError::Internal(anyhow::anyhow!("x")),
        ];
        for err in errors {
            assert!(!err.user_reply().is_empty());
        }
    }
}
