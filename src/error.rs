use thiserror::Error;

/// Errors raised while driving the browser or building the accessibility tree
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The browser could not produce (or we could not read) the accessibility snapshot
    #[error("Accessibility snapshot failed: {0}")]
    SnapshotFailed(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing a debug artifact to the log directory failed
    #[error("Failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_message() {
        let err = BrowserError::ToolExecutionFailed {
            tool: "click".to_string(),
            reason: "detached".to_string(),
        };
        assert_eq!(err.to_string(), "Tool 'click' failed: detached");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: BrowserError = parse.unwrap_err().into();
        assert!(matches!(err, BrowserError::Json(_)));
    }
}
