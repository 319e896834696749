//! Error taxonomy for tool registration and invocation.

use crate::types::ParamType;

/// Failure of a single tool invocation.
///
/// Caller-input errors (unknown tool, missing or malformed parameters) are
/// always detected before the tool performs any side effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Tool '{tool}' is missing required parameter '{param}'")]
    MissingRequiredParameter { tool: String, param: String },

    #[error("Parameter '{param}' of tool '{tool}' expects {expected}, got {actual}")]
    TypeMismatch {
        tool: String,
        param: String,
        expected: ParamType,
        actual: String,
    },

    #[error("Tool '{tool}' does not accept parameter '{param}'")]
    UnexpectedParameter { tool: String, param: String },

    #[error("Invalid value '{value}' for parameter '{param}' of tool '{tool}'")]
    InvalidEnumValue {
        tool: String,
        param: String,
        value: String,
    },

    #[error("Upstream failure in tool '{tool}'{}: {message}", status_suffix(.status_code))]
    UpstreamFailure {
        tool: String,
        status_code: Option<u16>,
        message: String,
    },

    #[error("Tool '{tool}' timed out waiting for upstream")]
    Timeout { tool: String },

    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ToolError {
    /// Name of the tool the error belongs to.
    pub fn tool(&self) -> &str {
        match self {
            Self::UnknownTool { name } => name,
            Self::MissingRequiredParameter { tool, .. }
            | Self::TypeMismatch { tool, .. }
            | Self::UnexpectedParameter { tool, .. }
            | Self::InvalidEnumValue { tool, .. }
            | Self::UpstreamFailure { tool, .. }
            | Self::Timeout { tool }
            | Self::ExecutionFailed { tool, .. } => tool,
        }
    }

    /// Errors caused by the invocation request itself.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTool { .. }
                | Self::MissingRequiredParameter { .. }
                | Self::TypeMismatch { .. }
                | Self::UnexpectedParameter { .. }
                | Self::InvalidEnumValue { .. }
        )
    }

    /// Errors caused by an external service, which a caller may retry.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. } | Self::Timeout { .. })
    }

    pub(crate) fn invalid_enum(tool: &str, param: &str, value: &str) -> Self {
        Self::InvalidEnumValue {
            tool: tool.into(),
            param: param.into(),
            value: value.into(),
        }
    }

    pub(crate) fn execution(tool: &str, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Failure while assembling a registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Duplicate tool registered: {0}")]
    DuplicateTool(String),

    #[error("Tool '{tool}' declares parameter '{param}' more than once")]
    DuplicateParameter { tool: String, param: String },

    #[error("{provider} API key is not configured (set {env_var} or the config file)")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },
}
