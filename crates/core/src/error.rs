use std::fmt;
use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Which of the two uploaded extracts an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Delimited employer code → alias mapping
    Alias,
    /// Fixed-width concepts extract
    Concepts,
}

impl InputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            InputKind::Alias => "alias",
            InputKind::Concepts => "concepts",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage that produced a processing error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AliasIndex,
    Rewrite,
    Report,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::AliasIndex => "alias index",
            Stage::Rewrite => "concept rewrite",
            Stage::Report => "unused report",
        }
    }

    /// 1-based position in the pipeline
    pub const fn step(self) -> u8 {
        match self {
            Stage::AliasIndex => 1,
            Stage::Rewrite => 2,
            Stage::Report => 3,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.step(), self.as_str())
    }
}

/// Errors that can occur while reconciling the two extracts
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Input bytes are not valid under the configured encoding
    #[error("{input} file is not valid {encoding}: {reason}")]
    Decode {
        input: InputKind,
        encoding: &'static str,
        reason: String,
    },

    /// Output text cannot be represented in the configured encoding
    #[error("{file} cannot be encoded as {encoding}: {reason}")]
    Encode {
        file: &'static str,
        encoding: &'static str,
        reason: String,
    },

    /// Failure inside one of the three pipeline stages
    #[error("Error in {stage}: {message}")]
    Stage { stage: Stage, message: String },

    /// A required input was not supplied
    #[error("Missing {0} input")]
    MissingInput(InputKind),

    /// Inconsistent configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReconcileError {
    /// Create a stage-tagged processing error
    pub fn stage(stage: Stage, msg: impl fmt::Display) -> Self {
        Self::Stage {
            stage,
            message: msg.to_string(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Coarse category used by front ends to pick a user-facing message
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReconcileError::Decode { .. } | ReconcileError::Encode { .. } => {
                ErrorCategory::Encoding
            }
            ReconcileError::Stage { .. } | ReconcileError::InvalidConfig(_) => {
                ErrorCategory::Processing
            }
            ReconcileError::MissingInput(_) => ErrorCategory::MissingInput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Encoding,
    Processing,
    MissingInput,
}
