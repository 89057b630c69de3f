use crate::foundation::core::ElementRole;

/// Convenience result type used across scrollpill.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy used by stage and controller APIs.
///
/// Rejected transitions and reconciliation anomalies are not errors: they are reported
/// through [`crate::RequestOutcome`] and logging respectively.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// A required render target could not be resolved at initialization.
    #[error("missing render target: {0:?}")]
    MissingTarget(ElementRole),

    /// A collaborator (tween engine, timers, render boundary) failed during a callback.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Invalid configuration values.
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Collaborator`] value.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Build a [`StageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error only affects initialization of a single subsystem.
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::MissingTarget(_))
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
