use std::fmt;

use ie_model::ModelError;
use thiserror::Error;

/// Which of the session's two tensors an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorRole {
    Input,
    Output,
}

impl fmt::Display for TensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorRole::Input => write!(f, "input"),
            TensorRole::Output => write!(f, "output"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// The source is missing or does not parse as a model.
    #[error("failed to load model: {0}")]
    ModelLoad(#[source] ModelError),
    /// The model's declared tensors are unusable (empty, zero-sized,
    /// non-f32, or not exactly one input and one output).
    #[error("unsupported model shape: {reason}")]
    Shape { reason: String },
    /// A caller vector does not match the session's fixed size. The session
    /// is untouched and stays usable.
    #[error("{tensor} vector has {actual} elements, session expects {expected}")]
    SizeMismatch {
        tensor: TensorRole,
        expected: usize,
        actual: usize,
    },
    /// The forward pass failed. Session state afterwards is whatever the
    /// backend left behind.
    #[error("backend execution failed: {0}")]
    Backend(#[source] ModelError),
}

impl SessionError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        SessionError::Shape {
            reason: reason.into(),
        }
    }

    /// Only size mismatches leave the session in a known-good state.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::SizeMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        let mismatch = SessionError::SizeMismatch {
            tensor: TensorRole::Input,
            expected: 4,
            actual: 3,
        };
        assert!(mismatch.is_recoverable());
        assert_eq!(
            mismatch.to_string(),
            "input vector has 3 elements, session expects 4"
        );
        assert!(!SessionError::shape("empty").is_recoverable());
        assert!(!SessionError::Backend(ModelError::NotBound).is_recoverable());
        assert!(!SessionError::ModelLoad(ModelError::Malformed("x".into())).is_recoverable());
    }
}
