//! Error taxonomy for the engine.
//!
//! Only malformed requests and configuration faults are errors. An
//! unaffordable purchase or a locked challenge is a normal outcome and is
//! reported through `Ok(0)` / `Ok(false)` instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Malformed request (negative or non-finite amounts, bad cost parameters).
    /// State is untouched.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown upgrade {key}")]
    UnknownUpgrade { key: String },

    #[error("unknown challenge {id}")]
    UnknownChallenge { id: String },

    #[error("unknown effect {id}")]
    UnknownEffect { id: String },

    /// A configuration entry broke a registration contract. Aborts startup.
    #[error("invariant violated by {id}: {reason}")]
    InvariantViolation { id: String, reason: String },

    /// An effect id was registered twice. Aborts startup.
    #[error("effect {id} registered more than once")]
    DuplicateEffect { id: String },
}

impl EngineError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn invariant(id: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Configuration errors must stop startup; everything else is recoverable.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolation { .. } | Self::DuplicateEffect { .. }
        )
    }

    /// Stable machine-readable code for logs and reports.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "ENGINE_INVALID_INPUT",
            Self::UnknownUpgrade { .. } => "ENGINE_UNKNOWN_UPGRADE",
            Self::UnknownChallenge { .. } => "ENGINE_UNKNOWN_CHALLENGE",
            Self::UnknownEffect { .. } => "ENGINE_UNKNOWN_EFFECT",
            Self::InvariantViolation { .. } => "ENGINE_INVARIANT_VIOLATION",
            Self::DuplicateEffect { .. } => "ENGINE_DUPLICATE_EFFECT",
        }
    }
}
