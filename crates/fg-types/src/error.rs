//! Engine error taxonomy. A plain enum implementing `Display` and
//! `std::error::Error` by hand — no `thiserror` — matching how the rest
//! of this workspace's reducer-level failures are reported.

use std::fmt;

/// The crate's own version, stamped onto every fatal error so a host
/// can tell which engine build produced a corrupted run.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Diagnostics attached to every fatal error per the error-handling
/// contract: engine/content version, seed, and how far into the
/// action log the failure occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalDiagnostics {
    pub engine_version: String,
    pub content_version: Option<u32>,
    pub seed: Option<u32>,
    pub action_index: Option<usize>,
}

impl FatalDiagnostics {
    pub fn new(content_version: Option<u32>, seed: Option<u32>, action_index: Option<usize>) -> Self {
        Self {
            engine_version: ENGINE_VERSION.to_string(),
            content_version,
            seed,
            action_index,
        }
    }
}

impl fmt::Display for FatalDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "engine_version={}, content_version={:?}, seed={:?}, action_index={:?}",
            self.engine_version, self.content_version, self.seed, self.action_index
        )
    }
}

/// Every failure mode an engine entry point can return. `IllegalAction`
/// is the one recoverable variant — the caller's state is unchanged
/// and play can continue. Every other variant is fatal: it indicates
/// content corruption, save corruption, or an engine bug, and the run
/// should abort with the attached diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    ContentInvalid {
        reason: String,
    },
    ContentNotLoaded {
        diagnostics: FatalDiagnostics,
    },
    IllegalAction {
        reason: String,
    },
    DeckExhausted {
        diagnostics: FatalDiagnostics,
    },
    PromptMismatch {
        expected: String,
        got: String,
        diagnostics: FatalDiagnostics,
    },
}

impl EngineError {
    /// `IllegalAction` is the only recoverable variant; every other
    /// variant should abort the run with its attached diagnostics.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::IllegalAction { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ContentInvalid { reason } => {
                write!(f, "content invalid: {reason}")
            }
            EngineError::ContentNotLoaded { diagnostics } => {
                write!(f, "content not loaded ({diagnostics})")
            }
            EngineError::IllegalAction { reason } => {
                write!(f, "illegal action: {reason}")
            }
            EngineError::DeckExhausted { diagnostics } => {
                write!(f, "deck exhausted ({diagnostics})")
            }
            EngineError::PromptMismatch {
                expected,
                got,
                diagnostics,
            } => {
                write!(
                    f,
                    "prompt mismatch: expected {expected}, got {got} ({diagnostics})"
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_action_is_not_fatal() {
        let err = EngineError::IllegalAction {
            reason: "wrong phase".to_string(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn content_invalid_is_fatal() {
        let err = EngineError::ContentInvalid {
            reason: "wrong major count".to_string(),
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn display_includes_diagnostics_for_fatal_variants() {
        let diagnostics = FatalDiagnostics::new(Some(3), Some(42), Some(7));
        let err = EngineError::DeckExhausted { diagnostics };
        let msg = err.to_string();
        assert!(msg.contains("seed=Some(42)"));
    }
}
