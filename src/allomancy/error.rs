//! Allomancy error taxonomy
//!
//! None of these are fatal. Every failure leaves state untouched and is
//! handed back to the caller as a signal.

use thiserror::Error;

use super::metals::Metal;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BurnError {
    #[error("not permitted to burn {0}")]
    NotPermitted(Metal),
    #[error("no {0} reserve left")]
    InsufficientReserve(Metal),
    #[error("reserves are full, cannot add {0}")]
    PoolFull(Metal),
    #[error("corrupt persisted state: {0}")]
    CorruptPersistedState(String),
}

impl BurnError {
    /// The metal the failure concerns, if any.
    pub fn metal(&self) -> Option<Metal> {
        match self {
            BurnError::NotPermitted(metal)
            | BurnError::InsufficientReserve(metal)
            | BurnError::PoolFull(metal) => Some(*metal),
            BurnError::CorruptPersistedState(_) => None,
        }
    }
}
