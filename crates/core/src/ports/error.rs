//! Port error types

use core::fmt;

/// Errors raised by a capability port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// Block stopped responding (destroyed, unpowered, or detached)
    Unreachable(&'static str),
    /// Block refused the request
    Rejected {
        /// Block that refused
        block: &'static str,
        /// Human-readable reason
        reason: &'static str,
    },
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::Unreachable(block) => write!(f, "{} is unreachable", block),
            PortError::Rejected { block, reason } => {
                write!(f, "{} rejected request: {}", block, reason)
            }
        }
    }
}
