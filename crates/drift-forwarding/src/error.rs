//! Forwarding-specific error types

use drift_core::PeerRef;
use thiserror::Error;

/// Top-level error type for the forwarding engine
#[derive(Debug, Error)]
pub enum ForwardingError {
    /// Identity registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Record acceptance errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

/// Errors from the identity registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A handle was presented that no peer was ever interned under.
    ///
    /// The interning discipline makes this unreachable from the engine's own
    /// call paths; hitting it means the registry's bijection is broken.
    #[error("No peer interned under reference {0}")]
    UnknownReference(PeerRef),
}

/// Errors from accepting an external record
///
/// Both variants mean the whole record was rejected with no side effects.
/// Malformed fields inside an accepted record are not errors; the codec
/// skips the offending entry and keeps going.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A contact-exchange record was addressed to a different module
    #[error("Routing record for section '{actual}' is not ours ('{expected}')")]
    NotMyProtocol { expected: String, actual: String },

    /// A persisted row is owned by a different module
    #[error("State record owned by '{actual}' is not ours ('{expected}')")]
    NotMyRecord { expected: String, actual: String },
}

/// Result type for forwarding operations
pub type ForwardingResult<T> = Result<T, ForwardingError>;
