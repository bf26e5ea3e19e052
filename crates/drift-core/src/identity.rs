//! Peer identity types
//!
//! Two views of a peer's identity live side by side:
//!
//! - [`PeerId`]: the opaque, host-assigned string identifier. Stable across
//!   sessions and across nodes.
//! - [`PeerRef`]: a compact, process-local integer handle. Cheap to copy and
//!   compare, meaningless outside the process that allocated it.
//!
//! The forwarding engine's identity registry maintains the bijection between
//! the two. [`PeerRef::LOCAL`] is permanently reserved for the local node.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Opaque, host-assigned peer identifier
///
/// The host decides what these strings look like (public key digests,
/// EID-style URIs, ...); the forwarding engine only ever compares them for
/// equality and hands them back unmodified.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
pub struct PeerId(String);

impl PeerId {
    /// Create a peer identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Compact process-local handle for an interned [`PeerId`]
///
/// Handles are allocated monotonically starting at 2 and are never
/// reassigned or reclaimed for the lifetime of the process. The value 1 is
/// reserved for the local node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("#{_0}")]
pub struct PeerRef(u64);

impl PeerRef {
    /// The local node's reserved handle
    pub const LOCAL: PeerRef = PeerRef(1);

    /// Create a handle from a raw value
    ///
    /// Only the identity registry should mint new handles; this exists for
    /// the registry itself and for tests.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw integer value of this handle
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whether this is the local node's reserved handle
    pub const fn is_local(self) -> bool {
        self.0 == Self::LOCAL.0
    }
}
