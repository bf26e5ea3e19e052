//! Identity registry
//!
//! The [`IdentityRegistry`] interns opaque [`PeerId`] strings to compact
//! [`PeerRef`] handles and back. The mapping is a bijection for the lifetime
//! of the process: a handle, once allocated, is never reassigned or
//! reclaimed.
//!
//! The local node is pinned to [`PeerRef::LOCAL`] at construction; every
//! other peer gets the next free handle, counting up from 2, the first time
//! it is seen.

use std::collections::HashMap;

use drift_core::{PeerId, PeerRef};

use crate::error::RegistryError;

/// Bidirectional interning table for peer identifiers
#[derive(Debug)]
pub struct IdentityRegistry {
    /// PeerId -> handle
    by_id: HashMap<PeerId, PeerRef>,
    /// handle -> PeerId
    by_ref: HashMap<PeerRef, PeerId>,
    /// Next free handle value
    next_ref: u64,
}

impl IdentityRegistry {
    /// Create a registry with the local node pinned to [`PeerRef::LOCAL`]
    pub fn new(local: PeerId) -> Self {
        let mut by_id = HashMap::new();
        let mut by_ref = HashMap::new();
        by_id.insert(local.clone(), PeerRef::LOCAL);
        by_ref.insert(PeerRef::LOCAL, local);
        Self {
            by_id,
            by_ref,
            next_ref: PeerRef::LOCAL.value() + 1,
        }
    }

    /// The local node's identifier
    pub fn local(&self) -> &PeerId {
        // LOCAL is inserted at construction and never removed.
        &self.by_ref[&PeerRef::LOCAL]
    }

    /// Intern a peer identifier, allocating a handle on first sight
    ///
    /// Idempotent: the same identifier always yields the same handle, and
    /// the allocation counter moves exactly once per distinct new peer.
    pub fn intern(&mut self, peer: &PeerId) -> PeerRef {
        if let Some(&r) = self.by_id.get(peer) {
            return r;
        }
        let r = PeerRef::from_raw(self.next_ref);
        self.next_ref += 1;
        self.by_id.insert(peer.clone(), r);
        self.by_ref.insert(r, peer.clone());
        r
    }

    /// Look up the handle for an already-interned peer
    pub fn get(&self, peer: &PeerId) -> Option<PeerRef> {
        self.by_id.get(peer).copied()
    }

    /// Resolve a handle back to its peer identifier
    ///
    /// Fails with [`RegistryError::UnknownReference`] for a handle that was
    /// never interned. Callers inside the engine treat that as a broken
    /// invariant (see the error's docs) but still get a recoverable miss
    /// rather than a panic.
    pub fn resolve(&self, r: PeerRef) -> Result<&PeerId, RegistryError> {
        self.by_ref.get(&r).ok_or(RegistryError::UnknownReference(r))
    }

    /// Number of interned peers, the local node included
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Always false: the local node is interned at construction
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
