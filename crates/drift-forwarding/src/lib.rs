//! # Drift Forwarding
//!
//! Label-matching delegate-forwarding engine for Drift Network.
//!
//! In an opportunistic, delay-tolerant network, a message's best chance of
//! reaching its target is often another peer entirely — one that advertises
//! the same classification label as the target and is therefore presumed to
//! move in the same circles. This crate maintains the table of per-peer
//! forwarding metrics learned through pairwise contact exchanges and, asked
//! for help with a target, nominates such "delegates".
//!
//! ## Core Components
//!
//! - [`IdentityRegistry`]: interns opaque peer identifiers to compact
//!   process-local handles (the local node is always handle 1)
//! - [`RoutingInfoBase`]: the RIB — last-writer-wins `(label, rank)` metrics
//!   per peer, never evicted, with a single table-wide update stamp
//! - [`codec`]: contact-exchange and persistence codecs for the RIB
//! - [`select_delegates`]: the delegate selection scan
//! - [`LabelForwarder`]: lifecycle hooks and the host-facing surface
//! - [`ForwarderService`] / [`ForwarderHandle`]: mailbox wrapper that runs
//!   the forwarder as a single-threaded actor on its own task
//!
//! ## Merge model
//!
//! Metrics replicate by pure overwrite: whatever a peer advertised most
//! recently (in arrival order, not in any causal order) is what the RIB
//! holds. There is no versioning and no per-entry staleness — a late,
//! stale update is indistinguishable from a fresh one. That is a known,
//! deliberate limitation of the protocol; keep it in mind before building
//! anything on top that assumes freshness.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use drift_core::{ConfigRecord, PeerId};
//! use drift_forwarding::{FORWARDER_NAME, LabelForwarder};
//!
//! let mut forwarder = LabelForwarder::new(PeerId::from("self"), hostname, directory);
//!
//! // Host events drive the engine:
//! forwarder.on_configured(&ConfigRecord::new(FORWARDER_NAME).with_label("commuter"));
//! forwarder.on_neighbor_arrived(&peer);
//! forwarder.receive_routing_info(&record)?;
//!
//! // ...and queries read it back out:
//! if let Some(delegates) = forwarder.select_delegates(&target, &already_targeted) {
//!     // hand the message to each delegate
//! }
//! ```

pub mod codec;
pub mod error;
pub mod forwarder;
pub mod registry;
pub mod rib;
pub mod select;
pub mod service;

// Re-export main types
pub use error::{ForwardingError, ForwardingResult, RecordError, RegistryError};
pub use forwarder::{FORWARDER_NAME, LabelForwarder, LocalPolicy};
pub use registry::IdentityRegistry;
pub use rib::{ForwardingMetric, RoutingInfoBase, UNSET_LABEL};
pub use select::select_delegates;
pub use service::{ForwarderCommand, ForwarderHandle, ForwarderService, ServiceStopped};

// Re-export core types for convenience
pub use drift_core::{ConfigRecord, MetricEntry, PeerDirectory, PeerId, PeerRef, RoutingRecord, StateRecord};
