//! # Drift Core
//!
//! Core types and seam traits for Drift Network's forwarding engine.
//!
//! This crate defines the vocabulary shared between the forwarding engine
//! and its host:
//!
//! - [`PeerId`] / [`PeerRef`]: the opaque string identity of a peer and its
//!   compact process-local handle.
//! - [`RoutingRecord`], [`ConfigRecord`], [`StateRecord`]: the three record
//!   shapes that cross the engine's boundary (contact exchange,
//!   configuration, persistence).
//! - [`PeerDirectory`] and [`RoutingCarrier`]: the capabilities the host
//!   implements for the engine.
//!
//! The decision logic itself lives in the `drift-forwarding` crate.

pub mod identity;
pub mod record;
pub mod traits;

// Re-export main types
pub use identity::{PeerId, PeerRef};
pub use record::{ConfigRecord, MetricEntry, RoutingRecord, StateRecord};
pub use traits::{PeerDirectory, RoutingCarrier};
