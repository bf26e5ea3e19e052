//! Seam traits implemented by the host
//!
//! The forwarding engine never talks to the network, the message store, or
//! the repository itself. The host hands it these two capabilities:
//!
//! - [`PeerDirectory`]: the host's live-peer registry, consulted during
//!   delegate selection to drop candidates that cannot currently be
//!   resolved to a reachable peer.
//! - [`RoutingCarrier`]: an outgoing message that a routing record can be
//!   attached to.

use chrono::{DateTime, Utc};

use crate::identity::PeerId;
use crate::record::RoutingRecord;

/// The host's registry of currently resolvable peers
///
/// A peer that is in the RIB but not in the directory is silently excluded
/// from delegate results; it is stale knowledge, not an error.
pub trait PeerDirectory: Send + Sync {
    /// Check whether a peer is currently resolvable by the host
    fn contains(&self, peer: &PeerId) -> bool;
}

/// An outgoing message that routing information can ride on
///
/// The forwarding engine attaches its metadata block under its own section
/// and stamps the message with the RIB's last-update time, so receivers can
/// relate the attached table to a point in time.
pub trait RoutingCarrier {
    /// Attach a routing record under the producing module's section
    fn attach_routing_record(&mut self, record: RoutingRecord);

    /// Stamp the message's creation time
    fn set_create_time(&mut self, at: DateTime<Utc>);
}
