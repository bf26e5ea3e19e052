//! Routing information base
//!
//! The [`RoutingInfoBase`] maps peer handles to their last learned
//! [`ForwardingMetric`]. Exactly one metric is stored per peer and a newly
//! received one unconditionally overwrites the old — last writer wins, with
//! no per-entry versioning or staleness check. A single table-wide
//! `last_updated` stamp is bumped on every mutation.
//!
//! Entries are never evicted. A neighbor leaving does not remove what was
//! learned about it: RIB contents are learned, possibly stale, routing
//! knowledge, and knowledge outlives contact. Re-implementations that add
//! an eviction policy here change the protocol.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use drift_core::PeerRef;

/// Label value meaning "no label configured"
///
/// A peer advertising this label (or an empty one) never matches anything
/// and is never matched against.
pub const UNSET_LABEL: &str = "unset";

/// A peer's self-advertised forwarding desirability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingMetric {
    /// Self-advertised classification label
    pub label: String,
    /// Self-advertised numeric desirability
    pub rank: i64,
}

impl ForwardingMetric {
    /// Create a metric
    pub fn new(label: impl Into<String>, rank: i64) -> Self {
        Self {
            label: label.into(),
            rank,
        }
    }

    /// Whether the label carries information at all
    pub fn has_label(&self) -> bool {
        !self.label.is_empty() && self.label != UNSET_LABEL
    }
}

/// The local table of learned per-peer forwarding metrics
#[derive(Debug)]
pub struct RoutingInfoBase {
    /// Learned metrics, keyed by peer handle
    ///
    /// A BTreeMap keeps iteration deterministic (ascending handle order,
    /// which is allocation order) and restartable.
    entries: BTreeMap<PeerRef, ForwardingMetric>,
    /// When any part of the table last changed
    last_updated: DateTime<Utc>,
}

impl RoutingInfoBase {
    /// Create an empty table stamped with the current time
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }

    /// Insert or overwrite the metric for a peer
    pub fn set_metric(&mut self, peer: PeerRef, metric: ForwardingMetric) {
        self.entries.insert(peer, metric);
        self.last_updated = Utc::now();
    }

    /// The metric last learned for a peer, if any
    pub fn get_metric(&self, peer: PeerRef) -> Option<&ForwardingMetric> {
        self.entries.get(&peer)
    }

    /// Iterate the table in handle order
    pub fn iter(&self) -> impl Iterator<Item = (PeerRef, &ForwardingMetric)> {
        self.entries.iter().map(|(&r, m)| (r, m))
    }

    /// Bump the table-wide timestamp without touching any entry
    ///
    /// Neighbor arrival and departure count as table activity even though
    /// they store nothing.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// When any part of the table last changed
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Number of peers with a stored metric
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no metrics
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RoutingInfoBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut rib = RoutingInfoBase::new();
        let r = PeerRef::from_raw(2);

        assert!(rib.get_metric(r).is_none());
        rib.set_metric(r, ForwardingMetric::new("red", 3));
        assert_eq!(rib.get_metric(r), Some(&ForwardingMetric::new("red", 3)));
    }

    #[test]
    fn test_overwrite_is_unconditional() {
        let mut rib = RoutingInfoBase::new();
        let r = PeerRef::from_raw(2);

        rib.set_metric(r, ForwardingMetric::new("red", 3));
        rib.set_metric(r, ForwardingMetric::new("blue", 1));

        assert_eq!(rib.get_metric(r), Some(&ForwardingMetric::new("blue", 1)));
        assert_eq!(rib.len(), 1);
    }

    #[test]
    fn test_iteration_is_handle_ordered() {
        let mut rib = RoutingInfoBase::new();
        rib.set_metric(PeerRef::from_raw(4), ForwardingMetric::new("c", 0));
        rib.set_metric(PeerRef::from_raw(2), ForwardingMetric::new("a", 0));
        rib.set_metric(PeerRef::from_raw(3), ForwardingMetric::new("b", 0));

        let labels: Vec<&str> = rib.iter().map(|(_, m)| m.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mutation_bumps_timestamp() {
        let mut rib = RoutingInfoBase::new();
        let before = rib.last_updated();
        rib.set_metric(PeerRef::from_raw(2), ForwardingMetric::new("red", 3));
        assert!(rib.last_updated() >= before);

        let before = rib.last_updated();
        rib.touch();
        assert!(rib.last_updated() >= before);
    }

    #[test]
    fn test_has_label() {
        assert!(ForwardingMetric::new("red", 0).has_label());
        assert!(!ForwardingMetric::new("", 0).has_label());
        assert!(!ForwardingMetric::new(UNSET_LABEL, 0).has_label());
    }
}
