//! External record shapes
//!
//! Three record formats cross the forwarding engine's boundary:
//!
//! - [`RoutingRecord`]: the contact-exchange metadata block piggy-backed on
//!   transported messages. Carries the sender's [`PeerId`] and a list of
//!   [`MetricEntry`] items.
//! - [`ConfigRecord`]: a named configuration section with optional `label`
//!   and `rank` attributes.
//! - [`StateRecord`]: one persisted repository row per known peer, owned by
//!   an authority tag.
//!
//! All three carry the section/authority name they were addressed to, so a
//! forwarding module can share a transport or repository with other modules
//! and ignore records that are not its own.
//!
//! Ranks travel as base-10 strings on the wire and in the repository; they
//! are parsed (and possibly rejected) only at decode time.

use serde::{Deserialize, Serialize};

use crate::identity::PeerId;

/// Contact-exchange metadata block
///
/// Produced by one node's RIB and consumed by another's. The `name` field is
/// the producing module's registered name; consumers reject records whose
/// name is not their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRecord {
    /// Registered name of the forwarding module that produced this record
    pub name: String,
    /// The sender's peer identifier
    pub node_id: PeerId,
    /// Advertised forwarding metrics
    pub metrics: Vec<MetricEntry>,
}

impl RoutingRecord {
    /// Create an empty record for the given module name and sender
    pub fn new(name: impl Into<String>, node_id: PeerId) -> Self {
        Self {
            name: name.into(),
            node_id,
            metrics: Vec::new(),
        }
    }

    /// Serialize to wire bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Deserialize from wire bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

/// One advertised forwarding metric inside a [`RoutingRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Opaque host identifier, carried for diagnostics only
    pub hostid: String,
    /// Advertised label
    pub label: String,
    /// Advertised rank as a base-10 integer string
    pub rank: String,
}

impl MetricEntry {
    /// Create a metric entry, rendering the rank in base 10
    pub fn new(hostid: impl Into<String>, label: impl Into<String>, rank: i64) -> Self {
        Self {
            hostid: hostid.into(),
            label: label.into(),
            rank: rank.to_string(),
        }
    }
}

/// Named configuration section
///
/// Both attributes are optional; an absent attribute leaves the current
/// policy value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Name of the module this section configures
    pub name: String,
    /// Replacement label for the local node
    pub label: Option<String>,
    /// Replacement rank as a base-10 integer string
    pub rank: Option<String>,
}

impl ConfigRecord {
    /// Create a configuration section with no attributes set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            rank: None,
        }
    }

    /// Set the label attribute
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the rank attribute
    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = Some(rank.into());
        self
    }
}

/// One persisted repository row
///
/// `key` is the peer's string identifier and `value` is `"<label>:<rank>"`.
/// Rows whose `authority` does not match the importing module's name are
/// rejected untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Name of the module that owns this row
    pub authority: String,
    /// Peer identifier the row describes
    pub key: String,
    /// Colon-separated label and rank
    pub value: String,
}

impl StateRecord {
    /// Create a repository row
    pub fn new(
        authority: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_record_byte_roundtrip() {
        let mut record = RoutingRecord::new("label", PeerId::from("node-a"));
        record.metrics.push(MetricEntry::new("host-a", "red", 7));
        record.metrics.push(MetricEntry::new("host-b", "blue", -2));

        let bytes = record.to_bytes().unwrap();
        let decoded = RoutingRecord::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_metric_entry_renders_rank_base10() {
        let entry = MetricEntry::new("h", "red", 42);
        assert_eq!(entry.rank, "42");
        assert_eq!(MetricEntry::new("h", "red", -5).rank, "-5");
    }

    #[test]
    fn test_config_record_builder() {
        let record = ConfigRecord::new("label").with_label("red").with_rank("3");
        assert_eq!(record.label.as_deref(), Some("red"));
        assert_eq!(record.rank.as_deref(), Some("3"));

        let empty = ConfigRecord::new("label");
        assert!(empty.label.is_none() && empty.rank.is_none());
    }
}
