//! The label forwarder
//!
//! [`LabelForwarder`] ties the identity registry, the RIB, the codec, and
//! delegate selection together behind the host-facing surface: lifecycle
//! hooks for neighbor arrival/departure and configuration, routing-record
//! exchange, delegate queries, and state export/import.
//!
//! The forwarder is a single logical actor. The host must deliver events to
//! it one at a time — the [`crate::service`] module provides a mailbox
//! wrapper that enforces this on a dedicated worker — and in return no
//! operation here blocks, and none needs a lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use drift_core::{ConfigRecord, PeerDirectory, PeerId, RoutingCarrier, RoutingRecord, StateRecord};
use tracing::{debug, trace, warn};

use crate::codec;
use crate::error::RecordError;
use crate::registry::IdentityRegistry;
use crate::rib::{ForwardingMetric, RoutingInfoBase, UNSET_LABEL};
use crate::select;

/// Registered name of this forwarding module
///
/// Contact-exchange records, configuration sections, and repository rows are
/// only accepted when addressed to this name, so several forwarding modules
/// can share one transport and one repository.
pub const FORWARDER_NAME: &str = "label";

/// The local node's own advertised policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPolicy {
    /// Label the local node advertises about itself
    pub label: String,
    /// Rank the local node advertises about itself
    pub rank: i64,
    /// Maximum number of delegates returned per request
    pub max_delegates: usize,
    /// Sort delegates by descending rank before truncating
    ///
    /// Off by default: the baseline protocol returns candidates in table
    /// order, unsorted.
    pub rank_ordered: bool,
}

impl Default for LocalPolicy {
    fn default() -> Self {
        Self {
            label: UNSET_LABEL.to_string(),
            rank: 1,
            max_delegates: 5,
            rank_ordered: false,
        }
    }
}

/// Label-matching delegate-forwarding engine
///
/// Owns the identity registry and the RIB outright; all access goes through
/// `&mut self`, so the single-event-at-a-time discipline of the host's
/// dispatch (or the [`crate::service`] mailbox) is the only synchronization
/// needed.
pub struct LabelForwarder<D: PeerDirectory> {
    /// Registered module name, gating record acceptance
    name: String,
    /// Informational host identifier stamped on outgoing self-advertisements
    host_tag: String,
    /// The local node's advertised policy
    policy: LocalPolicy,
    /// PeerId <-> PeerRef interning
    registry: IdentityRegistry,
    /// Learned per-peer forwarding metrics
    rib: RoutingInfoBase,
    /// The host's live-peer registry
    directory: Arc<D>,
}

impl<D: PeerDirectory> LabelForwarder<D> {
    /// Create a forwarder with the default policy
    pub fn new(local: PeerId, host_tag: impl Into<String>, directory: Arc<D>) -> Self {
        Self::with_policy(local, host_tag, directory, LocalPolicy::default())
    }

    /// Create a forwarder with an explicit starting policy
    pub fn with_policy(
        local: PeerId,
        host_tag: impl Into<String>,
        directory: Arc<D>,
        policy: LocalPolicy,
    ) -> Self {
        let host_tag = host_tag.into();
        debug!(%local, %host_tag, "label forwarder starting");
        Self {
            name: FORWARDER_NAME.to_string(),
            host_tag,
            policy,
            registry: IdentityRegistry::new(local),
            rib: RoutingInfoBase::new(),
            directory,
        }
    }

    /// The module's registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local node's identifier
    pub fn local(&self) -> &PeerId {
        self.registry.local()
    }

    /// The current advertised policy
    pub fn policy(&self) -> &LocalPolicy {
        &self.policy
    }

    /// The identity registry
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// The routing information base
    pub fn rib(&self) -> &RoutingInfoBase {
        &self.rib
    }

    /// When the RIB last changed
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.rib.last_updated()
    }

    fn own_metric(&self) -> ForwardingMetric {
        ForwardingMetric::new(self.policy.label.as_str(), self.policy.rank)
    }

    /// A neighbor came into contact range
    ///
    /// Interns the neighbor's identity (so its handle is stable from first
    /// sight) and marks table activity. No metric is stored: metrics arrive
    /// only through routing records.
    pub fn on_neighbor_arrived(&mut self, neighbor: &PeerId) {
        let r = self.registry.intern(neighbor);
        debug!(%neighbor, handle = %r, "neighbor arrived");
        self.rib.touch();
    }

    /// A neighbor left contact range
    ///
    /// The neighbor's metric, if any, stays in the RIB: learned routing
    /// knowledge outlives contact.
    pub fn on_neighbor_left(&mut self, neighbor: &PeerId) {
        let r = self.registry.intern(neighbor);
        debug!(%neighbor, handle = %r, "neighbor left");
        self.rib.touch();
    }

    /// Apply a configuration section
    ///
    /// Sections for other modules are ignored. A supplied label replaces
    /// the advertised label verbatim. A supplied rank must parse as a whole
    /// base-10 integer — leading or trailing garbage leaves the current
    /// rank unchanged, silently.
    pub fn on_configured(&mut self, record: &ConfigRecord) {
        if record.name != self.name {
            trace!(section = %record.name, "configuration section is not ours, ignoring");
            return;
        }

        let mut changed = false;

        if let Some(label) = &record.label {
            self.policy.label = label.clone();
            debug!(label = %self.policy.label, "advertised label configured");
            changed = true;
        }

        if let Some(rank) = &record.rank {
            match rank.parse::<i64>() {
                Ok(rank) => {
                    self.policy.rank = rank;
                    debug!(rank, "advertised rank configured");
                    changed = true;
                }
                Err(_) => {
                    warn!(rank = %rank, "malformed rank in configuration, keeping current value");
                }
            }
        }

        if changed {
            self.rib.touch();
        }
    }

    /// Build the contact-exchange record for an outgoing message
    pub fn routing_record(&self) -> RoutingRecord {
        codec::encode_contact(
            &self.name,
            &self.host_tag,
            &self.own_metric(),
            &self.registry,
            &self.rib,
        )
    }

    /// Attach routing information to an outgoing message
    ///
    /// Attaches the contact-exchange record under this module's section and
    /// stamps the message with the RIB's last-update time.
    pub fn add_routing_info<M: RoutingCarrier>(&self, message: &mut M) {
        message.attach_routing_record(self.routing_record());
        message.set_create_time(self.rib.last_updated());
    }

    /// Consume routing information that arrived on a message
    ///
    /// Records addressed to other modules are rejected with
    /// [`RecordError::NotMyProtocol`] and change nothing. The same record
    /// may arrive more than once; replaying it is harmless.
    pub fn receive_routing_info(&mut self, record: &RoutingRecord) -> Result<(), RecordError> {
        codec::decode_contact(&self.name, record, &mut self.registry, &mut self.rib)
    }

    /// Delegates for a target, bounded by the policy's maximum
    ///
    /// `None` means no delegate set was produced at all; the host must not
    /// forward to anyone on the strength of an absent result.
    pub fn select_delegates(
        &mut self,
        target: &PeerId,
        already_targeted: &[PeerId],
    ) -> Option<Vec<PeerId>> {
        self.select_delegates_with_limit(target, already_targeted, self.policy.max_delegates)
    }

    /// Delegates for a target with an explicit bound
    pub fn select_delegates_with_limit(
        &mut self,
        target: &PeerId,
        already_targeted: &[PeerId],
        limit: usize,
    ) -> Option<Vec<PeerId>> {
        select::select_delegates(
            target,
            already_targeted,
            limit,
            self.policy.rank_ordered,
            &mut self.registry,
            &self.rib,
            self.directory.as_ref(),
        )
    }

    /// Targets the given neighbor would be a good delegate for
    ///
    /// The reciprocal of [`Self::select_delegates`]: "which destinations is
    /// this neighbor worth handing messages for?". Reserved on the API for
    /// hosts that want the reverse query; this engine does not implement it
    /// and never produces a target set.
    pub fn targets_for(&mut self, neighbor: &PeerId) -> Option<Vec<PeerId>> {
        trace!(%neighbor, "target generation requested, not implemented");
        None
    }

    /// Export the RIB as repository rows for the host to persist
    pub fn export_state(&self) -> Vec<StateRecord> {
        codec::export_state(&self.name, &self.registry, &self.rib)
    }

    /// Apply one persisted repository row
    ///
    /// Rows owned by another module are rejected with
    /// [`RecordError::NotMyRecord`] and change nothing.
    pub fn import_record(&mut self, record: &StateRecord) -> Result<(), RecordError> {
        codec::import_record(&self.name, record, &mut self.registry, &mut self.rib)
    }

    /// Apply a batch of persisted repository rows
    ///
    /// Rows owned by other modules are rejected individually and logged;
    /// malformed rows are skipped inside the codec. Returns how many rows
    /// were accepted as ours.
    pub fn import_state(&mut self, records: &[StateRecord]) -> usize {
        let mut accepted = 0;
        for record in records {
            match self.import_record(record) {
                Ok(()) => accepted += 1,
                Err(e) => warn!(key = %record.key, %e, "repository row rejected"),
            }
        }
        accepted
    }

    /// Write the current table through the debug log
    pub fn log_table(&self) {
        debug!(name = %self.name, entries = self.rib.len(), "routing table");
        for (peer, metric) in self.rib.iter() {
            match self.registry.resolve(peer) {
                Ok(id) => {
                    debug!(handle = %peer, peer = %id, label = %metric.label, rank = metric.rank,
                        "routing table entry")
                }
                Err(_) => debug!(handle = %peer, "routing table entry without identity"),
            }
        }
    }
}
