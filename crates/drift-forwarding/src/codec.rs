//! Metric codec
//!
//! Translates between the [`RoutingInfoBase`] and the two external formats:
//!
//! - the contact-exchange [`RoutingRecord`] piggy-backed on transported
//!   messages ([`encode_contact`] / [`decode_contact`]), and
//! - the persisted repository rows ([`export_state`] / [`import_record`]).
//!
//! Records addressed to another module are rejected whole, with no side
//! effects. Malformed fields inside an accepted record are narrower: the
//! offending entry is skipped with a log line and its siblings still apply.
//! Replaying the same record any number of times converges to the same RIB
//! state, because every application is a pure overwrite.

use drift_core::{MetricEntry, PeerId, RoutingRecord, StateRecord};
use tracing::{debug, error, trace, warn};

use crate::error::RecordError;
use crate::registry::IdentityRegistry;
use crate::rib::{ForwardingMetric, RoutingInfoBase};

/// Build the outbound contact-exchange record
///
/// One nested entry per RIB-held peer, in table order, each tagged with the
/// peer's identifier string as its diagnostic `hostid`; then the local
/// node's own advertisement, tagged with `host_tag`, as the final entry.
/// Receivers apply entries in order, so the self-advertisement is the value
/// they converge on for the sender.
///
/// Encoding never fails; an empty RIB yields a record with just the
/// self-advertisement.
pub fn encode_contact(
    name: &str,
    host_tag: &str,
    own: &ForwardingMetric,
    registry: &IdentityRegistry,
    rib: &RoutingInfoBase,
) -> RoutingRecord {
    let mut record = RoutingRecord::new(name, registry.local().clone());

    for (peer, metric) in rib.iter() {
        match registry.resolve(peer) {
            Ok(id) => {
                record
                    .metrics
                    .push(MetricEntry::new(id.as_str(), metric.label.as_str(), metric.rank));
            }
            Err(e) => {
                // Interning discipline guarantees every RIB key resolves.
                debug_assert!(false, "RIB entry without identity: {e}");
                error!(%peer, "RIB entry has no interned identity, omitting from record");
            }
        }
    }

    record
        .metrics
        .push(MetricEntry::new(host_tag, own.label.as_str(), own.rank));

    record
}

/// Apply an inbound contact-exchange record to the RIB
///
/// Rejects records for other sections with [`RecordError::NotMyProtocol`]
/// before taking any action. Otherwise interns the sender, then walks the
/// nested entries in order, overwriting the sender's stored metric with each
/// well-formed one (last writer wins). An unparseable rank skips that entry
/// only.
pub fn decode_contact(
    name: &str,
    record: &RoutingRecord,
    registry: &mut IdentityRegistry,
    rib: &mut RoutingInfoBase,
) -> Result<(), RecordError> {
    if record.name != name {
        return Err(RecordError::NotMyProtocol {
            expected: name.to_string(),
            actual: record.name.clone(),
        });
    }

    let sender = registry.intern(&record.node_id);
    debug!(node_id = %record.node_id, %sender, entries = record.metrics.len(),
        "routing information received");

    for entry in &record.metrics {
        let rank: i64 = match entry.rank.parse() {
            Ok(rank) => rank,
            Err(_) => {
                warn!(hostid = %entry.hostid, rank = %entry.rank,
                    "metric entry with unparseable rank, skipping");
                continue;
            }
        };
        trace!(hostid = %entry.hostid, label = %entry.label, rank, "metric entry applied");
        rib.set_metric(sender, ForwardingMetric::new(entry.label.as_str(), rank));
    }

    rib.touch();
    Ok(())
}

/// Export the RIB as repository rows, one per known peer
///
/// Row values are `"<label>:<rank>"`, keyed by the peer's identifier and
/// owned by this module's name.
pub fn export_state(
    name: &str,
    registry: &IdentityRegistry,
    rib: &RoutingInfoBase,
) -> Vec<StateRecord> {
    let mut records = Vec::with_capacity(rib.len());

    for (peer, metric) in rib.iter() {
        match registry.resolve(peer) {
            Ok(id) => {
                let value = format!("{}:{}", metric.label, metric.rank);
                trace!(key = %id, %value, "exporting repository row");
                records.push(StateRecord::new(name, id.as_str(), value));
            }
            Err(e) => {
                debug_assert!(false, "RIB entry without identity: {e}");
                error!(%peer, "RIB entry has no interned identity, omitting from export");
            }
        }
    }

    records
}

/// Apply one persisted repository row to the RIB
///
/// Rows owned by another authority are rejected with
/// [`RecordError::NotMyRecord`] and no side effects. A row without a
/// separator, or with an unparseable rank, is skipped with a log line —
/// that is a recovered condition, not an error. The label ends at the first
/// colon; anything after it must be the rank.
pub fn import_record(
    name: &str,
    record: &StateRecord,
    registry: &mut IdentityRegistry,
    rib: &mut RoutingInfoBase,
) -> Result<(), RecordError> {
    if record.authority != name {
        return Err(RecordError::NotMyRecord {
            expected: name.to_string(),
            actual: record.authority.clone(),
        });
    }

    let Some((label, rank_str)) = record.value.split_once(':') else {
        warn!(key = %record.key, value = %record.value,
            "repository row without separator, skipping");
        return Ok(());
    };
    let rank: i64 = match rank_str.parse() {
        Ok(rank) => rank,
        Err(_) => {
            warn!(key = %record.key, rank = %rank_str,
                "repository row with unparseable rank, skipping");
            return Ok(());
        }
    };

    let peer = registry.intern(&PeerId::from(record.key.as_str()));
    rib.set_metric(peer, ForwardingMetric::new(label, rank));
    debug!(key = %record.key, label, rank, "repository row restored");
    Ok(())
}
