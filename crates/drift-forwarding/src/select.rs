//! Delegate selection
//!
//! Given a target peer, scan the RIB for other peers advertising the same
//! label — they are "alike" and presumed to have a good path to the target.
//!
//! Candidates are returned in RIB iteration order and truncated from the
//! front; no ordering by rank happens unless the caller opts into the
//! strict-ranking variant. The unsorted behavior is the protocol's
//! documented baseline, kept deliberately.

use drift_core::{PeerDirectory, PeerId};
use tracing::{debug, error, trace};

use crate::registry::IdentityRegistry;
use crate::rib::{RoutingInfoBase, UNSET_LABEL};

/// Whether a candidate's label qualifies it as a delegate for a target
///
/// The target's label must carry information (non-empty, not the unset
/// sentinel) and the candidate's label must equal it exactly. The rank and
/// the wire-format host identifier play no part here.
fn is_alike(target_label: &str, candidate_label: &str) -> bool {
    !target_label.is_empty()
        && target_label != UNSET_LABEL
        && !candidate_label.is_empty()
        && candidate_label == target_label
}

/// Compute the ranked candidate list of delegates for a target
///
/// Scans every RIB entry, excluding the local node, the target itself, any
/// peer in `already_targeted`, and any peer the host's directory cannot
/// currently resolve (stale knowledge, silently dropped). Survivors whose
/// label matches the target's are collected in table order and truncated to
/// `limit`; with `rank_ordered` they are first sorted by descending rank.
///
/// Returns `None` when nothing qualifies — the caller must distinguish "no
/// delegate set" from an empty one and take no forwarding action.
pub fn select_delegates<D: PeerDirectory + ?Sized>(
    target: &PeerId,
    already_targeted: &[PeerId],
    limit: usize,
    rank_ordered: bool,
    registry: &mut IdentityRegistry,
    rib: &RoutingInfoBase,
    directory: &D,
) -> Option<Vec<PeerId>> {
    let target_ref = registry.intern(target);
    let target_label = rib
        .get_metric(target_ref)
        .map(|m| m.label.as_str())
        .unwrap_or("");

    trace!(%target, %target_label, "selecting delegates");

    let mut qualified: Vec<(PeerId, i64)> = Vec::new();

    for (peer, metric) in rib.iter() {
        if peer.is_local() || peer == target_ref {
            continue;
        }
        let candidate = match registry.resolve(peer) {
            Ok(id) => id,
            Err(e) => {
                debug_assert!(false, "RIB entry without identity: {e}");
                error!(%peer, "RIB entry has no interned identity, skipping candidate");
                continue;
            }
        };
        if already_targeted.contains(candidate) {
            continue;
        }
        if !directory.contains(candidate) {
            // Known from a past contact but not currently resolvable.
            continue;
        }
        if is_alike(target_label, &metric.label) {
            debug!(%candidate, %target, label = %metric.label,
                "candidate is a good delegate for target");
            qualified.push((candidate.clone(), metric.rank));
        }
    }

    if qualified.is_empty() {
        debug!(%target, "no delegates found");
        return None;
    }

    if rank_ordered {
        qualified.sort_by(|a, b| b.1.cmp(&a.1));
    }
    qualified.truncate(limit);

    let delegates: Vec<PeerId> = qualified.into_iter().map(|(id, _)| id).collect();
    debug!(%target, count = delegates.len(), "delegates generated");
    Some(delegates)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::rib::ForwardingMetric;

    const LIMIT: usize = 5;

    /// Directory that resolves an explicit peer set
    struct TestDirectory {
        present: HashSet<PeerId>,
    }

    impl TestDirectory {
        fn of(names: &[&str]) -> Self {
            Self {
                present: names.iter().map(|n| PeerId::from(*n)).collect(),
            }
        }
    }

    impl PeerDirectory for TestDirectory {
        fn contains(&self, peer: &PeerId) -> bool {
            self.present.contains(peer)
        }
    }

    fn make_peer(name: &str) -> PeerId {
        PeerId::from(name)
    }

    fn populate(
        registry: &mut IdentityRegistry,
        rib: &mut RoutingInfoBase,
        peers: &[(&str, &str, i64)],
    ) {
        for (name, label, rank) in peers {
            let r = registry.intern(&make_peer(name));
            rib.set_metric(r, ForwardingMetric::new(*label, *rank));
        }
    }

    #[test]
    fn test_exclusions() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        populate(
            &mut registry,
            &mut rib,
            &[("a", "x", 1), ("b", "x", 2), ("c", "x", 3), ("t", "x", 4)],
        );
        let directory = TestDirectory::of(&["a", "b", "c", "t"]);

        let delegates = select_delegates(
            &make_peer("t"),
            &[make_peer("c")],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        )
        .unwrap();

        let got: HashSet<PeerId> = delegates.into_iter().collect();
        let want: HashSet<PeerId> = [make_peer("a"), make_peer("b")].into();
        assert_eq!(got, want);
    }

    #[test]
    fn test_unknown_or_unset_target_yields_no_set() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        populate(&mut registry, &mut rib, &[("a", "x", 1), ("b", "x", 2)]);
        let directory = TestDirectory::of(&["a", "b"]);

        // Target never heard of: its label is effectively unset.
        let result = select_delegates(
            &make_peer("t"),
            &[],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        );
        assert!(result.is_none());

        // Target with the sentinel label.
        let t = registry.intern(&make_peer("u"));
        rib.set_metric(t, ForwardingMetric::new(UNSET_LABEL, 1));
        let result = select_delegates(
            &make_peer("u"),
            &[],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        );
        assert!(result.is_none());

        // Target with an empty label.
        let v = registry.intern(&make_peer("v"));
        rib.set_metric(v, ForwardingMetric::new("", 1));
        let result = select_delegates(
            &make_peer("v"),
            &[],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_limit_enforcement() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        let names: Vec<String> = (0..10).map(|i| format!("p{i}")).collect();
        for name in &names {
            let r = registry.intern(&make_peer(name));
            rib.set_metric(r, ForwardingMetric::new("x", 1));
        }
        let t = registry.intern(&make_peer("t"));
        rib.set_metric(t, ForwardingMetric::new("x", 1));
        let present: Vec<&str> = names
            .iter()
            .map(|s| s.as_str())
            .chain(std::iter::once("t"))
            .collect();
        let directory = TestDirectory::of(&present);

        let delegates = select_delegates(
            &make_peer("t"),
            &[],
            3,
            false,
            &mut registry,
            &rib,
            &directory,
        )
        .unwrap();
        assert_eq!(delegates.len(), 3);
    }

    #[test]
    fn test_unresolvable_candidates_silently_skipped() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        populate(
            &mut registry,
            &mut rib,
            &[("a", "x", 1), ("gone", "x", 2), ("t", "x", 3)],
        );
        // "gone" is in the RIB but not resolvable by the host right now.
        let directory = TestDirectory::of(&["a", "t"]);

        let delegates = select_delegates(
            &make_peer("t"),
            &[],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        )
        .unwrap();
        assert_eq!(delegates, vec![make_peer("a")]);
    }

    #[test]
    fn test_label_mismatch_disqualifies() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        populate(
            &mut registry,
            &mut rib,
            &[("a", "y", 1), ("b", "", 1), ("c", UNSET_LABEL, 1), ("t", "x", 1)],
        );
        let directory = TestDirectory::of(&["a", "b", "c", "t"]);

        let result = select_delegates(
            &make_peer("t"),
            &[],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_baseline_order_is_table_order() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        // Interned in this order, so table order is a, b, c.
        populate(
            &mut registry,
            &mut rib,
            &[("a", "x", 1), ("b", "x", 9), ("c", "x", 5), ("t", "x", 0)],
        );
        let directory = TestDirectory::of(&["a", "b", "c", "t"]);

        let delegates = select_delegates(
            &make_peer("t"),
            &[],
            LIMIT,
            false,
            &mut registry,
            &rib,
            &directory,
        )
        .unwrap();
        assert_eq!(delegates, vec![make_peer("a"), make_peer("b"), make_peer("c")]);
    }

    #[test]
    fn test_rank_ordered_variant_sorts_descending() {
        let mut registry = IdentityRegistry::new(make_peer("self"));
        let mut rib = RoutingInfoBase::new();
        populate(
            &mut registry,
            &mut rib,
            &[("a", "x", 1), ("b", "x", 9), ("c", "x", 5), ("t", "x", 0)],
        );
        let directory = TestDirectory::of(&["a", "b", "c", "t"]);

        let delegates = select_delegates(
            &make_peer("t"),
            &[],
            2,
            true,
            &mut registry,
            &rib,
            &directory,
        )
        .unwrap();
        assert_eq!(delegates, vec![make_peer("b"), make_peer("c")]);
    }
}
