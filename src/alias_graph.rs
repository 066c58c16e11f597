//! One-hop alias links between identities.
//!
//! A commit whose author differs from its committer is weak evidence that the two identities are
//! related. Each such commit adds an undirected edge, stored symmetrically in the `alias_keys` of
//! both identities. Chains of edges are never followed.

use std::collections::BTreeSet;

use crate::commit_record::CommitRecord;
use crate::registry::IdentityRegistry;

/// Link the author and committer of `record` if they differ.
///
/// Both identities are created if they are not yet in the registry. Returns `true` if the record
/// carried mismatch evidence.
pub fn link_mismatch(registry: &mut IdentityRegistry, record: &CommitRecord) -> bool {
    if record.roles_match {
        return false;
    }
    link(registry, &record.author, &record.committer);
    true
}

/// Add an undirected edge between the identities with keys `a` and `b`.
///
/// Linking a key to itself does nothing.
pub fn link(registry: &mut IdentityRegistry, a: &str, b: &str) {
    if a == b {
        return;
    }
    let a_id = registry.get_or_insert(a);
    let b_id = registry.get_or_insert(b);
    registry.get_by_id_mut(a_id).alias_keys.insert(b.to_string());
    registry.get_by_id_mut(b_id).alias_keys.insert(a.to_string());
}

/// All edges of the alias graph, each listed once with its endpoints in sorted order.
pub fn alias_edges(registry: &IdentityRegistry) -> BTreeSet<(String, String)> {
    let mut edges = BTreeSet::new();
    for (_id, identity) in registry.iter() {
        for other in identity.alias_keys.iter() {
            if identity.key < *other {
                edges.insert((identity.key.clone(), other.clone()));
            } else {
                edges.insert((other.clone(), identity.key.clone()));
            }
        }
    }
    edges
}
