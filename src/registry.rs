use std::collections::HashMap;

use crate::commit_record::Role;
use crate::identity::{Identity, IdentityId};

// -------------------------------------------------------------------------------------------------
// IdentityRegistry
// -------------------------------------------------------------------------------------------------
/// The set of unique identities seen so far, keyed by their verbatim `"<name> <email>"` string.
///
/// Identities are stored in insertion order and are addressed by `IdentityId`, which stays valid
/// for the lifetime of the registry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdentityRegistry {
    identities: Vec<Identity>,
    index: HashMap<String, IdentityId>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for the given key, creating a zero-count identity if it is new.
    pub fn get_or_insert(&mut self, key: &str) -> IdentityId {
        if let Some(id) = self.index.get(key) {
            return *id;
        }
        let id = IdentityId(self.identities.len());
        self.identities.push(Identity::new(key.to_string()));
        self.index.insert(key.to_string(), id);
        id
    }

    /// Record one appearance of `key` in the given role.
    ///
    /// The identity's name and email are overwritten with the given values. In practice these
    /// never change for a fixed key, since the key is the unsplit form of the two.
    pub fn record_role(&mut self, key: &str, name: &str, email: &str, role: Role) -> IdentityId {
        let id = self.get_or_insert(key);
        let identity = &mut self.identities[id.0];
        identity.name.clear();
        identity.name.push_str(name);
        identity.email.clear();
        identity.email.push_str(email);
        match role {
            Role::Author => identity.as_author += 1,
            Role::Committer => identity.as_committer += 1,
        }
        id
    }

    #[inline]
    pub fn id_of(&self, key: &str) -> Option<IdentityId> {
        self.index.get(key).copied()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Identity> {
        self.id_of(key).map(|id| &self.identities[id.0])
    }

    /// Panics if `id` did not come from this registry.
    #[inline]
    pub fn get_by_id(&self, id: IdentityId) -> &Identity {
        &self.identities[id.0]
    }

    /// Panics if `id` did not come from this registry.
    #[inline]
    pub fn get_by_id_mut(&mut self, id: IdentityId) -> &mut Identity {
        &mut self.identities[id.0]
    }

    /// Iterate over identities and their ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (IdentityId, &Identity)> {
        self.identities
            .iter()
            .enumerate()
            .map(|(i, identity)| (IdentityId(i), identity))
    }

    /// Identities ordered from least to most active, with ties in insertion order.
    pub fn sorted_by_activity(&self) -> Vec<&Identity> {
        let mut sorted: Vec<&Identity> = self.identities.iter().collect();
        sorted.sort_by_key(|identity| identity.activity());
        sorted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
