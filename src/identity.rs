use serde::Serialize;
use std::collections::BTreeSet;

// -------------------------------------------------------------------------------------------------
// IdentityId
// -------------------------------------------------------------------------------------------------
/// A stable handle to an `Identity` within an `IdentityRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct IdentityId(pub(crate) usize);

impl IdentityId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

// -------------------------------------------------------------------------------------------------
// Sighting
// -------------------------------------------------------------------------------------------------
/// Where an identity was most recently seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sighting {
    /// The repository source as given on input: a URL or a local path
    pub source: String,

    pub commit_hash: String,
}

// -------------------------------------------------------------------------------------------------
// Identity
// -------------------------------------------------------------------------------------------------
/// A `(name, email)` pair as it appeared in the author or committer slot of commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// The verbatim `"<name> <email>"` string from the log
    pub key: String,

    pub name: String,
    pub email: String,

    /// How many commits had this identity as author
    pub as_author: u64,

    /// How many commits had this identity as committer
    pub as_committer: u64,

    /// Keys of other identities that appeared opposite this one in a single commit
    pub alias_keys: BTreeSet<String>,

    /// Hosting account name, if one was resolved
    pub verified_account: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Sighting>,
}

impl Identity {
    pub fn new(key: String) -> Self {
        Identity {
            key,
            name: String::new(),
            email: String::new(),
            as_author: 0,
            as_committer: 0,
            alias_keys: BTreeSet::new(),
            verified_account: None,
            last_seen: None,
        }
    }

    /// The total number of commit roles this identity has filled.
    #[inline]
    pub fn activity(&self) -> u64 {
        self.as_author + self.as_committer
    }
}
