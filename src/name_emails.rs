use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::commit_record::{CommitRecord, Role};

pub type EmailSet = BTreeSet<String>;

// -------------------------------------------------------------------------------------------------
// EmailSetMatcher
// -------------------------------------------------------------------------------------------------
/// Decides whether two names with the given email sets belong in the same alias cluster.
pub trait EmailSetMatcher {
    fn matches(&self, a: &EmailSet, b: &EmailSet) -> bool;
}

/// Names are clustered only when their email sets are exactly equal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactEmailSet;

impl EmailSetMatcher for ExactEmailSet {
    #[inline]
    fn matches(&self, a: &EmailSet, b: &EmailSet) -> bool {
        a == b
    }
}

// -------------------------------------------------------------------------------------------------
// AliasCluster
// -------------------------------------------------------------------------------------------------
/// Two or more distinct names that appear to belong to the same person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCluster {
    /// The sorted member names, comma-joined
    pub key: String,

    /// The member names, sorted
    pub names: Vec<String>,

    /// The email set of the name the cluster was derived from
    pub emails: EmailSet,
}

// -------------------------------------------------------------------------------------------------
// NameEmailIndex
// -------------------------------------------------------------------------------------------------
/// Maps each display name to the distinct email addresses it has been seen with.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameEmailIndex {
    names: BTreeMap<String, EmailSet>,
}

impl NameEmailIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, email: &str) {
        self.names
            .entry(name.to_string())
            .or_default()
            .insert(email.to_string());
    }

    /// Record the author and committer name/email pairs of a commit.
    pub fn observe(&mut self, record: &CommitRecord) {
        for role in [Role::Author, Role::Committer] {
            self.insert(record.name(role), record.email(role));
        }
    }

    pub fn emails_for(&self, name: &str) -> Option<&EmailSet> {
        self.names.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmailSet)> {
        self.names.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Names that have been seen with more than one email address, in name order.
    pub fn multi_email_names(&self) -> impl Iterator<Item = (&str, &EmailSet)> {
        self.iter().filter(|(_, emails)| emails.len() > 1)
    }

    /// Group names whose email sets the matcher considers the same.
    ///
    /// Only groups with at least two names are returned. A group that is derived more than once
    /// is reported once.
    pub fn alias_clusters(&self, matcher: &dyn EmailSetMatcher) -> Vec<AliasCluster> {
        let mut clusters: BTreeMap<String, AliasCluster> = BTreeMap::new();
        for emails in self.names.values() {
            // `self.names` is ordered, so `names` comes out sorted
            let names: Vec<String> = self
                .names
                .iter()
                .filter(|(_, other)| matcher.matches(emails, other))
                .map(|(name, _)| name.clone())
                .collect();
            if names.len() < 2 {
                continue;
            }
            let key = names.join(",");
            clusters.entry(key.clone()).or_insert_with(|| AliasCluster {
                key,
                names,
                emails: emails.clone(),
            });
        }
        clusters.into_values().collect()
    }

    /// `alias_clusters` using exact email set equality.
    pub fn clusters(&self) -> Vec<AliasCluster> {
        self.alias_clusters(&ExactEmailSet)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
