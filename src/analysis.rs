use tracing::{debug, warn};

use crate::alias_graph;
use crate::commit_record::{CommitRecord, Role};
use crate::identity::Sighting;
use crate::name_emails::NameEmailIndex;
use crate::registry::IdentityRegistry;

// -------------------------------------------------------------------------------------------------
// IngestStats
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Number of commit records aggregated
    pub records: usize,

    /// Number of non-empty log lines that could not be parsed
    pub rejected: usize,
}

// -------------------------------------------------------------------------------------------------
// Analysis
// -------------------------------------------------------------------------------------------------
/// Aggregated identity information from the commit history of one or more repositories.
///
/// All sources share the same state: an identity that appears in two repositories is a single
/// registry entry.
#[derive(Debug, Default, Clone)]
pub struct Analysis {
    pub registry: IdentityRegistry,
    pub names: NameEmailIndex,
    sources: Vec<String>,
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `source` was analyzed, even if it turned out to contribute no commits.
    pub fn add_source(&mut self, source: &str) {
        self.sources.push(source.to_string());
    }

    /// The sources analyzed so far, in the order they were added.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Parse and aggregate raw log text from `source`, one commit per line.
    ///
    /// Empty lines are skipped silently. Malformed lines are logged and skipped.
    pub fn ingest_log(&mut self, source: &str, log_text: &str) -> IngestStats {
        let mut stats = IngestStats::default();
        for line in log_text.lines().filter(|l| !l.is_empty()) {
            match CommitRecord::parse(line) {
                Ok(record) => {
                    self.ingest_record(source, &record);
                    stats.records += 1;
                }
                Err(e) => {
                    warn!("Skipping log line from {source}: {e}");
                    stats.rejected += 1;
                }
            }
        }
        debug!(
            "Ingested {} records from {source} ({} rejected)",
            stats.records, stats.rejected
        );
        stats
    }

    /// Aggregate a sequence of already-parsed records from `source`.
    pub fn ingest<'r, I>(&mut self, source: &str, records: I) -> IngestStats
    where
        I: IntoIterator<Item = &'r CommitRecord>,
    {
        let mut stats = IngestStats::default();
        for record in records {
            self.ingest_record(source, record);
            stats.records += 1;
        }
        stats
    }

    /// Feed one record to the registry, the alias graph, and the name/email index.
    pub fn ingest_record(&mut self, source: &str, record: &CommitRecord) {
        for role in [Role::Author, Role::Committer] {
            let id = self.registry.record_role(
                record.raw(role),
                record.name(role),
                record.email(role),
                role,
            );
            self.registry.get_by_id_mut(id).last_seen = Some(Sighting {
                source: source.to_string(),
                commit_hash: record.hash.clone(),
            });
        }

        alias_graph::link_mismatch(&mut self.registry, record);

        self.names.observe(record);
    }
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn scenario_single_self_committed() {
        let mut a = Analysis::new();
        let stats = a.ingest_log("repo", r#"abc123;"Alice alice@x.com";"Alice alice@x.com""#);
        assert_eq!(stats, IngestStats { records: 1, rejected: 0 });

        assert_eq!(a.registry.len(), 1);
        let alice = a.registry.get("Alice alice@x.com").unwrap();
        assert_eq!(alice.as_author, 1);
        assert_eq!(alice.as_committer, 1);
        assert!(alice.alias_keys.is_empty());
        assert_eq!(
            alice.last_seen,
            Some(Sighting {
                source: "repo".to_string(),
                commit_hash: "abc123".to_string()
            })
        );
        assert!(a.names.clusters().is_empty());
    }

    #[test]
    fn scenario_author_differs_from_committer() {
        let mut a = Analysis::new();
        a.ingest_log("repo", r#"def456;"Alice alice@x.com";"Bob bob@x.com""#);
        assert_eq!(a.registry.len(), 2);

        let alice = a.registry.get("Alice alice@x.com").unwrap();
        let bob = a.registry.get("Bob bob@x.com").unwrap();
        assert_eq!((alice.as_author, alice.as_committer), (1, 0));
        assert_eq!((bob.as_author, bob.as_committer), (0, 1));
        assert!(alice.alias_keys.contains(&bob.key));
        assert!(bob.alias_keys.contains(&alice.key));
    }

    #[test]
    fn scenario_aliases_by_email_set() {
        let mut a = Analysis::new();
        let log = indoc! {r#"
            c1;"Alice a1@x.com";"Alice a1@x.com"
            c2;"Alice a2@x.com";"Alice a2@x.com"
            c3;"Al a1@x.com";"Al a1@x.com"
            c4;"Al a2@x.com";"Al a2@x.com"
        "#};
        let stats = a.ingest_log("repo", log);
        assert_eq!(stats.records, 4);

        let multi: Vec<&str> = a.names.multi_email_names().map(|(n, _)| n).collect();
        assert_eq!(multi, ["Al", "Alice"]);

        let clusters = a.names.clusters();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].names, ["Al", "Alice"]);
    }

    #[test]
    fn scenario_malformed_line_is_skipped() {
        let mut a = Analysis::new();
        let log = indoc! {r#"
            abc123;"Alice alice@x.com";"Alice alice@x.com"
            this is not a commit

            fatal: not a git repository
        "#};
        let stats = a.ingest_log("repo", log);
        assert_eq!(stats, IngestStats { records: 1, rejected: 2 });
        assert_eq!(a.registry.len(), 1);
        assert_eq!(a.names.len(), 1);
    }

    #[test]
    fn state_accumulates_across_sources() {
        let mut a = Analysis::new();
        a.add_source("one");
        a.ingest_log("one", r#"c1;"Alice alice@x.com";"Alice alice@x.com""#);
        a.add_source("two");
        a.ingest_log("two", r#"c2;"Alice alice@x.com";"Alice alice@x.com""#);

        assert_eq!(a.sources(), ["one", "two"]);
        let alice = a.registry.get("Alice alice@x.com").unwrap();
        assert_eq!(alice.activity(), 4);
        assert_eq!(alice.last_seen.as_ref().unwrap().source, "two");
        assert_eq!(alice.last_seen.as_ref().unwrap().commit_hash, "c2");
    }

    #[test]
    fn reingesting_doubles_counts_but_not_edges() {
        let records: Vec<CommitRecord> = [
            r#"c1;"Alice alice@x.com";"Bob bob@x.com""#,
            r#"c2;"Bob bob@x.com";"Carol carol@x.com""#,
        ]
        .iter()
        .map(|l| CommitRecord::parse(l).unwrap())
        .collect();

        let mut once = Analysis::new();
        once.ingest("repo", &records);
        let mut twice = Analysis::new();
        twice.ingest("repo", &records);
        twice.ingest("repo", &records);

        for (_id, identity) in once.registry.iter() {
            let other = twice.registry.get(&identity.key).unwrap();
            assert_eq!(other.alias_keys, identity.alias_keys);
            assert_eq!(other.as_author, 2 * identity.as_author);
            assert_eq!(other.as_committer, 2 * identity.as_committer);
        }
        assert_eq!(once.names, twice.names);
    }

    // ---------------------------------------------------------------------------------------------
    // properties
    // ---------------------------------------------------------------------------------------------
    // A small pool of names and emails, so that collisions are common.
    fn arb_role() -> impl Strategy<Value = String> {
        (0..4usize, 0..4usize).prop_map(|(n, e)| {
            let names = ["Alice", "Al", "Bob", "Jane Doe"];
            let emails = ["a1@x.com", "a2@x.com", "bob@x.com", "jd@x.com"];
            format!("{} {}", names[n], emails[e])
        })
    }

    fn arb_line() -> impl Strategy<Value = String> {
        ("[0-9a-f]{6}", arb_role(), arb_role())
            .prop_map(|(hash, author, committer)| format!(r#"{hash};"{author}";"{committer}""#))
    }

    proptest! {
        #[test]
        fn role_counts_match_record_count(lines in prop::collection::vec(arb_line(), 0..40)) {
            let mut a = Analysis::new();
            let stats = a.ingest_log("repo", &lines.join("\n"));
            prop_assert_eq!(stats.records, lines.len());

            let authored: u64 = a.registry.iter().map(|(_, i)| i.as_author).sum();
            let committed: u64 = a.registry.iter().map(|(_, i)| i.as_committer).sum();
            prop_assert_eq!(authored as usize, lines.len());
            prop_assert_eq!(committed as usize, lines.len());
        }

        #[test]
        fn alias_graph_is_symmetric_without_self_edges(lines in prop::collection::vec(arb_line(), 0..40)) {
            let mut a = Analysis::new();
            a.ingest_log("repo", &lines.join("\n"));

            for (_, identity) in a.registry.iter() {
                prop_assert!(!identity.alias_keys.contains(&identity.key));
                for other in identity.alias_keys.iter() {
                    let other = a.registry.get(other).unwrap();
                    prop_assert!(other.alias_keys.contains(&identity.key));
                }
            }
        }

        #[test]
        fn clusters_are_exactly_equal_email_sets(lines in prop::collection::vec(arb_line(), 0..40)) {
            let mut a = Analysis::new();
            a.ingest_log("repo", &lines.join("\n"));

            let clusters = a.names.clusters();
            for (n1, e1) in a.names.iter() {
                for (n2, e2) in a.names.iter() {
                    if n1 == n2 {
                        continue;
                    }
                    let together = clusters
                        .iter()
                        .any(|c| c.names.iter().any(|n| n == n1) && c.names.iter().any(|n| n == n2));
                    prop_assert_eq!(together, e1 == e2);
                }
            }
        }

        #[test]
        fn aggregation_is_deterministic(lines in prop::collection::vec(arb_line(), 0..40)) {
            let text = lines.join("\n");
            let mut a = Analysis::new();
            a.ingest_log("repo", &text);
            let mut b = Analysis::new();
            b.ingest_log("repo", &text);

            prop_assert_eq!(&a.registry, &b.registry);
            prop_assert_eq!(
                crate::alias_graph::alias_edges(&a.registry),
                crate::alias_graph::alias_edges(&b.registry)
            );
            prop_assert_eq!(a.names.clusters(), b.names.clusters());
        }
    }
}
