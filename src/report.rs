use console::Style;
use serde::Serialize;
use std::io::Write;

use crate::alias_graph::alias_edges;
use crate::analysis::Analysis;
use crate::defaults::REPORT_DELIMITER;
use crate::identity::Identity;
use crate::name_emails::{AliasCluster, EmailSet, EmailSetMatcher};

// -------------------------------------------------------------------------------------------------
// Styles
// -------------------------------------------------------------------------------------------------
pub struct Styles {
    pub style_heading: Style,
    pub style_name: Style,
    pub style_metadata: Style,
    pub style_account: Style,
}

impl Styles {
    pub fn new(styles_enabled: bool) -> Self {
        let style_heading = Style::new().bold().force_styling(styles_enabled);
        let style_name = Style::new()
            .bright()
            .bold()
            .white()
            .force_styling(styles_enabled);
        let style_metadata = Style::new().bright().blue().force_styling(styles_enabled);
        let style_account = Style::new().bright().green().force_styling(styles_enabled);

        Self {
            style_heading,
            style_name,
            style_metadata,
            style_account,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Report
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Serialize)]
pub struct MultiEmailName<'a> {
    pub name: &'a str,
    pub emails: &'a EmailSet,
}

/// Everything the analysis found, in the order it is presented.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub sources: &'a [String],

    /// All identities, least active first
    pub identities: Vec<&'a Identity>,

    pub alias_edges: Vec<(String, String)>,
    pub multi_email_names: Vec<MultiEmailName<'a>>,
    pub clusters: Vec<AliasCluster>,
    pub total_identities: usize,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &'a Analysis, matcher: &dyn EmailSetMatcher) -> Self {
        Report {
            sources: analysis.sources(),
            identities: analysis.registry.sorted_by_activity(),
            alias_edges: alias_edges(&analysis.registry).into_iter().collect(),
            multi_email_names: analysis
                .names
                .multi_email_names()
                .map(|(name, emails)| MultiEmailName { name, emails })
                .collect(),
            clusters: analysis.names.alias_clusters(matcher),
            total_identities: analysis.registry.len(),
        }
    }

    /// Write the report as text for people to read.
    pub fn write_human<W: Write>(&self, mut w: W, styles: &Styles) -> std::io::Result<()> {
        let sources: Vec<&str> = self.sources.iter().map(String::as_str).collect();
        writeln!(w, "Analysis of the Git repositories \"{}\"", sources.join(", "))?;

        writeln!(w)?;
        writeln!(w, "{}", styles.style_heading.apply_to("Identities:"))?;
        for identity in self.identities.iter() {
            writeln!(w, "{REPORT_DELIMITER}")?;
            write_identity(&mut w, identity, styles)?;
        }

        if !self.multi_email_names.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", styles.style_heading.apply_to("Names with multiple emails:"))?;
            writeln!(w, "{REPORT_DELIMITER}")?;
            for entry in self.multi_email_names.iter() {
                writeln!(w, "{} is the owner of emails:", styles.style_name.apply_to(entry.name))?;
                for email in entry.emails.iter() {
                    writeln!(w, "\t\t\t{}", styles.style_metadata.apply_to(email))?;
                }
            }
        }

        if !self.clusters.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", styles.style_heading.apply_to("Names sharing identical emails:"))?;
            writeln!(w, "{REPORT_DELIMITER}")?;
            for cluster in self.clusters.iter() {
                writeln!(w, "{} are the same person", cluster.names.join(" and "))?;
            }
        }

        writeln!(w)?;
        writeln!(w, "{}", styles.style_heading.apply_to("Statistics:"))?;
        writeln!(w, "{REPORT_DELIMITER}")?;
        writeln!(w, "Total identities: {}", self.total_identities)?;
        Ok(())
    }
}

fn write_identity<W: Write>(w: &mut W, identity: &Identity, styles: &Styles) -> std::io::Result<()> {
    writeln!(w, "Name:\t\t\t{}", styles.style_name.apply_to(&identity.name))?;
    writeln!(w, "Email:\t\t\t{}", styles.style_metadata.apply_to(&identity.email))?;
    if identity.as_author > 0 {
        writeln!(w, "Appears as author:\t{} times", identity.as_author)?;
    }
    if identity.as_committer > 0 {
        writeln!(w, "Appears as committer:\t{} times", identity.as_committer)?;
    }
    if let Some(account) = &identity.verified_account {
        writeln!(w, "Verified account:")?;
        writeln!(
            w,
            "\t\t\t{}",
            styles.style_account.apply_to(format!("https://github.com/{account}"))
        )?;
    }
    if !identity.alias_keys.is_empty() {
        writeln!(w, "Also appears with:")?;
        for key in identity.alias_keys.iter() {
            writeln!(w, "\t\t\t{key}")?;
        }
    }
    Ok(())
}
