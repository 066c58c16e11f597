//! Resolution of hosting-platform account names for identities.
//!
//! After aggregation, each identity can be checked against the commit page of the commit it was
//! last seen in. One task runs per identity. Tasks are handed an owned copy of what they need and
//! return their result tagged with the identity's id; only the caller writes to the registry, once
//! every task has finished.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::defaults::{DEFAULT_SYSTEM_EMAILS, GITHUB_HOST_PREFIX};
use crate::github;
use crate::identity::IdentityId;
use crate::progress::Progress;
use crate::registry::IdentityRegistry;

// -------------------------------------------------------------------------------------------------
// AccountVerifier
// -------------------------------------------------------------------------------------------------
/// Looks up the hosting account responsible for a commit.
///
/// Implementations never fail: anything that goes wrong is logged and reported as `None`.
pub trait AccountVerifier: Send + Sync + 'static {
    fn verify(
        &self,
        repo_url: &str,
        commit_hash: &str,
    ) -> impl Future<Output = Option<String>> + Send;
}

// -------------------------------------------------------------------------------------------------
// CommitPageVerifier
// -------------------------------------------------------------------------------------------------
lazy_static! {
    static ref COMMIT_AUTHOR_LINK_PATTERN: Regex =
        Regex::new(r#"<a href=".+?commits\?author=(.+?)""#)
            .expect("commit author link regex should compile");
}

/// Find the account name in the first `commits?author=` link of a GitHub commit page.
pub fn extract_account(page: &str) -> Option<String> {
    COMMIT_AUTHOR_LINK_PATTERN
        .captures(page)
        .map(|captures| captures[1].to_string())
}

/// The commit page URL for `commit_hash` within the repository at `repo_url`.
pub fn commit_page_url(repo_url: &str, commit_hash: &str) -> String {
    let repo_url = repo_url.trim_end_matches('/');
    let repo_url = repo_url.strip_suffix(".git").unwrap_or(repo_url);
    format!("{repo_url}/commit/{commit_hash}")
}

/// Resolves accounts by scraping GitHub commit pages.
pub struct CommitPageVerifier {
    client: github::Client,
    host_prefix: String,
}

impl CommitPageVerifier {
    pub fn new(client: github::Client) -> Self {
        Self {
            client,
            host_prefix: GITHUB_HOST_PREFIX.to_string(),
        }
    }

    /// Check repositories under `host_prefix` instead of `https://github.com/`, e.g., for a
    /// GitHub Enterprise instance.
    pub fn with_host_prefix<S: Into<String>>(mut self, host_prefix: S) -> Self {
        self.host_prefix = host_prefix.into();
        self
    }

    async fn fetch_account(&self, page_url: &str) -> github::Result<Option<String>> {
        let url = reqwest::Url::parse(page_url)?;
        let page = self.client.get_html(url).await?;
        Ok(extract_account(&page))
    }
}

impl AccountVerifier for CommitPageVerifier {
    async fn verify(&self, repo_url: &str, commit_hash: &str) -> Option<String> {
        if !repo_url.starts_with(&self.host_prefix) {
            return None;
        }
        let page_url = commit_page_url(repo_url, commit_hash);
        match self.fetch_account(&page_url).await {
            Ok(Some(account)) => {
                debug!("{page_url}: {account}");
                Some(account)
            }
            Ok(None) => {
                debug!("{page_url}: no account link found");
                None
            }
            Err(e) => {
                debug!("Failed to verify {page_url}: {e}");
                None
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
// SystemEmails
// -------------------------------------------------------------------------------------------------
/// Email addresses of platform-generated identities, which are never verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEmails(BTreeSet<String>);

impl SystemEmails {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SystemEmails(emails.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.contains(email)
    }
}

impl Default for SystemEmails {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_EMAILS.iter().copied())
    }
}

// -------------------------------------------------------------------------------------------------
// verify_identities
// -------------------------------------------------------------------------------------------------
struct VerifyRequest {
    id: IdentityId,
    repo_url: String,
    commit_hash: String,
}

/// Run `verifier` concurrently for every identity in `registry` that has a sighting and whose
/// email is not a system email, then record the resolved accounts.
///
/// Returns the number of identities that were given an account. This waits for every request to
/// finish; there is no timeout.
pub fn verify_identities<V: AccountVerifier>(
    registry: &mut IdentityRegistry,
    verifier: Arc<V>,
    system_emails: &SystemEmails,
    progress: &Progress,
) -> Result<usize> {
    let requests: Vec<VerifyRequest> = registry
        .iter()
        .filter(|(_, identity)| !system_emails.contains(&identity.email))
        .filter_map(|(id, identity)| {
            identity.last_seen.as_ref().map(|sighting| VerifyRequest {
                id,
                repo_url: sighting.source.clone(),
                commit_hash: sighting.commit_hash.clone(),
            })
        })
        .collect();
    debug!("Verifying {} of {} identities", requests.len(), registry.len());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to initialize async runtime")?;

    let results: Vec<(IdentityId, String)> = runtime.block_on(async {
        let mut tasks = tokio::task::JoinSet::new();
        for request in requests {
            let verifier = Arc::clone(&verifier);
            tasks.spawn(async move {
                let account = verifier
                    .verify(&request.repo_url, &request.commit_hash)
                    .await;
                (request.id, account)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            progress.inc(1);
            match joined {
                Ok((id, Some(account))) => results.push((id, account)),
                Ok((_id, None)) => {}
                Err(e) => debug!("Verification task failed: {e}"),
            }
        }
        results
    });

    let num_verified = results.len();
    for (id, account) in results {
        registry.get_by_id_mut(id).verified_account = Some(account);
    }
    Ok(num_verified)
}
