use tracing::debug;

use super::client::MAX_PER_PAGE;
use super::models::Repository;
use super::{Client, Result};

/// The number of pages needed to list `total` items at `per_page` items per page.
pub fn page_count(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// A `RepoEnumerator` provides higher-level functionality on top of the GitHub REST API to list
/// the public repositories of a user or organization.
pub struct RepoEnumerator<'c> {
    client: &'c Client,
}

impl<'c> RepoEnumerator<'c> {
    pub fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Enumerate the public repositories of the given user or organization.
    ///
    /// The account's public repository count determines how many pages are requested.
    /// A page that fails to load is logged and skipped.
    pub async fn enumerate_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let user = self.client.get_user(username).await?;
        let num_pages = page_count(user.public_repos, MAX_PER_PAGE);
        debug!(
            "{} has {} public repositories across {num_pages} pages",
            user.login, user.public_repos
        );

        let mut repos = Vec::new();
        for page in 1..=num_pages {
            match self.client.get_user_repos_page(username, page).await {
                Ok(page_repos) => repos.extend(page_repos),
                Err(e) => debug!("Failed to list page {page} of repositories for {username}: {e}"),
            }
        }
        Ok(repos)
    }

    /// Enumerate the browsable URLs of the given account's repositories that pass `repo_type`.
    ///
    /// The resulting URLs are sorted and deduplicated.
    pub async fn enumerate_repo_urls(
        &self,
        username: &str,
        repo_type: RepoType,
    ) -> Result<Vec<String>> {
        let mut repos = self.enumerate_user_repos(username).await?;
        repos.retain(|r| repo_type.filter(r));

        let mut repo_urls: Vec<String> = repos.into_iter().map(|r| r.html_url).collect();
        repo_urls.sort();
        repo_urls.dedup();

        Ok(repo_urls)
    }
}

/// Specifies which GitHub repositories to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoType {
    /// Select both source repositories and fork repositories
    All,

    /// Only source repositories, i.e., ones that are not forks
    Source,
}

impl RepoType {
    pub fn filter(&self, repo: &Repository) -> bool {
        match self {
            RepoType::All => true,
            RepoType::Source => !repo.fork,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_counts() {
        assert_eq!(page_count(0, 100), 0);
        assert_eq!(page_count(1, 100), 1);
        assert_eq!(page_count(100, 100), 1);
        assert_eq!(page_count(101, 100), 2);
        assert_eq!(page_count(250, 100), 3);
        assert_eq!(page_count(5, 0), 0);
    }

    fn repo(name: &str, fork: bool) -> Repository {
        Repository {
            html_url: format!("https://github.com/octocat/{name}"),
            fork,
        }
    }

    #[test]
    fn repo_type_filter() {
        let source = repo("Spoon-Knife", false);
        let fork = repo("linguist", true);
        assert!(RepoType::All.filter(&source));
        assert!(RepoType::All.filter(&fork));
        assert!(RepoType::Source.filter(&source));
        assert!(!RepoType::Source.filter(&fork));
    }
}
