mod client;
mod client_builder;
mod error;
mod models;
mod repo_enumerator;

pub use client::Client;
pub use client_builder::ClientBuilder;
pub use error::Error;
pub use models::{Repository, User};
pub use repo_enumerator::{page_count, RepoEnumerator, RepoType};

pub type Result<T> = std::result::Result<T, Error>;

/// List the browsable URLs of the public repositories belonging to the given user or
/// organization.
///
/// This is a high-level wrapper for enumerating GitHub repositories that handles the details of
/// creating an async runtime and a GitHub REST API client.
///
/// The resulting URLs are sorted and deduplicated.
pub fn enumerate_repo_urls(
    api_url: &str,
    nickname: &str,
    repo_type: RepoType,
) -> anyhow::Result<Vec<String>> {
    use anyhow::Context;
    use tracing::info;

    let client = ClientBuilder::new()
        .base_url(api_url)
        .context("Failed to parse GitHub API URL")?
        .build()
        .context("Failed to initialize GitHub client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to initialize async runtime")?;

    let repo_urls = runtime.block_on(async {
        let repo_enumerator = RepoEnumerator::new(&client);
        repo_enumerator.enumerate_repo_urls(nickname, repo_type).await
    })?;

    info!("Found {} repositories for {nickname}", repo_urls.len());
    Ok(repo_urls)
}
