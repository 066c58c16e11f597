use reqwest::{header, Url};
use tracing::debug;

use super::models::{Repository, User};
use super::{ClientBuilder, Error, Result};

// -------------------------------------------------------------------------------------------------
// Client
// -------------------------------------------------------------------------------------------------
/// A minimal, unauthenticated client for the GitHub REST API.
#[derive(Clone)]
pub struct Client {
    pub(super) base_url: Url,
    pub(super) inner: reqwest::Client,
}

pub const MAX_PER_PAGE: u64 = 100;

impl Client {
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub async fn get_user(&self, username: &str) -> Result<User> {
        let response = self.get(&["users", username]).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Get one page of a user's (or organization's) public repositories.
    ///
    /// Pages are numbered from 1 and hold up to `MAX_PER_PAGE` repositories.
    pub async fn get_user_repos_page(&self, username: &str, page: u64) -> Result<Vec<Repository>> {
        let per_page = MAX_PER_PAGE.to_string();
        let page = page.to_string();
        let response = self
            .get_with_params(
                &["users", username, "repos"],
                &[("per_page", &per_page), ("page", &page)],
            )
            .await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Fetch an HTML page from anywhere, not necessarily from the API.
    pub async fn get_html(&self, url: Url) -> Result<String> {
        debug!("GET {url}");
        let response = self
            .inner
            .get(url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

// private implementation
impl Client {
    /// Construct a `Url` from the given path parts and query parameters.
    ///
    /// The path parts are appended to the base URL, so that a base URL with a path, such as
    /// `https://github.example.com/api/v3`, works.
    pub(super) fn make_url(&self, path_parts: &[&str], params: &[(&str, &str)]) -> Result<Url> {
        let mut buf = String::new();
        for p in path_parts {
            if p.contains('/') {
                return Err(Error::UrlSlashError(p.to_string()));
            }
            if !buf.is_empty() {
                buf.push('/');
            }
            buf.push_str(p);
        }

        let mut base_url = self.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let url = base_url.join(&buf)?;
        let url = if params.is_empty() {
            url
        } else {
            Url::parse_with_params(url.as_str(), params)?
        };
        Ok(url)
    }

    async fn get(&self, path_parts: &[&str]) -> Result<reqwest::Response> {
        self.get_with_params(path_parts, &[]).await
    }

    async fn get_with_params(
        &self,
        path_parts: &[&str],
        params: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let url = self.make_url(path_parts, params)?;
        self.get_url(url).await
    }

    async fn get_url(&self, url: Url) -> Result<reqwest::Response> {
        debug!("GET {url}");
        let response = self
            .inner
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;
        Ok(response.error_for_status()?)
    }
}
