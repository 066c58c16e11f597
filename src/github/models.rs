use serde::Deserialize;

// Only the fields that are read are modeled; the rest of each response is ignored.

// -------------------------------------------------------------------------------------------------
// User
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
    pub public_repos: u64,
}

// -------------------------------------------------------------------------------------------------
// Repository
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct Repository {
    pub html_url: String,
    pub fork: bool,
}
