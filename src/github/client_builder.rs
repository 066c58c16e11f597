use reqwest::{IntoUrl, Url};

use super::{Client, Error, Result};
use crate::defaults::DEFAULT_GITHUB_API_URL;

// -------------------------------------------------------------------------------------------------
// ClientBuilder
// -------------------------------------------------------------------------------------------------
pub struct ClientBuilder {
    base_url: reqwest::Url,
}

impl ClientBuilder {
    const USER_AGENT: &'static str = "identigraph";

    pub fn new() -> Self {
        ClientBuilder {
            base_url: Url::parse(DEFAULT_GITHUB_API_URL).expect("default base URL should parse"),
        }
    }

    pub fn base_url<T: IntoUrl>(mut self, url: T) -> Result<Self> {
        self.base_url = url.into_url().map_err(Error::ReqwestError)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Client> {
        let inner = reqwest::ClientBuilder::new()
            .user_agent(Self::USER_AGENT)
            .build()
            .map_err(Error::ReqwestError)?;
        Ok(Client {
            base_url: self.base_url,
            inner,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
