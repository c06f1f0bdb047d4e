use crate::{Error, Result};
use reqwest::Client;
use url::Url;

/// Retrieves the raw markup of the results index page
pub struct IndexFetcher {
    client: Client,
}

impl IndexFetcher {
    /// Create a fetcher with a default HTTP client
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the response body as text
    ///
    /// Connection failures and non-success statuses are both reported as
    /// [`Error::Network`].
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)
            .map_err(|e| Error::Network(format!("Invalid index URL {}: {}", url, e)))?;

        tracing::info!("Fetching {}...", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "Index request to {} failed with status {}",
                url, status
            )));
        }

        let body = response.text().await?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body)
    }
}

impl Default for IndexFetcher {
    fn default() -> Self {
        Self::new()
    }
}
