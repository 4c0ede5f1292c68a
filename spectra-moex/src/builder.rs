use std::time::Duration;

use spectra_core::{DEFAULT_MARKET_DATA_BASE_URL, SpectraError};

use crate::MoexConnector;
use crate::adapter::RealAdapter;

/// Builder for a [`MoexConnector`] talking to a custom endpoint or through a
/// preconfigured HTTP client.
#[derive(Debug, Clone)]
pub struct MoexConnectorBuilder {
    base_url: String,
    http: Option<reqwest::Client>,
    timeout: Option<Duration>,
}

impl Default for MoexConnectorBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            http: None,
            timeout: None,
        }
    }
}

impl MoexConnectorBuilder {
    /// Securities endpoint, e.g. `.../engines/stock/markets/shares/boards/TQBR/securities`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use an existing HTTP client. Takes precedence over [`Self::timeout`].
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Per-request timeout of the internally built client.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration and build the connector.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL does not parse, or `Connector` if
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<MoexConnector, SpectraError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| SpectraError::InvalidArg(format!("market data url: {e}")))?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut b = reqwest::Client::builder();
                if let Some(t) = self.timeout {
                    b = b.timeout(t);
                }
                b.build()
                    .map_err(|e| SpectraError::connector(MoexConnector::NAME, e.to_string()))?
            }
        };
        Ok(MoexConnector::from_adapter(RealAdapter::new(
            http,
            self.base_url,
        )))
    }
}

impl MoexConnector {
    /// Returns an unconfigured builder pointing at the public ISS endpoint.
    #[must_use]
    pub fn builder() -> MoexConnectorBuilder {
        MoexConnectorBuilder::default()
    }
}
