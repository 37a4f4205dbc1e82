use configuration::Endpoint;
use subxt::{OnlineClient, PolkadotConfig};
use support::net::wait_ws_ready_with_timeout;
use tracing::debug;

use crate::errors::{Chain, OrchestratorError};

#[async_trait::async_trait]
pub trait ClientFromUrl: Sized {
    async fn from_secure_url(url: &str) -> Result<Self, subxt::Error>;
    async fn from_insecure_url(url: &str) -> Result<Self, subxt::Error>;
}

#[async_trait::async_trait]
impl<Config: subxt::Config + Send + Sync> ClientFromUrl for OnlineClient<Config> {
    async fn from_secure_url(url: &str) -> Result<Self, subxt::Error> {
        Self::from_url(url).await
    }

    async fn from_insecure_url(url: &str) -> Result<Self, subxt::Error> {
        Self::from_insecure_url(url).await
    }
}

/// Build a client, plain `ws://` urls (e.g. a local network) are allowed.
pub async fn get_client_from_url<T: ClientFromUrl + Send>(url: &str) -> Result<T, subxt::Error> {
    if subxt::utils::url_is_secure(url)? {
        T::from_secure_url(url).await
    } else {
        T::from_insecure_url(url).await
    }
}

/// Connect to one of the nodes, optionally waiting for its rpc server first.
pub async fn connect(
    chain: Chain,
    endpoint: &Endpoint,
    ready_timeout: Option<u64>,
) -> Result<OnlineClient<PolkadotConfig>, OrchestratorError> {
    let url = endpoint.as_str();

    if let Some(secs) = ready_timeout {
        debug!("waiting up to {secs} secs for {chain} node at {url}");
        wait_ws_ready_with_timeout(url, secs)
            .await
            .map_err(|source| OrchestratorError::NotReady {
                chain,
                url: url.to_string(),
                source,
            })?;
    }

    debug!("connecting to {chain} node at {url}");
    get_client_from_url(url)
        .await
        .map_err(|source| OrchestratorError::Connection {
            chain,
            url: url.to_string(),
            source,
        })
}
