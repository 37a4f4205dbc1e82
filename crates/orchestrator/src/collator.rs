use configuration::HeaderSource;
use subxt::{ext::codec::Encode, OnlineClient, PolkadotConfig};
use tracing::{debug, info};

use crate::errors::{Chain, OrchestratorError};

/// What the relay needs to register a parachain: its head and its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollatorState {
    genesis_head: Vec<u8>,
    validation_code: Vec<u8>,
}

impl CollatorState {
    pub fn new(genesis_head: Vec<u8>, validation_code: Vec<u8>) -> Self {
        Self {
            genesis_head,
            validation_code,
        }
    }

    /// SCALE encoded header.
    pub fn genesis_head(&self) -> &[u8] {
        &self.genesis_head
    }

    pub fn validation_code(&self) -> &[u8] {
        &self.validation_code
    }

    pub fn genesis_head_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.genesis_head))
    }

    pub fn validation_code_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.validation_code))
    }
}

/// Read the head and the validation code of the collator chain.
pub async fn fetch_collator_state(
    client: &OnlineClient<PolkadotConfig>,
    header_source: HeaderSource,
) -> Result<CollatorState, OrchestratorError> {
    let genesis_head = fetch_header(client, header_source).await?;
    let validation_code = fetch_validation_code(client).await?;

    info!(
        "collator state fetched, head: {} bytes, validation code: {} bytes",
        genesis_head.len(),
        validation_code.len()
    );
    let state = CollatorState::new(genesis_head, validation_code);
    debug!("collator head: {}", state.genesis_head_hex());

    Ok(state)
}

/// Fetch the SCALE encoded header of the collator chain.
pub async fn fetch_header(
    client: &OnlineClient<PolkadotConfig>,
    header_source: HeaderSource,
) -> Result<Vec<u8>, OrchestratorError> {
    match header_source {
        HeaderSource::Latest => {
            let block = client
                .blocks()
                .at_latest()
                .await
                .map_err(OrchestratorError::client(Chain::Collator))?;
            debug!("using collator header #{}", block.number());
            Ok(block.header().encode())
        },
        HeaderSource::Genesis => {
            let genesis_hash = client.genesis_hash();
            debug!("using collator genesis header {genesis_hash:?}");
            let header = client
                .backend()
                .block_header(genesis_hash)
                .await
                .map_err(OrchestratorError::client(Chain::Collator))?
                .ok_or(OrchestratorError::MissingHeader {
                    chain: Chain::Collator,
                })?;
            Ok(header.encode())
        },
    }
}

/// Fetch the runtime code stored under `:code`.
pub async fn fetch_validation_code(
    client: &OnlineClient<PolkadotConfig>,
) -> Result<Vec<u8>, OrchestratorError> {
    let code_key = sp_core::storage::well_known_keys::CODE;
    client
        .storage()
        .at_latest()
        .await
        .map_err(OrchestratorError::client(Chain::Collator))?
        .fetch_raw(code_key)
        .await
        .map_err(OrchestratorError::client(Chain::Collator))?
        .ok_or_else(|| OrchestratorError::MissingStorage {
            chain: Chain::Collator,
            key: format!("0x{}", hex::encode(code_key)),
        })
}
