use configuration::BootstrapConfig;
use subxt::{
    dynamic::Value,
    ext::scale_value::{At, Composite},
    utils::AccountId32,
    OnlineClient, PolkadotConfig,
};
use subxt_signer::sr25519::Keypair;
use tracing::{debug, info, warn};

use crate::{
    errors::{Chain, OrchestratorError},
    signer::{account_of, keypair_from_uri, parse_account},
    tx_helper::{
        calls::renew,
        client::connect,
        events::field,
        submit::{submit_and_watch, SubmitOptions},
    },
};

/// A `Broker.Renewable` offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalOffer {
    pub core: u16,
    pub price: u128,
}

/// Extract the offer from the fields of a `Broker.Renewable` event.
pub fn renewal_offer<T>(fields: &Composite<T>) -> Option<RenewalOffer> {
    let core = field(fields, "core", 0)?.as_u128()?;
    let price = field(fields, "price", 1)?.as_u128()?;

    Some(RenewalOffer {
        core: u16::try_from(core).ok()?,
        price,
    })
}

/// Read `data.free` out of a decoded `System.Account` entry.
pub fn free_balance<T>(account_info: &Value<T>) -> Option<u128> {
    account_info.at("data").at("free")?.as_u128()
}

/// Renew only our core, and only if the beneficiary stays above the existential deposit.
pub fn should_renew(
    core_to_renew: u16,
    offer: &RenewalOffer,
    free_balance: u128,
    existential_deposit: u128,
) -> bool {
    offer.core == core_to_renew && free_balance >= offer.price.saturating_add(existential_deposit)
}

fn existential_deposit(api: &OnlineClient<PolkadotConfig>) -> Result<u128, OrchestratorError> {
    let address = subxt::dynamic::constant("Balances", "ExistentialDeposit");
    let value = api
        .constants()
        .at(&address)
        .map_err(OrchestratorError::client(Chain::Coretime))?
        .to_value()
        .map_err(OrchestratorError::decode(Chain::Coretime))?;

    value.as_u128().ok_or_else(|| {
        OrchestratorError::InvalidConfig("Balances.ExistentialDeposit is not a number".into())
    })
}

async fn account_free_balance(
    api: &OnlineClient<PolkadotConfig>,
    account: &AccountId32,
) -> Result<u128, OrchestratorError> {
    let address = subxt::dynamic::storage(
        "System",
        "Account",
        vec![Value::from_bytes(account.0)],
    );
    let account_info = api
        .storage()
        .at_latest()
        .await
        .map_err(OrchestratorError::client(Chain::Coretime))?
        .fetch(&address)
        .await
        .map_err(OrchestratorError::client(Chain::Coretime))?;

    // unknown accounts have no entry
    let Some(account_info) = account_info else {
        return Ok(0);
    };
    let account_info = account_info
        .to_value()
        .map_err(OrchestratorError::decode(Chain::Coretime))?;

    Ok(free_balance(&account_info).unwrap_or_default())
}

/// Follow the finalized blocks of the coretime chain and renew the configured
/// core each time the broker offers it. Runs until the subscription ends.
pub async fn watch_renewals(config: &BootstrapConfig) -> Result<(), OrchestratorError> {
    let endpoints = config.endpoints();
    let core_to_renew = config.renewal().core();
    let signer: Keypair = keypair_from_uri(config.signer().uri())?;
    let beneficiary = match config.renewal().beneficiary() {
        Some(address) => parse_account(address)?,
        None => account_of(&signer),
    };

    let api = connect(
        Chain::Coretime,
        endpoints.coretime(),
        endpoints.ready_timeout(),
    )
    .await?;
    let existential_deposit = existential_deposit(&api)?;
    debug!("existential deposit: {existential_deposit}");

    info!("watching renewals of core #{core_to_renew} for {beneficiary}");
    let mut blocks = api
        .blocks()
        .subscribe_finalized()
        .await
        .map_err(OrchestratorError::client(Chain::Coretime))?;

    while let Some(block) = blocks.next().await {
        let block = block.map_err(OrchestratorError::client(Chain::Coretime))?;
        let block_number = block.header().number;
        let events = block
            .events()
            .await
            .map_err(OrchestratorError::client(Chain::Coretime))?;

        for event in events.iter() {
            let event = event.map_err(OrchestratorError::client(Chain::Coretime))?;
            if event.pallet_name() != "Broker" || event.variant_name() != "Renewable" {
                continue;
            }

            let fields = event
                .field_values()
                .map_err(OrchestratorError::client(Chain::Coretime))?;
            let Some(offer) = renewal_offer(&fields) else {
                warn!("Block #{block_number}: can't decode Broker.Renewable, skipping");
                continue;
            };
            if offer.core != core_to_renew {
                continue;
            }

            let free = account_free_balance(&api, &beneficiary).await?;
            if !should_renew(core_to_renew, &offer, free, existential_deposit) {
                warn!(
                    "Block #{block_number}: core #{} costs {}, {beneficiary} only has {free}",
                    offer.core, offer.price
                );
                continue;
            }

            submit_and_watch(
                &api,
                &signer,
                &renew(offer.core),
                &SubmitOptions {
                    label: format!("renew core #{}", offer.core),
                    chain: Chain::Coretime,
                    finalization_timeout: config.submission().finalization_timeout(),
                },
            )
            .await?;

            info!("Block #{block_number}");
            info!("Core #{} renewed by {beneficiary}", offer.core);
        }
    }

    Ok(())
}
