use std::str::FromStr;

use subxt::utils::AccountId32;
use subxt_signer::{sr25519::Keypair, SecretUri};
use tracing::debug;

use crate::errors::OrchestratorError;

/// Derive the sr25519 keypair behind a secret uri, e.g. `//Alice`.
pub fn keypair_from_uri(uri: &str) -> Result<Keypair, OrchestratorError> {
    let secret = SecretUri::from_str(uri)
        .map_err(|e| OrchestratorError::Signer(uri.to_string(), e.to_string()))?;
    let keypair = Keypair::from_uri(&secret)
        .map_err(|e| OrchestratorError::Signer(uri.to_string(), e.to_string()))?;

    debug!("using signer {}", account_of(&keypair));
    Ok(keypair)
}

pub fn account_of(keypair: &Keypair) -> AccountId32 {
    keypair.public_key().into()
}

/// Parse an SS58 address.
pub fn parse_account(address: &str) -> Result<AccountId32, OrchestratorError> {
    AccountId32::from_str(address).map_err(|e| {
        OrchestratorError::InvalidConfig(format!("'{address}' is not a valid address: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use subxt_signer::sr25519::dev;

    use super::*;

    #[test]
    fn keypair_from_uri_should_derive_dev_accounts() {
        let alice = keypair_from_uri("//Alice").unwrap();
        assert_eq!(account_of(&alice), account_of(&dev::alice()));

        let bob = keypair_from_uri("//Bob").unwrap();
        assert_ne!(account_of(&alice), account_of(&bob));
    }

    #[test]
    fn keypair_from_uri_should_fail_with_invalid_phrase() {
        let err = keypair_from_uri("this is not a mnemonic").unwrap_err();
        assert!(matches!(err, OrchestratorError::Signer(uri, _) if uri == "this is not a mnemonic"));
    }

    #[test]
    fn parse_account_should_accept_ss58() {
        let bob = parse_account("5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty").unwrap();
        assert_eq!(bob, account_of(&dev::bob()));

        assert!(parse_account("not-an-address").is_err());
    }
}
