use std::future::Future;

use configuration::BootstrapConfig;
use tracing::info;

use crate::{
    collator::{fetch_collator_state, CollatorState},
    errors::{Chain, OrchestratorError},
    signer::{account_of, keypair_from_uri},
    tx_helper::{
        calls::{coretime_setup_calls, relay_setup_calls},
        client::connect,
        submit::{submit_sudo_batch, SubmissionOutcome, SubmitOptions},
    },
};

pub const RELAY_SETUP_LABEL: &str = "relay setup";
pub const CORETIME_SETUP_LABEL: &str = "coretime setup";

/// Outcomes of both setup batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub relay: SubmissionOutcome,
    pub coretime: SubmissionOutcome,
}

/// Bootstrap the network: register the collator's parachain on the relay
/// chain, then configure the broker and start the sales on the coretime chain.
///
/// Each step only starts once the previous one reached a terminal state, a
/// failure aborts the run.
pub async fn run_setup(config: &BootstrapConfig) -> Result<SetupReport, OrchestratorError> {
    let endpoints = config.endpoints();
    let header_source = config.relay().registration().header_source();

    let collator_state = async {
        let collator = connect(
            Chain::Collator,
            endpoints.collator(),
            endpoints.ready_timeout(),
        )
        .await?;
        fetch_collator_state(&collator, header_source).await
    };

    run_setup_with(config, collator_state).await
}

async fn run_setup_with(
    config: &BootstrapConfig,
    collator_state: impl Future<Output = Result<CollatorState, OrchestratorError>>,
) -> Result<SetupReport, OrchestratorError> {
    let endpoints = config.endpoints();
    let submission = config.submission();

    // 1. collator head and code, nothing is submitted without them
    let collator_state = collator_state.await?;

    // 2. signer
    let sudo = keypair_from_uri(config.signer().uri())?;
    let sudo_account = account_of(&sudo);

    // 3. relay chain
    info!("submitting {RELAY_SETUP_LABEL} to {}", endpoints.relay());
    let relay = connect(Chain::Relay, endpoints.relay(), endpoints.ready_timeout()).await?;
    let relay_outcome = submit_sudo_batch(
        &relay,
        &sudo,
        relay_setup_calls(config.relay(), &sudo_account, &collator_state),
        submission.batch_mode(),
        &SubmitOptions {
            label: RELAY_SETUP_LABEL.to_string(),
            chain: Chain::Relay,
            finalization_timeout: submission.finalization_timeout(),
        },
    )
    .await?;
    drop(relay);

    // 4. coretime chain
    info!("submitting {CORETIME_SETUP_LABEL} to {}", endpoints.coretime());
    let coretime = connect(
        Chain::Coretime,
        endpoints.coretime(),
        endpoints.ready_timeout(),
    )
    .await?;
    let coretime_outcome = submit_sudo_batch(
        &coretime,
        &sudo,
        coretime_setup_calls(config.coretime()),
        submission.batch_mode(),
        &SubmitOptions {
            label: CORETIME_SETUP_LABEL.to_string(),
            chain: Chain::Coretime,
            finalization_timeout: submission.finalization_timeout(),
        },
    )
    .await?;

    Ok(SetupReport {
        relay: relay_outcome,
        coretime: coretime_outcome,
    })
}

#[cfg(test)]
mod tests {
    use configuration::BootstrapConfigBuilder;

    use super::*;

    // nothing listens on port 1, reaching the relay would fail with a relay error
    fn unreachable_network() -> BootstrapConfig {
        BootstrapConfigBuilder::new()
            .with_collator_url("ws://127.0.0.1:1")
            .with_relay_url("ws://127.0.0.1:1")
            .with_coretime_url("ws://127.0.0.1:1")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn run_setup_should_abort_before_the_relay_when_the_collator_is_down() {
        let err = run_setup(&unreachable_network()).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Connection {
                chain: Chain::Collator,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn run_setup_should_report_a_collator_that_never_gets_ready() {
        let config = BootstrapConfigBuilder::new()
            .with_collator_url("ws://127.0.0.1:1")
            .with_ready_timeout(1)
            .build()
            .unwrap();

        let err = run_setup(&config).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::NotReady {
                chain: Chain::Collator,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn run_setup_should_abort_before_the_relay_without_validation_code() {
        let missing_code = async {
            Err::<CollatorState, _>(OrchestratorError::MissingStorage {
                chain: Chain::Collator,
                key: "0x3a636f6465".to_string(),
            })
        };

        let err = run_setup_with(&unreachable_network(), missing_code)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::MissingStorage {
                chain: Chain::Collator,
                ref key,
            } if key == "0x3a636f6465"
        ));
    }

    #[tokio::test]
    async fn run_setup_should_abort_before_the_relay_without_header() {
        let missing_header = async {
            Err::<CollatorState, _>(OrchestratorError::MissingHeader {
                chain: Chain::Collator,
            })
        };

        let err = run_setup_with(&unreachable_network(), missing_header)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::MissingHeader {
                chain: Chain::Collator
            }
        ));
    }

    #[tokio::test]
    async fn run_setup_should_reach_the_relay_once_the_collator_state_is_known() {
        let collator_state = async {
            Ok::<_, OrchestratorError>(CollatorState::new(vec![1, 2, 3], vec![0, 97, 115, 109]))
        };

        let err = run_setup_with(&unreachable_network(), collator_state)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Connection {
                chain: Chain::Relay,
                ..
            }
        ));
    }
}
