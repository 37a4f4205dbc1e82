use std::{fmt::Display, future::Future, time::Duration};

use configuration::BatchMode;
use subxt::{
    tx::{DynamicPayload, Payload, TxStatus},
    utils::H256,
    OnlineClient, PolkadotConfig,
};
use subxt_signer::sr25519::Keypair;
use tracing::{debug, info, warn};

use super::{calls::sudo_batch, events::dispatch_failure};
use crate::errors::{Chain, OrchestratorError};

/// Status reported by a node for a watched extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Validated,
    Broadcasted,
    NoLongerInBestBlock,
    InBestBlock(H256),
    InFinalizedBlock(H256),
    Failed(String),
}

impl Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusKind::Validated => write!(f, "Validated"),
            StatusKind::Broadcasted => write!(f, "Broadcasted"),
            StatusKind::NoLongerInBestBlock => write!(f, "NoLongerInBestBlock"),
            StatusKind::InBestBlock(hash) => write!(f, "InBestBlock({hash:?})"),
            StatusKind::InFinalizedBlock(hash) => write!(f, "InFinalizedBlock({hash:?})"),
            StatusKind::Failed(message) => write!(f, "Failed({message})"),
        }
    }
}

impl<C: subxt::client::OnlineClientT<PolkadotConfig>> From<&TxStatus<PolkadotConfig, C>>
    for StatusKind
{
    fn from(status: &TxStatus<PolkadotConfig, C>) -> Self {
        match status {
            TxStatus::Validated { .. } => StatusKind::Validated,
            TxStatus::Broadcasted { .. } => StatusKind::Broadcasted,
            TxStatus::NoLongerInBestBlock { .. } => StatusKind::NoLongerInBestBlock,
            TxStatus::InBestBlock(in_block) => StatusKind::InBestBlock(in_block.block_hash()),
            TxStatus::InFinalizedBlock(in_block) => {
                StatusKind::InFinalizedBlock(in_block.block_hash())
            },
            TxStatus::Error { message } => StatusKind::Failed(format!("error: {message}")),
            TxStatus::Invalid { message } => StatusKind::Failed(format!("invalid: {message}")),
            TxStatus::Dropped { message } => StatusKind::Failed(format!("dropped: {message}")),
        }
    }
}

/// Progress of a single submission.
///
/// `Finalized` and `Failed` are terminal, any further status is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Pending,
    InBlock(H256),
    Finalized(H256),
    Failed(String),
}

impl SubmissionState {
    pub fn advance(self, status: &StatusKind) -> Self {
        if self.is_terminal() {
            return self;
        }

        match status {
            StatusKind::Validated | StatusKind::Broadcasted => self,
            // retracted, wait for the next block
            StatusKind::NoLongerInBestBlock => SubmissionState::Pending,
            StatusKind::InBestBlock(hash) => SubmissionState::InBlock(*hash),
            StatusKind::InFinalizedBlock(hash) => SubmissionState::Finalized(*hash),
            StatusKind::Failed(reason) => SubmissionState::Failed(reason.clone()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Finalized(_) | SubmissionState::Failed(_)
        )
    }
}

/// A finalized and successfully dispatched submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub label: String,
    pub block_hash: H256,
    pub extrinsic_hash: H256,
}

#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Used in logs and errors, e.g. `relay setup`.
    pub label: String,
    pub chain: Chain,
    pub finalization_timeout: Option<u64>,
}

/// Submit `calls` as a single `Sudo.sudo(Utility.batch_all(calls))` extrinsic
/// (or `batch`, per `batch_mode`) and wait until it is finalized.
pub async fn submit_sudo_batch(
    api: &OnlineClient<PolkadotConfig>,
    signer: &Keypair,
    calls: Vec<DynamicPayload>,
    batch_mode: BatchMode,
    options: &SubmitOptions,
) -> Result<SubmissionOutcome, OrchestratorError> {
    debug!(
        "[{}] wrapping {} calls in sudo {}",
        options.label,
        calls.len(),
        batch_mode.call_name()
    );
    let sudo_call = sudo_batch(calls, batch_mode);

    submit_and_watch(api, signer, &sudo_call, options).await
}

/// Sign and submit `call`, then follow it until it reaches a terminal state.
pub async fn submit_and_watch<Call: Payload>(
    api: &OnlineClient<PolkadotConfig>,
    signer: &Keypair,
    call: &Call,
    options: &SubmitOptions,
) -> Result<SubmissionOutcome, OrchestratorError> {
    let label = options.label.as_str();
    let tx = api
        .tx()
        .sign_and_submit_then_watch_default(call, signer)
        .await
        .map_err(OrchestratorError::client(options.chain))?;

    info!("[{label}] submitted extrinsic {:?}", tx.extrinsic_hash());

    with_timeout(label, options.finalization_timeout, follow(tx, label)).await
}

async fn with_timeout<F>(
    label: &str,
    timeout_secs: Option<u64>,
    fut: F,
) -> Result<SubmissionOutcome, OrchestratorError>
where
    F: Future<Output = Result<SubmissionOutcome, OrchestratorError>>,
{
    match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
            .await
            .map_err(|_| OrchestratorError::Timeout {
                label: label.to_string(),
                secs,
            })?,
        None => fut.await,
    }
}

async fn follow(
    mut tx: subxt::tx::TxProgress<PolkadotConfig, OnlineClient<PolkadotConfig>>,
    label: &str,
) -> Result<SubmissionOutcome, OrchestratorError> {
    let extrinsic_hash = tx.extrinsic_hash();
    let mut state = SubmissionState::Pending;

    while let Some(status) = tx.next().await {
        let status = status.map_err(|e| OrchestratorError::submission(label, e.to_string()))?;
        let kind = StatusKind::from(&status);
        info!("[{label}] Current status is {kind}");

        state = state.advance(&kind);
        match (&state, status) {
            (SubmissionState::InBlock(hash), _) => {
                info!("[{label}] Transaction included at blockHash {hash:?}");
            },
            (SubmissionState::Finalized(hash), TxStatus::InFinalizedBlock(in_block)) => {
                info!("[{label}] Transaction finalized at blockHash {hash:?}");
                let events = in_block
                    .wait_for_success()
                    .await
                    .map_err(|e| OrchestratorError::submission(label, e.to_string()))?;

                for event in events.iter() {
                    let event =
                        event.map_err(|e| OrchestratorError::submission(label, e.to_string()))?;
                    let fields = event
                        .field_values()
                        .map_err(|e| OrchestratorError::submission(label, e.to_string()))?;
                    if let Some(reason) =
                        dispatch_failure(event.pallet_name(), event.variant_name(), &fields)
                    {
                        warn!("[{label}] {reason}");
                        return Err(OrchestratorError::submission(label, reason));
                    }
                }

                return Ok(SubmissionOutcome {
                    label: label.to_string(),
                    block_hash: *hash,
                    extrinsic_hash,
                });
            },
            (SubmissionState::Failed(reason), _) => {
                warn!("[{label}] Transaction error");
                return Err(OrchestratorError::submission(label, reason.clone()));
            },
            _ => continue,
        }
    }

    Err(OrchestratorError::submission(
        label,
        "status stream ended before finalization",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> H256 {
        H256::repeat_byte(byte)
    }

    fn run(statuses: &[StatusKind]) -> SubmissionState {
        statuses
            .iter()
            .fold(SubmissionState::Pending, |state, status| state.advance(status))
    }

    #[test]
    fn submission_should_be_pending_until_included() {
        let state = run(&[StatusKind::Validated, StatusKind::Broadcasted]);
        assert_eq!(state, SubmissionState::Pending);
        assert!(!state.is_terminal());
    }

    #[test]
    fn submission_should_finalize_after_inclusion() {
        let state = run(&[
            StatusKind::Validated,
            StatusKind::Broadcasted,
            StatusKind::InBestBlock(hash(1)),
        ]);
        assert_eq!(state, SubmissionState::InBlock(hash(1)));
        assert!(!state.is_terminal());

        let state = state.advance(&StatusKind::InFinalizedBlock(hash(1)));
        assert_eq!(state, SubmissionState::Finalized(hash(1)));
        assert!(state.is_terminal());
    }

    #[test]
    fn submission_should_go_back_to_pending_when_retracted() {
        let state = run(&[
            StatusKind::InBestBlock(hash(1)),
            StatusKind::NoLongerInBestBlock,
        ]);
        assert_eq!(state, SubmissionState::Pending);

        let state = state.advance(&StatusKind::InBestBlock(hash(2)));
        assert_eq!(state, SubmissionState::InBlock(hash(2)));
    }

    #[test]
    fn submission_should_fail_on_error_status() {
        let state = run(&[
            StatusKind::Validated,
            StatusKind::Failed("dropped: too low priority".into()),
        ]);
        assert_eq!(
            state,
            SubmissionState::Failed("dropped: too low priority".into())
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn terminal_states_should_absorb_later_statuses() {
        let finalized = SubmissionState::Finalized(hash(3));
        assert_eq!(
            finalized
                .clone()
                .advance(&StatusKind::Failed("invalid: stale".into())),
            finalized
        );

        let failed = SubmissionState::Failed("error: boom".into());
        assert_eq!(
            failed.clone().advance(&StatusKind::InFinalizedBlock(hash(4))),
            failed
        );
    }

    #[test]
    fn status_kind_should_render_for_logs() {
        assert_eq!(StatusKind::Broadcasted.to_string(), "Broadcasted");
        assert_eq!(
            StatusKind::Failed("invalid: bad proof".into()).to_string(),
            "Failed(invalid: bad proof)"
        );
    }

    #[tokio::test]
    async fn with_timeout_should_fail_when_never_finalized() {
        let err = with_timeout("relay setup", Some(1), futures::future::pending())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Timeout { ref label, secs: 1 } if label == "relay setup"
        ));
    }

    #[tokio::test]
    async fn with_timeout_should_wait_without_limit_when_unset() {
        let outcome = SubmissionOutcome {
            label: "coretime setup".into(),
            block_hash: hash(5),
            extrinsic_hash: hash(6),
        };

        let res = with_timeout("coretime setup", None, async { Ok(outcome.clone()) }).await;
        assert_eq!(res.unwrap(), outcome);
    }
}
