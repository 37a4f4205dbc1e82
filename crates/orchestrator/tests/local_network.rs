//! Needs a relay chain on :9900, a coretime chain on :9910 and a collator on
//! :9920, all with `//Alice` as sudo. Run with `cargo test -- --ignored`.

use configuration::{BatchMode, BootstrapConfigBuilder};
use coretime_bootstrap_orchestrator::{
    collator::fetch_collator_state, errors::Chain, run_setup, tx_helper::client::connect,
    OrchestratorError,
};

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
#[ignore = "requires a running local network"]
async fn collator_state_is_readable() {
    init_logs();
    let config = BootstrapConfigBuilder::new().build().unwrap();
    let collator = connect(Chain::Collator, config.endpoints().collator(), Some(60))
        .await
        .unwrap();

    let state = fetch_collator_state(&collator, config.relay().registration().header_source())
        .await
        .unwrap();

    assert!(!state.genesis_head().is_empty());
    assert!(!state.validation_code().is_empty());
}

#[tokio::test]
#[ignore = "requires a running local network"]
async fn setup_finalizes_both_batches_then_fails_on_rerun() {
    init_logs();
    let config = BootstrapConfigBuilder::new()
        .with_ready_timeout(60)
        .with_finalization_timeout(300)
        .with_batch_mode(BatchMode::BatchAll)
        .build()
        .unwrap();

    let report = run_setup(&config).await.unwrap();
    assert_ne!(report.relay.block_hash, report.coretime.block_hash);

    // the parachain is already registered
    let err = run_setup(&config).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Submission { .. }));
}
