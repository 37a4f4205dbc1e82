//! Bootstrap a local relay + coretime + collator network.
//!
//! The setup reads the collator's head and code, registers it on the relay
//! chain and assigns it a core, then configures the broker pallet of the
//! coretime chain and starts the sales. Both steps are sent as a single
//! sudo batch and are followed until finalized.

pub mod collator;
pub mod errors;
pub mod renewal;
pub mod setup;
pub mod signer;
pub mod tx_helper;

pub use collator::CollatorState;
pub use errors::{Chain, OrchestratorError};
pub use renewal::watch_renewals;
pub use setup::{run_setup, SetupReport};
pub use tx_helper::submit::SubmissionOutcome;
