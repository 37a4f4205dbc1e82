//! Configuration of a coretime bootstrap run: the three node endpoints, the
//! privileged signer and the values of the relay and coretime setup batches.
//!
//! Everything can be loaded from a toml file with
//! [`BootstrapConfig::load_from_toml`] and overridden with a
//! [`BootstrapConfigBuilder`].
mod bootstrap;
mod coretime;
mod endpoints;
mod relay;
mod renewal;
pub mod shared;
mod utils;

pub use bootstrap::{BootstrapConfig, BootstrapConfigBuilder, SignerConfig, SubmissionConfig};
pub use coretime::{BrokerConfig, CoretimeSetupConfig, Lease, SalesConfig, LEASES_COUNT};
pub use endpoints::EndpointsConfig;
pub use relay::{CoreAssignmentConfig, RegistrationConfig, RelaySetupConfig};
pub use renewal::RenewalConfig;
pub use shared::types::{BatchMode, Endpoint, HeaderSource};
