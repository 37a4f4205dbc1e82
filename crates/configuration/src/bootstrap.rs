use std::{fs, path::Path};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use support::constants::CORETIME_FINALIZATION_TIMEOUT_SECONDS;
use tracing::debug;

use crate::{
    coretime::CoretimeSetupConfig,
    endpoints::EndpointsConfig,
    relay::{RegistrationConfig, RelaySetupConfig},
    renewal::RenewalConfig,
    shared::{
        errors::{ConfigError, FieldError},
        helpers::{
            ensure_not_zero, ensure_value_is_not_empty, join_errors, merge_errors,
            merge_errors_vecs,
        },
        types::{BatchMode, CoreIndex, Endpoint, HeaderSource},
    },
    utils::default_sudo_uri,
};

/// Identity used to sign the privileged calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Secret uri (e.g. `//Alice`) the sr25519 keypair is derived from.
    #[serde(default = "default_sudo_uri")]
    uri: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            uri: default_sudo_uri(),
        }
    }
}

impl SignerConfig {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// How the setup batches are wrapped and followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    batch_mode: BatchMode,

    /// Seconds to wait for a batch to be finalized, waits forever when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    finalization_timeout: Option<u64>,
}

impl SubmissionConfig {
    pub fn batch_mode(&self) -> BatchMode {
        self.batch_mode
    }

    pub fn finalization_timeout(&self) -> Option<u64> {
        self.finalization_timeout
    }
}

/// Full configuration of a bootstrap run.
///
/// Every section is optional in the toml file, missing values fall back to
/// the defaults of a local relay/coretime/collator network.
///
/// # Example:
///
/// ```
/// use coretime_bootstrap_configuration::BootstrapConfig;
///
/// let config = BootstrapConfig::load_from_toml_str(
///     r#"
///     [endpoints]
///     relay = "ws://127.0.0.1:9944"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.endpoints().relay().as_str(), "ws://127.0.0.1:9944/");
/// assert_eq!(config.relay().registration().para_id(), 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    endpoints: EndpointsConfig,
    signer: SignerConfig,
    submission: SubmissionConfig,
    relay: RelaySetupConfig,
    coretime: CoretimeSetupConfig,
    renewal: RenewalConfig,
}

impl BootstrapConfig {
    pub fn endpoints(&self) -> &EndpointsConfig {
        &self.endpoints
    }

    pub fn signer(&self) -> &SignerConfig {
        &self.signer
    }

    pub fn submission(&self) -> &SubmissionConfig {
        &self.submission
    }

    pub fn relay(&self) -> &RelaySetupConfig {
        &self.relay
    }

    pub fn coretime(&self) -> &CoretimeSetupConfig {
        &self.coretime
    }

    pub fn renewal(&self) -> &RenewalConfig {
        &self.renewal
    }

    /// Load and validate a configuration from a toml file.
    pub fn load_from_toml(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        debug!("loading bootstrap config from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("can't read config file {}: {e}", path.display()))?;

        Self::load_from_toml_str(&content)
    }

    /// Load and validate a configuration from toml content.
    pub fn load_from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: BootstrapConfig = toml::from_str(content)?;

        config.with_env_overrides()
    }

    /// The local network defaults, with the environment overrides applied.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Result<Self, anyhow::Error> {
        let timeout = std::env::var(CORETIME_FINALIZATION_TIMEOUT_SECONDS).ok();
        let config = self.with_finalization_timeout_override(timeout.as_deref())?;

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(anyhow!(join_errors(&errors)));
        }

        Ok(config)
    }

    fn with_finalization_timeout_override(
        mut self,
        timeout: Option<&str>,
    ) -> Result<Self, anyhow::Error> {
        if let Some(timeout) = timeout {
            let timeout = timeout.parse::<u64>().map_err(|e| {
                anyhow!("{CORETIME_FINALIZATION_TIMEOUT_SECONDS} should be a number: {e}")
            })?;
            self.submission.finalization_timeout = Some(timeout);
        }

        Ok(self)
    }

    /// Render the configuration as toml.
    pub fn dump_to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn validate(&self) -> Vec<anyhow::Error> {
        let mut errors = vec![];

        if let Err(e) = ensure_value_is_not_empty(&self.signer.uri) {
            errors = merge_errors(errors, ConfigError::Signer(FieldError::InvalidUri(e)).into());
        }

        if let Some(timeout) = self.submission.finalization_timeout {
            if let Err(e) = ensure_not_zero(timeout) {
                errors = merge_errors(
                    errors,
                    ConfigError::Submission(FieldError::InvalidFinalizationTimeout(e)).into(),
                );
            }
        }

        if let Some(timeout) = self.endpoints.ready_timeout() {
            if let Err(e) = ensure_not_zero(timeout) {
                errors = merge_errors(
                    errors,
                    ConfigError::Endpoints(FieldError::InvalidReadyTimeout(e)).into(),
                );
            }
        }

        errors = merge_errors_vecs(errors, self.relay.validate());
        errors = merge_errors_vecs(errors, self.coretime.validate());
        merge_errors_vecs(errors, self.renewal.validate())
    }
}

/// A [`BootstrapConfig`] builder, used to override values declaratively with fields validation.
///
/// # Example:
///
/// ```
/// use coretime_bootstrap_configuration::{BatchMode, BootstrapConfigBuilder};
///
/// let config = BootstrapConfigBuilder::new()
///     .with_relay_url("ws://10.0.0.1:9944")
///     .with_batch_mode(BatchMode::Batch)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.submission().batch_mode(), BatchMode::Batch);
/// ```
#[derive(Debug)]
pub struct BootstrapConfigBuilder {
    config: BootstrapConfig,
    errors: Vec<anyhow::Error>,
}

impl Default for BootstrapConfigBuilder {
    fn default() -> Self {
        Self::from_config(BootstrapConfig::default())
    }
}

impl BootstrapConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded configuration, e.g. to apply cli overrides.
    pub fn from_config(config: BootstrapConfig) -> Self {
        Self {
            config,
            errors: vec![],
        }
    }

    fn transition(config: BootstrapConfig, errors: Vec<anyhow::Error>) -> Self {
        Self { config, errors }
    }

    fn with_endpoint<F>(
        self,
        url: &str,
        apply: F,
        wrap: fn(anyhow::Error) -> FieldError<anyhow::Error>,
    ) -> Self
    where
        F: FnOnce(EndpointsConfig, Endpoint) -> EndpointsConfig,
    {
        match Endpoint::try_from(url) {
            Ok(endpoint) => Self::transition(
                BootstrapConfig {
                    endpoints: apply(self.config.endpoints, endpoint),
                    ..self.config
                },
                self.errors,
            ),
            Err(error) => Self::transition(
                self.config,
                merge_errors(self.errors, ConfigError::Endpoints(wrap(error.into())).into()),
            ),
        }
    }

    pub fn with_relay_url(self, url: &str) -> Self {
        self.with_endpoint(url, EndpointsConfig::with_relay, FieldError::InvalidRelayEndpoint)
    }

    pub fn with_coretime_url(self, url: &str) -> Self {
        self.with_endpoint(
            url,
            EndpointsConfig::with_coretime,
            FieldError::InvalidCoretimeEndpoint,
        )
    }

    pub fn with_collator_url(self, url: &str) -> Self {
        self.with_endpoint(
            url,
            EndpointsConfig::with_collator,
            FieldError::InvalidCollatorEndpoint,
        )
    }

    pub fn with_ready_timeout(self, ready_timeout: u64) -> Self {
        Self::transition(
            BootstrapConfig {
                endpoints: self.config.endpoints.with_ready_timeout(ready_timeout),
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_signer_uri(self, uri: impl Into<String>) -> Self {
        Self::transition(
            BootstrapConfig {
                signer: SignerConfig { uri: uri.into() },
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_batch_mode(self, batch_mode: BatchMode) -> Self {
        Self::transition(
            BootstrapConfig {
                submission: SubmissionConfig {
                    batch_mode,
                    ..self.config.submission
                },
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_finalization_timeout(self, finalization_timeout: u64) -> Self {
        Self::transition(
            BootstrapConfig {
                submission: SubmissionConfig {
                    finalization_timeout: Some(finalization_timeout),
                    ..self.config.submission
                },
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_header_source(self, header_source: HeaderSource) -> Self {
        let registration: RegistrationConfig = self
            .config
            .relay
            .registration()
            .clone()
            .with_header_source(header_source);

        Self::transition(
            BootstrapConfig {
                relay: self.config.relay.with_registration(registration),
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_relay(self, relay: RelaySetupConfig) -> Self {
        Self::transition(
            BootstrapConfig {
                relay,
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_coretime(self, coretime: CoretimeSetupConfig) -> Self {
        Self::transition(
            BootstrapConfig {
                coretime,
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_renewal_core(self, core: CoreIndex) -> Self {
        Self::transition(
            BootstrapConfig {
                renewal: self.config.renewal.with_core(core),
                ..self.config
            },
            self.errors,
        )
    }

    pub fn with_beneficiary(self, beneficiary: impl Into<String>) -> Self {
        Self::transition(
            BootstrapConfig {
                renewal: self.config.renewal.with_beneficiary(beneficiary),
                ..self.config
            },
            self.errors,
        )
    }

    /// Seals the builder and returns a [`BootstrapConfig`] if there are no validation errors, else returns errors.
    pub fn build(self) -> Result<BootstrapConfig, Vec<anyhow::Error>> {
        let errors = merge_errors_vecs(self.errors, self.config.validate());

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coretime::Lease, relay::CoreAssignmentConfig};

    #[test]
    fn bootstrap_config_should_load_the_local_network_defaults_from_an_empty_file() {
        let config = BootstrapConfig::load_from_toml_str("").unwrap();

        assert_eq!(config, BootstrapConfig::default());
        assert_eq!(config.endpoints().relay().as_str(), "ws://127.0.0.1:9900/");
        assert_eq!(config.endpoints().coretime().as_str(), "ws://127.0.0.1:9910/");
        assert_eq!(config.endpoints().collator().as_str(), "ws://127.0.0.1:9920/");
        assert_eq!(config.endpoints().ready_timeout(), None);
        assert_eq!(config.signer().uri(), "//Alice");
        assert_eq!(config.submission().batch_mode(), BatchMode::BatchAll);
        assert_eq!(config.renewal().core(), 1);
        assert_eq!(config.renewal().beneficiary(), None);
    }

    #[test]
    fn bootstrap_config_should_load_a_full_file() {
        let config =
            BootstrapConfig::load_from_toml("./testing/snapshots/0001-local-network.toml")
                .unwrap();

        assert_eq!(config.endpoints().relay().as_str(), "ws://127.0.0.1:9944/");
        assert_eq!(config.endpoints().ready_timeout(), Some(60));
        assert_eq!(config.signer().uri(), "//Bob");
        assert_eq!(config.submission().batch_mode(), BatchMode::Batch);
        assert_eq!(config.relay().coretime_cores(), 3);
        assert_eq!(config.relay().assignment().task(), 1005);
        assert_eq!(config.relay().assignment().end_hint(), Some(1000));
        assert_eq!(config.relay().registration().para_id(), 2000);
        assert_eq!(
            config.relay().registration().header_source(),
            HeaderSource::Genesis
        );
        assert_eq!(
            config.relay().registration().deposit(),
            1_000_000_000_000_000_000_000
        );
        assert_eq!(config.coretime().request_core_count(), 3);
        assert_eq!(config.coretime().broker().limit_cores_offered(), Some(1));
        assert_eq!(
            config.coretime().leases(),
            &[Lease::new(1005, 2000), Lease::new(2000, 20)]
        );
        assert_eq!(config.coretime().sales().initial_price(), 5_000_000_000);
        assert_eq!(config.renewal().core(), 2);
        assert_eq!(
            config.renewal().beneficiary(),
            Some("5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty")
        );
    }

    #[test]
    fn bootstrap_config_should_fail_with_invalid_endpoint_in_file() {
        let err = BootstrapConfig::load_from_toml_str(
            r#"
            [endpoints]
            collator = "http://127.0.0.1:9920"
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("expected 'ws' or 'wss'"));
    }

    #[test]
    fn bootstrap_config_should_report_every_invalid_field() {
        let err = BootstrapConfig::load_from_toml_str(
            r#"
            [signer]
            uri = ""

            [coretime]
            leases = []
            "#,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "signer.uri: can't be empty\ncoretime.leases: expected exactly 2 entries, got 0"
        );
    }

    #[test]
    fn bootstrap_config_should_round_trip_through_toml() {
        let config = BootstrapConfigBuilder::new()
            .with_batch_mode(BatchMode::Batch)
            .with_finalization_timeout(120)
            .with_beneficiary("5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty")
            .build()
            .unwrap();

        let dumped = config.dump_to_toml().unwrap();
        let loaded = BootstrapConfig::load_from_toml_str(&dumped).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn bootstrap_config_should_apply_the_finalization_timeout_override_without_a_file() {
        let config = BootstrapConfig::default()
            .with_finalization_timeout_override(Some("42"))
            .unwrap();

        assert_eq!(config.submission().finalization_timeout(), Some(42));
        assert_eq!(
            BootstrapConfig::from_env().unwrap().endpoints(),
            BootstrapConfig::default().endpoints()
        );
    }

    #[test]
    fn bootstrap_config_should_reject_a_non_numeric_finalization_timeout_override() {
        let err = BootstrapConfig::default()
            .with_finalization_timeout_override(Some("soon"))
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("CORETIME_FINALIZATION_TIMEOUT_SECONDS should be a number"));
    }

    #[test]
    fn bootstrap_config_should_keep_the_file_timeout_without_override() {
        let config = BootstrapConfig::load_from_toml_str(
            r#"
            [submission]
            finalization_timeout = 90
            "#,
        )
        .unwrap()
        .with_finalization_timeout_override(None)
        .unwrap();

        assert_eq!(config.submission().finalization_timeout(), Some(90));
    }

    #[test]
    fn bootstrap_config_builder_should_apply_overrides() {
        let base = BootstrapConfig::load_from_toml_str("").unwrap();
        let config = BootstrapConfigBuilder::from_config(base)
            .with_relay_url("ws://10.0.0.1:9900")
            .with_coretime_url("ws://10.0.0.1:9910")
            .with_collator_url("wss://collator.example.com")
            .with_ready_timeout(30)
            .with_signer_uri("//Charlie")
            .with_header_source(HeaderSource::Genesis)
            .with_renewal_core(7)
            .with_relay(
                RelaySetupConfig::default()
                    .with_assignment(CoreAssignmentConfig::default().with_begin(40)),
            )
            .build()
            .unwrap();

        assert_eq!(config.endpoints().relay().as_str(), "ws://10.0.0.1:9900/");
        assert_eq!(config.endpoints().coretime().as_str(), "ws://10.0.0.1:9910/");
        assert_eq!(
            config.endpoints().collator().as_str(),
            "wss://collator.example.com/"
        );
        assert_eq!(config.endpoints().ready_timeout(), Some(30));
        assert_eq!(config.signer().uri(), "//Charlie");
        // with_relay replaces the whole section, header source included
        assert_eq!(
            config.relay().registration().header_source(),
            HeaderSource::Latest
        );
        assert_eq!(config.relay().assignment().begin(), 40);
        assert_eq!(config.renewal().core(), 7);
    }

    #[test]
    fn bootstrap_config_builder_should_fail_and_returns_errors_if_endpoints_are_invalid() {
        let errors = BootstrapConfigBuilder::new()
            .with_relay_url("http://127.0.0.1:9900")
            .with_coretime_url("not an url")
            .with_finalization_timeout(0)
            .build()
            .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.first().unwrap().to_string(),
            "endpoints.relay: 'http://127.0.0.1:9900' uses scheme 'http', expected 'ws' or 'wss'"
        );
        assert!(errors
            .get(1)
            .unwrap()
            .to_string()
            .starts_with("endpoints.coretime: 'not an url' is not a valid url"));
        assert_eq!(
            errors.get(2).unwrap().to_string(),
            "submission.finalization_timeout: can't be zero"
        );
    }
}
