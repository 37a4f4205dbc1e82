use serde::{Deserialize, Serialize};

use crate::shared::{
    errors::{ConfigError, FieldError},
    helpers::{ensure_value_is_not_empty, merge_errors},
    types::CoreIndex,
};

/// Automatic renewal of a core on the coretime chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenewalConfig {
    /// Core to renew when the broker reports it as renewable.
    core: CoreIndex,

    /// SS58 address whose free balance must cover the renewal price.
    /// Defaults to the signer account.
    #[serde(skip_serializing_if = "Option::is_none")]
    beneficiary: Option<String>,
}

impl Default for RenewalConfig {
    fn default() -> Self {
        Self {
            core: 1,
            beneficiary: None,
        }
    }
}

impl RenewalConfig {
    pub fn core(&self) -> CoreIndex {
        self.core
    }

    pub fn beneficiary(&self) -> Option<&str> {
        self.beneficiary.as_deref()
    }

    pub(crate) fn with_core(self, core: CoreIndex) -> Self {
        Self { core, ..self }
    }

    pub(crate) fn with_beneficiary(self, beneficiary: impl Into<String>) -> Self {
        Self {
            beneficiary: Some(beneficiary.into()),
            ..self
        }
    }

    pub(crate) fn validate(&self) -> Vec<anyhow::Error> {
        let mut errors = vec![];

        if let Some(beneficiary) = &self.beneficiary {
            if let Err(e) = ensure_value_is_not_empty(beneficiary.trim()) {
                errors = merge_errors(
                    errors,
                    ConfigError::Renewal(FieldError::InvalidBeneficiary(e)).into(),
                );
            }
        }

        errors
    }
}
