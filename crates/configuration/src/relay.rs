use serde::{Deserialize, Serialize};

use crate::shared::{
    errors::{ConfigError, FieldError},
    helpers::{ensure_at_most, ensure_not_zero, merge_errors},
    types::{
        BlockNumber, CoreIndex, HeaderSource, ParaId, PartsOf57600, CORE_MASK_BITS, U128,
    },
};

/// Relay chain part of the bootstrap.
///
/// Holds the values of the three privileged calls submitted to the relay:
/// `Configuration.set_coretime_cores`, `Coretime.assign_core` and
/// `Registrar.force_register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySetupConfig {
    coretime_cores: u32,
    assignment: CoreAssignmentConfig,
    registration: RegistrationConfig,
}

impl Default for RelaySetupConfig {
    fn default() -> Self {
        Self {
            coretime_cores: 1,
            assignment: CoreAssignmentConfig::default(),
            registration: RegistrationConfig::default(),
        }
    }
}

impl RelaySetupConfig {
    /// Number of cores handed over to the coretime chain.
    pub fn coretime_cores(&self) -> u32 {
        self.coretime_cores
    }

    pub fn assignment(&self) -> &CoreAssignmentConfig {
        &self.assignment
    }

    pub fn registration(&self) -> &RegistrationConfig {
        &self.registration
    }

    pub fn with_coretime_cores(self, coretime_cores: u32) -> Self {
        Self {
            coretime_cores,
            ..self
        }
    }

    pub fn with_assignment(self, assignment: CoreAssignmentConfig) -> Self {
        Self { assignment, ..self }
    }

    pub fn with_registration(self, registration: RegistrationConfig) -> Self {
        Self {
            registration,
            ..self
        }
    }

    pub(crate) fn validate(&self) -> Vec<anyhow::Error> {
        let mut errors = vec![];

        if let Err(e) = ensure_at_most(self.assignment.parts.into(), CORE_MASK_BITS.into()) {
            errors = merge_errors(
                errors,
                ConfigError::Relay(FieldError::InvalidAssignmentParts(e)).into(),
            );
        }

        if let Err(e) = ensure_not_zero(self.assignment.parts.into()) {
            errors = merge_errors(
                errors,
                ConfigError::Relay(FieldError::InvalidAssignmentParts(e)).into(),
            );
        }

        errors
    }
}

/// Assignment of a relay core to a single task, for a fraction of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreAssignmentConfig {
    core: CoreIndex,
    begin: BlockNumber,
    task: ParaId,
    parts: PartsOf57600,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_hint: Option<BlockNumber>,
}

impl Default for CoreAssignmentConfig {
    fn default() -> Self {
        Self {
            core: 0,
            begin: 20,
            task: 1005,
            parts: CORE_MASK_BITS,
            end_hint: None,
        }
    }
}

impl CoreAssignmentConfig {
    pub fn core(&self) -> CoreIndex {
        self.core
    }

    /// Relay block from which the assignment applies.
    pub fn begin(&self) -> BlockNumber {
        self.begin
    }

    /// Para id the core is assigned to.
    pub fn task(&self) -> ParaId {
        self.task
    }

    pub fn parts(&self) -> PartsOf57600 {
        self.parts
    }

    pub fn end_hint(&self) -> Option<BlockNumber> {
        self.end_hint
    }

    pub fn with_core(self, core: CoreIndex) -> Self {
        Self { core, ..self }
    }

    pub fn with_begin(self, begin: BlockNumber) -> Self {
        Self { begin, ..self }
    }

    pub fn with_task(self, task: ParaId) -> Self {
        Self { task, ..self }
    }

    pub fn with_parts(self, parts: PartsOf57600) -> Self {
        Self { parts, ..self }
    }

    pub fn with_end_hint(self, end_hint: BlockNumber) -> Self {
        Self {
            end_hint: Some(end_hint),
            ..self
        }
    }
}

/// Forced registration of the collator's parachain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    para_id: ParaId,
    deposit: U128,
    header_source: HeaderSource,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            para_id: 100,
            deposit: U128(0),
            header_source: HeaderSource::Latest,
        }
    }
}

impl RegistrationConfig {
    pub fn para_id(&self) -> ParaId {
        self.para_id
    }

    pub fn deposit(&self) -> u128 {
        self.deposit.into()
    }

    pub fn header_source(&self) -> HeaderSource {
        self.header_source
    }

    pub fn with_para_id(self, para_id: ParaId) -> Self {
        Self { para_id, ..self }
    }

    pub fn with_deposit(self, deposit: u128) -> Self {
        Self {
            deposit: deposit.into(),
            ..self
        }
    }

    pub fn with_header_source(self, header_source: HeaderSource) -> Self {
        Self {
            header_source,
            ..self
        }
    }
}
