use serde::{Deserialize, Serialize};

use crate::shared::{
    errors::{ConfigError, FieldError, ValidationError},
    helpers::{ensure_at_most, ensure_not_zero, merge_errors},
    types::{CoreIndex, ParaId, Perbill, Timeslice, PERBILL_ONE, U128},
};

/// Leases set on the broker: one for the coretime chain itself, one for the
/// registered parachain.
pub const LEASES_COUNT: usize = 2;

/// Coretime chain part of the bootstrap.
///
/// Drives the five broker calls: `configure`, `request_core_count`, two
/// `set_lease` and `start_sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoretimeSetupConfig {
    request_core_count: CoreIndex,
    broker: BrokerConfig,
    leases: Vec<Lease>,
    sales: SalesConfig,
}

impl Default for CoretimeSetupConfig {
    fn default() -> Self {
        Self {
            request_core_count: 2,
            broker: BrokerConfig::default(),
            leases: vec![Lease::new(1005, 1000), Lease::new(100, 10)],
            sales: SalesConfig::default(),
        }
    }
}

impl CoretimeSetupConfig {
    pub fn broker(&self) -> &BrokerConfig {
        &self.broker
    }

    /// Cores requested from the relay chain.
    pub fn request_core_count(&self) -> CoreIndex {
        self.request_core_count
    }

    pub fn leases(&self) -> &[Lease] {
        &self.leases
    }

    pub fn sales(&self) -> &SalesConfig {
        &self.sales
    }

    pub fn with_broker(self, broker: BrokerConfig) -> Self {
        Self { broker, ..self }
    }

    pub fn with_request_core_count(self, request_core_count: CoreIndex) -> Self {
        Self {
            request_core_count,
            ..self
        }
    }

    pub fn with_leases(self, leases: Vec<Lease>) -> Self {
        Self { leases, ..self }
    }

    pub fn with_sales(self, sales: SalesConfig) -> Self {
        Self { sales, ..self }
    }

    pub(crate) fn validate(&self) -> Vec<anyhow::Error> {
        let mut errors = vec![];

        if self.leases.len() != LEASES_COUNT {
            errors = merge_errors(
                errors,
                ConfigError::Coretime(FieldError::InvalidLeases(anyhow::Error::from(
                    ValidationError::WrongLength {
                        expected: LEASES_COUNT,
                        actual: self.leases.len(),
                    },
                )))
                .into(),
            );
        }

        if let Err(e) = ensure_not_zero(self.broker.region_length.into()) {
            errors = merge_errors(
                errors,
                ConfigError::Coretime(FieldError::InvalidRegionLength(e)).into(),
            );
        }

        if let Err(e) = ensure_at_most(
            self.broker.ideal_bulk_proportion.into(),
            PERBILL_ONE.into(),
        ) {
            errors = merge_errors(
                errors,
                ConfigError::Coretime(FieldError::InvalidIdealBulkProportion(e)).into(),
            );
        }

        errors
    }
}

/// Broker `ConfigRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    advance_notice: u32,
    interlude_length: u32,
    leadin_length: u32,
    region_length: Timeslice,
    ideal_bulk_proportion: Perbill,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_cores_offered: Option<CoreIndex>,
    renewal_bump: Perbill,
    contribution_timeout: Timeslice,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            advance_notice: 5,
            interlude_length: 2,
            leadin_length: 1,
            region_length: 2,
            ideal_bulk_proportion: 100,
            limit_cores_offered: None,
            renewal_bump: 500,
            contribution_timeout: 5,
        }
    }
}

impl BrokerConfig {
    pub fn advance_notice(&self) -> u32 {
        self.advance_notice
    }

    pub fn interlude_length(&self) -> u32 {
        self.interlude_length
    }

    pub fn leadin_length(&self) -> u32 {
        self.leadin_length
    }

    pub fn region_length(&self) -> Timeslice {
        self.region_length
    }

    pub fn ideal_bulk_proportion(&self) -> Perbill {
        self.ideal_bulk_proportion
    }

    pub fn limit_cores_offered(&self) -> Option<CoreIndex> {
        self.limit_cores_offered
    }

    pub fn renewal_bump(&self) -> Perbill {
        self.renewal_bump
    }

    pub fn contribution_timeout(&self) -> Timeslice {
        self.contribution_timeout
    }

    pub fn with_advance_notice(self, advance_notice: u32) -> Self {
        Self {
            advance_notice,
            ..self
        }
    }

    pub fn with_region_length(self, region_length: Timeslice) -> Self {
        Self {
            region_length,
            ..self
        }
    }

    pub fn with_ideal_bulk_proportion(self, ideal_bulk_proportion: Perbill) -> Self {
        Self {
            ideal_bulk_proportion,
            ..self
        }
    }

    pub fn with_limit_cores_offered(self, limit_cores_offered: CoreIndex) -> Self {
        Self {
            limit_cores_offered: Some(limit_cores_offered),
            ..self
        }
    }
}

/// Fixed-term lease of a core to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    task: ParaId,
    until: Timeslice,
}

impl Lease {
    pub fn new(task: ParaId, until: Timeslice) -> Self {
        Self { task, until }
    }

    pub fn task(&self) -> ParaId {
        self.task
    }

    /// Last timeslice of the lease.
    pub fn until(&self) -> Timeslice {
        self.until
    }
}

/// Arguments of `Broker.start_sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    initial_price: U128,
    extra_cores: CoreIndex,
}

impl Default for SalesConfig {
    fn default() -> Self {
        // no cores on sale, only the fixed leases are served
        Self {
            initial_price: U128(1),
            extra_cores: 0,
        }
    }
}

impl SalesConfig {
    pub fn initial_price(&self) -> u128 {
        self.initial_price.into()
    }

    pub fn extra_cores(&self) -> CoreIndex {
        self.extra_cores
    }

    pub fn with_initial_price(self, initial_price: u128) -> Self {
        Self {
            initial_price: initial_price.into(),
            ..self
        }
    }

    pub fn with_extra_cores(self, extra_cores: CoreIndex) -> Self {
        Self {
            extra_cores,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coretime_setup_config_defaults_should_match_local_network() {
        let coretime = CoretimeSetupConfig::default();
        let broker = coretime.broker();

        assert_eq!(broker.advance_notice(), 5);
        assert_eq!(broker.interlude_length(), 2);
        assert_eq!(broker.leadin_length(), 1);
        assert_eq!(broker.region_length(), 2);
        assert_eq!(broker.ideal_bulk_proportion(), 100);
        assert_eq!(broker.limit_cores_offered(), None);
        assert_eq!(broker.renewal_bump(), 500);
        assert_eq!(broker.contribution_timeout(), 5);
        assert_eq!(coretime.request_core_count(), 2);
        assert_eq!(
            coretime.leases(),
            &[Lease::new(1005, 1000), Lease::new(100, 10)]
        );
        assert_eq!(coretime.sales().initial_price(), 1);
        assert_eq!(coretime.sales().extra_cores(), 0);
        assert!(coretime.validate().is_empty());
    }

    #[test]
    fn coretime_setup_config_should_require_two_leases() {
        let coretime = CoretimeSetupConfig::default().with_leases(vec![Lease::new(1005, 1000)]);

        let errors = coretime.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "coretime.leases: expected exactly 2 entries, got 1"
        );
    }

    #[test]
    fn coretime_setup_config_should_collect_all_broker_errors() {
        let coretime = CoretimeSetupConfig::default().with_broker(
            BrokerConfig::default()
                .with_region_length(0)
                .with_ideal_bulk_proportion(PERBILL_ONE + 1),
        );

        let errors = coretime.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "coretime.broker.region_length: can't be zero"
        );
        assert_eq!(
            errors[1].to_string(),
            "coretime.broker.ideal_bulk_proportion: 1000000001 exceeds the maximum of 1000000000"
        );
    }
}
