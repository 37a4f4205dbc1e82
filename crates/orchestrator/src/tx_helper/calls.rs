//! Dynamic payloads of the privileged setup calls.
//!
//! Calls are built against the runtime metadata at submission time, so only
//! pallet/call names and argument shapes live here.

use configuration::{
    BatchMode, BrokerConfig, CoreAssignmentConfig, CoretimeSetupConfig, Lease,
    RegistrationConfig, RelaySetupConfig, SalesConfig,
};
use subxt::{dynamic::Value, tx::DynamicPayload, utils::AccountId32};

use crate::collator::CollatorState;

fn option_value(value: Option<impl Into<u128>>) -> Value {
    match value {
        Some(v) => Value::unnamed_variant("Some", [Value::u128(v.into())]),
        None => Value::unnamed_variant("None", Vec::<Value>::new()),
    }
}

/// `Configuration.set_coretime_cores`
pub fn set_coretime_cores(cores: u32) -> DynamicPayload {
    subxt::dynamic::tx(
        "Configuration",
        "set_coretime_cores",
        vec![Value::u128(cores.into())],
    )
}

/// `Coretime.assign_core`, the whole assignment goes to a single task.
pub fn assign_core(assignment: &CoreAssignmentConfig) -> DynamicPayload {
    let schedule = Value::unnamed_composite(vec![Value::unnamed_composite(vec![
        Value::unnamed_variant("Task", [Value::u128(assignment.task().into())]),
        Value::u128(assignment.parts().into()),
    ])]);

    subxt::dynamic::tx(
        "Coretime",
        "assign_core",
        vec![
            Value::u128(assignment.core().into()),
            Value::u128(assignment.begin().into()),
            schedule,
            option_value(assignment.end_hint()),
        ],
    )
}

/// `Registrar.force_register`, `who` becomes the parachain manager.
pub fn force_register(
    who: &AccountId32,
    registration: &RegistrationConfig,
    collator_state: &CollatorState,
) -> DynamicPayload {
    subxt::dynamic::tx(
        "Registrar",
        "force_register",
        vec![
            Value::from_bytes(who.0),
            Value::u128(registration.deposit()),
            Value::u128(registration.para_id().into()),
            Value::from_bytes(collator_state.genesis_head()),
            Value::from_bytes(collator_state.validation_code()),
        ],
    )
}

/// The relay chain batch, in submission order.
pub fn relay_setup_calls(
    relay: &RelaySetupConfig,
    who: &AccountId32,
    collator_state: &CollatorState,
) -> Vec<DynamicPayload> {
    vec![
        set_coretime_cores(relay.coretime_cores()),
        assign_core(relay.assignment()),
        force_register(who, relay.registration(), collator_state),
    ]
}

/// `Broker.configure`
pub fn configure_broker(broker: &BrokerConfig) -> DynamicPayload {
    let config_record = Value::named_composite([
        ("advance_notice", Value::u128(broker.advance_notice().into())),
        (
            "interlude_length",
            Value::u128(broker.interlude_length().into()),
        ),
        ("leadin_length", Value::u128(broker.leadin_length().into())),
        ("region_length", Value::u128(broker.region_length().into())),
        (
            "ideal_bulk_proportion",
            Value::u128(broker.ideal_bulk_proportion().into()),
        ),
        (
            "limit_cores_offered",
            option_value(broker.limit_cores_offered()),
        ),
        ("renewal_bump", Value::u128(broker.renewal_bump().into())),
        (
            "contribution_timeout",
            Value::u128(broker.contribution_timeout().into()),
        ),
    ]);

    subxt::dynamic::tx("Broker", "configure", vec![config_record])
}

/// `Broker.request_core_count`
pub fn request_core_count(core_count: u16) -> DynamicPayload {
    subxt::dynamic::tx(
        "Broker",
        "request_core_count",
        vec![Value::u128(core_count.into())],
    )
}

/// `Broker.set_lease`
pub fn set_lease(lease: &Lease) -> DynamicPayload {
    subxt::dynamic::tx(
        "Broker",
        "set_lease",
        vec![
            Value::u128(lease.task().into()),
            Value::u128(lease.until().into()),
        ],
    )
}

/// `Broker.start_sales`
pub fn start_sales(sales: &SalesConfig) -> DynamicPayload {
    subxt::dynamic::tx(
        "Broker",
        "start_sales",
        vec![
            Value::u128(sales.initial_price()),
            Value::u128(sales.extra_cores().into()),
        ],
    )
}

/// The coretime chain batch, in submission order.
pub fn coretime_setup_calls(coretime: &CoretimeSetupConfig) -> Vec<DynamicPayload> {
    let mut calls = vec![
        configure_broker(coretime.broker()),
        request_core_count(coretime.request_core_count()),
    ];
    calls.extend(coretime.leases().iter().map(set_lease));
    calls.push(start_sales(coretime.sales()));

    calls
}

/// `Broker.renew`
pub fn renew(core: u16) -> DynamicPayload {
    subxt::dynamic::tx("Broker", "renew", vec![Value::u128(core.into())])
}

/// Wrap the calls in a `Utility` batch executed through `Sudo.sudo`.
pub fn sudo_batch(calls: Vec<DynamicPayload>, batch_mode: BatchMode) -> DynamicPayload {
    let calls: Vec<Value> = calls.into_iter().map(|call| call.into_value()).collect();
    let batch = subxt::dynamic::tx(
        "Utility",
        batch_mode.call_name(),
        vec![Value::unnamed_composite(calls)],
    );

    subxt::dynamic::tx("Sudo", "sudo", vec![batch.into_value()])
}
