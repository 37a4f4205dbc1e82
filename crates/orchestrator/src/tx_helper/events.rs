use subxt::ext::scale_value::{Composite, Value, ValueDef};

/// Field of an event, by name or by position for unnamed composites.
pub fn field<'a, T>(fields: &'a Composite<T>, name: &str, position: usize) -> Option<&'a Value<T>> {
    match fields {
        Composite::Named(named) => named.iter().find(|(n, _)| n == name).map(|(_, v)| v),
        Composite::Unnamed(values) => values.get(position),
    }
}

fn variant_name<T>(value: &Value<T>) -> Option<&str> {
    match &value.value {
        ValueDef::Variant(v) => Some(v.name.as_str()),
        _ => None,
    }
}

/// Inspect an event emitted by a sudo batch extrinsic.
///
/// The extrinsic itself succeeds when the wrapped call fails, the failure is
/// only visible in `Sudo.Sudid` and `Utility.BatchInterrupted`.
pub fn dispatch_failure<T>(pallet: &str, variant: &str, fields: &Composite<T>) -> Option<String> {
    match (pallet, variant) {
        ("Sudo", "Sudid") => {
            let result = field(fields, "sudo_result", 0)?;
            if variant_name(result) == Some("Err") {
                Some(format!("sudo call failed: {result}"))
            } else {
                None
            }
        },
        ("Utility", "BatchInterrupted") => {
            let index = field(fields, "index", 0)
                .and_then(|v| v.as_u128())
                .map(|i| i.to_string())
                .unwrap_or_else(|| "?".to_string());
            let error = field(fields, "error", 1)
                .map(|v| v.to_string())
                .unwrap_or_default();
            Some(format!("batch interrupted at call #{index}: {error}"))
        },
        _ => None,
    }
}
