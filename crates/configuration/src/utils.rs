use support::constants::{
    DEFAULT_COLLATOR_WS, DEFAULT_CORETIME_WS, DEFAULT_RELAY_WS, DEFAULT_SUDO_URI, THIS_IS_A_BUG,
};

use crate::shared::types::Endpoint;

fn default_endpoint(url: &str) -> Endpoint {
    Endpoint::try_from(url)
        .unwrap_or_else(|e| panic!("default endpoint '{url}' should be valid: {e} {THIS_IS_A_BUG}"))
}

pub(crate) fn default_relay_endpoint() -> Endpoint {
    default_endpoint(DEFAULT_RELAY_WS)
}

pub(crate) fn default_coretime_endpoint() -> Endpoint {
    default_endpoint(DEFAULT_CORETIME_WS)
}

pub(crate) fn default_collator_endpoint() -> Endpoint {
    default_endpoint(DEFAULT_COLLATOR_WS)
}

pub(crate) fn default_sudo_uri() -> String {
    DEFAULT_SUDO_URI.to_string()
}
