use serde::{Deserialize, Serialize};

use crate::{
    shared::types::Endpoint,
    utils::{default_collator_endpoint, default_coretime_endpoint, default_relay_endpoint},
};

/// Websocket endpoints of the three nodes the bootstrap talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Relay chain node.
    #[serde(default = "default_relay_endpoint")]
    relay: Endpoint,

    /// Coretime (broker) chain node.
    #[serde(default = "default_coretime_endpoint")]
    coretime: Endpoint,

    /// Collator of the parachain to register.
    #[serde(default = "default_collator_endpoint")]
    collator: Endpoint,

    /// Seconds to wait for each node rpc server before connecting.
    /// When unset the connection is attempted right away.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ready_timeout: Option<u64>,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            relay: default_relay_endpoint(),
            coretime: default_coretime_endpoint(),
            collator: default_collator_endpoint(),
            ready_timeout: None,
        }
    }
}

impl EndpointsConfig {
    pub fn relay(&self) -> &Endpoint {
        &self.relay
    }

    pub fn coretime(&self) -> &Endpoint {
        &self.coretime
    }

    pub fn collator(&self) -> &Endpoint {
        &self.collator
    }

    pub fn ready_timeout(&self) -> Option<u64> {
        self.ready_timeout
    }

    pub(crate) fn with_relay(self, relay: Endpoint) -> Self {
        Self { relay, ..self }
    }

    pub(crate) fn with_coretime(self, coretime: Endpoint) -> Self {
        Self { coretime, ..self }
    }

    pub(crate) fn with_collator(self, collator: Endpoint) -> Self {
        Self { collator, ..self }
    }

    pub(crate) fn with_ready_timeout(self, ready_timeout: u64) -> Self {
        Self {
            ready_timeout: Some(ready_timeout),
            ..self
        }
    }
}
