//! Coretime bootstrap orchestrator error definitions.

use std::fmt::Display;

/// The node a failure comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Relay,
    Coretime,
    Collator,
}

impl Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Chain::Relay => "relay",
            Chain::Coretime => "coretime",
            Chain::Collator => "collator",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Can't derive a signer from secret uri '{0}': {1}")]
    Signer(String, String),
    #[error("{chain} node at {url} is not ready")]
    NotReady {
        chain: Chain,
        url: String,
        #[source]
        source: support::net::NetError,
    },
    #[error("Can't connect to {chain} node at {url}")]
    Connection {
        chain: Chain,
        url: String,
        #[source]
        source: subxt::Error,
    },
    #[error("Storage key {key} not found on {chain}")]
    MissingStorage { chain: Chain, key: String },
    #[error("Block header not found on {chain}")]
    MissingHeader { chain: Chain },
    #[error("{chain} client error")]
    Client {
        chain: Chain,
        #[source]
        source: subxt::Error,
    },
    #[error("{label} submission failed: {reason}")]
    Submission { label: String, reason: String },
    #[error("{label} not finalized after {secs} secs")]
    Timeout { label: String, secs: u64 },
}

impl OrchestratorError {
    pub(crate) fn client(chain: Chain) -> impl FnOnce(subxt::Error) -> Self {
        move |source| OrchestratorError::Client { chain, source }
    }

    /// Values decoded against the runtime metadata fail with their own error type.
    pub(crate) fn decode(chain: Chain) -> impl FnOnce(subxt::error::DecodeError) -> Self {
        move |e| OrchestratorError::Client {
            chain,
            source: e.into(),
        }
    }

    pub(crate) fn submission(label: &str, reason: impl Into<String>) -> Self {
        OrchestratorError::Submission {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_should_be_reported_as_client_errors() {
        let err = OrchestratorError::decode(Chain::Coretime)(
            subxt::error::DecodeError::custom_string("not a u128".to_string()),
        );

        assert!(matches!(
            err,
            OrchestratorError::Client {
                chain: Chain::Coretime,
                source: subxt::Error::Decode(_),
            }
        ));
        assert_eq!(err.to_string(), "coretime client error");
    }
}
