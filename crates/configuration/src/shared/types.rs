use std::{fmt::Display, str::FromStr};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};
use url::Url;

use super::errors::ConversionError;

pub type ParaId = u32;

/// Broker core index.
pub type CoreIndex = u16;

/// Relay chain block number.
pub type BlockNumber = u32;

/// Broker timeslice.
pub type Timeslice = u32;

/// Fraction of a core, expressed in parts of 57600.
pub type PartsOf57600 = u16;

/// Parts-per-billion, stored as its raw inner value.
pub type Perbill = u32;

/// A whole core.
pub const CORE_MASK_BITS: PartsOf57600 = 57_600;

/// Raw value of `Perbill::one()`.
pub const PERBILL_ONE: Perbill = 1_000_000_000;

/// A websocket url pointing to a node rpc server.
///
/// Only `ws` and `wss` schemes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(Url);

impl Endpoint {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let url = Url::parse(value)
            .map_err(|e| ConversionError::InvalidUrl(value.to_string(), e.to_string()))?;

        match url.scheme() {
            "ws" | "wss" => Ok(Self(url)),
            other => Err(ConversionError::UnsupportedScheme(
                value.to_string(),
                other.to_string(),
            )),
        }
    }
}

impl TryFrom<String> for Endpoint {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Endpoint> for String {
    fn from(value: Endpoint) -> Self {
        value.0.to_string()
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which `Utility` call wraps the setup calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// `Utility.batch`, stops at the first failing call and keeps the previous ones.
    Batch,
    /// `Utility.batch_all`, reverts every call if one fails.
    #[default]
    BatchAll,
}

impl BatchMode {
    /// Name of the `Utility` pallet call.
    pub fn call_name(&self) -> &'static str {
        match self {
            BatchMode::Batch => "batch",
            BatchMode::BatchAll => "batch_all",
        }
    }
}

impl FromStr for BatchMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "batch" => Ok(BatchMode::Batch),
            "batch_all" | "batch-all" => Ok(BatchMode::BatchAll),
            _ => Err(ConversionError::UnknownBatchMode(s.to_string())),
        }
    }
}

/// Which collator header is used as the parachain genesis head.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderSource {
    /// Header of the latest block known by the collator.
    #[default]
    Latest,
    /// Header of the block at the genesis hash.
    Genesis,
}

impl FromStr for HeaderSource {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(HeaderSource::Latest),
            "genesis" => Ok(HeaderSource::Genesis),
            _ => Err(ConversionError::UnknownHeaderSource(s.to_string())),
        }
    }
}

/// Balances are `u128` on chain, toml integers stop at `i64`.
/// Accept both integers and strings when deserializing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct U128(pub u128);

impl Serialize for U128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl From<u128> for U128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<U128> for u128 {
    fn from(value: U128) -> Self {
        value.0
    }
}

struct U128Visitor;

impl<'de> Visitor<'de> for U128Visitor {
    type Value = U128;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an unsigned integer or a string containing one")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(U128(value.into()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u128::try_from(value)
            .map(U128)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value
            .replace('_', "")
            .parse::<u128>()
            .map(U128)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for U128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(U128Visitor)
    }
}
