//! Wire types advertised by a twin's `/info` endpoint.
//!
//! A twin describes itself with its own address, the binder it keeps its
//! files in, and optionally the paywall guarding its content. The paywall
//! tells a payer which token type and what quantity it expects.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque hexadecimal identifier: a twin address, a token type hash or
/// a binder id.
///
/// The client never validates the contents; the responding twin is the
/// authority on what constitutes a well-formed hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TwinHash(String);

impl TwinHash {
    /// Wraps a hash string without validation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TwinHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TwinHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TwinHash {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for TwinHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TwinHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Paywall configuration advertised by a twin.
///
/// Content behind the paywall is released once the twin has received
/// `target_pay_quantity` units of the token identified by `target_pay_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paywall {
    /// URL of the content released after payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,

    /// Token type hash the paywall accepts.
    pub target_pay_type: TwinHash,

    /// Quantity of tokens the paywall expects.
    pub target_pay_quantity: Decimal,
}

/// The public info document served at `GET /info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinInfo {
    /// Address payments to this twin are sent to.
    pub address: TwinHash,

    /// Binder holding the twin's own file, fetchable via `/fetch/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binder_id: Option<TwinHash>,

    /// Paywall configuration, if the twin guards content behind one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paywall: Option<Paywall>,

    /// Any further fields the twin advertises.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
