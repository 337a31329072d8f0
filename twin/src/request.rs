//! Payment request construction.
//!
//! A micropay is routed through the payer's own twin: the payer asks its twin
//! to `pay/{destinationAddress}/{tokenTypeHash}/{amount}/{destinationUrl}`,
//! and the twin settles the payment and forwards to the destination URL. The
//! destination URL travels as a single percent-encoded path segment, encoded
//! the way `encodeURIComponent` does so that `:`, `/` and `?` survive the hop.
//!
//! Nothing here validates the amount or the hashes. The responding twin is
//! the judge of both, and its verdict comes back through
//! [`classify`](crate::classify::classify).

use std::borrow::Cow;
use std::str::FromStr;

use http::Method;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use rust_decimal::Decimal;
use serde_json::{Number, Value, json};

use crate::constants::{PAY_PATH, PAYWALL_SEGMENT};
use crate::transport::RequestBody;
use crate::types::TwinHash;

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes `value` for use as a single path segment.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Reverses [`encode_component`].
#[must_use]
pub fn decode_component(value: &str) -> Cow<'_, str> {
    percent_decode_str(value).decode_utf8_lossy()
}

/// Returns the URL of the paywalled content behind a twin's base URL.
#[must_use]
pub fn paywall_url(twin_url: &str) -> String {
    format!("{}/{PAYWALL_SEGMENT}", twin_url.trim_end_matches('/'))
}

/// Options for a micropay request.
#[derive(Debug, Clone, PartialEq)]
pub struct MicropayOptions {
    /// HTTP verb used against the pay endpoint; `GET` unless set.
    pub method: Method,
    /// Body forwarded to the destination, typically with `POST`.
    pub body: Option<RequestBody>,
}

impl Default for MicropayOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
        }
    }
}

impl MicropayOptions {
    /// Creates default options: `GET`, no body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP verb.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the forwarded body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// A payment request, relative to the payer twin's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path starting with `/`, already percent-encoded.
    pub path: String,
    /// Optional body.
    pub body: Option<RequestBody>,
}

impl PaymentRequest {
    /// Builds the micropay request
    /// `/pay/{destination_address}/{token_type}/{amount}/{encoded destination_url}`.
    #[must_use]
    pub fn micropay(
        destination_address: &TwinHash,
        token_type: &TwinHash,
        amount: Decimal,
        destination_url: &str,
        options: MicropayOptions,
    ) -> Self {
        let path = format!(
            "/{PAY_PATH}/{}/{}/{amount}/{}",
            encode_component(destination_address.as_str()),
            encode_component(token_type.as_str()),
            encode_component(destination_url),
        );
        Self {
            method: options.method,
            path,
            body: options.body,
        }
    }

    /// Builds a direct transfer of `amount` tokens of `token_type` from the
    /// payer twin to `destination_address`.
    #[must_use]
    pub fn transfer(destination_address: &TwinHash, token_type: &TwinHash, amount: Decimal) -> Self {
        Self {
            method: Method::POST,
            path: format!("/dq/{}/transfer", encode_component(token_type.as_str())),
            body: Some(RequestBody::Json(json!({
                "destination": destination_address,
                "amount": amount_value(amount),
            }))),
        }
    }

    /// Decodes the destination URL embedded in a micropay path.
    #[must_use]
    pub fn destination_url(&self) -> Option<String> {
        let mut segments = self.path.trim_start_matches('/').split('/');
        if segments.next() != Some(PAY_PATH) {
            return None;
        }
        let encoded = segments.nth(3)?;
        Some(decode_component(encoded).into_owned())
    }
}

/// Renders `amount` as a JSON number, exactly as written. Relies on
/// `serde_json`'s `arbitrary_precision`, so no digit goes through `f64`.
fn amount_value(amount: Decimal) -> Value {
    let rendered = amount.to_string();
    Number::from_str(&rendered).map_or(Value::String(rendered), Value::Number)
}
