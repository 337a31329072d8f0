//! Response classification.
//!
//! Turns a raw [`HttpResponse`] into either a success body or exactly one
//! [`TwinError`] variant. Rules are evaluated in order and the first match
//! wins:
//!
//! 1. `401`/`403` → [`TwinError::Auth`], for every operation.
//! 2. `4xx` on a micropay whose body reports a quantity disagreement →
//!    [`TwinError::MicropayAmountMismatch`].
//! 3. `4xx` on a micropay whose body reports a token type disagreement →
//!    [`TwinError::MicropayTokenMismatch`].
//! 4. Any other non-2xx on a micropay → [`TwinError::Micropay`].
//! 5. Any other non-2xx → [`TwinError::Generic`].
//! 6. `2xx` → success.
//!
//! Twins do not return machine-readable rejection codes, so rules 2 and 3
//! look for a mismatch phrase plus its subject in the body's `error` string.
//! The word lists live in [`MismatchSignal::detect`] and nowhere else.

use std::fmt;

use http::StatusCode;

use crate::body::ResponseBody;
use crate::error::{ErrorDetail, TwinError, TwinErrorKind};
use crate::transport::HttpResponse;

/// What a request was trying to do. Only [`Operation::Micropay`] unlocks
/// the micropay-specific rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /info` on the client's own twin.
    Info,
    /// A direct token transfer.
    Pay,
    /// A paywall payment routed through the client's own twin.
    Micropay,
    /// Any other endpoint: fetch, import, arbitrary requests.
    Generic,
}

impl Operation {
    /// Returns the operation name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Pay => "pay",
            Self::Micropay => "micropay",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structural signal a micropay rejection body carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchSignal {
    /// The requested amount differs from the paywall's quantity.
    Amount,
    /// The requested token type differs from the paywall's type.
    Token,
}

impl MismatchSignal {
    const MISMATCH_PHRASES: &'static [&'static str] = &[
        "mismatch",
        "does not match",
        "doesn't match",
        "expected",
        "incorrect",
    ];
    const AMOUNT_SUBJECTS: &'static [&'static str] = &["amount", "quantity"];
    const TOKEN_SUBJECTS: &'static [&'static str] = &["token type", "pay type", "token"];

    /// Looks for a mismatch signal in a rejection body.
    ///
    /// Reads the `error` string of a JSON body, or the whole body if it is
    /// plain text. A signal needs both a mismatch phrase (`mismatch`,
    /// `does not match`, `expected`, ...) and a subject: `amount`/`quantity`
    /// for [`MismatchSignal::Amount`], `token`/`pay type` for
    /// [`MismatchSignal::Token`]. Amount takes precedence over token.
    #[must_use]
    pub fn detect(body: &ResponseBody) -> Option<Self> {
        let reason = match body {
            ResponseBody::Text(text) => text.as_str(),
            _ => body.error_message()?,
        };
        let reason = reason.to_ascii_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| reason.contains(w));

        if !mentions(Self::MISMATCH_PHRASES) {
            return None;
        }
        if mentions(Self::AMOUNT_SUBJECTS) {
            Some(Self::Amount)
        } else if mentions(Self::TOKEN_SUBJECTS) {
            Some(Self::Token)
        } else {
            None
        }
    }
}

/// Picks the error kind for a non-2xx response.
#[must_use]
pub fn error_kind(status: StatusCode, body: &ResponseBody, operation: Operation) -> TwinErrorKind {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return TwinErrorKind::Auth;
    }
    if operation != Operation::Micropay {
        return TwinErrorKind::Generic;
    }
    if status.is_client_error() {
        match MismatchSignal::detect(body) {
            Some(MismatchSignal::Amount) => return TwinErrorKind::MicropayAmountMismatch,
            Some(MismatchSignal::Token) => return TwinErrorKind::MicropayTokenMismatch,
            None => {}
        }
    }
    TwinErrorKind::Micropay
}

/// Classifies `response`, returning its decoded body on success.
///
/// # Errors
///
/// Returns the single [`TwinError`] variant selected by the rules above for
/// any non-2xx status.
pub fn classify(response: HttpResponse, operation: Operation) -> Result<ResponseBody, TwinError> {
    if response.status.is_success() {
        return Ok(ResponseBody::from_bytes(response.body));
    }
    Err(reject(response.status, response.body, operation))
}

/// Classifies a response from a binary endpoint, returning the raw bytes on
/// success.
///
/// # Errors
///
/// Same as [`classify`]; the error body is decoded as usual.
pub fn classify_binary(
    response: HttpResponse,
    operation: Operation,
) -> Result<Vec<u8>, TwinError> {
    if response.status.is_success() {
        return Ok(response.body);
    }
    Err(reject(response.status, response.body, operation))
}

fn reject(status: StatusCode, raw: Vec<u8>, operation: Operation) -> TwinError {
    let detail = ErrorDetail::new(status, raw);
    let kind = error_kind(status, &detail.data, operation);
    let err = TwinError::from_kind(kind, detail);

    #[cfg(feature = "telemetry")]
    tracing::debug!(
        operation = %operation,
        status = status.as_u16(),
        kind = ?err.kind(),
        "twin rejected request"
    );

    err
}
