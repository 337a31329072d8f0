//! Error types for twin client operations.
//!
//! [`TwinError`] is the taxonomy of rejections a twin can answer with. Its
//! variants are mutually exclusive and ordered by specificity:
//!
//! | Variant                                   | Produced when                                   |
//! |-------------------------------------------|-------------------------------------------------|
//! | [`TwinError::Auth`]                       | status 401 or 403, any operation                |
//! | [`TwinError::MicropayAmountMismatch`]     | micropay rejected for the wrong quantity        |
//! | [`TwinError::MicropayTokenMismatch`]      | micropay rejected for the wrong token type      |
//! | [`TwinError::Micropay`]                   | micropay rejected for any other reason          |
//! | [`TwinError::Generic`]                    | any other non-2xx status                        |
//!
//! [`Error`] is what a [`TwinClient`](crate::TwinClient) call returns: either a
//! classified [`TwinError`] or a failure that happened before a response
//! could be classified.

use std::fmt;

use http::StatusCode;

use crate::body::ResponseBody;
use crate::transport::TransportError;

/// Payload shared by every [`TwinError`] variant.
///
/// `raw` holds the body bytes exactly as received. `data` is the decoded view
/// of the same bytes; a JSON body re-serialised from it may differ in
/// whitespace and key order.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    /// Status code of the rejecting response.
    pub status: StatusCode,
    /// Canonical reason phrase of `status`, e.g. `"Bad Request"`.
    pub message: String,
    /// The response body, decoded.
    pub data: ResponseBody,
    /// The response body, byte for byte.
    pub raw: Vec<u8>,
}

impl ErrorDetail {
    /// Creates a detail from the raw body of a rejecting response. The
    /// message is the canonical reason of `status`.
    #[must_use]
    pub fn new(status: StatusCode, raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        Self {
            status,
            message: status_text(status),
            data: ResponseBody::from_bytes(raw.clone()),
            raw,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.error_message() {
            Some(reason) => write!(f, "{} ({}): {reason}", self.message, self.status.as_u16()),
            None => write!(f, "{} ({})", self.message, self.status.as_u16()),
        }
    }
}

/// Returns the canonical reason phrase for `status`, or its numeric code if
/// it has none.
pub(crate) fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}

/// A rejection returned by a twin.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TwinError {
    /// A non-2xx response with no finer classification.
    #[error("twin error: {0}")]
    Generic(ErrorDetail),

    /// Credentials were missing or rejected.
    #[error("twin authentication error: {0}")]
    Auth(ErrorDetail),

    /// A micropayment was rejected for an unspecified reason.
    #[error("micropay error: {0}")]
    Micropay(ErrorDetail),

    /// A micropayment was rejected because the amount does not match the
    /// paywall's expected quantity.
    #[error("micropay amount mismatch: {0}")]
    MicropayAmountMismatch(ErrorDetail),

    /// A micropayment was rejected because the token type does not match the
    /// paywall's expected type.
    #[error("micropay token mismatch: {0}")]
    MicropayTokenMismatch(ErrorDetail),
}

/// Fieldless discriminant of [`TwinError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwinErrorKind {
    /// See [`TwinError::Generic`].
    Generic,
    /// See [`TwinError::Auth`].
    Auth,
    /// See [`TwinError::Micropay`].
    Micropay,
    /// See [`TwinError::MicropayAmountMismatch`].
    MicropayAmountMismatch,
    /// See [`TwinError::MicropayTokenMismatch`].
    MicropayTokenMismatch,
}

impl TwinError {
    /// Builds the variant for `kind` around `detail`.
    #[must_use]
    pub fn from_kind(kind: TwinErrorKind, detail: ErrorDetail) -> Self {
        match kind {
            TwinErrorKind::Generic => Self::Generic(detail),
            TwinErrorKind::Auth => Self::Auth(detail),
            TwinErrorKind::Micropay => Self::Micropay(detail),
            TwinErrorKind::MicropayAmountMismatch => Self::MicropayAmountMismatch(detail),
            TwinErrorKind::MicropayTokenMismatch => Self::MicropayTokenMismatch(detail),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> TwinErrorKind {
        match self {
            Self::Generic(_) => TwinErrorKind::Generic,
            Self::Auth(_) => TwinErrorKind::Auth,
            Self::Micropay(_) => TwinErrorKind::Micropay,
            Self::MicropayAmountMismatch(_) => TwinErrorKind::MicropayAmountMismatch,
            Self::MicropayTokenMismatch(_) => TwinErrorKind::MicropayTokenMismatch,
        }
    }

    /// Returns the shared payload.
    #[must_use]
    pub const fn detail(&self) -> &ErrorDetail {
        match self {
            Self::Generic(detail)
            | Self::Auth(detail)
            | Self::Micropay(detail)
            | Self::MicropayAmountMismatch(detail)
            | Self::MicropayTokenMismatch(detail) => detail,
        }
    }

    /// Consumes the error and returns its payload.
    #[must_use]
    pub fn into_detail(self) -> ErrorDetail {
        match self {
            Self::Generic(detail)
            | Self::Auth(detail)
            | Self::Micropay(detail)
            | Self::MicropayAmountMismatch(detail)
            | Self::MicropayTokenMismatch(detail) => detail,
        }
    }

    /// Returns the HTTP status text of the rejecting response.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.detail().message
    }

    /// Returns the rejecting response's body.
    #[must_use]
    pub const fn data(&self) -> &ResponseBody {
        &self.detail().data
    }

    /// Returns the rejecting response's body exactly as received.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.detail().raw
    }

    /// Returns the status code of the rejecting response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.detail().status
    }

    /// Returns `true` for any of the three micropay rejections.
    #[must_use]
    pub const fn is_micropay(&self) -> bool {
        matches!(
            self,
            Self::Micropay(_) | Self::MicropayAmountMismatch(_) | Self::MicropayTokenMismatch(_)
        )
    }
}

/// Errors returned by [`TwinClient`](crate::TwinClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The twin answered with a non-2xx status.
    #[error(transparent)]
    Twin(#[from] TwinError),

    /// No response could be obtained.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A 2xx body did not have the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        /// Human-readable context.
        context: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A URL could not be parsed or joined.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The destination twin advertises no paywall to pay.
    #[error("twin at {url} advertises no paywall")]
    NoPaywall {
        /// The destination URL that was resolved.
        url: String,
    },
}

impl Error {
    /// Returns the classified rejection, if this error is one.
    #[must_use]
    pub const fn as_twin(&self) -> Option<&TwinError> {
        match self {
            Self::Twin(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the kind of the classified rejection, if this error is one.
    #[must_use]
    pub const fn twin_kind(&self) -> Option<TwinErrorKind> {
        match self {
            Self::Twin(err) => Some(err.kind()),
            _ => None,
        }
    }
}
