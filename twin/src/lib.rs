#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Client library for TODAQ twins.
//!
//! A twin is an HTTP service holding a DQ wallet. This crate talks to one
//! twin, the caller's own, and through it pays other twins, including the
//! paywalled "micropay" flow where a payment unlocks content behind another
//! twin's URL.
//!
//! # Overview
//!
//! A micropay runs as a fixed pipeline:
//!
//! 1. [`InfoResolver`] reads the destination twin's `/info` document to learn
//!    its address.
//! 2. [`PaymentRequest`] builds `pay/{address}/{type}/{amount}/{url}` against
//!    the payer's own twin.
//! 3. The [`Transport`] sends it.
//! 4. [`classify()`] maps the response to a body or to one of the five
//!    [`TwinError`] variants.
//!
//! HTTP itself is pluggable: any [`Transport`] works, and the `twin-http`
//! crate provides one backed by `reqwest`.
//!
//! # Modules
//!
//! - [`body`] - Decoded response bodies
//! - [`classify`](mod@classify) - Mapping HTTP outcomes to the error taxonomy
//! - [`client`] - The twin client and its operations
//! - [`config`] - Client configuration
//! - [`constants`] - Endpoint paths of the twin API
//! - [`error`] - Error types
//! - [`info`] - Resolution of a twin's public info document
//! - [`request`] - Payment request construction
//! - [`transport`] - The HTTP capability the client runs on
//! - [`types`] - Wire types of the twin API
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod body;
pub mod classify;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod info;
pub mod request;
pub mod transport;
pub mod types;

pub use body::ResponseBody;
pub use classify::{Operation, classify};
pub use client::TwinClient;
pub use config::ClientConfig;
pub use error::{Error, ErrorDetail, TwinError, TwinErrorKind};
pub use info::InfoResolver;
pub use request::{MicropayOptions, PaymentRequest};
pub use transport::{HttpRequest, HttpResponse, RequestBody, Transport, TransportError};
pub use types::{Paywall, TwinHash, TwinInfo};
