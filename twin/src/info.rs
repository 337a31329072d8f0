//! Resolution of a twin's public info document.

use http::Method;
use url::Url;

use crate::body::ResponseBody;
use crate::constants::{API_KEY_PARAM, INFO_PATH};
use crate::error::{Error, ErrorDetail, TwinError};
use crate::transport::{HttpRequest, Transport};
use crate::types::TwinInfo;

/// Fetches `GET {base}/info` from arbitrary twins.
///
/// Used by the client to learn a destination twin's address before paying
/// it. Any non-2xx answer becomes a [`TwinError::Generic`]: auth and paywall
/// classification only apply on the payment path.
#[derive(Clone, Copy)]
pub struct InfoResolver<'a> {
    transport: &'a dyn Transport,
}

impl std::fmt::Debug for InfoResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoResolver").finish_non_exhaustive()
    }
}

impl<'a> InfoResolver<'a> {
    /// Creates a resolver sending through `transport`.
    #[must_use]
    pub const fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Fetches the info document of the twin at `base_url`.
    ///
    /// # Errors
    ///
    /// - [`Error::UrlParse`] if `base_url` is not an absolute URL.
    /// - [`Error::Transport`] if no response was obtained.
    /// - [`Error::Twin`] with [`TwinError::Generic`] on any non-2xx status.
    /// - [`Error::Decode`] if the document lacks an address.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.info_resolver.fetch_info", skip(self, api_key), err)
    )]
    pub async fn fetch_info(&self, base_url: &str, api_key: Option<&str>) -> Result<TwinInfo, Error> {
        let url = info_url(base_url)?;
        let mut request = HttpRequest::new(Method::GET, url);
        if let Some(key) = api_key {
            request.query.push((API_KEY_PARAM.to_owned(), key.to_owned()));
        }

        let response = self.transport.send(request).await?;
        if !response.status.is_success() {
            return Err(TwinError::Generic(ErrorDetail::new(response.status, response.body)).into());
        }

        let body = ResponseBody::from_bytes(response.body);
        let info: TwinInfo = body.decode().map_err(|source| Error::Decode {
            context: "twin info document",
            source,
        })?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(address = %info.address, paywall = info.paywall.is_some(), "resolved twin info");

        Ok(info)
    }
}

fn info_url(base_url: &str) -> Result<Url, Error> {
    let normalized = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalized)
        .and_then(|base| base.join(INFO_PATH))
        .map_err(|source| Error::UrlParse {
            context: "Failed to construct destination /info URL",
            source,
        })
}
