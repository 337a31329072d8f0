//! Endpoint paths and protocol constants of the twin HTTP API.

/// Public info document.
pub const INFO_PATH: &str = "info";

/// Prefix of the micropay path `pay/{address}/{type}/{amount}/{url}`.
pub const PAY_PATH: &str = "pay";

/// Binary file upload.
pub const IMPORT_PATH: &str = "import";

/// Prefix of the binary download path `fetch/{id}`.
pub const FETCH_PATH: &str = "fetch";

/// Path segment appended to a destination twin's URL to address its
/// paywalled content.
pub const PAYWALL_SEGMENT: &str = "paywall";

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "apiKey";

/// Content type of JSON requests.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of binary uploads.
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";
