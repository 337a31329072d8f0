//! HTTP transport for the TODAQ twin client.
//!
//! Provides [`ReqwestTransport`], a [`twin::Transport`] backed by `reqwest`,
//! and [`connect`] to build a ready-to-use [`TwinClient`] on top of it.
//!
//! # Example
//!
//! ```no_run
//! use twin::ClientConfig;
//!
//! # async fn run() -> Result<(), twin::Error> {
//! let config = ClientConfig::parse("https://41aa.tq.biz.todaq.net")?.with_api_key("key");
//! let client = twin_http::connect(config);
//! let info = client.info().await?;
//! println!("{}", info.address);
//! # Ok(())
//! # }
//! ```

pub mod transport;

pub use transport::ReqwestTransport;

use twin::{ClientConfig, TwinClient};

/// Creates a [`TwinClient`] using a default [`ReqwestTransport`].
#[must_use]
pub fn connect(config: ClientConfig) -> TwinClient {
    TwinClient::new(config, ReqwestTransport::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use twin::{Error, MicropayOptions, ResponseBody, TwinError, TwinErrorKind, TwinHash};
    use wiremock::matchers::{body_json, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN_TYPE: &str = "41mocktokentype";
    const DESTINATION_ADDRESS: &str = "41mockaddress";

    fn client(server: &MockServer, api_key: Option<&str>) -> TwinClient {
        let mut config = ClientConfig::parse(&server.uri()).unwrap();
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        connect(config)
    }

    /// Starts a destination twin advertising a paywall.
    async fn paywall_twin() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": DESTINATION_ADDRESS,
                "paywall": {
                    "targetUrl": "https://example.com",
                    "targetPayType": TOKEN_TYPE,
                    "targetPayQuantity": 1
                }
            })))
            .mount(&server)
            .await;
        server
    }

    async fn mount_pay(payer: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path_regex(format!(r"^/pay/{DESTINATION_ADDRESS}/{TOKEN_TYPE}/1/[^/]+$")))
            .respond_with(response)
            .expect(1)
            .mount(payer)
            .await;
    }

    async fn micropay(payer: &MockServer, payee: &MockServer) -> Result<ResponseBody, Error> {
        client(payer, Some("payer-key"))
            .micropay(
                &payee.uri(),
                &TwinHash::new(TOKEN_TYPE),
                Decimal::ONE,
                MicropayOptions::default(),
            )
            .await
    }

    #[tokio::test]
    async fn test_info_teapot() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(418).set_body_json(json!({ "error": "Teapot" })))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server, None).info().await.unwrap_err();
        let Error::Twin(TwinError::Generic(detail)) = err else {
            panic!("expected generic twin error, got {err:?}");
        };
        assert_eq!(detail.message, "I'm a teapot");
        assert_eq!(detail.data.as_json(), Some(&json!({ "error": "Teapot" })));
    }

    #[tokio::test]
    async fn test_info_wrong_api_key() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .and(query_param("apiKey", "definitely-wrong-api-key"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server, Some("definitely-wrong-api-key"))
            .info()
            .await
            .unwrap_err();
        assert_eq!(err.twin_kind(), Some(TwinErrorKind::Auth));
    }

    #[tokio::test]
    async fn test_micropay_success() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        let expected = format!(
            "/pay/{DESTINATION_ADDRESS}/{TOKEN_TYPE}/1/{}",
            twin::request::encode_component(&format!("{}/paywall", payee.uri()))
        );
        Mock::given(method("GET"))
            .and(path(expected.as_str()))
            .and(query_param("apiKey", "payer-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "Success" })))
            .expect(1)
            .mount(&payer)
            .await;

        let body = micropay(&payer, &payee).await.unwrap();
        assert_eq!(body.as_json(), Some(&json!({ "result": "Success" })));
    }

    #[tokio::test]
    async fn test_micropay_bad_request() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        mount_pay(
            &payer,
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Any bad micropay request" })),
        )
        .await;

        let err = micropay(&payer, &payee).await.unwrap_err();
        let Error::Twin(TwinError::Micropay(detail)) = err else {
            panic!("expected micropay error, got {err:?}");
        };
        assert_eq!(detail.message, "Bad Request");
        assert_eq!(
            detail.data.as_json(),
            Some(&json!({ "error": "Any bad micropay request" }))
        );
    }

    #[tokio::test]
    async fn test_micropay_amount_mismatch() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        mount_pay(
            &payer,
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Payment amount mismatch" })),
        )
        .await;

        let err = micropay(&payer, &payee).await.unwrap_err();
        assert_eq!(err.twin_kind(), Some(TwinErrorKind::MicropayAmountMismatch));
    }

    #[tokio::test]
    async fn test_micropay_token_mismatch() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        mount_pay(
            &payer,
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Payment token type mismatch" })),
        )
        .await;

        let err = micropay(&payer, &payee).await.unwrap_err();
        assert_eq!(err.twin_kind(), Some(TwinErrorKind::MicropayTokenMismatch));
    }

    #[tokio::test]
    async fn test_micropay_server_failure_is_micropay() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        mount_pay(&payer, ResponseTemplate::new(500)).await;

        let err = micropay(&payer, &payee).await.unwrap_err();
        let twin = err.as_twin().unwrap();
        assert!(twin.is_micropay());
        assert_eq!(twin.message(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_micropay_paywall() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        mount_pay(
            &payer,
            ResponseTemplate::new(200).set_body_json(json!({ "result": "Success" })),
        )
        .await;

        let body = client(&payer, None)
            .micropay_paywall(&payee.uri(), MicropayOptions::default())
            .await
            .unwrap();
        assert_eq!(body.as_json(), Some(&json!({ "result": "Success" })));
    }

    #[tokio::test]
    async fn test_pay_transfer() {
        let payer = MockServer::start().await;
        let payee = paywall_twin().await;
        Mock::given(method("POST"))
            .and(path(format!("/dq/{TOKEN_TYPE}/transfer").as_str()))
            .and(body_json(json!({ "destination": DESTINATION_ADDRESS, "amount": 1 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "Success" })))
            .expect(1)
            .mount(&payer)
            .await;

        client(&payer, None)
            .pay(&payee.uri(), &TwinHash::new(TOKEN_TYPE), Decimal::ONE)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_import_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/import"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Import error string" })),
            )
            .mount(&mock_server)
            .await;

        let err = client(&mock_server, None)
            .import(b"some-binary-file-content".to_vec())
            .await
            .unwrap_err();
        let Error::Twin(TwinError::Generic(detail)) = err else {
            panic!("expected generic twin error, got {err:?}");
        };
        assert_eq!(detail.message, "Bad Request");
        assert_eq!(detail.data.as_json(), Some(&json!({ "error": "Import error string" })));
    }

    #[tokio::test]
    async fn test_fetch_binary() {
        let mock_server = MockServer::start().await;
        let file = vec![0x41u8, 0x00, 0xfe, 0xff];
        Mock::given(method("GET"))
            .and(path("/fetch/41binder"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(file.clone()))
            .mount(&mock_server)
            .await;

        let bytes = client(&mock_server, None)
            .fetch(&TwinHash::new("41binder"))
            .await
            .unwrap();
        assert_eq!(bytes, file);
    }
}
