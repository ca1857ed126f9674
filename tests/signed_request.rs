//! Integration tests for the signed-request pipeline.
//!
//! A counting mock transport records every prepared request and replays
//! canned responses, so these tests never touch the network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use binance_connector::api::*;
use binance_connector::endpoints::{market, trade};
use binance_connector::network::API_KEY_HEADER;
use serde_json::{json, Value};

const API_KEY: &str = "test-api-key";
const API_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

#[derive(Default)]
struct MockTransport {
    calls: AtomicUsize,
    requests: Mutex<Vec<PreparedRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
}

impl MockTransport {
    fn with_responses(responses: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        })
    }

    fn ok(body: &str) -> Arc<Self> {
        Self::with_responses(vec![Ok(RawResponse::new(200, body))])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> PreparedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn dispatch(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(200, "{}")))
    }
}

fn signed_client(transport: Arc<MockTransport>) -> BinanceClient {
    BinanceClient::builder()
        .api_key(API_KEY)
        .api_secret(API_SECRET)
        .transport(transport)
        .build()
        .unwrap()
}

// =============================================================================
// Request building
// =============================================================================

mod building {
    use super::*;

    #[tokio::test]
    async fn test_signature_round_trip() {
        let transport = MockTransport::ok(r#"{"orderId": 1}"#);
        let client = signed_client(transport.clone());

        client
            .new_order_sor(
                "BNBUSDT",
                "BUY",
                "LIMIT",
                1.01,
                Params::new().with("recvWindow", 5000),
            )
            .await
            .unwrap();

        let req = transport.last_request();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "https://api.binance.com/api/v3/sor/order");
        assert_eq!(req.body.as_deref(), Some(req.payload.as_str()));

        let signed = req.signed_payload().unwrap();
        assert!(signed.starts_with(
            "symbol=BNBUSDT&side=BUY&type=LIMIT&quantity=1.01&recvWindow=5000&timestamp="
        ));
        let recomputed = sign(API_SECRET.as_bytes(), signed).unwrap();
        assert_eq!(req.signature(), Some(recomputed.as_str()));
        assert!(req.payload.ends_with(&format!("&signature={}", recomputed)));
        assert_eq!(req.header(API_KEY_HEADER), Some(API_KEY));
    }

    #[tokio::test]
    async fn test_signed_get_carries_query_in_url() {
        let transport = MockTransport::ok("[]");
        let client = signed_client(transport.clone());

        client
            .my_trades("BTCUSDT", Params::new().with("limit", 10))
            .await
            .unwrap();

        let req = transport.last_request();
        assert!(req.body.is_none());
        let (base, query) = req.url.split_once('?').unwrap();
        assert_eq!(base, "https://api.binance.com/api/v3/myTrades");
        assert_eq!(query, req.payload);
        let signed = req.signed_payload().unwrap();
        assert_eq!(
            req.signature().unwrap(),
            sign(API_SECRET.as_bytes(), signed).unwrap()
        );
    }

    #[test]
    fn test_known_vector_through_builder() {
        let client = signed_client(MockTransport::ok("{}"));
        let spec = RequestSpec::new(
            Method::Post,
            "/api/v3/order",
            Params::new()
                .with("symbol", "LTCBTC")
                .with("side", "BUY")
                .with("type", "LIMIT")
                .with("timeInForce", "GTC")
                .with("quantity", 1)
                .with("price", 0.1)
                .with("recvWindow", 5000)
                .with("timestamp", 1499827319559i64),
            Security::Signed,
        );
        let req = client.prepare(&spec).unwrap();
        assert_eq!(
            req.signature(),
            Some("c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71")
        );
    }

    #[test]
    fn test_reordering_changes_signature() {
        let client = signed_client(MockTransport::ok("{}"));
        let a = RequestSpec::new(
            Method::Get,
            "/api/v3/order",
            Params::new()
                .with("symbol", "BTCUSDT")
                .with("orderId", 7)
                .with("timestamp", 1i64),
            Security::Signed,
        );
        let b = RequestSpec::new(
            Method::Get,
            "/api/v3/order",
            Params::new()
                .with("orderId", 7)
                .with("symbol", "BTCUSDT")
                .with("timestamp", 1i64),
            Security::Signed,
        );
        let ra = client.prepare(&a).unwrap();
        let rb = client.prepare(&b).unwrap();
        assert_ne!(ra.signed_payload(), rb.signed_payload());
        assert_ne!(ra.signature(), rb.signature());

        // Same order, same bytes.
        assert_eq!(client.prepare(&a).unwrap(), ra);
    }

    #[tokio::test]
    async fn test_recv_window_absent_unless_supplied() {
        let transport = MockTransport::with_responses(vec![
            Ok(RawResponse::new(200, "{}")),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let client = signed_client(transport.clone());

        client.account(Params::new()).await.unwrap();
        assert!(!transport.last_request().payload.contains("recvWindow"));

        client
            .account(Params::new().with("recvWindow", 5000))
            .await
            .unwrap();
        let req = transport.last_request();
        assert_eq!(req.payload.matches("recvWindow=").count(), 1);
        assert!(req.payload.contains("recvWindow=5000"));
    }

    #[tokio::test]
    async fn test_public_request_has_no_signature() {
        let transport = MockTransport::ok("{}");
        let client = BinanceClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();

        client.depth("BTCUSDT", Params::new().with("limit", 5)).await.unwrap();

        let req = transport.last_request();
        assert_eq!(
            req.url,
            "https://api.binance.com/api/v3/depth?symbol=BTCUSDT&limit=5"
        );
        assert!(req.signature().is_none());
        assert!(req.header(API_KEY_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_base_url_override() {
        let transport = MockTransport::ok("{}");
        let client = BinanceClient::builder()
            .base_url("https://testnet.binance.vision/")
            .transport(transport.clone())
            .build()
            .unwrap();

        client.ping().await.unwrap();
        assert_eq!(
            transport.last_request().url,
            "https://testnet.binance.vision/api/v3/ping"
        );
    }
}

// =============================================================================
// Pre-dispatch failures
// =============================================================================

mod pre_dispatch {
    use super::*;

    #[tokio::test]
    async fn test_signed_call_without_secret_never_dispatches() {
        let transport = MockTransport::ok("{}");
        let client = BinanceClient::builder()
            .api_key(API_KEY)
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client.account(Params::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_signed_call_without_credentials_never_dispatches() {
        let transport = MockTransport::ok("{}");
        let client = BinanceClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client
            .sign_request(Method::Get, "/api/v3/account", Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert!(!err.to_string().contains(API_SECRET));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_argument_never_dispatches() {
        let transport = MockTransport::ok("{}");
        let client = signed_client(transport.clone());

        let err = client
            .new_order("", "BUY", "MARKET", Params::new())
            .await
            .unwrap_err();
        match err {
            ApiError::MissingArgument(name) => assert_eq!(name, "symbol"),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = client
            .call(&trade::NEW_ORDER_SOR, Params::new().with("symbol", "BNBUSDT"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CallerContract);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_recv_window_never_dispatches() {
        let transport = MockTransport::ok("{}");
        let client = signed_client(transport.clone());

        let err = client
            .account(Params::new().with("recvWindow", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_caller_signature_never_dispatches() {
        let transport = MockTransport::ok("{}");
        let client = signed_client(transport.clone());

        let err = client
            .account(Params::new().with("signature", "x").with("timestamp", 1i64))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_api_key_never_dispatches() {
        let transport = MockTransport::ok("{}");
        let result = BinanceClient::builder()
            .api_key("key\nwith-newline")
            .api_secret(API_SECRET)
            .transport(transport.clone())
            .build();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_listen_key_requires_api_key() {
        let transport = MockTransport::ok("{}");
        let client = BinanceClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client.new_listen_key().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(transport.calls(), 0);
    }
}

// =============================================================================
// Response interpretation
// =============================================================================

mod responses {
    use super::*;

    #[tokio::test]
    async fn test_success_payload() {
        let client = signed_client(MockTransport::ok(r#"{"orderId": 1}"#));
        let resp = client
            .new_order("BNBUSDT", "BUY", "MARKET", Params::new().with("quantity", 1))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.data, json!({"orderId": 1}));
    }

    #[tokio::test]
    async fn test_typed_server_time() {
        let client = BinanceClient::builder()
            .transport(MockTransport::ok(r#"{"serverTime": 1499827319559}"#))
            .build()
            .unwrap();
        let resp = client.time().await.unwrap();
        assert_eq!(resp.data, market::ServerTime { server_time: 1499827319559 });
    }

    #[tokio::test]
    async fn test_exchange_error() {
        let transport = MockTransport::with_responses(vec![Ok(RawResponse::new(
            400,
            r#"{"code": -1102, "msg": "Mandatory parameter X was not sent"}"#,
        ))]);
        let client = signed_client(transport);

        let err = client
            .new_order("BNBUSDT", "BUY", "LIMIT", Params::new())
            .await
            .unwrap_err();
        match err {
            ApiError::Exchange {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, -1102);
                assert_eq!(message, "Mandatory parameter X was not sent");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_not_exchange_error() {
        let transport = MockTransport::with_responses(vec![Err(TransportError::Timeout)]);
        let client = signed_client(transport);

        let err = client.account(Params::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_timeout());
        assert_eq!(err.exchange_code(), None);
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let client = BinanceClient::builder()
            .transport(MockTransport::ok("not json"))
            .build()
            .unwrap();
        let err = client.ping().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_limit_usage_surfaced_when_enabled() {
        let raw = RawResponse::new(200, "{}").with_header("x-mbx-used-weight-1m", "42");
        let client = BinanceClient::builder()
            .show_limit_usage(true)
            .transport(MockTransport::with_responses(vec![Ok(raw)]))
            .build()
            .unwrap();

        let resp = client.ping().await.unwrap();
        let usage = resp.limit_usage.unwrap();
        assert_eq!(usage.get("x-mbx-used-weight-1m").map(String::as_str), Some("42"));
    }
}

// =============================================================================
// Retry hook
// =============================================================================

mod retries {
    use super::*;

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy::Custom(RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_factor: 2.0,
            jitter: false,
            retryable_statuses: vec![429, 502, 503, 504],
        })
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let transport = MockTransport::with_responses(vec![
            Err(TransportError::Timeout),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let client = signed_client(transport.clone());

        assert!(client.account(Params::new()).await.is_err());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_retries_and_resigns() {
        let transport = MockTransport::with_responses(vec![
            Ok(RawResponse::new(503, "Service Unavailable")),
            Err(TransportError::Connect("refused".into())),
            Ok(RawResponse::new(200, r#"{"balances": []}"#)),
        ]);
        let client = BinanceClient::builder()
            .api_key(API_KEY)
            .api_secret(API_SECRET)
            .retry(fast_retry(3))
            .transport(transport.clone())
            .build()
            .unwrap();

        let resp = client.account(Params::new()).await.unwrap();
        assert_eq!(resp.data, json!({"balances": []}));
        assert_eq!(transport.calls(), 3);

        for req in transport.requests.lock().unwrap().iter() {
            let signed = req.signed_payload().unwrap();
            assert_eq!(
                req.signature().unwrap(),
                sign(API_SECRET.as_bytes(), signed).unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_retry_stops_at_max() {
        let transport = MockTransport::with_responses(vec![
            Ok(RawResponse::new(502, "")),
            Ok(RawResponse::new(502, "")),
            Ok(RawResponse::new(502, "")),
        ]);
        let client = BinanceClient::builder()
            .retry(fast_retry(1))
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client.ping().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_long_retry_after_returns_to_caller() {
        let transport = MockTransport::with_responses(vec![
            Ok(RawResponse::new(429, r#"{"code": -1003, "msg": "Too many requests."}"#)
                .with_header("retry-after", "3600")),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let client = BinanceClient::builder()
            .retry(fast_retry(3))
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client.ping().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_state_changing_calls_never_retry() {
        let transport = MockTransport::with_responses(vec![
            Err(TransportError::Timeout),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let client = BinanceClient::builder()
            .api_key(API_KEY)
            .api_secret(API_SECRET)
            .retry(fast_retry(3))
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client
            .new_order("BNBUSDT", "BUY", "MARKET", Params::new().with("quantity", 1))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_business_errors_are_not_retried() {
        let transport = MockTransport::with_responses(vec![Ok(RawResponse::new(
            400,
            r#"{"code": -1121, "msg": "Invalid symbol."}"#,
        ))]);
        let client = BinanceClient::builder()
            .retry(fast_retry(3))
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client.depth("NOPE", Params::new()).await.unwrap_err();
        assert_eq!(err.exchange_code(), Some(-1121));
        assert_eq!(transport.calls(), 1);
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let transport = Arc::new(MockTransport::default());
    let client = signed_client(transport.clone());

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .get_order("BTCUSDT", Params::new().with("orderId", i))
                .await
                .map(|resp| resp.data)
        }));
    }
    for handle in handles {
        let data: Value = handle.await.unwrap().unwrap();
        assert_eq!(data, json!({}));
    }
    assert_eq!(transport.calls(), 8);
}
