use afs_sdk::captcha::{Client, Error, Transport};
use afs_sdk::credentials::Credentials;
use afs_sdk_common::rpc_sign::sign_rpc_v1;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

// 记录请求并返回固定JSON，避免打到真实的计费接口
struct MockTransport {
    calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
    response: Value,
}

impl MockTransport {
    fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            response,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn recorded_query(&self, idx: usize) -> BTreeMap<String, String> {
        let urls = self.urls.lock().unwrap();
        urls[idx]
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: Url) -> Result<Value, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url);
        Ok(self.response.clone())
    }
}

struct PendingTransport;

#[async_trait]
impl Transport for PendingTransport {
    async fn get_json(&self, _url: Url) -> Result<Value, Error> {
        std::future::pending().await
    }
}

fn test_credentials() -> Credentials {
    Credentials::new("testid", "testsecret", "FFFF0N00000000009C01").unwrap()
}

fn test_client(transport: Arc<MockTransport>) -> Client {
    Client::builder()
        .credentials(test_credentials())
        .transport(transport)
        .build()
}

#[test]
fn empty_credential_field_is_rejected() {
    assert!(Credentials::new("", "secret", "app_key").is_err());
    assert!(Credentials::new("id", "", "app_key").is_err());
    assert!(Credentials::new("id", "secret", "").is_err());
    assert!(Credentials::new("id", "secret", "app_key").is_ok());
}

#[tokio::test]
async fn signed_request_and_verbatim_response() {
    let body = json!({"Code": 100, "Msg": "success", "RequestId": "AAAA-BBBB"});
    let transport = MockTransport::new(body.clone());
    let client = test_client(transport.clone());

    let resp = client
        .authenticate_sig()
        .token("t-123")
        .session_id("s-456")
        .sig("sig-789")
        .remote_ip("42.120.74.98")
        .scene("nc_login")
        .build()
        .send()
        .await
        .unwrap();

    // 响应原样返回，Code的含义由调用方处理
    assert_eq!(resp, body);
    assert_eq!(transport.call_count(), 1);

    let urls = transport.urls.lock().unwrap();
    assert_eq!(urls[0].host_str(), Some("afs.aliyuncs.com"));
    drop(urls);

    let mut params = transport.recorded_query(0);
    let signature = params.remove("Signature").expect("Signature param missing");

    for (k, v) in [
        ("Action", "AuthenticateSig"),
        ("Format", "JSON"),
        ("RegionId", "cn-hangzhou"),
        ("SignatureMethod", "HMAC-SHA1"),
        ("SignatureVersion", "1.0"),
        ("Version", "2018-01-12"),
        ("AccessKeyId", "testid"),
        ("AppKey", "FFFF0N00000000009C01"),
        ("Token", "t-123"),
        ("SessionId", "s-456"),
        ("Sig", "sig-789"),
        ("RemoteIp", "42.120.74.98"),
        ("Scene", "nc_login"),
    ] {
        assert_eq!(params.get(k).map(String::as_str), Some(v), "param {k}");
    }
    assert!(params.contains_key("SignatureNonce"));
    assert!(params.contains_key("Timestamp"));

    // 像服务端那样对除Signature以外的参数重算签名
    assert_eq!(sign_rpc_v1(&params, "testsecret", "GET"), signature);
}

#[tokio::test]
async fn extra_params_are_sent_and_signed() {
    let transport = MockTransport::new(json!({"Code": 100}));
    let client = test_client(transport.clone());

    let extra = BTreeMap::from([("VerifyUrl".to_owned(), "https://example.com/a b".to_owned())]);
    client
        .authenticate_sig()
        .token("t")
        .session_id("s")
        .sig("x")
        .remote_ip("1.2.3.4")
        .extra(extra)
        .build()
        .send()
        .await
        .unwrap();

    let mut params = transport.recorded_query(0);
    assert_eq!(
        params.get("VerifyUrl").map(String::as_str),
        Some("https://example.com/a b")
    );
    let signature = params.remove("Signature").unwrap();
    assert_eq!(sign_rpc_v1(&params, "testsecret", "GET"), signature);
}

#[tokio::test]
async fn fresh_nonce_and_timestamp_per_call() {
    let transport = MockTransport::new(json!({"Code": 100}));
    let client = test_client(transport.clone());

    for _ in 0..2 {
        client
            .authenticate_sig()
            .token("t")
            .session_id("s")
            .sig("x")
            .remote_ip("1.2.3.4")
            .build()
            .send()
            .await
            .unwrap();
    }

    let first = transport.recorded_query(0);
    let second = transport.recorded_query(1);
    assert_ne!(first["SignatureNonce"], second["SignatureNonce"]);
}

#[tokio::test]
async fn empty_required_param_fails_without_network() {
    let transport = MockTransport::new(json!({"Code": 100}));
    let client = test_client(transport.clone());

    for (token, session_id, sig, remote_ip) in [
        ("", "s", "x", "1.2.3.4"),
        ("t", "", "x", "1.2.3.4"),
        ("t", "s", "", "1.2.3.4"),
        ("t", "s", "x", ""),
    ] {
        let err = client
            .authenticate_sig()
            .token(token)
            .session_id(session_id)
            .sig(sig)
            .remote_ip(remote_ip)
            .build()
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParam(_)), "got: {err}");
    }

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn unresponsive_transport_times_out() {
    let client = Client::builder()
        .credentials(test_credentials())
        .transport(Arc::new(PendingTransport))
        .timeout(Duration::from_millis(50))
        .build();

    let err = client
        .authenticate_sig()
        .token("t")
        .session_id("s")
        .sig("x")
        .remote_ip("1.2.3.4")
        .build()
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got: {err}");
}
