use crate::helper::sign_hmac_sha1;
use base64::Engine;
use base64::engine::general_purpose;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::BTreeMap;

// 签名文档：https://help.aliyun.com/document_detail/29442.html

// RFC3986的unreserved字符不编码，其它全部编码。注意`!'()*`这四个字符
// java.net.URLEncoder一类的编码器不会编码，但是按照文档必须编码
const RPC_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a key or value for the canonicalized query string.
///
/// Leaves only `A-Z a-z 0-9 - _ . ~` unescaped; non-ASCII input is encoded
/// per UTF-8 byte. `escape("")` is `""`.
pub fn escape(s: &str) -> String {
    utf8_percent_encode(s, RPC_ENCODE_SET).to_string()
}

/// `escape(key)=escape(value)` pairs joined with `&`, in ascending key order.
pub fn canonicalized_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the RPC v1.0 signature over `params`.
///
/// `params` must hold every query parameter that will be sent except
/// `Signature` itself. The HMAC-SHA1 key is the access key secret with a
/// trailing `&` appended, as the protocol requires; the result is the
/// base64 of the raw digest.
pub fn sign_rpc_v1(
    params: &BTreeMap<String, String>,
    access_key_secret: &str,
    method: &str,
) -> String {
    let canonicalized = canonicalized_query_string(params);
    let string_to_sign = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        escape("/"),
        escape(&canonicalized)
    );

    let secret = format!("{}&", access_key_secret);
    let digest = sign_hmac_sha1(&secret, &string_to_sign);
    general_purpose::STANDARD.encode(digest)
}

#[test]
fn escape_test() {
    assert_eq!(escape("ABCxyz012-_.~"), "ABCxyz012-_.~");
    assert_eq!(escape(""), "");
    assert_eq!(escape("!'()*"), "%21%27%28%29%2A");
    assert_eq!(escape("a b"), "a%20b");
    assert_eq!(escape("k=v&x"), "k%3Dv%26x");
    assert_eq!(escape("中"), "%E4%B8%AD");
}

#[test]
fn sign_is_deterministic_and_order_independent() {
    let mut a = BTreeMap::new();
    a.insert("b".to_owned(), "1".to_owned());
    a.insert("a".to_owned(), "2".to_owned());
    let mut b = BTreeMap::new();
    b.insert("a".to_owned(), "2".to_owned());
    b.insert("b".to_owned(), "1".to_owned());

    assert_eq!(sign_rpc_v1(&a, "secret", "GET"), sign_rpc_v1(&a, "secret", "GET"));
    assert_eq!(sign_rpc_v1(&a, "secret", "GET"), sign_rpc_v1(&b, "secret", "GET"));
}

#[test]
fn sign_is_sensitive_to_each_input() {
    let mut base = BTreeMap::new();
    base.insert("a".to_owned(), "1".to_owned());
    base.insert("b".to_owned(), "2".to_owned());
    let reference = sign_rpc_v1(&base, "secret", "GET");

    let mut changed_value = base.clone();
    changed_value.insert("b".to_owned(), "3".to_owned());
    assert_ne!(sign_rpc_v1(&changed_value, "secret", "GET"), reference);

    let mut changed_key = BTreeMap::new();
    changed_key.insert("a".to_owned(), "1".to_owned());
    changed_key.insert("c".to_owned(), "2".to_owned());
    assert_ne!(sign_rpc_v1(&changed_key, "secret", "GET"), reference);

    assert_ne!(sign_rpc_v1(&base, "secret2", "GET"), reference);
    assert_ne!(sign_rpc_v1(&base, "secret", "POST"), reference);

    // `&`拼接避免了键值歧义：{"a": "1&b=2"}和{"a": "1", "b": "2"}签名不同
    let mut ambiguous = BTreeMap::new();
    ambiguous.insert("a".to_owned(), "1&b=2".to_owned());
    assert_ne!(sign_rpc_v1(&ambiguous, "secret", "GET"), reference);
}

#[test]
fn empty_params_canonical_string_is_empty() {
    let params = BTreeMap::new();
    assert_eq!(canonicalized_query_string(&params), "");
    // 退化情况下签名依然是确定的
    assert_eq!(
        sign_rpc_v1(&params, "secret", "GET"),
        sign_rpc_v1(&params, "secret", "GET")
    );
}

#[test]
fn sign_params_test() {
    let s = "AccessKeyId=testid&AccountName=<a%b'>&Action=SingleSendMail&AddressType=1&Format=XML&HtmlBody=4&RegionId=cn-hangzhou&ReplyToAddress=true&SignatureMethod=HMAC-SHA1&SignatureNonce=c1b2c332-4cfb-4a0f-b8cc-ebe622aa0a5c&SignatureVersion=1.0&Subject=3&TagName=2&Timestamp=2016-10-20T06:27:56Z&ToAddress=1@test.com&Version=2015-11-23";
    let url = url::Url::parse(&format!("http://example.com?{}", s)).unwrap();
    let mut map = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        map.insert(key.to_string(), value.to_string());
    }

    let sign = sign_rpc_v1(&map, "testsecret", "POST");

    assert_eq!(sign, "llJfXJjBW3OacrVgxxsITgYaYm0=")
}

#[test]
fn authenticate_sig_get_vector() {
    let pairs = [
        ("Action", "AuthenticateSig"),
        ("Format", "JSON"),
        ("RegionId", "cn-hangzhou"),
        ("SignatureMethod", "HMAC-SHA1"),
        ("SignatureVersion", "1.0"),
        ("Version", "2018-01-12"),
        ("SignatureNonce", "0b7dcd4e6b1c4a9a9f8a2fd5b2b6c4de"),
        ("Timestamp", "2024-05-01T12:00:00Z"),
        ("AccessKeyId", "testid"),
        ("AppKey", "FFFF0N00000000009C01"),
        ("Token", "300:1716000000000:09b5b23c-8a33-4b5a-9b6e-1d2f3a4b5c6d"),
        ("SessionId", "session-123"),
        ("Sig", "05SnGwmeYuPjHUdp2Fqy9pyKnSIMKL_v"),
        ("RemoteIp", "42.120.74.98"),
        ("Scene", "nc_login"),
    ];
    let map = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<BTreeMap<_, _>>();

    let sign = sign_rpc_v1(&map, "testsecret", "GET");

    assert_eq!(sign, "rR69SfTBj1trr2mR2gUVBwPz0bw=")
}
