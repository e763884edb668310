use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::format_description::well_known::iso8601::{
    Config, EncodedConfig, Iso8601, TimePrecision,
};
use uuid::Uuid;

/// 输出格式: YYYY-MM-DDThh:mm:ssZ
///
/// eg: 2025-11-13T13:31:09Z
pub fn now_iso8601() -> String {
    const ENCODED_CONFIG: EncodedConfig = Config::DEFAULT
        .set_time_precision(TimePrecision::Second {
            decimal_digits: None,
        })
        .encode();

    OffsetDateTime::now_utc()
        .format(&Iso8601::<ENCODED_CONFIG>)
        .unwrap()
}

/// 128-bit random nonce rendered without delimiters, fresh per request.
pub fn generate_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn sign_hmac_sha1(secret: &str, str_to_sign: &str) -> Vec<u8> {
    type HmacSha1 = Hmac<sha1::Sha1>;
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(str_to_sign.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// 按照签名文档要求序列化请求参数为BTreeMap<String, String>
///
/// 传入的query需要是一个to_value后为Value::Object的类型；AFS的请求参数
/// 都是扁平的标量，不支持嵌套
pub fn to_query_map(query: impl Serialize) -> BTreeMap<String, String> {
    let v = serde_json::to_value(query).expect("Serialize to serde_json::Value failed");
    let Value::Object(map) = v else {
        panic!("to_query_map: input query is not an object!");
    };

    map.into_iter()
        .map(|(k, val)| {
            let s = match val {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "".to_owned(),
                other => panic!("to_query_map: nested value for key {k}: {other}"),
            };
            (k, s)
        })
        .collect()
}

#[test]
fn nonce_is_compact_and_unique() {
    let a = generate_nonce();
    let b = generate_nonce();
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[test]
fn to_query_map_test() {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Params<'a> {
        session_id: &'a str,
        remote_ip: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        scene: Option<&'a str>,
    }

    let map = to_query_map(Params {
        session_id: "s-1",
        remote_ip: "1.2.3.4",
        scene: None,
    });
    assert_eq!(
        map.into_iter().collect::<Vec<_>>(),
        vec![
            ("RemoteIp".to_owned(), "1.2.3.4".to_owned()),
            ("SessionId".to_owned(), "s-1".to_owned()),
        ]
    );
}
