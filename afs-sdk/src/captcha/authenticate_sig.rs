use super::{Client, Error};
use afs_sdk_common::helper::{generate_nonce, now_iso8601, to_query_map};
use afs_sdk_common::rpc_sign::sign_rpc_v1;
use bon::Builder;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

// 公共请求参数：固定参数 + 每次调用重新生成的参数 + 凭证参数
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PubParams<'a> {
    action: &'a str,
    format: &'a str,
    region_id: &'a str,
    signature_method: &'a str,
    signature_version: &'a str,
    version: &'a str,
    signature_nonce: String,
    timestamp: String,
    access_key_id: &'a str,
    app_key: &'a str,
}

/// [AuthenticateSig API](https://help.aliyun.com/document_detail/64840.html)
#[serde_with::skip_serializing_none]
#[derive(Builder, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateSig<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    client: &'a Client,

    /// 前端验证通过后回调返回的token
    token: &'a str,
    /// 前端验证会话id
    session_id: &'a str,
    /// 前端验证签名串
    sig: &'a str,
    /// 终端用户的ip
    remote_ip: &'a str,
    scene: Option<&'a str>,
    /// 其它需要透传给验证服务的字段，一并参与签名
    #[serde(flatten)]
    #[builder(default)]
    extra: BTreeMap<String, String>,
}

impl AuthenticateSig<'_> {
    /// Signs and sends the request, returning the service's JSON body
    /// verbatim. The payload's own `Code`/`Msg` semantics are left to the
    /// caller.
    pub async fn send(&self) -> Result<Value, Error> {
        // 远端验签按次计费，必填参数缺失时直接本地报错，不发起请求
        for (name, value) in [
            ("Token", self.token),
            ("SessionId", self.session_id),
            ("Sig", self.sig),
            ("RemoteIp", self.remote_ip),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidParam(format!("{name} must not be empty")));
            }
        }

        let client = self.client;
        let creds = &client.credentials;

        let pub_params = PubParams {
            action: super::ACTION,
            format: super::FORMAT,
            region_id: super::REGION_ID,
            signature_method: super::SIGNATURE_METHOD,
            signature_version: super::SIGNATURE_VERSION,
            version: super::VERSION,
            signature_nonce: generate_nonce(),
            timestamp: now_iso8601(),
            access_key_id: &creds.access_key_id,
            app_key: &creds.app_key,
        };

        // 后写的覆盖先写的：公共参数 < 调用方参数
        let mut query_map = to_query_map(&pub_params);
        query_map.extend(to_query_map(self));

        // Signature本身不参与签名，算完后再加入请求参数
        let signature = sign_rpc_v1(&query_map, &creds.access_key_secret, "GET");
        query_map.insert("Signature".to_owned(), signature);

        let url_ = Url::parse_with_params(&format!("https://{}/", client.host), &query_map)
            .map_err(|e| Error::InvalidParam(format!("bad host {}: {e}", client.host)))?;

        match tokio::time::timeout(client.timeout, client.transport.get_json(url_)).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout(client.timeout)),
        }
    }
}
