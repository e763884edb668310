use super::Error;
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Performs the outbound GET and decodes the JSON body.
///
/// 把网络层隔离出来，签名和参数组装部分就可以不联网测试
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: Url) -> Result<Value, Error>;
}

/// Default transport backed by [`reqwest::Client`].
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: Url) -> Result<Value, Error> {
        let resp = self.http_client.get(url).send().await?;
        parse_json_response(resp).await
    }
}

async fn parse_json_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Api {
            code: status,
            body: resp.text().await.unwrap_or_default(),
        });
    }

    let bytes = resp.bytes().await?;
    let data = serde_json::from_slice(&bytes).map_err(|e| Error::Json {
        message: e.to_string(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })?;
    Ok(data)
}
