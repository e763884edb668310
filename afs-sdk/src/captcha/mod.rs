//! 阿里云验证码(AFS)服务端验签sdk
//!
//! [官方文档](https://help.aliyun.com/document_detail/66340.html)

mod authenticate_sig;
pub use authenticate_sig::{AuthenticateSig, AuthenticateSigBuilder};

mod error;
pub use error::Error;

mod transport;
pub use transport::{HttpTransport, Transport};

use crate::credentials::Credentials;
use bon::bon;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const DEFAULT_HOST: &str = "afs.aliyuncs.com";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

// 固定公共参数，每次请求都会带上
pub(crate) const ACTION: &str = "AuthenticateSig";
pub(crate) const FORMAT: &str = "JSON";
pub(crate) const REGION_ID: &str = "cn-hangzhou";
pub(crate) const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub(crate) const SIGNATURE_VERSION: &str = "1.0";
pub(crate) const VERSION: &str = "2018-01-12";

pub struct Client {
    pub(crate) credentials: Credentials,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) host: String,
    pub(crate) timeout: Duration,
}

#[bon]
impl Client {
    #[builder(on(String, into))]
    pub fn new(
        credentials: Credentials,
        /// Defaults to `afs.aliyuncs.com`.
        host: Option<String>,
        /// Hard deadline for the whole outbound call. Defaults to 5000 ms.
        timeout: Option<Duration>,
        /// Swap in a mock to test without network access.
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self {
            credentials,
            transport: transport.unwrap_or_else(|| Arc::new(HttpTransport::new())),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub fn authenticate_sig(&self) -> AuthenticateSigBuilder<'_> {
        AuthenticateSig::builder(self)
    }
}
