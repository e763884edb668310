//! Credentials definitions.
//!
//! The credential set is fixed at construction time and read-only afterwards;
//! validation happens here so that misconfiguration surfaces before any
//! billable verification call can be made.

#[derive(Clone, Debug)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub app_key: String,
}

#[derive(thiserror::Error, Debug)]
pub enum CredentialsError {
    #[error("invalid credentials: {0} must not be empty")]
    Empty(&'static str),
}

impl Credentials {
    /// 三个字段都必须非空，缺一不可
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let creds = Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            app_key: app_key.into(),
        };
        for (name, value) in [
            ("access_key_id", &creds.access_key_id),
            ("access_key_secret", &creds.access_key_secret),
            ("app_key", &creds.app_key),
        ] {
            if value.is_empty() {
                return Err(CredentialsError::Empty(name));
            }
        }
        Ok(creds)
    }
}
