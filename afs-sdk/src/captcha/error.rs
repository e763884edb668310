use crate::credentials::CredentialsError;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid param: {0}")]
    InvalidParam(String),
    #[error("request failed: code: {code}\nbody: {body}")]
    Api { code: StatusCode, body: String },
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("parse response json error: {message}, response text: {body}")]
    Json { message: String, body: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialsError),
}
