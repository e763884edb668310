#![doc = include_str!("../README.md")]

pub mod captcha;

/// Credentials for the AFS API.
pub mod credentials;
