//! Shared signing utilities for the AFS SDK.

pub mod helper;
pub mod rpc_sign;
