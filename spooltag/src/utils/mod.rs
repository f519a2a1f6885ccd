//! Utilities for spooltag: small, reusable helpers used across the crate.
//!
//! Hex helpers are shared by dumps, logging and display code; the timeout
//! helpers centralize the session timeout handed to transports.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
