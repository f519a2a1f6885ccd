// spooltag-rs/spooltag/src/crypto/mod.rs
//! Key derivation for the spool tag scheme.

pub mod kdf;

pub use kdf::{derive_keys, key_bytes_to_u64};
