// spooltag-rs/spooltag/src/lib.rs

//! spooltag
//!
//! Key derivation and a detect/read/write protocol engine for MIFARE
//! Classic 1K filament spool tags.
#![warn(missing_docs)]

pub mod constants;
pub mod crypto;
pub mod dump;
pub mod engine;
pub mod error;
pub mod layout;
pub mod prelude;
pub mod tagger;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
