// spooltag-rs/spooltag/src/layout/mod.rs

//! Fixed byte layout of the spool data blocks and sector trailers.

pub mod blocks;
pub mod catalog;
pub mod parser;
pub mod trailer;

pub use blocks::{FilamentSelection, TagPayload};
pub use catalog::{ColorPreset, Filament, MaterialCategory};
pub use parser::TagSummary;
pub use trailer::{has_writable_access_bits, render_trailer};
