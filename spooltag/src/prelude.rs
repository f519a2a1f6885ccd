// spooltag-rs/spooltag/src/prelude.rs

pub use crate::dump::{DumpStore, TagDump};
pub use crate::engine::{
    Detection, Engine, PassOutcome, Protocol, ReadResult, SessionState, WriteAuthorization,
};
pub use crate::layout::{FilamentSelection, TagPayload, TagSummary};
pub use crate::tagger::{ReadReport, Tagger, TaggerBuilder, TaggerConfig, WriteReport};
pub use crate::transport::{CardPoller, EventHandler, PollerEvent, Transport};
pub use crate::{
    BlockData, CardClassification, Error, KeyType, Result, SectorKey, SectorKeySet, SectorPair,
    Uid,
};

// Re-export small utilities for convenience
pub use crate::crypto::derive_keys;
pub use crate::utils::{bytes_to_hex_spaced, bytes_to_hex_upper, ms, parse_hex};
