//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockTransport setup so tests across the
//! crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use crate::engine::SessionState;
use crate::layout::{FilamentSelection, TagPayload};
use crate::tagger::{Tagger, TaggerConfig};
use crate::transport::{MockTransport, SimCard};
use crate::{Result, Uid};

/// UID used by the reference write scenario.
#[doc(hidden)]
pub fn sample_uid() -> Uid {
    uid(&[0xAA, 0xBB, 0xCC, 0xDD])
}

/// Build a UID from raw bytes; panics on an invalid length.
#[doc(hidden)]
pub fn uid(bytes: &[u8]) -> Uid {
    match Uid::try_from(bytes) {
        Ok(uid) => uid,
        Err(e) => panic!("bad test uid {:02X?}: {}", bytes, e),
    }
}

/// PLA Basic, Black, 1000 g.
#[doc(hidden)]
pub fn pla_black_payload() -> TagPayload {
    match TagPayload::from_selection(&FilamentSelection::new(0, 0, 1000)) {
        Ok(p) => p,
        Err(e) => panic!("catalog changed: {}", e),
    }
}

/// Tagger with default config over a MockTransport holding `card`.
#[doc(hidden)]
pub fn mock_tagger(card: SimCard) -> Tagger<MockTransport> {
    Tagger::new(MockTransport::new(card), TaggerConfig::default())
}

/// Convenience: scan and detect in one go, returning the detected session.
#[doc(hidden)]
pub fn detected_session(tagger: &mut Tagger<MockTransport>) -> Result<SessionState> {
    let mut session = tagger.scan()?;
    tagger.detect(&mut session)?;
    Ok(session)
}
