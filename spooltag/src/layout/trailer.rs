// spooltag-rs/spooltag/src/layout/trailer.rs

//! Sector trailer policy: `keyA[6] FF 07 80 69 keyB[6]`.

use crate::constants::{BLOCK_SIZE, KEY_SIZE, TRAILER_ACCESS_BITS, TRAILER_GPB};
use crate::types::{BlockData, SectorKey};

/// Offset of the access bits inside a trailer
pub const ACCESS_BITS_OFFSET: usize = KEY_SIZE;

/// Build the trailer for a sector we own. Key A and Key B are both `key`.
pub fn render_trailer(key: &SectorKey) -> BlockData {
    let mut block = [0u8; BLOCK_SIZE];
    block[..KEY_SIZE].copy_from_slice(key.as_bytes());
    block[ACCESS_BITS_OFFSET..ACCESS_BITS_OFFSET + 3].copy_from_slice(&TRAILER_ACCESS_BITS);
    block[ACCESS_BITS_OFFSET + 3] = TRAILER_GPB;
    block[BLOCK_SIZE - KEY_SIZE..].copy_from_slice(key.as_bytes());
    BlockData::from_bytes(block)
}

/// Access bits of a trailer as read back from a card.
pub fn access_bits(trailer: &BlockData) -> [u8; 3] {
    let b = trailer.as_bytes();
    [
        b[ACCESS_BITS_OFFSET],
        b[ACCESS_BITS_OFFSET + 1],
        b[ACCESS_BITS_OFFSET + 2],
    ]
}

/// True if the trailer carries the writable template bits. Only bytes
/// 6..9 are compared; keys read back masked and byte 9 is free for use.
pub fn has_writable_access_bits(trailer: &BlockData) -> bool {
    access_bits(trailer) == TRAILER_ACCESS_BITS
}
