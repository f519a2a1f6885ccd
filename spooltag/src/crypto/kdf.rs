// spooltag-rs/spooltag/src/crypto/kdf.rs

//! UID -> sector key derivation.
//!
//! HKDF-SHA256 (RFC 5869) with the scheme master secret as salt, the card
//! UID as input keying material and `"RFID-A\0"` as info. The 96 bytes of
//! output keying material are cut into sixteen 6-byte sector keys.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::constants::{KDF_CONTEXT, KDF_OKM_LEN, KEY_SIZE, MASTER_SECRET, NUM_SECTORS};
use crate::types::{SectorKey, SectorKeySet, Uid};

/// Derive the 16 sector keys for `uid`.
pub fn derive_keys(uid: &Uid) -> SectorKeySet {
    let hk = Hkdf::<Sha256>::new(Some(&MASTER_SECRET), uid.as_bytes());

    let mut okm = [0u8; KDF_OKM_LEN];
    // 96 bytes is well below the 255 * 32 byte HKDF-SHA256 limit.
    hk.expand(KDF_CONTEXT, &mut okm)
        .expect("96 bytes is a valid HKDF-SHA256 output length");

    let mut keys = [SectorKey::DEFAULT; NUM_SECTORS];
    for (key, chunk) in keys.iter_mut().zip(okm.chunks_exact(KEY_SIZE)) {
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(chunk);
        *key = SectorKey::from_bytes(bytes);
    }

    log::debug!("derived sector keys for uid {}", uid);
    SectorKeySet::from_keys(keys)
}

/// Convert a 6-byte key to a big-endian 48-bit integer.
pub fn key_bytes_to_u64(key: &[u8; KEY_SIZE]) -> u64 {
    SectorKey::from_bytes(*key).to_u64()
}
