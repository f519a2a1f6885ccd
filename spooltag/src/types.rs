// spooltag-rs/spooltag/src/types.rs

use crate::constants::{
    BLOCK_SIZE, BLOCKS_PER_SECTOR, DEFAULT_KEY, KEY_SIZE, NUM_BLOCKS, NUM_SECTORS, UID_MAX_LEN,
    UID_MIN_LEN,
};
use crate::Error;
use derive_more::Display;
use std::convert::TryFrom;

/// UID - Newtype Pattern (4〜10 バイト)
///
/// Captured once from anticollision and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid {
    bytes: [u8; UID_MAX_LEN],
    len: u8,
}

impl Uid {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_upper(self.as_bytes())
    }

    pub fn to_hex_spaced(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if !(UID_MIN_LEN..=UID_MAX_LEN).contains(&bytes.len()) {
            return Err(Error::InvalidUidLength {
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; UID_MAX_LEN];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: arr,
            len: bytes.len() as u8,
        })
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex_spaced())
    }
}

/// Sector key (6 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectorKey([u8; KEY_SIZE]);

impl SectorKey {
    /// Factory default key `FF FF FF FF FF FF`
    pub const DEFAULT: Self = Self(DEFAULT_KEY);

    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Big-endian 48-bit integer form, as some poller APIs take keys.
    pub fn to_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_upper(&self.0)
    }
}

/// The 16 per-sector keys derived from one UID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorKeySet([SectorKey; NUM_SECTORS]);

impl SectorKeySet {
    pub(crate) fn from_keys(keys: [SectorKey; NUM_SECTORS]) -> Self {
        Self(keys)
    }

    /// Key for `sector`. Sector numbers come from `SectorPair` or
    /// `sector_of`, so an out-of-range index is a caller bug.
    pub fn get(&self, sector: u8) -> crate::Result<SectorKey> {
        self.0
            .get(sector as usize)
            .copied()
            .ok_or(Error::InvalidSector(sector))
    }

    /// Key of a data sector. Infallible: both pairs index into the set.
    pub fn for_pair(&self, pair: SectorPair) -> SectorKey {
        self.0[pair.sector() as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectorKey> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SectorKey] {
        &self.0
    }
}

/// BlockData (16 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockData([u8; BLOCK_SIZE]);

impl BlockData {
    pub const ZERO: Self = Self([0u8; BLOCK_SIZE]);

    pub const fn from_bytes(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Upper-case, space separated (`"00 1A FF ..."`), as used in dumps.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }

    pub fn to_ascii_safe(&self) -> String {
        self.0
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect()
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; BLOCK_SIZE] = bytes.try_into().map_err(|_| {
            Error::DumpFormat(format!("block must be 16 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }
}

/// Which of the two keys of a sector is used for authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum KeyType {
    A,
    B,
}

/// The two sectors that carry spool data. Each read or write pass is
/// scoped to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum SectorPair {
    #[default]
    #[display(fmt = "sector 0")]
    Zero,
    #[display(fmt = "sector 1")]
    One,
}

impl SectorPair {
    pub const ALL: [Self; 2] = [Self::Zero, Self::One];

    pub fn sector(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// First block of the sector; authentication targets this block.
    pub fn first_block(self) -> u8 {
        self.sector() * BLOCKS_PER_SECTOR as u8
    }

    pub fn trailer_block(self) -> u8 {
        self.first_block() + BLOCKS_PER_SECTOR as u8 - 1
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Zero => Some(Self::One),
            Self::One => None,
        }
    }
}

/// Sector containing `block`.
pub fn sector_of(block: u8) -> crate::Result<u8> {
    if block as usize >= NUM_BLOCKS {
        return Err(Error::InvalidBlock(block));
    }
    Ok(block / BLOCKS_PER_SECTOR as u8)
}

/// True if `block` is the trailer of its sector.
pub fn is_trailer(block: u8) -> bool {
    (block as usize) % BLOCKS_PER_SECTOR == BLOCKS_PER_SECTOR - 1
}

/// Classification of a card with respect to this scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardClassification {
    #[default]
    Unknown,
    /// Factory programmed tag; its access bits refuse our writes.
    Original,
    /// Blank or previously claimed by this crate.
    Rewritable,
}
