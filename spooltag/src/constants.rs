// spooltag-rs/spooltag/src/constants.rs
//! Card layout and scheme constants used across the crate

/// Number of sectors on a MIFARE Classic 1K card
pub const NUM_SECTORS: usize = 16;

/// Blocks per sector (the last one is the sector trailer)
pub const BLOCKS_PER_SECTOR: usize = 4;

/// Total number of blocks on a 1K card
pub const NUM_BLOCKS: usize = NUM_SECTORS * BLOCKS_PER_SECTOR;

/// Block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Sector key size in bytes
pub const KEY_SIZE: usize = 6;

/// Shortest and longest UID reported by ISO14443-3A anticollision
pub const UID_MIN_LEN: usize = 4;
pub const UID_MAX_LEN: usize = 10;

/// Factory default key for virgin cards
pub const DEFAULT_KEY: [u8; KEY_SIZE] = [0xFF; KEY_SIZE];

/// Master secret of the spool tag scheme (HKDF salt)
pub const MASTER_SECRET: [u8; 16] = [
    0x9a, 0x75, 0x9c, 0xf2, 0xc4, 0xf7, 0xca, 0xff, 0x22, 0x2c, 0xb9, 0x76, 0x9b, 0x41, 0xbc,
    0x96,
];

/// HKDF expand context. The trailing NUL is part of the HMAC input.
pub const KDF_CONTEXT: &[u8; 7] = b"RFID-A\0";

/// Output keying material: 16 sectors x 6 bytes
pub const KDF_OKM_LEN: usize = NUM_SECTORS * KEY_SIZE;

/// Access bits written into every trailer this crate owns (bytes 6..9)
pub const TRAILER_ACCESS_BITS: [u8; 3] = [0xFF, 0x07, 0x80];

/// General purpose byte following the access bits (byte 9)
pub const TRAILER_GPB: u8 = 0x69;

/// Payload blocks of sector 0
pub const BLOCK_MATERIAL: u8 = 1;
pub const BLOCK_FILAMENT_TYPE: u8 = 2;

/// Payload blocks of sector 1
pub const BLOCK_DETAIL: u8 = 4;
pub const BLOCK_COLOR_WEIGHT: u8 = 5;
pub const BLOCK_MANUFACTURER: u8 = 6;

/// Dump file defaults
pub const DUMP_FILETYPE: &str = "Bambu Tag";
pub const DUMP_VERSION: u32 = 1;
pub const DEFAULT_DUMP_DIR: &str = "apps_data/bambu_tagger";
pub const DEFAULT_DUMP_EXTENSION: &str = ".btag";
pub const DEFAULT_MAX_SAVED_TAGS: usize = 32;

/// Default spool weight offered by the orchestrator
pub const DEFAULT_WEIGHT_GRAMS: u16 = 1000;
