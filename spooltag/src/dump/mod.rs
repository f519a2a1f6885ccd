// spooltag-rs/spooltag/src/dump/mod.rs

//! Text dump of a captured tag.
//!
//! ```text
//! Filetype: Bambu Tag
//! Version: 1
//! UID: AA BB CC DD
//! UID_len: 4
//! Block_1: 00 00 ... (16 hex pairs)
//! Block_2: ...
//! Block_4: ...
//! Block_5: ...
//! Block_6: ...    only when a manufacturer block was captured
//! ```

pub mod store;

pub use store::DumpStore;

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::constants::{
    BLOCK_COLOR_WEIGHT, BLOCK_DETAIL, BLOCK_FILAMENT_TYPE, BLOCK_MANUFACTURER, BLOCK_MATERIAL,
    DUMP_FILETYPE, DUMP_VERSION,
};
use crate::engine::{ReadResult, SessionState};
use crate::layout::TagPayload;
use crate::types::{BlockData, Uid};
use crate::utils::{bytes_to_hex_upper, parse_hex};
use crate::{Error, Result};

/// A captured tag: UID plus the spool data blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagDump {
    pub uid: Uid,
    pub data: ReadResult,
}

impl TagDump {
    pub fn new(uid: Uid, data: ReadResult) -> Self {
        Self { uid, data }
    }

    pub fn from_session(session: &SessionState) -> Self {
        Self::new(*session.uid(), *session.read_result())
    }

    /// Blocks to write when cloning this dump onto another card.
    pub fn payload(&self) -> TagPayload {
        TagPayload::from(&self.data)
    }

    /// File stem under which the dump is stored.
    pub fn file_stem(&self) -> String {
        self.uid.to_hex()
    }

    fn blocks(&self) -> Vec<(u8, BlockData)> {
        let mut blocks = vec![
            (BLOCK_MATERIAL, self.data.material),
            (BLOCK_FILAMENT_TYPE, self.data.filament_type),
            (BLOCK_DETAIL, self.data.detail),
            (BLOCK_COLOR_WEIGHT, self.data.color_weight),
        ];
        if let Some(m) = self.data.manufacturer {
            blocks.push((BLOCK_MANUFACTURER, m));
        }
        blocks
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Filetype: {}", DUMP_FILETYPE);
        let _ = writeln!(out, "Version: {}", DUMP_VERSION);
        let _ = writeln!(out, "UID: {}", self.uid.to_hex_spaced());
        let _ = writeln!(out, "UID_len: {}", self.uid.len());
        for (block, data) in self.blocks() {
            let _ = writeln!(out, "Block_{}: {}", block, data.to_hex());
        }
        out
    }

    /// Parse a dump. Field order is free and unknown lines are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let fields: HashMap<&str, &str> = text
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect();

        if let Some(filetype) = fields.get("Filetype") {
            if *filetype != DUMP_FILETYPE {
                return Err(Error::DumpFormat(format!("unexpected filetype {:?}", filetype)));
            }
        }

        let uid_hex = fields
            .get("UID")
            .ok_or_else(|| Error::DumpFormat("missing UID".into()))?;
        let uid_bytes = parse_hex(uid_hex).map_err(Error::DumpFormat)?;
        let uid = Uid::try_from(uid_bytes.as_slice())
            .map_err(|e| Error::DumpFormat(format!("UID: {}", e)))?;

        if let Some(len) = fields.get("UID_len") {
            let len: usize = len
                .parse()
                .map_err(|_| Error::DumpFormat(format!("bad UID_len {:?}", len)))?;
            if len != uid.len() {
                return Err(Error::DumpFormat(format!(
                    "UID_len {} does not match {} UID bytes",
                    len,
                    uid.len()
                )));
            }
        }

        let block = |n: u8| -> Result<Option<BlockData>> {
            match fields.get(format!("Block_{}", n).as_str()) {
                None => Ok(None),
                Some(hex) => {
                    let bytes = parse_hex(hex).map_err(Error::DumpFormat)?;
                    BlockData::try_from(bytes.as_slice()).map(Some)
                }
            }
        };
        let required = |n: u8| -> Result<BlockData> {
            block(n)?.ok_or_else(|| Error::DumpFormat(format!("missing Block_{}", n)))
        };

        let data = ReadResult {
            material: required(BLOCK_MATERIAL)?,
            filament_type: required(BLOCK_FILAMENT_TYPE)?,
            detail: required(BLOCK_DETAIL)?,
            color_weight: required(BLOCK_COLOR_WEIGHT)?,
            manufacturer: block(BLOCK_MANUFACTURER)?,
            valid: true,
        };
        Ok(Self { uid, data })
    }
}
