// spooltag-rs/spooltag/src/layout/blocks.rs

//! Renderers for the spool data blocks.
//!
//! Every renderer is total: text is truncated to its slot and the rest of
//! the block stays zero.

use crate::constants::{
    BLOCK_COLOR_WEIGHT, BLOCK_DETAIL, BLOCK_FILAMENT_TYPE, BLOCK_MANUFACTURER, BLOCK_MATERIAL,
    BLOCK_SIZE,
};
use crate::engine::ReadResult;
use crate::layout::catalog::{self, ColorPreset, Filament};
use crate::types::{BlockData, SectorPair};
use crate::Result;

/// Width of the variant, material id and manufacturer slots
pub const SHORT_FIELD_LEN: usize = 8;

fn put_str(block: &mut [u8; BLOCK_SIZE], offset: usize, max_len: usize, s: &str) {
    let bytes = s.as_bytes();
    let len = bytes.len().min(max_len);
    block[offset..offset + len].copy_from_slice(&bytes[..len]);
}

/// Block 1: variant (bytes 0..8) + material id (bytes 8..16)
pub fn render_material(variant: &str, material_id: &str) -> BlockData {
    let mut block = [0u8; BLOCK_SIZE];
    put_str(&mut block, 0, SHORT_FIELD_LEN, variant);
    put_str(&mut block, SHORT_FIELD_LEN, SHORT_FIELD_LEN, material_id);
    BlockData::from_bytes(block)
}

/// Block 2: filament type string
pub fn render_filament_type(filament_type: &str) -> BlockData {
    let mut block = [0u8; BLOCK_SIZE];
    put_str(&mut block, 0, BLOCK_SIZE, filament_type);
    BlockData::from_bytes(block)
}

/// Block 4: detailed type / display name
pub fn render_detail(display_name: &str) -> BlockData {
    let mut block = [0u8; BLOCK_SIZE];
    put_str(&mut block, 0, BLOCK_SIZE, display_name);
    BlockData::from_bytes(block)
}

/// Block 5: RGBA (bytes 0..4) + weight in grams, little endian (bytes 4..6)
pub fn render_color_weight(rgba: [u8; 4], weight_grams: u16) -> BlockData {
    let mut block = [0u8; BLOCK_SIZE];
    block[..4].copy_from_slice(&rgba);
    block[4..6].copy_from_slice(&weight_grams.to_le_bytes());
    BlockData::from_bytes(block)
}

/// Block 6: short manufacturer code (bytes 0..8)
pub fn render_manufacturer(code: &str) -> BlockData {
    let mut block = [0u8; BLOCK_SIZE];
    put_str(&mut block, 0, SHORT_FIELD_LEN, code);
    BlockData::from_bytes(block)
}

/// User selection for programming a fresh tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilamentSelection {
    pub filament_index: usize,
    pub color_index: usize,
    pub weight_grams: u16,
    pub manufacturer: Option<String>,
}

impl FilamentSelection {
    pub fn new(filament_index: usize, color_index: usize, weight_grams: u16) -> Self {
        Self {
            filament_index,
            color_index,
            weight_grams,
            manufacturer: None,
        }
    }

    pub fn with_manufacturer(mut self, code: impl Into<String>) -> Self {
        self.manufacturer = Some(code.into());
        self
    }

    pub fn filament(&self) -> Result<&'static Filament> {
        catalog::filament_at(self.filament_index)
    }

    pub fn color(&self) -> Result<&'static ColorPreset> {
        catalog::color_at(self.color_index)
    }
}

/// The blocks a write pass hands to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPayload {
    pub material: BlockData,
    pub filament_type: BlockData,
    pub detail: BlockData,
    pub color_weight: BlockData,
    pub manufacturer: Option<BlockData>,
}

impl TagPayload {
    /// Render all blocks for a catalog selection.
    pub fn from_selection(selection: &FilamentSelection) -> Result<Self> {
        let filament = selection.filament()?;
        let color = selection.color()?;
        Ok(Self {
            material: render_material(filament.variant, filament.material_id),
            filament_type: render_filament_type(filament.filament_type),
            detail: render_detail(filament.display_name),
            color_weight: render_color_weight(color.rgba(), selection.weight_grams),
            manufacturer: selection.manufacturer.as_deref().map(render_manufacturer),
        })
    }

    /// Payload blocks of `pair`, in write order. Block 6 is always part of
    /// sector 1 and is cleared when there is no manufacturer, so a rewrite
    /// never leaves an earlier code behind.
    pub fn blocks_for(&self, pair: SectorPair) -> Vec<(u8, BlockData)> {
        match pair {
            SectorPair::Zero => vec![
                (BLOCK_MATERIAL, self.material),
                (BLOCK_FILAMENT_TYPE, self.filament_type),
            ],
            SectorPair::One => vec![
                (BLOCK_DETAIL, self.detail),
                (BLOCK_COLOR_WEIGHT, self.color_weight),
                (BLOCK_MANUFACTURER, self.manufacturer.unwrap_or(BlockData::ZERO)),
            ],
        }
    }

    /// Data for `block`, if this payload writes it.
    pub fn block(&self, block: u8) -> Option<BlockData> {
        match block {
            BLOCK_MATERIAL => Some(self.material),
            BLOCK_FILAMENT_TYPE => Some(self.filament_type),
            BLOCK_DETAIL => Some(self.detail),
            BLOCK_COLOR_WEIGHT => Some(self.color_weight),
            BLOCK_MANUFACTURER => self.manufacturer,
            _ => None,
        }
    }
}

/// Clone mode: write back exactly what was captured.
impl From<&ReadResult> for TagPayload {
    fn from(read: &ReadResult) -> Self {
        Self {
            material: read.material,
            filament_type: read.filament_type,
            detail: read.detail,
            color_weight: read.color_weight,
            manufacturer: read.manufacturer,
        }
    }
}
