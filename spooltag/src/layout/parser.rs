// spooltag-rs/spooltag/src/layout/parser.rs

use crate::engine::ReadResult;
use crate::layout::catalog::{self, ColorPreset, Filament};
use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::DumpFormat(format!(
            "need {} bytes, got {}",
            min,
            data.len()
        )));
    }
    Ok(())
}

/// Read a little-endian u16 at given index, with bounds checking.
pub fn le_u16_at(data: &[u8], idx: usize) -> Result<u16> {
    ensure_len(data, idx + 2)?;
    Ok(u16::from_le_bytes([data[idx], data[idx + 1]]))
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    ensure_len(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

/// Read a zero-terminated string of at most `max_len` bytes at `idx`.
/// Non-UTF-8 bytes are replaced rather than rejected.
pub fn cstr_at(data: &[u8], idx: usize, max_len: usize) -> Result<String> {
    let s = slice_at(data, idx, max_len)?;
    let end = s.iter().position(|&b| b == 0).unwrap_or(s.len());
    Ok(String::from_utf8_lossy(&s[..end]).into_owned())
}

/// Fields decoded from the spool data blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSummary {
    pub variant: String,
    pub material_id: String,
    pub filament_type: String,
    pub detail: String,
    pub rgba: [u8; 4],
    pub weight_grams: u16,
    pub manufacturer: Option<String>,
}

impl TagSummary {
    pub fn parse(read: &ReadResult) -> Result<Self> {
        let material = read.material.as_bytes();
        let color_weight = read.color_weight.as_bytes();
        let rgba = slice_at(color_weight, 0, 4)?;

        Ok(Self {
            variant: cstr_at(material, 0, 8)?,
            material_id: cstr_at(material, 8, 8)?,
            filament_type: cstr_at(read.filament_type.as_bytes(), 0, 16)?,
            detail: cstr_at(read.detail.as_bytes(), 0, 16)?,
            rgba: [rgba[0], rgba[1], rgba[2], rgba[3]],
            weight_grams: le_u16_at(color_weight, 4)?,
            manufacturer: read
                .manufacturer
                .map(|m| cstr_at(m.as_bytes(), 0, 8))
                .transpose()?,
        })
    }

    /// Catalog entry for the material id, if this is a known filament.
    pub fn filament(&self) -> Option<&'static Filament> {
        catalog::find_filament(&self.material_id)
    }

    /// Named color preset for the exact RGBA, if any.
    pub fn color(&self) -> Option<&'static ColorPreset> {
        catalog::color_for_rgba(self.rgba)
    }

    /// `#RRGGBB` for display
    pub fn color_hex(&self) -> String {
        format!("#{}", crate::utils::bytes_to_hex_upper(&self.rgba[..3]))
    }
}
