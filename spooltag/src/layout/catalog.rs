// spooltag-rs/spooltag/src/layout/catalog.rs

//! Static filament, color and weight tables offered for programming.

use derive_more::Display;

use crate::{Error, Result};

/// Base material category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MaterialCategory {
    #[display(fmt = "PLA")]
    Pla,
    #[display(fmt = "PETG")]
    Petg,
    #[display(fmt = "ABS")]
    Abs,
    #[display(fmt = "ASA")]
    Asa,
    #[display(fmt = "TPU")]
    Tpu,
    #[display(fmt = "PA")]
    Pa,
    #[display(fmt = "PC")]
    Pc,
    #[display(fmt = "PET-CF")]
    PetCf,
    #[display(fmt = "Support")]
    Support,
}

/// One programmable filament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filament {
    /// e.g. `"GFA00"`, block 1 bytes 8..16
    pub material_id: &'static str,
    /// e.g. `"PLA Basic"`, block 4
    pub display_name: &'static str,
    /// block 1 bytes 0..8, empty for every catalog entry today
    pub variant: &'static str,
    /// e.g. `"PLA"`, block 2
    pub filament_type: &'static str,
    pub category: MaterialCategory,
}

const fn filament(
    material_id: &'static str,
    display_name: &'static str,
    filament_type: &'static str,
    category: MaterialCategory,
) -> Filament {
    Filament {
        material_id,
        display_name,
        variant: "",
        filament_type,
        category,
    }
}

use MaterialCategory::*;

pub static FILAMENTS: [Filament; 33] = [
    filament("GFA00", "PLA Basic", "PLA", Pla),
    filament("GFA01", "PLA Matte", "PLA", Pla),
    filament("GFA02", "PLA Metal", "PLA", Pla),
    filament("GFA05", "PLA Silk", "PLA", Pla),
    filament("GFA08", "PLA Sparkle", "PLA", Pla),
    filament("GFA09", "PLA Tough", "PLA", Pla),
    filament("GFA50", "PLA-CF", "PLA-CF", Pla),
    filament("GFL99", "Generic PLA", "PLA", Pla),
    filament("GFG00", "PETG Basic", "PETG", Petg),
    filament("GFG01", "PETG Translucent", "PETG", Petg),
    filament("GFG02", "PETG HF", "PETG", Petg),
    filament("GFG50", "PETG-CF", "PETG-CF", Petg),
    filament("GFG99", "Generic PETG", "PETG", Petg),
    filament("GFB00", "ABS", "ABS", Abs),
    filament("GFB50", "ABS-GF", "ABS-GF", Abs),
    filament("GFB99", "Generic ABS", "ABS", Abs),
    filament("GFB01", "ASA", "ASA", Asa),
    filament("GFB02", "ASA-Aero", "ASA-AERO", Asa),
    filament("GFB98", "Generic ASA", "ASA", Asa),
    filament("GFU00", "TPU 95A HF", "TPU", Tpu),
    filament("GFU01", "TPU 95A", "TPU", Tpu),
    filament("GFU02", "TPU for AMS", "TPU-AMS", Tpu),
    filament("GFU99", "Generic TPU", "TPU", Tpu),
    filament("GFN03", "PA-CF", "PA-CF", Pa),
    filament("GFN05", "PA6-CF", "PA6-CF", Pa),
    filament("GFN99", "Generic PA", "PA", Pa),
    filament("GFC00", "PC", "PC", Pc),
    filament("GFC99", "Generic PC", "PC", Pc),
    filament("GFT01", "PET-CF", "PET-CF", PetCf),
    filament("GFS00", "Support W", "PLA-S", Support),
    filament("GFS01", "Support G", "PA-S", Support),
    filament("GFS02", "Support PLA", "PLA-S", Support),
    filament("GFS04", "PVA", "PVA", Support),
];

/// Named RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0xFF for solid colors
    pub a: u8,
}

impl ColorPreset {
    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

const fn color(name: &'static str, r: u8, g: u8, b: u8, a: u8) -> ColorPreset {
    ColorPreset { name, r, g, b, a }
}

pub static COLOR_PRESETS: [ColorPreset; 22] = [
    color("Black", 0x00, 0x00, 0x00, 0xFF),
    color("White", 0xFF, 0xFF, 0xFF, 0xFF),
    color("Gray", 0x80, 0x80, 0x80, 0xFF),
    color("Red", 0xFF, 0x00, 0x00, 0xFF),
    color("Green", 0x00, 0xFF, 0x00, 0xFF),
    color("Blue", 0x00, 0x00, 0xFF, 0xFF),
    color("Yellow", 0xFF, 0xFF, 0x00, 0xFF),
    color("Cyan", 0x00, 0xFF, 0xFF, 0xFF),
    color("Magenta", 0xFF, 0x00, 0xFF, 0xFF),
    color("Orange", 0xFF, 0xA5, 0x00, 0xFF),
    color("Purple", 0x80, 0x00, 0x80, 0xFF),
    color("Pink", 0xFF, 0xC0, 0xCB, 0xFF),
    color("Brown", 0x8B, 0x45, 0x13, 0xFF),
    color("Beige", 0xF5, 0xF5, 0xDC, 0xFF),
    color("Navy", 0x00, 0x00, 0x80, 0xFF),
    color("Teal", 0x00, 0x80, 0x80, 0xFF),
    color("Olive", 0x80, 0x80, 0x00, 0xFF),
    color("Maroon", 0x80, 0x00, 0x00, 0xFF),
    color("Silver", 0xC0, 0xC0, 0xC0, 0xFF),
    color("Gold", 0xFF, 0xD7, 0x00, 0xFF),
    color("Natural", 0xFD, 0xF5, 0xE6, 0xFF),
    color("Clear", 0xFF, 0xFF, 0xFF, 0x80),
];

/// Spool weights in grams
pub static WEIGHT_PRESETS: [u16; 5] = [250, 500, 1000, 2000, 3000];

pub fn filament_at(index: usize) -> Result<&'static Filament> {
    FILAMENTS.get(index).ok_or(Error::UnknownPreset {
        kind: "filament",
        index,
    })
}

pub fn color_at(index: usize) -> Result<&'static ColorPreset> {
    COLOR_PRESETS.get(index).ok_or(Error::UnknownPreset {
        kind: "color",
        index,
    })
}

pub fn weight_at(index: usize) -> Result<u16> {
    WEIGHT_PRESETS
        .get(index)
        .copied()
        .ok_or(Error::UnknownPreset {
            kind: "weight",
            index,
        })
}

/// Catalog entry carrying `material_id`, if any.
pub fn find_filament(material_id: &str) -> Option<&'static Filament> {
    FILAMENTS.iter().find(|f| f.material_id == material_id)
}

/// Index of the color preset called `name` (case-insensitive).
pub fn find_color(name: &str) -> Option<usize> {
    COLOR_PRESETS
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(name))
}

/// Preset whose RGBA equals `rgba` exactly.
pub fn color_for_rgba(rgba: [u8; 4]) -> Option<&'static ColorPreset> {
    COLOR_PRESETS.iter().find(|c| c.rgba() == rgba)
}
