//! Conversions between CSS pixels and PDF user units.
//!
//! `k` is the PDF writer's scale factor: points per user unit.

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

const PT_PER_INCH: f64 = 72.0;
const PX_PER_INCH: f64 = 96.0;

/// Convert a CSS pixel length into user units.
pub fn unit_convert(px: f64, k: f64) -> f64 {
    px * PT_PER_INCH / PX_PER_INCH / k
}

/// [`unit_convert`] applied to every entry, e.g. a margin set.
pub fn unit_convert_all(values: &HashMap<String, f64>, k: f64) -> HashMap<String, f64> {
    values
        .iter()
        .map(|(key, px)| (key.clone(), unit_convert(*px, k)))
        .collect()
}

/// Convert user units back to CSS pixels, optionally flooring.
pub fn to_px(value: f64, k: f64, floor: bool) -> f64 {
    let px = value * k / PT_PER_INCH * PX_PER_INCH;
    if floor {
        px.floor()
    } else {
        px
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageUnit {
    Pt,
    Mm,
    Cm,
    In,
    Px,
    Pc,
    Em,
    Ex,
}

impl PageUnit {
    /// Points per unit.
    pub fn scale_factor(self) -> f64 {
        match self {
            PageUnit::Pt => 1.0,
            PageUnit::Mm => 72.0 / 25.4,
            PageUnit::Cm => 72.0 / 2.54,
            PageUnit::In => 72.0,
            PageUnit::Px => 96.0 / 72.0,
            PageUnit::Pc => 12.0,
            PageUnit::Em => 12.0,
            PageUnit::Ex => 6.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown unit: {0}")]
pub struct UnknownUnit(pub String);

impl FromStr for PageUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(PageUnit::Pt),
            "mm" => Ok(PageUnit::Mm),
            "cm" => Ok(PageUnit::Cm),
            "in" => Ok(PageUnit::In),
            "px" => Ok(PageUnit::Px),
            "pc" => Ok(PageUnit::Pc),
            "em" => Ok(PageUnit::Em),
            "ex" => Ok(PageUnit::Ex),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}
