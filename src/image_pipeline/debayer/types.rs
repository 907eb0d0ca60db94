//! Types for debayering operations

use std::str::FromStr;

/// RGB frame after debayering, same dimensions as its source mosaic
pub type ColorFrame = image::RgbImage;

/// 2x2 color filter array layout, named from the top-left cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CfaPattern {
    /// row 0 = B G, row 1 = G R
    #[default]
    Bggr,
    /// row 0 = R G, row 1 = G B
    Rggb,
}

/// What happens to the last row and column, which have no complete neighborhood
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Leave them black
    #[default]
    Zero,
    /// Copy the nearest reconstructed pixel
    Clamp,
}

impl FromStr for CfaPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bggr" => Ok(Self::Bggr),
            "rggb" => Ok(Self::Rggb),
            other => Err(format!("unsupported CFA pattern '{other}' (expected bggr or rggb)")),
        }
    }
}

impl FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!("unknown edge policy '{other}' (expected zero or clamp)")),
        }
    }
}
