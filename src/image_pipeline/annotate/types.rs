//! Caption overlay configuration types

use std::path::PathBuf;

/// Appearance of the caption band
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    /// Height of the band anchored to the bottom edge, in pixels
    pub band_height: u32,
    /// Opacity of the black band background (0.0 - 1.0)
    pub band_opacity: f32,
    /// Caption glyph height in pixels
    pub font_size: f32,
    /// TrueType/OpenType font; `None` searches common system locations
    pub font_path: Option<PathBuf>,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            band_height: 40,
            band_opacity: 0.7,
            font_size: 24.0,
            font_path: None,
        }
    }
}
