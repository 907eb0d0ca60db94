//! Frame metadata types

use std::str::FromStr;

use serde::Deserialize;

/// Capture statistics recorded alongside each frame.
///
/// Missing fields take their zero value. `frame_number` is whatever the capture
/// tool recorded and plays no part in output ordering.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameMetadata {
    /// Absolute capture time, seconds since the epoch
    #[serde(rename = "Timestamp")]
    pub timestamp: f64,
    #[serde(rename = "FrameNumber")]
    pub frame_number: i64,
    /// Seconds relative to the capture trigger
    #[serde(rename = "RelativeTime")]
    pub relative_time: f64,
    #[serde(rename = "MaxPixelValue")]
    pub max_pixel_value: f64,
    #[serde(rename = "MinPixelValue")]
    pub min_pixel_value: f64,
    #[serde(rename = "MeanPixelValue")]
    pub mean_pixel_value: f64,
    #[serde(rename = "MedianPixelValue")]
    pub median_pixel_value: f64,
    /// Dimensions of the original sensor array
    pub shape: Vec<usize>,
}

/// Where the metadata payload is looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataSource {
    /// Scan the raw container bytes for a marker string
    #[default]
    Marker,
    /// Read the decoded `ImageDescription` tag
    TiffTag,
}

impl FromStr for MetadataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "marker" => Ok(Self::Marker),
            "tag" | "tiff-tag" => Ok(Self::TiffTag),
            other => Err(format!("unknown metadata source '{other}' (expected marker or tag)")),
        }
    }
}
