//! Position-based metadata extraction.
//!
//! The container is never parsed: the reader looks for a marker string anywhere
//! in the file bytes and takes the first `{ ... }` that follows it. A literal
//! brace between the marker and the payload will desynchronize the scan.

use tracing::trace;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::metadata::reader::{MetadataReader, extract_braced, parse_metadata};
use crate::image_pipeline::metadata::types::FrameMetadata;

pub const DEFAULT_MARKER: &str = "ImageDescription";

pub struct MarkerScanReader {
    marker: Vec<u8>,
}

impl MarkerScanReader {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into().into_bytes(),
        }
    }

    fn find_marker(&self, data: &[u8]) -> Option<usize> {
        if self.marker.is_empty() {
            return Some(0);
        }
        data.windows(self.marker.len())
            .position(|window| window == self.marker.as_slice())
    }
}

impl Default for MarkerScanReader {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl MetadataReader for MarkerScanReader {
    fn read_metadata(&self, data: &[u8]) -> Result<Option<FrameMetadata>> {
        let Some(start) = self.find_marker(data) else {
            return Ok(None);
        };
        trace!(offset = start, "metadata marker found");

        let payload = extract_braced(&data[start..])?;
        parse_metadata(payload).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::PipelineError;

    #[test]
    fn test_reads_payload_after_marker() {
        let mut data = b"II*\0{garbage}\x0e\x01ImageDescription\0".to_vec();
        data.extend_from_slice(
            br#"{"Timestamp":1.5,"FrameNumber":7,"RelativeTime":0.233,"MaxPixelValue":255,"MinPixelValue":0,"MeanPixelValue":120.4,"MedianPixelValue":118,"shape":[480,640]}"#,
        );
        data.extend_from_slice(b"\0\xff\x00pixels");

        let meta = MarkerScanReader::default()
            .read_metadata(&data)
            .unwrap()
            .unwrap();

        assert_eq!(meta.relative_time, 0.233);
        assert_eq!(meta.frame_number, 7);
    }

    #[test]
    fn test_missing_marker_is_not_an_error() {
        let data = br#"{"Timestamp":1.5}"#;

        let result = MarkerScanReader::default().read_metadata(data).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_truncated_payload_is_error() {
        let data = br#"ImageDescription {"Timestamp":1.5"#;

        let result = MarkerScanReader::default().read_metadata(data);

        assert!(matches!(result, Err(PipelineError::MetadataError(_))));
    }

    #[test]
    fn test_custom_marker() {
        let data = br#"ImageDescription {"FrameNumber":1} meta: {"FrameNumber":2}"#;

        let meta = MarkerScanReader::new("meta:")
            .read_metadata(data)
            .unwrap()
            .unwrap();

        assert_eq!(meta.frame_number, 2);
    }
}
