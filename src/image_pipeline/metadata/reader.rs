use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::metadata::types::FrameMetadata;

pub trait MetadataReader {
    /// Returns `Ok(None)` when the container carries no metadata at all.
    fn read_metadata(&self, data: &[u8]) -> Result<Option<FrameMetadata>>;
}

impl<T: MetadataReader + ?Sized> MetadataReader for Box<T> {
    fn read_metadata(&self, data: &[u8]) -> Result<Option<FrameMetadata>> {
        (**self).read_metadata(data)
    }
}

/// Slices out the first `{` through the first `}` of `text`, inclusive.
///
/// Nesting is not tracked: the first closing brace ends the payload.
pub fn extract_braced(text: &[u8]) -> Result<&[u8]> {
    let open = text.iter().position(|&b| b == b'{');
    let close = text.iter().position(|&b| b == b'}');

    match (open, close) {
        (Some(open), Some(close)) if open < close => Ok(&text[open..=close]),
        (None, _) => Err(PipelineError::MetadataError(
            "no opening brace after marker".to_string(),
        )),
        (_, None) => Err(PipelineError::MetadataError(
            "no closing brace after marker".to_string(),
        )),
        (Some(open), Some(close)) => Err(PipelineError::MetadataError(format!(
            "closing brace at offset {close} precedes opening brace at offset {open}"
        ))),
    }
}

pub fn parse_metadata(payload: &[u8]) -> Result<FrameMetadata> {
    serde_json::from_slice(payload).map_err(|e| PipelineError::MetadataError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_payload() {
        let payload = br#"{"Timestamp":1.5,"FrameNumber":7,"RelativeTime":0.233,"MaxPixelValue":255,"MinPixelValue":0,"MeanPixelValue":120.4,"MedianPixelValue":118,"shape":[480,640]}"#;

        let meta = parse_metadata(payload).unwrap();

        assert_eq!(meta.timestamp, 1.5);
        assert_eq!(meta.frame_number, 7);
        assert_eq!(meta.relative_time, 0.233);
        assert_eq!(meta.max_pixel_value, 255.0);
        assert_eq!(meta.mean_pixel_value, 120.4);
        assert_eq!(meta.median_pixel_value, 118.0);
        assert_eq!(meta.shape, vec![480, 640]);
    }

    #[test]
    fn test_missing_fields_default_and_unknown_fields_ignored() {
        let meta = parse_metadata(br#"{"RelativeTime":-0.5,"Exposure":12}"#).unwrap();

        assert_eq!(meta.relative_time, -0.5);
        assert_eq!(meta.frame_number, 0);
        assert!(meta.shape.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let result = parse_metadata(br#"{"FrameNumber":"seven"}"#);

        assert!(matches!(result, Err(PipelineError::MetadataError(_))));
    }

    #[test]
    fn test_extract_stops_at_first_closing_brace() {
        let text = br#"junk {"a":{"b":1}} tail"#;

        assert_eq!(extract_braced(text).unwrap(), br#"{"a":{"b":1}"#);
    }

    #[test]
    fn test_extract_rejects_missing_or_reversed_braces() {
        assert!(extract_braced(br#"{"Timestamp":1.5"#).is_err());
        assert!(extract_braced(b"no braces here").is_err());
        assert!(extract_braced(b"} then {").is_err());
    }
}
