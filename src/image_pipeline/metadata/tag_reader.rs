use std::io::Cursor;

use tiff::decoder::Decoder;
use tiff::tags::Tag;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::metadata::reader::{MetadataReader, extract_braced, parse_metadata};
use crate::image_pipeline::metadata::types::FrameMetadata;

/// Reads the payload from the decoded `ImageDescription` tag of the first IFD.
pub struct TiffTagReader;

impl MetadataReader for TiffTagReader {
    fn read_metadata(&self, data: &[u8]) -> Result<Option<FrameMetadata>> {
        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| PipelineError::MetadataError(e.to_string()))?;

        let description = decoder
            .find_tag(Tag::ImageDescription)
            .and_then(|value| value.map(|v| v.into_string()).transpose())
            .map_err(|e| PipelineError::MetadataError(e.to_string()))?;

        match description {
            Some(text) => parse_metadata(extract_braced(text.as_bytes())?).map(Some),
            None => Ok(None),
        }
    }
}
