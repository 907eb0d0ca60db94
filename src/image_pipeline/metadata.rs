//! Embedded frame metadata module
//!
//! Each capture frame carries a JSON object with capture statistics inside its
//! TIFF `ImageDescription` field. Extraction sits behind [`MetadataReader`] so the
//! tolerant byte scan can be swapped for the structured tag lookup.

mod marker_reader;
mod reader;
mod tag_reader;
pub mod types;

pub use marker_reader::{DEFAULT_MARKER, MarkerScanReader};
pub use reader::{MetadataReader, extract_braced, parse_metadata};
pub use tag_reader::TiffTagReader;
pub use types::{FrameMetadata, MetadataSource};
