//! RAW frame reading module
//!
//! Decodes the container of a single captured frame into an 8-bit sample buffer.

mod reader;
mod tiff_reader;
pub mod types;

pub use reader::RawFrameReader;
pub use tiff_reader::TiffFrameReader;
pub use types::RawFrame;
