//! Caption overlay module
//!
//! Burns a translucent band with the frame caption into the bottom of each
//! reconstructed frame.

mod annotator;
pub mod types;

pub use annotator::{FrameAnnotator, caption};
pub use types::AnnotationStyle;
