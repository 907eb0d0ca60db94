use std::path::PathBuf;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::ColorFrame;

/// Consumer of annotated frames, in strictly increasing output index order.
pub trait VideoSink {
    fn write_frame(&mut self, index: usize, frame: &ColorFrame) -> Result<()>;

    /// Finalizes the artifact. Returns the video path, or `None` when nothing
    /// was encoded.
    fn finish(&mut self) -> Result<Option<PathBuf>>;
}

pub(crate) fn check_order(last: usize, index: usize) -> Result<()> {
    if index <= last {
        return Err(PipelineError::OutOfOrder { index, last });
    }
    Ok(())
}
