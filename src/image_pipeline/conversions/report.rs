//! Outcome of a sequencer run

use std::path::PathBuf;

use thiserror::Error;

use crate::image_pipeline::common::PipelineTimings;

/// Why a discovered frame produced no output. None of these stop the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("no embedded metadata")]
    NoMetadata,

    #[error("JSON parse error: {0}")]
    MalformedMetadata(String),

    #[error("not a single-channel Bayer frame: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFrame {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmittedFrame {
    /// 1-based position in the output
    pub index: usize,
    pub path: PathBuf,
    pub caption: String,
}

#[derive(Debug, Default)]
pub struct SequenceReport {
    /// Number of input files found, the denominator of every caption
    pub discovered: usize,
    /// Frames handed to the sink, in output order
    pub emitted: Vec<EmittedFrame>,
    pub skipped: Vec<SkippedFrame>,
    /// Finalized video, if the sink produced one
    pub output: Option<PathBuf>,
    pub timings: PipelineTimings,
}

impl SequenceReport {
    pub fn new(discovered: usize) -> Self {
        Self {
            discovered,
            ..Self::default()
        }
    }
}
