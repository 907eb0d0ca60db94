//! Pipeline conversions module
//!
//! Orchestrates a directory of raw frames into an ordered, annotated video.

mod config;
mod frame_sequencer;
mod report;


pub use config::{SequencerConfig, SequencerConfigBuilder};
pub use frame_sequencer::{FrameOutcome, FrameSequencer};
pub use report::{EmittedFrame, SequenceReport, SkipReason, SkippedFrame};
