//! Video output module
//!
//! Annotated frames leave the pipeline through a [`VideoSink`]. Two backends
//! produce the same artifact: numbered JPEGs encoded afterwards by `ffmpeg`, or
//! raw RGB frames streamed straight into an `ffmpeg` child process.

mod file_sequence;
mod sink;
mod stream;
#[cfg(all(test, unix))]
mod test_support;
pub mod types;

pub use file_sequence::FileSequenceSink;
pub use sink::VideoSink;
pub use stream::StreamSink;
pub use types::{EncoderSettings, SinkMode};
