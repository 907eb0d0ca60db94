//! Image processing pipeline module
//!
//! Turns a directory of Bayer-mosaic capture frames into an annotated video:
//! RAW reading, metadata extraction, debayering, captioning and video output,
//! with the sequencing logic in `conversions`.

pub mod annotate;
pub mod common;
pub mod conversions;
pub mod debayer;
pub mod metadata;
pub mod raw;
pub mod video;

pub use common::{
    PipelineError,
    PipelineTimings,
    Result,
};

pub use raw::{
    RawFrame,
    RawFrameReader,
    TiffFrameReader,
};

pub use metadata::{
    FrameMetadata,
    MarkerScanReader,
    MetadataReader,
    MetadataSource,
    TiffTagReader,
};

pub use debayer::{
    CfaPattern,
    ColorFrame,
    CpuDebayer,
    EdgePolicy,
};

pub use annotate::{
    AnnotationStyle,
    FrameAnnotator,
};

pub use video::{
    EncoderSettings,
    FileSequenceSink,
    SinkMode,
    StreamSink,
    VideoSink,
};

pub use conversions::{
    FrameSequencer,
    SequenceReport,
    SequencerConfig,
    SequencerConfigBuilder,
    SkipReason,
};
