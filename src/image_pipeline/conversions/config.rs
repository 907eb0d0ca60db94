//! Frame sequencer configuration types

use std::path::PathBuf;

use crate::image_pipeline::annotate::AnnotationStyle;
use crate::image_pipeline::debayer::{CfaPattern, EdgePolicy};
use crate::image_pipeline::metadata::{DEFAULT_MARKER, MetadataSource};
use crate::image_pipeline::video::{EncoderSettings, SinkMode};

/// Configuration for a raw-frames-to-video run
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerConfig {
    /// Directory holding the raw frames
    pub input_dir: PathBuf,
    /// Extension of raw frame files, without the dot (matched case-sensitively)
    pub input_extension: String,
    /// Final video file
    pub output_path: PathBuf,
    /// Stream into the encoder, or go through numbered image files
    pub sink_mode: SinkMode,
    /// Where numbered frames go in file-sequence mode
    pub frames_dir: PathBuf,
    pub frame_rate: u32,
    /// JPEG quality for file-sequence frames (1 - 100)
    pub jpeg_quality: u8,
    /// File-sequence mode only: run the encoder after writing frames
    pub run_encoder: bool,
    pub ffmpeg_path: PathBuf,
    pub metadata_source: MetadataSource,
    /// Marker searched for when `metadata_source` is `Marker`
    pub metadata_marker: String,
    pub cfa_pattern: CfaPattern,
    pub edge_policy: EdgePolicy,
    pub annotation: AnnotationStyle,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        let encoder = EncoderSettings::default();
        Self {
            input_dir: PathBuf::from("./"),
            input_extension: "tiff".to_string(),
            output_path: encoder.output_path,
            sink_mode: SinkMode::default(),
            frames_dir: PathBuf::from("preview"),
            frame_rate: encoder.frame_rate,
            jpeg_quality: 95,
            run_encoder: true,
            ffmpeg_path: encoder.ffmpeg_path,
            metadata_source: MetadataSource::default(),
            metadata_marker: DEFAULT_MARKER.to_string(),
            cfa_pattern: CfaPattern::default(),
            edge_policy: EdgePolicy::default(),
            annotation: AnnotationStyle::default(),
        }
    }
}

impl SequencerConfig {
    pub fn builder() -> SequencerConfigBuilder {
        SequencerConfigBuilder::default()
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            ffmpeg_path: self.ffmpeg_path.clone(),
            frame_rate: self.frame_rate,
            output_path: self.output_path.clone(),
        }
    }
}

/// Builder for SequencerConfig
#[derive(Default)]
pub struct SequencerConfigBuilder {
    input_dir: Option<PathBuf>,
    input_extension: Option<String>,
    output_path: Option<PathBuf>,
    sink_mode: Option<SinkMode>,
    frames_dir: Option<PathBuf>,
    frame_rate: Option<u32>,
    jpeg_quality: Option<u8>,
    run_encoder: Option<bool>,
    ffmpeg_path: Option<PathBuf>,
    metadata_source: Option<MetadataSource>,
    metadata_marker: Option<String>,
    cfa_pattern: Option<CfaPattern>,
    edge_policy: Option<EdgePolicy>,
    annotation: Option<AnnotationStyle>,
}

impl SequencerConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    pub fn input_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.input_extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn sink_mode(mut self, mode: SinkMode) -> Self {
        self.sink_mode = Some(mode);
        self
    }

    pub fn frames_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frames_dir = Some(dir.into());
        self
    }

    pub fn frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = Some(fps);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    pub fn run_encoder(mut self, enable: bool) -> Self {
        self.run_encoder = Some(enable);
        self
    }

    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    pub fn metadata_source(mut self, source: MetadataSource) -> Self {
        self.metadata_source = Some(source);
        self
    }

    pub fn metadata_marker(mut self, marker: impl Into<String>) -> Self {
        self.metadata_marker = Some(marker.into());
        self
    }

    pub fn cfa_pattern(mut self, pattern: CfaPattern) -> Self {
        self.cfa_pattern = Some(pattern);
        self
    }

    pub fn edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = Some(policy);
        self
    }

    pub fn annotation(mut self, style: AnnotationStyle) -> Self {
        self.annotation = Some(style);
        self
    }

    pub fn build(self) -> SequencerConfig {
        let default = SequencerConfig::default();
        SequencerConfig {
            input_dir: self.input_dir.unwrap_or(default.input_dir),
            input_extension: self.input_extension.unwrap_or(default.input_extension),
            output_path: self.output_path.unwrap_or(default.output_path),
            sink_mode: self.sink_mode.unwrap_or(default.sink_mode),
            frames_dir: self.frames_dir.unwrap_or(default.frames_dir),
            frame_rate: self.frame_rate.unwrap_or(default.frame_rate).max(1),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality).clamp(1, 100),
            run_encoder: self.run_encoder.unwrap_or(default.run_encoder),
            ffmpeg_path: self.ffmpeg_path.unwrap_or(default.ffmpeg_path),
            metadata_source: self.metadata_source.unwrap_or(default.metadata_source),
            metadata_marker: self.metadata_marker.unwrap_or(default.metadata_marker),
            cfa_pattern: self.cfa_pattern.unwrap_or(default.cfa_pattern),
            edge_policy: self.edge_policy.unwrap_or(default.edge_policy),
            annotation: self.annotation.unwrap_or(default.annotation),
        }
    }
}
