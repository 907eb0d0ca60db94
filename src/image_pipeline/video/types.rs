//! Video output configuration types

use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SinkMode {
    /// Pipe raw frames into the encoder as they are produced
    #[default]
    Stream,
    /// Write numbered JPEG files, then run the encoder over them
    FileSequence,
}

impl FromStr for SinkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            "files" | "file-sequence" => Ok(Self::FileSequence),
            other => Err(format!("unknown sink mode '{other}' (expected stream or files)")),
        }
    }
}

/// How the external encoder is invoked
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    /// Encoder executable, resolved through PATH when relative
    pub ffmpeg_path: PathBuf,
    pub frame_rate: u32,
    /// Final video file
    pub output_path: PathBuf,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            frame_rate: 30,
            output_path: PathBuf::from("output.mp4"),
        }
    }
}

/// H.264 in 8-bit 4:2:0, shared by both sinks
pub(crate) const OUTPUT_CODEC_ARGS: [&str; 4] = ["-c:v", "libx264", "-pix_fmt", "yuv420p"];
