use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use rawcap_preview::image_pipeline::{
    AnnotationStyle, CfaPattern, EdgePolicy, MetadataSource, SequencerConfig, SinkMode,
};

#[derive(Parser, Debug)]
#[command(
    name = "rawcap_preview",
    about = "Turn a directory of raw Bayer TIFF frames into an annotated preview video"
)]
pub struct Cli {
    /// Directory holding the captured frames.
    #[arg(short, long, default_value = "./")]
    pub input: PathBuf,

    /// Extension of frame files, without the dot.
    #[arg(long, default_value = "tiff")]
    pub extension: String,

    /// Output video file.
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// How frames reach the encoder: `stream` (pipe) or `files` (numbered JPEGs).
    #[arg(short, long, default_value = "stream")]
    pub mode: SinkMode,

    /// Directory for numbered JPEGs in `files` mode.
    #[arg(long, default_value = "preview")]
    pub frames_dir: PathBuf,

    /// Only write the numbered JPEGs; do not run the encoder. Requires `--mode files`.
    #[arg(long)]
    pub no_encode: bool,

    /// Output frame rate.
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// JPEG quality of the numbered frames (1-100). Unused in `stream` mode.
    #[arg(long, default_value_t = 95)]
    pub quality: u8,

    /// ffmpeg executable.
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Metadata lookup: `marker` (byte scan) or `tag` (decoded ImageDescription).
    #[arg(long, default_value = "marker")]
    pub metadata: MetadataSource,

    /// Marker text preceding the JSON payload for `marker` lookup.
    #[arg(long, default_value = "ImageDescription")]
    pub marker: String,

    /// Color filter array layout of the sensor: `bggr` or `rggb`.
    #[arg(long, default_value = "bggr")]
    pub pattern: CfaPattern,

    /// Last row/column handling: `zero` or `clamp`.
    #[arg(long, default_value = "zero")]
    pub edge: EdgePolicy,

    /// Caption font (TTF/OTF). Defaults to a system font.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Caption font size in pixels.
    #[arg(long, default_value_t = 24.0)]
    pub font_size: f32,

    /// Height of the caption band in pixels.
    #[arg(long, default_value_t = 40)]
    pub band_height: u32,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Rejects flag combinations the selected sink cannot honor.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.no_encode && self.mode == SinkMode::Stream {
            bail!("--no-encode only applies to `--mode files`; stream mode always encodes");
        }
        Ok(())
    }

    pub fn to_config(&self) -> SequencerConfig {
        let annotation = AnnotationStyle {
            band_height: self.band_height,
            font_size: self.font_size,
            font_path: self.font.clone(),
            ..AnnotationStyle::default()
        };

        SequencerConfig::builder()
            .input_dir(&self.input)
            .input_extension(self.extension.as_str())
            .output_path(&self.output)
            .sink_mode(self.mode)
            .frames_dir(&self.frames_dir)
            .run_encoder(!self.no_encode)
            .frame_rate(self.fps)
            .jpeg_quality(self.quality)
            .ffmpeg_path(&self.ffmpeg)
            .metadata_source(self.metadata)
            .metadata_marker(self.marker.as_str())
            .cfa_pattern(self.pattern)
            .edge_policy(self.edge)
            .annotation(annotation)
            .build()
    }
}
