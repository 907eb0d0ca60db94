use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use image::codecs::jpeg::JpegEncoder;
use tracing::{info, instrument, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::ColorFrame;
use crate::image_pipeline::video::sink::{VideoSink, check_order};
use crate::image_pipeline::video::types::{EncoderSettings, OUTPUT_CODEC_ARGS};

/// Writes `frame_0001.jpg`, `frame_0002.jpg`, ... and optionally encodes them.
pub struct FileSequenceSink {
    frames_dir: PathBuf,
    jpeg_quality: u8,
    encoder: Option<EncoderSettings>,
    last_index: usize,
    written: usize,
}

impl FileSequenceSink {
    /// Creates `frames_dir` if needed. With `encoder: None` the sink stops
    /// after writing the image files.
    pub fn new(
        frames_dir: impl Into<PathBuf>,
        jpeg_quality: u8,
        encoder: Option<EncoderSettings>,
    ) -> Result<Self> {
        let frames_dir = frames_dir.into();
        std::fs::create_dir_all(&frames_dir).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", frames_dir.display(), e))
        })?;
        remove_stale_frames(&frames_dir)?;

        Ok(Self {
            frames_dir,
            jpeg_quality: jpeg_quality.clamp(1, 100),
            encoder,
            last_index: 0,
            written: 0,
        })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.frames_dir.join(format!("frame_{index:04}.jpg"))
    }

    fn encode(&self, settings: &EncoderSettings) -> Result<()> {
        let pattern = self.frames_dir.join("frame_%04d.jpg");
        info!(
            encoder = %settings.ffmpeg_path.display(),
            output = %settings.output_path.display(),
            fps = settings.frame_rate,
            "Encoding frame sequence"
        );

        let status = Command::new(&settings.ffmpeg_path)
            .arg("-y")
            .args(["-framerate", settings.frame_rate.to_string().as_str()])
            .arg("-i")
            .arg(&pattern)
            .args(OUTPUT_CODEC_ARGS)
            .arg(&settings.output_path)
            .status()
            .map_err(|e| {
                PipelineError::EncoderError(format!(
                    "failed to run {}: {}",
                    settings.ffmpeg_path.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(PipelineError::EncoderError(format!(
                "{} exited with {}",
                settings.ffmpeg_path.display(),
                status
            )));
        }
        Ok(())
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("frame_") && name.ends_with(".jpg"))
}

/// Deletes `frame_*.jpg` left by an earlier run, so the encoder pattern only
/// sees frames written by this sink.
fn remove_stale_frames(frames_dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(frames_dir)
        .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", frames_dir.display(), e)))?;

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if is_frame_file(&path) && path.is_file() {
            std::fs::remove_file(&path).map_err(|e| {
                PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
            })?;
            removed += 1;
        }
    }
    if removed > 0 {
        warn!(removed, dir = %frames_dir.display(), "Removed frames from a previous run");
    }
    Ok(())
}

impl VideoSink for FileSequenceSink {
    fn write_frame(&mut self, index: usize, frame: &ColorFrame) -> Result<()> {
        check_order(self.last_index, index)?;

        let path = self.frame_path(index);
        let file = File::create(&path)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);

        JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality)
            .encode_image(frame)
            .map_err(|e| PipelineError::EncodeError(format!("{}: {}", path.display(), e)))?;
        writer.flush()?;

        info!("Wrote {}", path.display());
        self.last_index = index;
        self.written += 1;
        Ok(())
    }

    #[instrument(skip(self), fields(frames = self.written))]
    fn finish(&mut self) -> Result<Option<PathBuf>> {
        let Some(settings) = &self.encoder else {
            return Ok(None);
        };
        if self.written == 0 {
            warn!("No frames were written, skipping video encoding");
            return Ok(None);
        }

        self.encode(settings)?;
        Ok(Some(settings.output_path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn frame() -> ColorFrame {
        ColorFrame::from_pixel(16, 8, Rgb([120, 30, 200]))
    }

    #[test]
    fn test_writes_zero_padded_jpegs() {
        let dir = tempfile::tempdir().unwrap();
        let frames_dir = dir.path().join("preview");
        let mut sink = FileSequenceSink::new(&frames_dir, 95, None).unwrap();

        sink.write_frame(1, &frame()).unwrap();
        sink.write_frame(2, &frame()).unwrap();

        assert!(frames_dir.join("frame_0001.jpg").exists());
        assert!(frames_dir.join("frame_0002.jpg").exists());
        let decoded = image::open(frames_dir.join("frame_0002.jpg")).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert_eq!(sink.finish().unwrap(), None);
    }

    #[test]
    fn test_rejects_out_of_order_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSequenceSink::new(dir.path(), 95, None).unwrap();

        sink.write_frame(2, &frame()).unwrap();
        let result = sink.write_frame(2, &frame());

        assert!(matches!(
            result,
            Err(PipelineError::OutOfOrder { index: 2, last: 2 })
        ));
    }

    #[test]
    fn test_finish_without_frames_skips_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EncoderSettings {
            ffmpeg_path: dir.path().join("missing-ffmpeg"),
            ..EncoderSettings::default()
        };
        let mut sink = FileSequenceSink::new(dir.path(), 95, Some(settings)).unwrap();

        assert_eq!(sink.finish().unwrap(), None);
    }

    #[test]
    fn test_missing_encoder_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EncoderSettings {
            ffmpeg_path: dir.path().join("missing-ffmpeg"),
            ..EncoderSettings::default()
        };
        let mut sink = FileSequenceSink::new(dir.path(), 95, Some(settings)).unwrap();
        sink.write_frame(1, &frame()).unwrap();

        let result = sink.finish();

        assert!(matches!(result, Err(PipelineError::EncoderError(_))));
    }

    #[test]
    fn test_new_removes_frames_from_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("frame_0003.jpg"), b"stale").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        let mut sink = FileSequenceSink::new(dir.path(), 95, None).unwrap();
        sink.write_frame(1, &frame()).unwrap();

        assert!(dir.path().join("frame_0001.jpg").exists());
        assert!(!dir.path().join("frame_0003.jpg").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_finish_encodes_the_sequence() {
        use crate::image_pipeline::video::test_support::{fake_encoder, recorded_args};

        let dir = tempfile::tempdir().unwrap();
        let frames_dir = dir.path().join("preview");
        let output = dir.path().join("out.mp4");
        let settings = EncoderSettings {
            ffmpeg_path: fake_encoder(dir.path(), r#": > "$last""#),
            output_path: output.clone(),
            ..EncoderSettings::default()
        };
        let mut sink = FileSequenceSink::new(&frames_dir, 95, Some(settings)).unwrap();
        sink.write_frame(1, &frame()).unwrap();
        sink.write_frame(2, &frame()).unwrap();

        assert_eq!(sink.finish().unwrap(), Some(output.clone()));
        assert!(output.exists());

        let pattern = frames_dir.join("frame_%04d.jpg").display().to_string();
        let output_arg = output.display().to_string();
        assert_eq!(
            recorded_args(dir.path()),
            [
                "-y", "-framerate", "30", "-i", pattern.as_str(), "-c:v", "libx264", "-pix_fmt",
                "yuv420p", output_arg.as_str(),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_encoder_exit_status_is_checked() {
        use crate::image_pipeline::video::test_support::fake_encoder;

        let dir = tempfile::tempdir().unwrap();
        let settings = EncoderSettings {
            ffmpeg_path: fake_encoder(dir.path(), "exit 1"),
            output_path: dir.path().join("out.mp4"),
            ..EncoderSettings::default()
        };
        let mut sink =
            FileSequenceSink::new(dir.path().join("preview"), 95, Some(settings)).unwrap();
        sink.write_frame(1, &frame()).unwrap();

        assert!(matches!(sink.finish(), Err(PipelineError::EncoderError(_))));
    }
}
