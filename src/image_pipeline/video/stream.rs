use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::ColorFrame;
use crate::image_pipeline::video::sink::{VideoSink, check_order};
use crate::image_pipeline::video::types::{EncoderSettings, OUTPUT_CODEC_ARGS};

struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
}

/// Streams raw RGB24 frames into the stdin of an ffmpeg child process.
///
/// The encoder is spawned on the first frame, sized to that frame; every later
/// frame must have the same dimensions.
pub struct StreamSink {
    settings: EncoderSettings,
    encoder: Option<Encoder>,
    last_index: usize,
    written: usize,
}

impl StreamSink {
    pub fn new(settings: EncoderSettings) -> Self {
        Self {
            settings,
            encoder: None,
            last_index: 0,
            written: 0,
        }
    }

    fn spawn(&self, width: u32, height: u32) -> Result<Encoder> {
        info!(
            encoder = %self.settings.ffmpeg_path.display(),
            output = %self.settings.output_path.display(),
            width,
            height,
            fps = self.settings.frame_rate,
            "Spawning video encoder"
        );

        let mut child = Command::new(&self.settings.ffmpeg_path)
            .args(["-y", "-v", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", format!("{width}x{height}").as_str()])
            .args(["-framerate", self.settings.frame_rate.to_string().as_str()])
            .args(["-i", "pipe:0"])
            .args(OUTPUT_CODEC_ARGS)
            .arg(&self.settings.output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| {
                PipelineError::EncoderError(format!(
                    "failed to spawn {}: {}",
                    self.settings.ffmpeg_path.display(),
                    e
                ))
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            PipelineError::EncoderError("encoder stdin not available".to_string())
        })?;

        Ok(Encoder {
            child,
            stdin: Some(stdin),
            width,
            height,
        })
    }
}

impl VideoSink for StreamSink {
    fn write_frame(&mut self, index: usize, frame: &ColorFrame) -> Result<()> {
        check_order(self.last_index, index)?;

        let (width, height) = frame.dimensions();
        if self.encoder.is_none() {
            self.encoder = Some(self.spawn(width, height)?);
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(PipelineError::EncoderError("encoder not running".to_string()));
        };

        if (width, height) != (encoder.width, encoder.height) {
            warn!(
                index,
                width,
                height,
                expected_width = encoder.width,
                expected_height = encoder.height,
                "Frame size differs from the stream size"
            );
            return Err(PipelineError::InvalidDimensions(width as usize, height as usize));
        }

        let stdin = encoder
            .stdin
            .as_mut()
            .ok_or_else(|| PipelineError::EncoderError("encoder stdin closed".to_string()))?;
        stdin.write_all(frame.as_raw()).map_err(|e| {
            PipelineError::EncoderError(format!("failed to write frame {index}: {e}"))
        })?;

        debug!(index, "Streamed frame");
        self.last_index = index;
        self.written += 1;
        Ok(())
    }

    #[instrument(skip(self), fields(frames = self.written))]
    fn finish(&mut self) -> Result<Option<PathBuf>> {
        let Some(mut encoder) = self.encoder.take() else {
            warn!("No frames were streamed, no video produced");
            return Ok(None);
        };

        // Closing stdin signals end of stream.
        drop(encoder.stdin.take());
        let status = encoder.child.wait()?;
        if !status.success() {
            return Err(PipelineError::EncoderError(format!(
                "{} exited with {}",
                self.settings.ffmpeg_path.display(),
                status
            )));
        }

        info!(output = %self.settings.output_path.display(), "Video encoding complete");
        Ok(Some(self.settings.output_path.clone()))
    }
}

impl Drop for StreamSink {
    fn drop(&mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            warn!("Video encoder dropped before finish, killing it");
            drop(encoder.stdin.take());
            let _ = encoder.child.kill();
            let _ = encoder.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn missing_encoder() -> EncoderSettings {
        EncoderSettings {
            ffmpeg_path: PathBuf::from("/nonexistent/bin/ffmpeg"),
            ..EncoderSettings::default()
        }
    }

    #[test]
    fn test_finish_without_frames_produces_nothing() {
        let mut sink = StreamSink::new(missing_encoder());

        assert_eq!(sink.finish().unwrap(), None);
    }

    #[test]
    fn test_spawn_failure_is_encoder_error() {
        let mut sink = StreamSink::new(missing_encoder());
        let frame = ColorFrame::from_pixel(4, 4, Rgb([1, 2, 3]));

        let result = sink.write_frame(1, &frame);

        assert!(matches!(result, Err(PipelineError::EncoderError(_))));
    }

    #[test]
    fn test_index_zero_is_out_of_order() {
        let mut sink = StreamSink::new(missing_encoder());
        let frame = ColorFrame::from_pixel(4, 4, Rgb([1, 2, 3]));

        let result = sink.write_frame(0, &frame);

        assert!(matches!(result, Err(PipelineError::OutOfOrder { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_streams_frames_sized_to_the_first_one() {
        use crate::image_pipeline::video::test_support::{fake_encoder, recorded_args};

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let settings = EncoderSettings {
            ffmpeg_path: fake_encoder(dir.path(), r#"cat > "$last""#),
            output_path: output.clone(),
            ..EncoderSettings::default()
        };
        let mut sink = StreamSink::new(settings);
        let first = ColorFrame::from_pixel(4, 2, Rgb([1, 2, 3]));
        let second = ColorFrame::from_pixel(4, 2, Rgb([7, 8, 9]));

        sink.write_frame(1, &first).unwrap();
        sink.write_frame(2, &second).unwrap();
        let mismatch = sink.write_frame(3, &ColorFrame::from_pixel(2, 2, Rgb([0, 0, 0])));
        let finished = sink.finish().unwrap();

        assert!(matches!(mismatch, Err(PipelineError::InvalidDimensions(2, 2))));
        assert_eq!(finished, Some(output.clone()));

        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len(), 48);
        assert_eq!(&written[..24], first.as_raw().as_slice());
        assert_eq!(&written[24..], second.as_raw().as_slice());

        let output_arg = output.display().to_string();
        let mut expected = vec![
            "-y", "-v", "error", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s", "4x2",
            "-framerate", "30", "-i", "pipe:0", "-c:v", "libx264", "-pix_fmt", "yuv420p",
        ];
        expected.push(&output_arg);
        assert_eq!(recorded_args(dir.path()), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_encoder_is_reported_on_finish() {
        use crate::image_pipeline::video::test_support::fake_encoder;

        let dir = tempfile::tempdir().unwrap();
        let settings = EncoderSettings {
            ffmpeg_path: fake_encoder(dir.path(), "cat > /dev/null; exit 3"),
            output_path: dir.path().join("out.mp4"),
            ..EncoderSettings::default()
        };
        let mut sink = StreamSink::new(settings);

        sink.write_frame(1, &ColorFrame::from_pixel(4, 2, Rgb([1, 2, 3])))
            .unwrap();

        assert!(matches!(sink.finish(), Err(PipelineError::EncoderError(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_drop_kills_running_encoder() {
        use crate::image_pipeline::video::test_support::fake_encoder;
        use std::time::{Duration, Instant};

        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let body = format!("echo $$ > '{}'\nexec sleep 30", pid_file.display());
        let settings = EncoderSettings {
            ffmpeg_path: fake_encoder(dir.path(), &body),
            output_path: dir.path().join("out.mp4"),
            ..EncoderSettings::default()
        };
        let mut sink = StreamSink::new(settings);
        sink.write_frame(1, &ColorFrame::from_pixel(4, 2, Rgb([1, 2, 3])))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let pid = loop {
            if let Ok(pid) = std::fs::read_to_string(&pid_file) {
                if !pid.trim().is_empty() {
                    break pid.trim().to_string();
                }
            }
            assert!(Instant::now() < deadline, "encoder never started");
            std::thread::sleep(Duration::from_millis(10));
        };

        drop(sink);

        assert!(!std::path::Path::new("/proc").join(&pid).exists());
    }
}
