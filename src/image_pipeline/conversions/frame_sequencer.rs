use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    annotate::FrameAnnotator,
    common::{
        PipelineTimings,
        error::{PipelineError, Result},
    },
    conversions::config::SequencerConfig,
    conversions::report::{EmittedFrame, SequenceReport, SkipReason, SkippedFrame},
    debayer::{ColorFrame, CpuDebayer},
    metadata::{MarkerScanReader, MetadataReader, MetadataSource, TiffTagReader},
    raw::{RawFrameReader, TiffFrameReader},
    video::{FileSequenceSink, SinkMode, StreamSink, VideoSink},
};

/// Result of running one discovered file through decode, metadata, debayer and
/// caption stages.
#[derive(Debug)]
pub enum FrameOutcome {
    Ready { frame: ColorFrame, caption: String },
    Skipped(SkipReason),
}

/// Drives every discovered raw frame through the pipeline, in filename order.
pub struct FrameSequencer<R: RawFrameReader, M: MetadataReader> {
    reader: R,
    metadata: M,
    debayer: CpuDebayer,
    annotator: FrameAnnotator,
    config: SequencerConfig,
}

impl FrameSequencer<TiffFrameReader, Box<dyn MetadataReader>> {
    pub fn new(config: SequencerConfig) -> Result<Self> {
        let metadata: Box<dyn MetadataReader> = match config.metadata_source {
            MetadataSource::Marker => {
                Box::new(MarkerScanReader::new(config.metadata_marker.clone()))
            }
            MetadataSource::TiffTag => Box::new(TiffTagReader),
        };
        let annotator = FrameAnnotator::new(config.annotation.clone())?;
        Ok(Self::with_custom(TiffFrameReader, metadata, annotator, config))
    }
}

impl<R: RawFrameReader, M: MetadataReader> FrameSequencer<R, M> {
    pub fn with_custom(
        reader: R,
        metadata: M,
        annotator: FrameAnnotator,
        config: SequencerConfig,
    ) -> Self {
        Self {
            reader,
            metadata,
            debayer: CpuDebayer::new(config.cfa_pattern, config.edge_policy),
            annotator,
            config,
        }
    }

    /// Builds the sink selected by the configuration.
    pub fn open_sink(&self) -> Result<Box<dyn VideoSink>> {
        let sink: Box<dyn VideoSink> = match self.config.sink_mode {
            SinkMode::Stream => Box::new(StreamSink::new(self.config.encoder_settings())),
            SinkMode::FileSequence => Box::new(FileSequenceSink::new(
                &self.config.frames_dir,
                self.config.jpeg_quality,
                self.config
                    .run_encoder
                    .then(|| self.config.encoder_settings()),
            )?),
        };
        Ok(sink)
    }

    /// Lists input frames in lexicographic filename order.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.input_dir;
        let entries = std::fs::read_dir(dir)
            .map_err(|e| PipelineError::InputReadError(format!("{}: {}", dir.display(), e)))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| PipelineError::InputReadError(format!("{}: {}", dir.display(), e)))?
                .path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.config.input_extension.as_str());
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    #[instrument(skip(self, sink), fields(input = %self.config.input_dir.display()))]
    pub fn run(&self, sink: &mut dyn VideoSink) -> Result<SequenceReport> {
        let files = self.discover()?;
        let total = files.len();
        if total == 0 {
            warn!(
                extension = %self.config.input_extension,
                "No input frames found"
            );
        } else {
            info!(total, "Discovered input frames");
        }

        let mut report = SequenceReport::new(total);
        let mut timings = PipelineTimings::new();

        for path in files {
            let _span = tracing::info_span!("frame", file = %path.display()).entered();
            let index = report.emitted.len() + 1;

            match self.process_frame(&path, index, total, &mut timings)? {
                FrameOutcome::Ready { frame, caption } => {
                    timings.measure("emit", || sink.write_frame(index, &frame))?;
                    report.emitted.push(EmittedFrame {
                        index,
                        path,
                        caption,
                    });
                }
                FrameOutcome::Skipped(reason) => {
                    warn!(file = %path.display(), %reason, "Skipping frame");
                    report.skipped.push(SkippedFrame { path, reason });
                }
            }
        }

        report.output = timings.measure("finish", || sink.finish())?;
        timings.log_summary();
        report.timings = timings;

        info!(
            discovered = report.discovered,
            emitted = report.emitted.len(),
            skipped = report.skipped.len(),
            "Sequence complete"
        );
        Ok(report)
    }

    /// Runs one file up to, but not including, emission.
    ///
    /// `Err` means the whole run must stop; frame-local problems come back as
    /// [`FrameOutcome::Skipped`].
    pub fn process_frame(
        &self,
        path: &Path,
        index: usize,
        total: usize,
        timings: &mut PipelineTimings,
    ) -> Result<FrameOutcome> {
        let data = timings
            .measure("read", || std::fs::read(path))
            .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;

        let raw = match timings.measure("decode", || self.reader.read_frame(&data)) {
            Ok(raw) => raw,
            Err(PipelineError::UnsupportedFormat(msg)) => {
                return Ok(FrameOutcome::Skipped(SkipReason::UnsupportedFormat(msg)));
            }
            Err(PipelineError::DecodeError(msg)) => {
                return Err(PipelineError::DecodeError(format!(
                    "{}: {}",
                    path.display(),
                    msg
                )));
            }
            Err(e) => {
                return Err(PipelineError::DecodeError(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let meta = match timings.measure("metadata", || self.metadata.read_metadata(&data)) {
            Ok(Some(meta)) => meta,
            Ok(None) => return Ok(FrameOutcome::Skipped(SkipReason::NoMetadata)),
            Err(PipelineError::MetadataError(msg)) => {
                return Ok(FrameOutcome::Skipped(SkipReason::MalformedMetadata(msg)));
            }
            Err(e) => {
                return Ok(FrameOutcome::Skipped(SkipReason::MalformedMetadata(
                    e.to_string(),
                )));
            }
        };

        let mut frame = match timings.measure("demosaic", || self.debayer.process(&raw)) {
            Ok(frame) => frame,
            Err(e) => {
                return Ok(FrameOutcome::Skipped(SkipReason::UnsupportedFormat(
                    e.to_string(),
                )));
            }
        };

        let caption = timings.measure("annotate", || {
            self.annotator.annotate(&mut frame, &meta, index, total)
        });

        Ok(FrameOutcome::Ready { frame, caption })
    }
}
