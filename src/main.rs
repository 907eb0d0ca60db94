mod cli;

use anyhow::Context;
use clap::Parser;
use rawcap_preview::image_pipeline::FrameSequencer;
use rawcap_preview::logger::{self, error, info, warn};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    cli.validate()?;
    logger::init(if cli.verbose { "debug" } else { "info" });

    info!("Starting rawcap_preview...");

    let config = cli.to_config();
    info!(
        input = %config.input_dir.display(),
        output = %config.output_path.display(),
        mode = ?config.sink_mode,
        fps = config.frame_rate,
        "Configuration loaded"
    );

    let sequencer = FrameSequencer::new(config).context("failed to initialize pipeline")?;
    let mut sink = sequencer
        .open_sink()
        .context("failed to open video output")?;

    let report = match sequencer.run(sink.as_mut()) {
        Ok(report) => report,
        Err(e) => {
            error!("Processing failed: {}", e);
            return Err(e).context("frame pipeline aborted");
        }
    };

    if !report.skipped.is_empty() {
        warn!(
            dropped = report.skipped.len(),
            discovered = report.discovered,
            "Some frames were dropped"
        );
    }

    match &report.output {
        Some(path) => info!(
            frames = report.emitted.len(),
            output = %path.display(),
            "Video written"
        ),
        None => info!(
            frames = report.emitted.len(),
            "Finished without encoding a video"
        ),
    }

    Ok(())
}
