use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::cfa::CfaTile;
use crate::image_pipeline::debayer::types::{CfaPattern, ColorFrame, EdgePolicy};
use crate::image_pipeline::raw::RawFrame;

/// Bilinear two-sample debayer on the CPU.
///
/// Only pixels with `x < width - 1` and `y < height - 1` are reconstructed;
/// what ends up in the last row and column is decided by the [`EdgePolicy`].
pub struct CpuDebayer {
    tile: CfaTile,
    edge_policy: EdgePolicy,
}

impl Default for CpuDebayer {
    fn default() -> Self {
        Self::new(CfaPattern::default(), EdgePolicy::default())
    }
}

impl CpuDebayer {
    pub fn new(pattern: CfaPattern, edge_policy: EdgePolicy) -> Self {
        Self {
            tile: CfaTile::for_pattern(pattern),
            edge_policy,
        }
    }

    pub fn process(&self, raw: &RawFrame) -> Result<ColorFrame> {
        if !raw.is_single_channel() {
            return Err(PipelineError::UnsupportedFormat(format!(
                "expected a single-channel Bayer mosaic, got {} channels",
                raw.channels
            )));
        }

        let (width, height) = (raw.width, raw.height);
        if raw.data.len() != width * height {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        debug!(width, height, edge_policy = ?self.edge_policy, "Debayering frame");

        let stride = width * 3;
        let mut rgb = vec![0u8; stride * height];

        for y in 0..height.saturating_sub(1) {
            let row = &mut rgb[y * stride..(y + 1) * stride];
            for x in 0..width.saturating_sub(1) {
                let rule = self.tile.rule(x, y);
                let px = &mut row[x * 3..x * 3 + 3];
                px[0] = rule.red.eval(raw, x, y);
                px[1] = rule.green.eval(raw, x, y);
                px[2] = rule.blue.eval(raw, x, y);
            }
        }

        if self.edge_policy == EdgePolicy::Clamp && width >= 2 && height >= 2 {
            clamp_edges(&mut rgb, width, height);
        }

        ColorFrame::from_raw(width as u32, height as u32, rgb)
            .ok_or(PipelineError::InvalidDimensions(width, height))
    }
}

/// Last column takes column `width - 2`, then the last row takes row `height - 2`.
fn clamp_edges(rgb: &mut [u8], width: usize, height: usize) {
    let stride = width * 3;
    for y in 0..height - 1 {
        let row = &mut rgb[y * stride..(y + 1) * stride];
        row.copy_within((width - 2) * 3..(width - 1) * 3, (width - 1) * 3);
    }
    rgb.copy_within((height - 2) * stride..(height - 1) * stride, (height - 1) * stride);
}
