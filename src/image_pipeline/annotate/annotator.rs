use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::Rgb;
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, info, warn};

use crate::image_pipeline::annotate::types::AnnotationStyle;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::ColorFrame;
use crate::image_pipeline::metadata::FrameMetadata;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Caption text for the frame at 1-based `index` of `total` discovered frames.
pub fn caption(meta: &FrameMetadata, index: usize, total: usize) -> String {
    format!(
        "Frame {}/{}, Time {:.3} s",
        index, total, meta.relative_time
    )
}

/// Draws the caption band. Without a font only the band background is drawn.
pub struct FrameAnnotator {
    style: AnnotationStyle,
    font: Option<FontVec>,
}

impl FrameAnnotator {
    /// Loads the configured font, or the first system font found.
    ///
    /// An explicitly configured font that cannot be loaded is an error; a
    /// missing system font only costs the caption text.
    pub fn new(style: AnnotationStyle) -> Result<Self> {
        let font = match &style.font_path {
            Some(path) => Some(load_font(path)?),
            None => {
                let found = SYSTEM_FONTS
                    .iter()
                    .map(Path::new)
                    .filter(|path| path.exists())
                    .find_map(|path| load_font(path).ok());
                if found.is_none() {
                    warn!("no system font found, captions will be drawn without text");
                }
                found
            }
        };
        Ok(Self::with_font(style, font))
    }

    pub fn with_font(style: AnnotationStyle, font: Option<FontVec>) -> Self {
        Self { style, font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Darkens the bottom band and centers the caption in it. Returns the caption.
    pub fn annotate(
        &self,
        frame: &mut ColorFrame,
        meta: &FrameMetadata,
        index: usize,
        total: usize,
    ) -> String {
        let (width, height) = frame.dimensions();
        let band_top = height.saturating_sub(self.style.band_height);

        for y in band_top..height {
            for x in 0..width {
                let pixel = frame.get_pixel_mut(x, y);
                for channel in pixel.0.iter_mut() {
                    *channel = darken(*channel, self.style.band_opacity);
                }
            }
        }

        let text = caption(meta, index, total);
        let Some(font) = &self.font else { return text };
        let scale = PxScale::from(self.style.font_size);
        let (text_w, text_h) = text_size(scale, font, &text);
        let (x, y) = self.text_origin(width, height, text_w, text_h);

        draw_text_mut(frame, TEXT_COLOR, x, y, scale, font, &text);
        debug!(index, %text, "caption drawn");
        text
    }

    /// Top-left corner that centers a `text_w` x `text_h` box inside the band.
    pub fn text_origin(&self, width: u32, height: u32, text_w: u32, text_h: u32) -> (i32, i32) {
        let band_top = height.saturating_sub(self.style.band_height) as i32;
        let band_h = height.min(self.style.band_height) as i32;
        let x = (width as i32 - text_w as i32) / 2;
        let y = band_top + (band_h - text_h as i32) / 2;
        (x, y)
    }
}

/// Composites black at `opacity` over `value`.
fn darken(value: u8, opacity: f32) -> u8 {
    let keep = (1.0 - opacity.clamp(0.0, 1.0)) * value as f32;
    keep.round() as u8
}

fn load_font(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path)
        .map_err(|e| PipelineError::FontError(format!("{}: {}", path.display(), e)))?;
    let font = FontVec::try_from_vec(data)
        .map_err(|e| PipelineError::FontError(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), "loaded caption font");
    Ok(font)
}
