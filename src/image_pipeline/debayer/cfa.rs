//! Per-site interpolation rules for a 2x2 color filter array tile.
//!
//! A tile maps the parity `(y % 2, x % 2)` of an output pixel to the recipe for
//! each of its three channels. Offsets are `(dx, dy)` relative to the pixel.

use crate::image_pipeline::debayer::types::CfaPattern;
use crate::image_pipeline::raw::RawFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// Copy the sample at the offset.
    At(isize, isize),
    /// Truncating mean of the samples at two offsets.
    Mean((isize, isize), (isize, isize)),
}

impl Sample {
    /// Evaluates the recipe at `(x, y)`. Neighbors outside the frame read as 0.
    #[inline]
    pub fn eval(self, frame: &RawFrame, x: usize, y: usize) -> u8 {
        match self {
            Sample::At(dx, dy) => fetch(frame, x, y, dx, dy),
            Sample::Mean((ax, ay), (bx, by)) => {
                let a = fetch(frame, x, y, ax, ay) as u16;
                let b = fetch(frame, x, y, bx, by) as u16;
                ((a + b) / 2) as u8
            }
        }
    }
}

#[inline]
fn fetch(frame: &RawFrame, x: usize, y: usize, dx: isize, dy: isize) -> u8 {
    match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
        (Some(sx), Some(sy)) if sx < frame.width && sy < frame.height => frame.sample(sx, sy),
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteRule {
    pub red: Sample,
    pub green: Sample,
    pub blue: Sample,
}

impl SiteRule {
    const fn swap_red_blue(self) -> Self {
        Self {
            red: self.blue,
            green: self.green,
            blue: self.red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfaTile {
    /// Indexed `[y % 2][x % 2]`
    sites: [[SiteRule; 2]; 2],
}

const BLUE_SITE: SiteRule = SiteRule {
    red: Sample::At(1, 1),
    green: Sample::Mean((1, 0), (0, 1)),
    blue: Sample::At(0, 0),
};

const GREEN_ON_BLUE_ROW: SiteRule = SiteRule {
    red: Sample::Mean((0, 1), (1, 1)),
    green: Sample::At(0, 0),
    blue: Sample::Mean((-1, 0), (1, 0)),
};

const GREEN_ON_RED_ROW: SiteRule = SiteRule {
    red: Sample::Mean((-1, 0), (1, 0)),
    green: Sample::At(0, 0),
    blue: Sample::Mean((0, -1), (1, -1)),
};

const RED_SITE: SiteRule = SiteRule {
    red: Sample::At(0, 0),
    green: Sample::Mean((-1, 0), (0, -1)),
    blue: Sample::At(-1, -1),
};

impl CfaTile {
    pub const BGGR: CfaTile = CfaTile {
        sites: [
            [BLUE_SITE, GREEN_ON_BLUE_ROW],
            [GREEN_ON_RED_ROW, RED_SITE],
        ],
    };

    /// Same geometry as BGGR with the red and blue filters exchanged.
    pub const RGGB: CfaTile = CfaTile {
        sites: [
            [BLUE_SITE.swap_red_blue(), GREEN_ON_BLUE_ROW.swap_red_blue()],
            [GREEN_ON_RED_ROW.swap_red_blue(), RED_SITE.swap_red_blue()],
        ],
    };

    pub fn for_pattern(pattern: CfaPattern) -> Self {
        match pattern {
            CfaPattern::Bggr => Self::BGGR,
            CfaPattern::Rggb => Self::RGGB,
        }
    }

    #[inline]
    pub fn rule(&self, x: usize, y: usize) -> &SiteRule {
        &self.sites[y % 2][x % 2]
    }
}
