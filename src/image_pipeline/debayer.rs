//! Debayering module for reconstructing RGB frames from a Bayer mosaic

pub mod cfa;
pub mod cpu_debayer;
pub mod types;

pub use cfa::{CfaTile, Sample, SiteRule};
pub use cpu_debayer::CpuDebayer;
pub use types::{CfaPattern, ColorFrame, EdgePolicy};
