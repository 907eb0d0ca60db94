//! RAW frame reader implementation using the tiff library.
//!
//! Capture frames are stored as baseline TIFF files holding the undemosaiced
//! sensor mosaic as a grayscale image. 8-bit frames are passed through; 16-bit
//! frames are reduced to their high byte, which is how the capture tool
//! produces its 8-bit variant. Any other sample layout is decoded as-is and
//! reported with its real channel count, so the debayer stage can refuse it.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::RawFrame;

/// Frame reader backed by the `tiff` decoder.
pub struct TiffFrameReader;

impl RawFrameReader for TiffFrameReader {
    /// Decodes the first image of a TIFF container into a [`RawFrame`].
    ///
    /// # Returns
    ///
    /// * `Ok(RawFrame)` - Decoded samples with their channel count
    /// * `Err(PipelineError::DecodeError)` - The container could not be decoded
    /// * `Err(PipelineError::UnsupportedFormat)` - Sample type is neither 8 nor 16 bit
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame> {
        debug!("Decoding TIFF frame, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let colortype = decoder
            .colortype()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let (width, height) = (width as usize, height as usize);

        let samples: Vec<u8> = match decoder
            .read_image()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?
        {
            DecodingResult::U8(values) => values,
            DecodingResult::U16(values) => values.iter().map(|&v| (v >> 8) as u8).collect(),
            _ => {
                return Err(PipelineError::UnsupportedFormat(format!(
                    "{colortype:?} samples"
                )));
            }
        };

        let pixels = width * height;
        if pixels == 0 || samples.len() % pixels != 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        let channels = samples.len() / pixels;

        debug!(width, height, channels, ?colortype, "Decoded frame");

        Ok(RawFrame {
            width,
            height,
            channels,
            data: samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{TiffEncoder, colortype};

    fn encode<C: colortype::ColorType>(width: u32, height: u32, data: &[C::Inner]) -> Vec<u8>
    where
        [C::Inner]: tiff::encoder::TiffValue,
    {
        let mut buffer = Vec::new();
        TiffEncoder::new(Cursor::new(&mut buffer))
            .unwrap()
            .write_image::<C>(width, height, data)
            .unwrap();
        buffer
    }

    #[test]
    fn test_reads_gray8_frame() {
        let data: Vec<u8> = (0..12).collect();
        let bytes = encode::<colortype::Gray8>(4, 3, &data);

        let frame = TiffFrameReader.read_frame(&bytes).unwrap();

        assert_eq!((frame.width, frame.height, frame.channels), (4, 3, 1));
        assert_eq!(frame.data, data);
        assert_eq!(frame.sample(1, 2), 9);
    }

    #[test]
    fn test_gray16_keeps_high_byte() {
        let data: Vec<u16> = vec![0x0000, 0x01ff, 0x8000, 0xffff];
        let bytes = encode::<colortype::Gray16>(2, 2, &data);

        let frame = TiffFrameReader.read_frame(&bytes).unwrap();

        assert!(frame.is_single_channel());
        assert_eq!(frame.data, vec![0x00, 0x01, 0x80, 0xff]);
    }

    #[test]
    fn test_rgb_frame_reports_three_channels() {
        let data = vec![10u8; 2 * 2 * 3];
        let bytes = encode::<colortype::RGB8>(2, 2, &data);

        let frame = TiffFrameReader.read_frame(&bytes).unwrap();

        assert_eq!(frame.channels, 3);
        assert!(!frame.is_single_channel());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = TiffFrameReader.read_frame(b"definitely not a tiff");

        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }
}
