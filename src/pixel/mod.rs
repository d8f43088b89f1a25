// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Pixel-domain embedding for lossless raster carriers.
//!
//! [`lsb`] hides a bit stream in the low bits of the R, G, and B channels of
//! an RGBA buffer; the alpha channel is never touched, so transparency masks
//! survive bit-exact. [`frames`] orchestrates the same engine across the
//! frames of an animated or paged container (GIF, multi-page TIFF).
//!
//! File parsing and encoding belong to an external image codec (see
//! [`crate::format`]); everything here operates on decoded RGBA buffers.

pub mod frames;
pub mod lsb;

use crate::error::StegoError;
use crate::validate::validate_dimensions;

pub use frames::{embed_frames, extract_frames, FrameMode};
pub use lsb::{
    calculate_capacity, embed_data, embed_file, embed_text, extract_data, extract_file,
    extract_text,
};

/// A decoded RGBA image: the unit all pixel engines operate on.
///
/// `rgba` holds `width × height` pixels, four bytes each, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PixelImage {
    /// Wrap a decoded RGBA buffer, validating dimensions and length.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, StegoError> {
        validate_dimensions(width, height)?;
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(StegoError::InvalidArgument(
                "RGBA buffer length does not match dimensions",
            ));
        }
        Ok(Self { width, height, rgba })
    }

    /// Byte capacity of this image at the given bit depth.
    pub fn capacity(&self, bit_depth: u8) -> Result<usize, StegoError> {
        calculate_capacity(self.width, self.height, bit_depth)
    }
}
