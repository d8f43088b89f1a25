// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Carrier format detection and the external image-codec boundary.
//!
//! The core never parses or encodes image files itself; a linking program
//! supplies an [`ImageCodec`]. What the core does own is format detection:
//! a fixed handler list, each with a name and a magic-byte sniffer, walked in
//! order until one claims the bytes.

use crate::error::StegoError;
use crate::jpeg::JpegCoefficients;
use crate::pixel::PixelImage;

/// One recognised carrier format.
pub struct FormatHandler {
    /// Canonical lowercase format name (`"jpeg"`, `"png"`, …).
    pub name: &'static str,
    /// Returns `true` if `bytes` start like this format.
    pub can_decode: fn(&[u8]) -> bool,
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.len() >= 3 && bytes[0] == 0xFF && bytes[1] == 0xD8 && bytes[2] == 0xFF
}

fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
}

fn is_gif(bytes: &[u8]) -> bool {
    bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")
}

fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP"
}

fn is_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
}

fn is_bmp(bytes: &[u8]) -> bool {
    bytes.starts_with(b"BM")
}

/// Registered handlers, walked in order by [`detect_format`].
pub const HANDLERS: &[FormatHandler] = &[
    FormatHandler { name: "jpeg", can_decode: is_jpeg },
    FormatHandler { name: "png", can_decode: is_png },
    FormatHandler { name: "gif", can_decode: is_gif },
    FormatHandler { name: "webp", can_decode: is_webp },
    FormatHandler { name: "tiff", can_decode: is_tiff },
    FormatHandler { name: "bmp", can_decode: is_bmp },
];

/// Identify a carrier format from its leading bytes.
///
/// # Errors
/// [`StegoError::UnsupportedFormat`] if no handler claims the bytes.
pub fn detect_format(bytes: &[u8]) -> Result<&'static str, StegoError> {
    HANDLERS
        .iter()
        .find(|h| (h.can_decode)(bytes))
        .map(|h| h.name)
        .ok_or(StegoError::UnsupportedFormat)
}

/// The image codec capability a linking program provides.
///
/// Single-frame formats round-trip through [`PixelImage`]; animated and paged
/// containers through frame vectors; JPEG through its quantized coefficients.
pub trait ImageCodec {
    /// Decode a single-frame image to RGBA.
    fn decode(&self, bytes: &[u8]) -> Result<PixelImage, StegoError>;
    /// Encode RGBA to the named format (losslessly for stego carriers).
    fn encode(&self, image: &PixelImage, format: &str) -> Result<Vec<u8>, StegoError>;
    /// Decode every frame of an animated or paged container, in order.
    fn decode_frames(&self, bytes: &[u8]) -> Result<Vec<PixelImage>, StegoError>;
    /// Re-encode frames into the named container, preserving metadata of
    /// frames the caller did not modify.
    fn encode_frames(&self, frames: &[PixelImage], format: &str) -> Result<Vec<u8>, StegoError>;
    /// Parse a JPEG into its quantized DCT coefficients.
    fn extract_coefficients(&self, bytes: &[u8]) -> Result<JpegCoefficients, StegoError>;
    /// Re-encode (possibly modified) coefficients into a JPEG byte stream.
    fn encode_from_coefficients(&self, coeffs: &JpegCoefficients) -> Result<Vec<u8>, StegoError>;
}
