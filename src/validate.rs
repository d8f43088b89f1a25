// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Pre-flight validation, capacity policy, and filename hygiene.
//!
//! Every embed entry point runs two capacity checks: an estimated one before
//! compression/encryption (cheap, heuristic) and an exact one after. Both are
//! gated by [`EmbedOptions::strict_capacity`] — strict mode fails with
//! [`StegoError::CapacityExceeded`], non-strict mode records a
//! [`CapacityWarning`] and proceeds, accepting that the carrier may not be
//! extractable.

use core::fmt;

use crate::codec::payload::PayloadKind;
use crate::error::StegoError;

/// Maximum secret length for text embedding, in bytes.
pub const MAX_SECRET_LENGTH: usize = 50_000;
/// Maximum cover text length, in characters.
pub const MAX_COVER_LENGTH: usize = 100_000;
/// Maximum message length for image embedding, in bytes.
pub const MAX_MESSAGE_LENGTH: usize = 10_485_760;
/// Maximum file size for file embedding, in bytes.
pub const MAX_EMBED_FILE_SIZE: usize = 10_485_760;
/// Maximum carrier image byte size.
pub const MAX_IMAGE_SIZE: usize = 52_428_800;
/// Maximum image dimension per side, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 10_000;
/// Maximum sanitized filename length, in bytes.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Capacity policy for embed operations.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// When `true` (the default), over-capacity payloads fail the embed.
    /// When `false`, they are demoted to warnings and the embed proceeds.
    pub strict_capacity: bool,
    /// Optional caller-imposed payload ceiling, applied on top of the
    /// carrier's computed capacity.
    pub max_payload_bytes: Option<usize>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            strict_capacity: true,
            max_payload_bytes: None,
        }
    }
}

/// A capacity check that failed in non-strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityWarning {
    /// Payload bytes the embed needs.
    pub required: usize,
    /// Bytes the carrier (and policy) allow.
    pub available: usize,
    /// `false` for the pre-compression estimate, `true` for the final check
    /// on the actual framed payload.
    pub exact: bool,
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = if self.exact { "framed payload" } else { "estimated payload" };
        write!(
            f,
            "{stage} of {} bytes exceeds available capacity of {} bytes; extraction may fail",
            self.required, self.available
        )
    }
}

/// Validate carrier image dimensions.
///
/// # Errors
/// [`StegoError::InvalidArgument`] if either side is zero or exceeds
/// [`MAX_IMAGE_DIMENSION`], or if the pixel count exceeds
/// `MAX_IMAGE_DIMENSION²`.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), StegoError> {
    if width == 0 || height == 0 {
        return Err(StegoError::InvalidArgument("image dimensions must be positive"));
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(StegoError::InvalidArgument("image dimension exceeds maximum"));
    }
    let max_pixels = MAX_IMAGE_DIMENSION as u64 * MAX_IMAGE_DIMENSION as u64;
    if width as u64 * height as u64 > max_pixels {
        return Err(StegoError::InvalidArgument("image pixel count exceeds maximum"));
    }
    Ok(())
}

/// Estimate the framed payload size before compression and encryption run.
///
/// Text compresses better than opaque binary, hence the different factors.
/// Encryption adds the 32-byte salt + counter prefix.
pub fn estimate_payload_size(raw_len: usize, kind: PayloadKind, encrypted: bool) -> usize {
    let factor_num = match kind {
        PayloadKind::Text => 6,
        PayloadKind::Binary => 7,
    };
    let compressed = (raw_len * factor_num + 9) / 10;
    compressed + if encrypted { 32 } else { 0 }
}

/// Apply the capacity policy to one check.
///
/// Strict mode turns an over-capacity payload into
/// [`StegoError::CapacityExceeded`]; non-strict mode appends a
/// [`CapacityWarning`] and lets the embed proceed.
pub fn check_capacity(
    required: usize,
    carrier_capacity: usize,
    exact: bool,
    options: &EmbedOptions,
    hint: &'static str,
    warnings: &mut Vec<CapacityWarning>,
) -> Result<(), StegoError> {
    let available = match options.max_payload_bytes {
        Some(cap) => carrier_capacity.min(cap),
        None => carrier_capacity,
    };
    if required <= available {
        return Ok(());
    }
    if options.strict_capacity {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
            hint,
        });
    }
    warnings.push(CapacityWarning {
        required,
        available,
        exact,
    });
    Ok(())
}

/// Characters never allowed in an embedded filename.
const FORBIDDEN: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Sanitize a filename for safe round-tripping through a carrier.
///
/// Strips path separators and shell-hostile characters plus leading dots,
/// truncates to [`MAX_FILENAME_LENGTH`] bytes preserving the extension, and
/// falls back to `"file"` when nothing survives.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        return "file".to_string();
    }
    if cleaned.len() <= MAX_FILENAME_LENGTH {
        return cleaned;
    }

    // Keep the extension when truncating, unless the extension alone eats
    // the whole length limit.
    match cleaned.rfind('.') {
        Some(dot) if cleaned.len() - dot < MAX_FILENAME_LENGTH => {
            let ext = &cleaned[dot..];
            let stem = truncate_chars(&cleaned[..dot], MAX_FILENAME_LENGTH - ext.len());
            if stem.is_empty() {
                truncate_chars(&cleaned, MAX_FILENAME_LENGTH)
            } else {
                stem + ext
            }
        }
        _ => truncate_chars(&cleaned, MAX_FILENAME_LENGTH),
    }
}

/// Truncate to at most `max` bytes on a character boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    let mut out = String::with_capacity(max.min(s.len()));
    for c in s.chars() {
        if out.len() + c.len_utf8() > max {
            break;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_dimensions() {
        assert!(validate_dimensions(1, 1).is_ok());
        assert!(validate_dimensions(10_000, 10_000).is_ok());
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(validate_dimensions(0, 100).is_err());
        assert!(validate_dimensions(100, 0).is_err());
    }

    #[test]
    fn oversized_dimension_rejected() {
        assert!(validate_dimensions(10_001, 10).is_err());
        assert!(validate_dimensions(10, 10_001).is_err());
    }

    #[test]
    fn estimate_text_vs_binary() {
        assert_eq!(estimate_payload_size(100, PayloadKind::Text, false), 60);
        assert_eq!(estimate_payload_size(100, PayloadKind::Binary, false), 70);
        assert_eq!(estimate_payload_size(100, PayloadKind::Text, true), 92);
    }

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_payload_size(1, PayloadKind::Text, false), 1);
        assert_eq!(estimate_payload_size(3, PayloadKind::Binary, false), 3);
    }

    #[test]
    fn strict_capacity_fails() {
        let mut warnings = Vec::new();
        let result = check_capacity(
            500,
            100,
            true,
            &EmbedOptions::default(),
            "shorten the message",
            &mut warnings,
        );
        assert!(matches!(result, Err(StegoError::CapacityExceeded { .. })));
        assert!(warnings.is_empty());
    }

    #[test]
    fn lenient_capacity_warns() {
        let options = EmbedOptions {
            strict_capacity: false,
            max_payload_bytes: Some(100),
        };
        let mut warnings = Vec::new();
        check_capacity(500, 10_000, true, &options, "", &mut warnings).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].available, 100);
        assert_eq!(warnings[0].required, 500);
    }

    #[test]
    fn payload_cap_applies_in_strict_mode() {
        let options = EmbedOptions {
            strict_capacity: true,
            max_payload_bytes: Some(64),
        };
        let mut warnings = Vec::new();
        let result = check_capacity(65, 10_000, false, &options, "", &mut warnings);
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded { available: 64, .. })
        ));
    }

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_filename("dir/sub\\evil.txt"), "dirsubevil.txt");
        assert_eq!(sanitize_filename("a:b|c\"d<e>f?g%h*i"), "abcdefghi");
    }

    #[test]
    fn sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename("...hidden"), "hidden");
        assert_eq!(sanitize_filename(".bashrc"), "bashrc");
    }

    #[test]
    fn sanitize_empty_defaults() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("///"), "file");
        assert_eq!(sanitize_filename("..."), "file");
    }

    #[test]
    fn sanitize_truncates_preserving_extension() {
        let long = "a".repeat(300) + ".jpeg";
        let out = sanitize_filename(&long);
        assert_eq!(out.len(), MAX_FILENAME_LENGTH);
        assert!(out.ends_with(".jpeg"));
    }

    #[test]
    fn sanitize_truncates_without_extension() {
        let long = "b".repeat(400);
        let out = sanitize_filename(&long);
        assert_eq!(out.len(), MAX_FILENAME_LENGTH);
    }
}
