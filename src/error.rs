// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Error types for the embedding and extraction pipelines.
//!
//! [`StegoError`] covers all failure modes from carrier validation through
//! framing, encryption, and engine-level embedding. Errors surface immediately
//! at the entry point that caused them; no partial carriers are returned.

use core::fmt;

use crate::codec::payload::PayloadKind;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// A parameter is outside its valid range (bit depth, dimensions,
    /// over-limit lengths, malformed encrypted blobs, bad filenames).
    InvalidArgument(&'static str),
    /// The message does not fit in the available carrier bits/coefficients.
    CapacityExceeded {
        /// Bits (or bytes, per the reporting call) the message needs.
        required: usize,
        /// Bits (or bytes) the carrier can hold.
        available: usize,
        /// Suggested remedy for this carrier family.
        hint: &'static str,
    },
    /// A declared payload length exceeds what the carrier delivers.
    Truncated {
        /// Units the header or caller declared.
        expected: usize,
        /// Units actually present in the carrier.
        actual: usize,
    },
    /// The caller asked for one payload type but the carrier holds another.
    PayloadTypeMismatch {
        expected: PayloadKind,
        found: PayloadKind,
    },
    /// Zero-width digit count is not divisible by four.
    InvalidZwcLength(usize),
    /// AES-CTR decryption produced no usable result (wrong password or
    /// corrupted carrier).
    DecryptionFailed,
    /// The deflate stream could not be decompressed (wrong password or
    /// corrupted carrier).
    DecompressionFailed,
    /// Extracted text is not valid UTF-8.
    InvalidUtf8,
    /// The carrier bytes match no registered image format handler.
    UnsupportedFormat,
    /// Every frame in the container is below the minimum embedding capacity.
    NoUsableFrames,
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::CapacityExceeded {
                required,
                available,
                hint,
            } => write!(
                f,
                "carrier capacity exceeded: need {required}, have {available} ({hint})"
            ),
            Self::Truncated { expected, actual } => {
                write!(f, "carrier truncated: declared {expected}, found {actual}")
            }
            Self::PayloadTypeMismatch { expected, found } => {
                write!(f, "payload type mismatch: expected {expected:?}, found {found:?}")
            }
            Self::InvalidZwcLength(count) => {
                write!(f, "zero-width digit count {count} is not a multiple of four")
            }
            Self::DecryptionFailed => write!(f, "decryption failed (wrong password?)"),
            Self::DecompressionFailed => {
                write!(f, "decompression failed (wrong password or corrupted carrier?)")
            }
            Self::InvalidUtf8 => write!(f, "extracted text is not valid UTF-8"),
            Self::UnsupportedFormat => write!(f, "unrecognised image format"),
            Self::NoUsableFrames => write!(f, "no frame has enough capacity for embedding"),
            Self::Cancelled => write!(f, "operation cancelled by caller"),
        }
    }
}

impl std::error::Error for StegoError {}
