// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Raw-deflate compression adapter.
//!
//! Wraps flate2's RFC 1951 deflate behind a uniform `compress`/`decompress`
//! pair. The stream carries no zlib or gzip wrapper and no marker bytes of
//! our own — payload framing records the compressed length, so the decoder
//! always knows exactly how many bytes to feed back in.
//!
//! Decompressed output is capped at [`MAX_MESSAGE_LENGTH`] to bound the
//! worst-case allocation from a corrupted or hostile carrier.

use std::io::Read;

use flate2::read::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;

use crate::error::StegoError;
use crate::validate::MAX_MESSAGE_LENGTH;

/// Compress bytes as a raw deflate stream.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(data, Compression::best());
    let mut out = Vec::new();
    encoder
        .read_to_end(&mut out)
        .expect("deflate compression from memory should not fail");
    out
}

/// Decompress a raw deflate stream.
///
/// Fails with [`StegoError::DecompressionFailed`] on any codec error — after
/// a wrong-password decryption this is usually the first place the garbage is
/// noticed.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .take(MAX_MESSAGE_LENGTH as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|_| StegoError::DecompressionFailed)?;
    if out.len() > MAX_MESSAGE_LENGTH {
        return Err(StegoError::DecompressionFailed);
    }
    Ok(out)
}
