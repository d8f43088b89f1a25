// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! LSB embedding into usable AC coefficients.
//!
//! A coefficient is *usable* iff its value is outside {-1, 0, +1}. The walk
//! order is fixed: components in list order (chroma components, id ≠ 1, only
//! when requested), blocks in raster order, in-block indices 1..=63 (DC is
//! never touched). Embedding rewrites the magnitude's low bit and keeps the
//! sign, so the set of usable coefficients — and with it the decoder's walk —
//! is preserved exactly.
//!
//! The engine adds no header of its own. Callers frame the payload
//! ([`crate::codec::payload`]) and pass the framed bytes as the bit source;
//! [`extract_framed`] reads the framing header back to learn the length.

use crate::codec::bits::{bits_to_bytes, bytes_to_bits};
use crate::codec::payload::{PayloadKind, HEADER_LEN};
use crate::error::StegoError;
use crate::jpeg::coeffs::JpegCoefficients;
use crate::progress;
use crate::validate::MAX_MESSAGE_LENGTH;

/// JPEG component id of the luminance channel.
const LUMA_COMPONENT_ID: u8 = 1;

const CAPACITY_HINT: &str =
    "use a larger JPEG, enable chroma components, or shorten the message";

/// A coefficient can carry a bit iff its value is outside {-1, 0, +1}.
fn usable(coeff: i16) -> bool {
    coeff < -1 || coeff > 1
}

/// Byte capacity over the usable AC coefficients of the selected components.
pub fn capacity(coeffs: &JpegCoefficients, use_chroma: bool) -> usize {
    let usable_count: usize = coeffs
        .components
        .iter()
        .filter(|c| use_chroma || c.id == LUMA_COMPONENT_ID)
        .map(|c| {
            c.grid
                .coeffs()
                .chunks_exact(64)
                .map(|block| block[1..].iter().filter(|&&v| usable(v)).count())
                .sum::<usize>()
        })
        .sum();
    usable_count / 8
}

/// Embed a bit stream into the usable AC coefficients, in place.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] when the walk ends before the stream
/// does; `available` reports the bits that were placed. The carrier is
/// partially modified at that point — deep-clone first if that matters.
pub fn embed_bits(
    coeffs: &mut JpegCoefficients,
    bits: &[u8],
    use_chroma: bool,
) -> Result<(), StegoError> {
    progress::init(coeffs.components.len() as u32);
    let mut pos = 0usize;

    'walk: for component in &mut coeffs.components {
        progress::check_cancelled()?;
        if !use_chroma && component.id != LUMA_COMPONENT_ID {
            progress::advance();
            continue;
        }
        let grid = &mut component.grid;
        for br in 0..grid.blocks_tall() {
            for bc in 0..grid.blocks_wide() {
                let block = grid.block_mut(br, bc);
                for coeff in block[1..].iter_mut() {
                    if !usable(*coeff) {
                        continue;
                    }
                    if pos >= bits.len() {
                        break 'walk;
                    }
                    let magnitude = (*coeff as i32).abs();
                    let rewritten = (magnitude & !1) | i32::from(bits[pos] & 1);
                    if rewritten <= 1 {
                        // Would leave the usable range; leave the coefficient
                        // alone and keep the bit for the next position.
                        continue;
                    }
                    *coeff = if *coeff < 0 {
                        -rewritten as i16
                    } else {
                        rewritten as i16
                    };
                    pos += 1;
                }
            }
        }
        progress::advance();
    }

    if pos < bits.len() {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available: pos,
            hint: CAPACITY_HINT,
        });
    }
    progress::finish();
    Ok(())
}

/// Extract `bit_count` bits from the usable AC coefficients.
///
/// Emits `|coefficient| & 1` over exactly the walk [`embed_bits`] used.
///
/// # Errors
/// [`StegoError::Truncated`] when fewer usable coefficients exist than
/// requested bits.
pub fn extract_bits(
    coeffs: &JpegCoefficients,
    bit_count: usize,
    use_chroma: bool,
) -> Result<Vec<u8>, StegoError> {
    let mut out = Vec::with_capacity(bit_count);

    'walk: for component in &coeffs.components {
        if !use_chroma && component.id != LUMA_COMPONENT_ID {
            continue;
        }
        let grid = &component.grid;
        for br in 0..grid.blocks_tall() {
            for bc in 0..grid.blocks_wide() {
                for &coeff in &grid.block(br, bc)[1..] {
                    if !usable(coeff) {
                        continue;
                    }
                    if out.len() == bit_count {
                        break 'walk;
                    }
                    out.push((coeff.unsigned_abs() & 1) as u8);
                }
            }
        }
    }

    if out.len() < bit_count {
        return Err(StegoError::Truncated {
            expected: bit_count,
            actual: out.len(),
        });
    }
    Ok(out)
}

/// Embed framed payload bytes (see [`crate::codec::payload`]) as bits.
pub fn embed_payload(
    coeffs: &mut JpegCoefficients,
    framed: &[u8],
    use_chroma: bool,
) -> Result<(), StegoError> {
    embed_bits(coeffs, &bytes_to_bits(framed), use_chroma)
}

/// Extract `byte_len` payload bytes embedded by [`embed_payload`].
pub fn extract_payload(
    coeffs: &JpegCoefficients,
    byte_len: usize,
    use_chroma: bool,
) -> Result<Vec<u8>, StegoError> {
    let bits = extract_bits(coeffs, byte_len.saturating_mul(8), use_chroma)?;
    Ok(bits_to_bytes(&bits))
}

/// Extract a complete framed payload, reading its own header for the length.
///
/// Returns the framed bytes (header included), ready for
/// [`crate::codec::payload::decode_payload`].
pub fn extract_framed(
    coeffs: &JpegCoefficients,
    use_chroma: bool,
) -> Result<Vec<u8>, StegoError> {
    let header = bits_to_bytes(&extract_bits(coeffs, HEADER_LEN * 8, use_chroma)?);
    PayloadKind::from_byte(header[0])?;
    let len = u32::from_le_bytes([header[1], header[2], header[3], header[4]]) as usize;
    if len > MAX_MESSAGE_LENGTH {
        return Err(StegoError::Truncated {
            expected: len,
            actual: capacity(coeffs, use_chroma).saturating_sub(HEADER_LEN),
        });
    }
    extract_payload(coeffs, HEADER_LEN + len, use_chroma)
}
