// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Pixel LSB engine.
//!
//! Embeds a bit stream into the low `d` bits (`d` ∈ 1..=4) of every R, G,
//! and B channel byte of an RGBA buffer. Every fourth byte is the alpha
//! channel and is skipped unconditionally — transparency must survive
//! bit-exact.
//!
//! The message stream maps onto channels in buffer order: channel `c`
//! (counting visited channels only) carries stream bits `c·d .. c·d+d`,
//! least-significant carrier bit first. Extraction therefore needs the same
//! bit depth and a *message-stream* bit offset, not a byte offset.
//!
//! Helper formats:
//!
//! ```text
//! text:  [len: u32 LE][UTF-8 bytes]
//! data:  raw bytes, length supplied by the caller on extraction
//! file:  [0x55][name_len: u8][name][file_size: u32 LE][contents]
//! ```

use crate::codec::bits::{bits_to_bytes, bytes_to_bits};
use crate::error::StegoError;
use crate::pixel::PixelImage;
use crate::validate::{
    sanitize_filename, validate_dimensions, MAX_EMBED_FILE_SIZE, MAX_MESSAGE_LENGTH,
};

/// Magic byte opening the self-describing file header.
pub const FILE_HEADER_MAGIC: u8 = 0x55;

const CAPACITY_HINT: &str = "use a shorter message, a larger image, or a higher bit depth";

/// Reject bit depths outside 1..=4.
pub fn validate_bit_depth(bit_depth: u8) -> Result<(), StegoError> {
    if (1..=4).contains(&bit_depth) {
        Ok(())
    } else {
        Err(StegoError::InvalidArgument("bit depth must be between 1 and 4"))
    }
}

/// Embeddable bits in an RGBA buffer at the given depth.
fn bit_capacity(rgba_len: usize, bit_depth: u8) -> usize {
    (rgba_len / 4) * 3 * bit_depth as usize
}

/// Byte capacity of a `width × height` RGBA image at the given bit depth.
///
/// Three channels per pixel carry `bit_depth` bits each; alpha carries none.
pub fn calculate_capacity(width: u32, height: u32, bit_depth: u8) -> Result<usize, StegoError> {
    validate_bit_depth(bit_depth)?;
    validate_dimensions(width, height)?;
    let bits = width as u64 * height as u64 * 3 * bit_depth as u64;
    Ok((bits / 8) as usize)
}

/// Embed a bit stream into the low bits of the RGB channels.
///
/// Alpha bytes (every fourth) are skipped. When the stream ends mid-channel,
/// only the consumed low bits of that channel are overwritten.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] when the stream is longer than the
/// buffer's bit capacity; the buffer is then left unmodified.
pub fn embed_bits(rgba: &mut [u8], bits: &[u8], bit_depth: u8) -> Result<(), StegoError> {
    validate_bit_depth(bit_depth)?;
    let available = bit_capacity(rgba.len(), bit_depth);
    if bits.len() > available {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available,
            hint: CAPACITY_HINT,
        });
    }

    let depth = bit_depth as usize;
    let mut pos = 0usize;
    for (i, channel) in rgba.iter_mut().enumerate() {
        if i % 4 == 3 {
            continue; // alpha
        }
        let take = depth.min(bits.len() - pos);
        let mut low = 0u8;
        for k in 0..take {
            low |= (bits[pos + k] & 1) << k;
        }
        *channel = (*channel & (0xFFu8 << take)) | low;
        pos += take;
        if pos == bits.len() {
            break;
        }
    }
    Ok(())
}

/// Extract `bit_count` message bits starting at message-stream `bit_offset`.
///
/// The offset is measured in stream bits, exactly as [`embed_bits`] laid them
/// out — it is not a channel or byte offset.
///
/// # Errors
/// [`StegoError::Truncated`] when `bit_offset + bit_count` exceeds the
/// buffer's bit capacity.
pub fn extract_bits(
    rgba: &[u8],
    bit_offset: usize,
    bit_count: usize,
    bit_depth: u8,
) -> Result<Vec<u8>, StegoError> {
    validate_bit_depth(bit_depth)?;
    let available = bit_capacity(rgba.len(), bit_depth);
    let end = bit_offset
        .checked_add(bit_count)
        .ok_or(StegoError::Truncated {
            expected: bit_count,
            actual: available,
        })?;
    if end > available {
        return Err(StegoError::Truncated {
            expected: bit_count,
            actual: available.saturating_sub(bit_offset),
        });
    }

    let depth = bit_depth as usize;
    let mut out = Vec::with_capacity(bit_count);
    let mut channel = bit_offset / depth;
    let mut within = bit_offset % depth;
    while out.len() < bit_count {
        let byte = rgba[(channel / 3) * 4 + channel % 3];
        while within < depth && out.len() < bit_count {
            out.push((byte >> within) & 1);
            within += 1;
        }
        within = 0;
        channel += 1;
    }
    Ok(out)
}

/// Embed a length-prefixed payload: `[len: u32 LE][payload]`.
pub(crate) fn embed_with_length(
    rgba: &mut [u8],
    payload: &[u8],
    bit_depth: u8,
) -> Result<(), StegoError> {
    let mut data = Vec::with_capacity(4 + payload.len());
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    embed_bits(rgba, &bytes_to_bits(&data), bit_depth)
}

/// Extract a length-prefixed payload embedded by [`embed_with_length`].
pub(crate) fn extract_with_length(rgba: &[u8], bit_depth: u8) -> Result<Vec<u8>, StegoError> {
    let len_bits = extract_bits(rgba, 0, 32, bit_depth)?;
    let len_bytes: [u8; 4] = bits_to_bytes(&len_bits)
        .try_into()
        .expect("32 bits yield 4 bytes");
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_MESSAGE_LENGTH {
        // An absurd declared length means the carrier holds no such payload.
        let available = bit_capacity(rgba.len(), bit_depth);
        return Err(StegoError::Truncated {
            expected: len,
            actual: available.saturating_sub(32) / 8,
        });
    }

    let payload_bits = extract_bits(rgba, 32, len * 8, bit_depth)?;
    Ok(bits_to_bytes(&payload_bits))
}

/// Embed a UTF-8 text message with a 4-byte length header.
pub fn embed_text(image: &mut PixelImage, message: &str, bit_depth: u8) -> Result<(), StegoError> {
    if message.len() > MAX_MESSAGE_LENGTH {
        return Err(StegoError::InvalidArgument("message exceeds maximum length"));
    }
    embed_with_length(&mut image.rgba, message.as_bytes(), bit_depth)
}

/// Extract a text message embedded by [`embed_text`].
pub fn extract_text(image: &PixelImage, bit_depth: u8) -> Result<String, StegoError> {
    let bytes = extract_with_length(&image.rgba, bit_depth)?;
    String::from_utf8(bytes).map_err(|_| StegoError::InvalidUtf8)
}

/// Embed opaque bytes with no header; the caller keeps the length.
pub fn embed_data(image: &mut PixelImage, data: &[u8], bit_depth: u8) -> Result<(), StegoError> {
    if data.len() > MAX_MESSAGE_LENGTH {
        return Err(StegoError::InvalidArgument("message exceeds maximum length"));
    }
    embed_bits(&mut image.rgba, &bytes_to_bits(data), bit_depth)
}

/// Extract `len` bytes embedded by [`embed_data`].
pub fn extract_data(
    image: &PixelImage,
    len: usize,
    bit_depth: u8,
) -> Result<Vec<u8>, StegoError> {
    let bits = extract_bits(&image.rgba, 0, len.saturating_mul(8), bit_depth)?;
    Ok(bits_to_bytes(&bits))
}

/// Embed a named file with the self-describing header.
///
/// The filename is sanitized before embedding, so hostile names never enter
/// the carrier.
pub fn embed_file(
    image: &mut PixelImage,
    filename: &str,
    contents: &[u8],
    bit_depth: u8,
) -> Result<(), StegoError> {
    if contents.len() > MAX_EMBED_FILE_SIZE {
        return Err(StegoError::InvalidArgument("file exceeds maximum embeddable size"));
    }
    let name = sanitize_filename(filename);
    let name_bytes = name.as_bytes();

    let mut data = Vec::with_capacity(2 + name_bytes.len() + 4 + contents.len());
    data.push(FILE_HEADER_MAGIC);
    data.push(name_bytes.len() as u8);
    data.extend_from_slice(name_bytes);
    data.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    data.extend_from_slice(contents);
    embed_bits(&mut image.rgba, &bytes_to_bits(&data), bit_depth)
}

/// Extract a file embedded by [`embed_file`], returning `(filename, contents)`.
pub fn extract_file(
    image: &PixelImage,
    bit_depth: u8,
) -> Result<(String, Vec<u8>), StegoError> {
    let head = bits_to_bytes(&extract_bits(&image.rgba, 0, 16, bit_depth)?);
    if head[0] != FILE_HEADER_MAGIC {
        return Err(StegoError::InvalidArgument("carrier holds no file header"));
    }
    let name_len = head[1] as usize;

    let name_bits = extract_bits(&image.rgba, 16, name_len * 8, bit_depth)?;
    let name = String::from_utf8(bits_to_bytes(&name_bits)).map_err(|_| StegoError::InvalidUtf8)?;

    let size_offset = 16 + name_len * 8;
    let size_bytes: [u8; 4] = bits_to_bytes(&extract_bits(&image.rgba, size_offset, 32, bit_depth)?)
        .try_into()
        .expect("32 bits yield 4 bytes");
    let size = u32::from_le_bytes(size_bytes) as usize;
    if size > MAX_EMBED_FILE_SIZE {
        let available = bit_capacity(image.rgba.len(), bit_depth);
        return Err(StegoError::Truncated {
            expected: size,
            actual: available.saturating_sub(size_offset + 32) / 8,
        });
    }

    let content_bits = extract_bits(&image.rgba, size_offset + 32, size * 8, bit_depth)?;
    Ok((sanitize_filename(&name), bits_to_bytes(&content_bits)))
}
