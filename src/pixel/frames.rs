// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Multi-frame orchestration for animated and paged carriers.
//!
//! Applies the pixel LSB engine across an ordered frame sequence in one of
//! three modes:
//!
//! - **First**: the whole payload goes into the first usable frame.
//! - **All**: the whole payload goes into every frame large enough; smaller
//!   frames pass through untouched and the decoder is told which frame to
//!   read.
//! - **Split**: the payload is partitioned across usable frames, each part
//!   prefixed by a 12-byte chunk header:
//!
//! ```text
//! [4 bytes] chunk_index  (u32 LE)
//! [4 bytes] total_chunks (u32 LE)
//! [4 bytes] chunk_size   (u32 LE)
//! ```
//!
//! On read, the first five frames are probed for a plausible chunk header to
//! auto-detect split mode; the probe can false-positive on random-looking
//! frames, so the decoder also takes an explicit mode override.
//!
//! Frames the orchestrator does not select are never mutated — partial-frame
//! offsets, palettes, and disposal metadata belong to the external container
//! codec and must survive bit-exact.

use crate::codec::bits::{bits_to_bytes, bytes_to_bits};
use crate::error::StegoError;
use crate::pixel::lsb;
use crate::pixel::PixelImage;
use crate::progress;

/// Minimum byte capacity for a frame to participate in embedding.
pub const MIN_FRAME_CAPACITY: usize = 8;
/// Chunk header length in bytes.
pub const CHUNK_HEADER_LEN: usize = 12;
/// Upper bound a plausible chunk size must respect.
pub const MAX_CHUNK_SIZE: u32 = 1_000_000;
/// Exclusive upper bound on the chunk count.
pub const MAX_TOTAL_CHUNKS: u32 = 10_000;
/// Frames probed for a chunk header during mode auto-detection.
const PROBE_FRAMES: usize = 5;

/// How a payload is laid out across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Full payload in the first usable frame.
    First,
    /// Full payload in every frame with sufficient capacity.
    All,
    /// Payload partitioned across usable frames behind chunk headers.
    Split,
}

/// One parsed chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChunkHeader {
    index: u32,
    total: u32,
    size: u32,
}

impl ChunkHeader {
    fn to_bytes(self) -> [u8; CHUNK_HEADER_LEN] {
        let mut out = [0u8; CHUNK_HEADER_LEN];
        out[0..4].copy_from_slice(&self.index.to_le_bytes());
        out[4..8].copy_from_slice(&self.total.to_le_bytes());
        out[8..12].copy_from_slice(&self.size.to_le_bytes());
        out
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            index: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            total: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            size: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        }
    }

    /// The predicate the read path uses to tell chunk headers from noise.
    fn plausible(self) -> bool {
        self.size > 0
            && self.size <= MAX_CHUNK_SIZE
            && self.total > 0
            && self.total < MAX_TOTAL_CHUNKS
            && self.index < self.total
    }
}

/// Embed a framed payload across `frames` in the given mode.
///
/// Returns the indices of the frames that were written, in embed order.
///
/// # Errors
/// - [`StegoError::NoUsableFrames`] if every frame is below
///   [`MIN_FRAME_CAPACITY`].
/// - [`StegoError::CapacityExceeded`] if the selected mode cannot place the
///   full payload.
pub fn embed_frames(
    frames: &mut [PixelImage],
    payload: &[u8],
    mode: FrameMode,
    bit_depth: u8,
) -> Result<Vec<usize>, StegoError> {
    lsb::validate_bit_depth(bit_depth)?;
    progress::init(frames.len() as u32);

    let capacities: Vec<usize> = frames
        .iter()
        .map(|f| f.capacity(bit_depth))
        .collect::<Result<_, _>>()?;
    let usable: Vec<usize> = (0..frames.len())
        .filter(|&i| capacities[i] >= MIN_FRAME_CAPACITY)
        .collect();
    if usable.is_empty() {
        return Err(StegoError::NoUsableFrames);
    }

    let written = match mode {
        FrameMode::First => {
            let idx = usable[0];
            let needed = 4 + payload.len();
            if capacities[idx] < needed {
                return Err(StegoError::CapacityExceeded {
                    required: needed,
                    available: capacities[idx],
                    hint: "use a larger first frame or split mode",
                });
            }
            lsb::embed_with_length(&mut frames[idx].rgba, payload, bit_depth)?;
            progress::advance();
            vec![idx]
        }
        FrameMode::All => {
            let needed = 4 + payload.len();
            let selected: Vec<usize> = usable
                .iter()
                .copied()
                .filter(|&i| capacities[i] >= needed)
                .collect();
            if selected.is_empty() {
                let best = usable.iter().map(|&i| capacities[i]).max().unwrap_or(0);
                return Err(StegoError::CapacityExceeded {
                    required: needed,
                    available: best,
                    hint: "no frame is large enough; try split mode",
                });
            }
            for &idx in &selected {
                progress::check_cancelled()?;
                lsb::embed_with_length(&mut frames[idx].rgba, payload, bit_depth)?;
                progress::advance();
            }
            selected
        }
        FrameMode::Split => embed_split(frames, &capacities, &usable, payload, bit_depth)?,
    };

    progress::finish();
    Ok(written)
}

/// Partition the payload across usable frames and write one chunk per frame.
fn embed_split(
    frames: &mut [PixelImage],
    capacities: &[usize],
    usable: &[usize],
    payload: &[u8],
    bit_depth: u8,
) -> Result<Vec<usize>, StegoError> {
    if payload.is_empty() {
        return Err(StegoError::InvalidArgument("split mode needs a non-empty payload"));
    }

    // Plan the partition first: chunk headers need total_chunks up front.
    let mut plan: Vec<(usize, usize)> = Vec::new();
    let mut remaining = payload.len();
    for &idx in usable {
        if remaining == 0 {
            break;
        }
        let room = capacities[idx]
            .saturating_sub(CHUNK_HEADER_LEN)
            .min(MAX_CHUNK_SIZE as usize);
        if room == 0 {
            continue;
        }
        let take = remaining.min(room);
        plan.push((idx, take));
        remaining -= take;
    }

    if remaining > 0 {
        let available = payload.len() - remaining;
        return Err(StegoError::CapacityExceeded {
            required: payload.len(),
            available,
            hint: "add frames, raise the bit depth, or shorten the payload",
        });
    }
    if plan.len() as u32 >= MAX_TOTAL_CHUNKS {
        return Err(StegoError::InvalidArgument("payload would need too many chunks"));
    }

    let total = plan.len() as u32;
    let mut offset = 0usize;
    let mut written = Vec::with_capacity(plan.len());
    for (chunk_index, &(frame_idx, size)) in plan.iter().enumerate() {
        progress::check_cancelled()?;
        let header = ChunkHeader {
            index: chunk_index as u32,
            total,
            size: size as u32,
        };
        let mut data = Vec::with_capacity(CHUNK_HEADER_LEN + size);
        data.extend_from_slice(&header.to_bytes());
        data.extend_from_slice(&payload[offset..offset + size]);
        offset += size;

        lsb::embed_bits(&mut frames[frame_idx].rgba, &bytes_to_bits(&data), bit_depth)?;
        written.push(frame_idx);
        progress::advance();
    }
    Ok(written)
}

/// Extract a framed payload from `frames`.
///
/// With `mode: None`, the first five frames are probed for a plausible chunk
/// header; a hit selects split mode, otherwise the frame at `frame_index`
/// (default 0) is read as a length-prefixed payload. Pass an explicit mode to
/// bypass the heuristic.
pub fn extract_frames(
    frames: &[PixelImage],
    bit_depth: u8,
    frame_index: Option<usize>,
    mode: Option<FrameMode>,
) -> Result<Vec<u8>, StegoError> {
    lsb::validate_bit_depth(bit_depth)?;
    progress::init(frames.len() as u32);

    let resolved = mode.unwrap_or_else(|| {
        if detect_split(frames, bit_depth) {
            FrameMode::Split
        } else {
            FrameMode::First
        }
    });

    let result = match resolved {
        FrameMode::Split => extract_split(frames, bit_depth),
        FrameMode::First | FrameMode::All => {
            let idx = frame_index.unwrap_or(0);
            let frame = frames
                .get(idx)
                .ok_or(StegoError::InvalidArgument("frame index out of range"))?;
            lsb::extract_with_length(&frame.rgba, bit_depth)
        }
    };
    progress::finish();
    result
}

/// Probe the first frames for a plausible chunk header.
fn detect_split(frames: &[PixelImage], bit_depth: u8) -> bool {
    frames
        .iter()
        .take(PROBE_FRAMES)
        .any(|frame| matches!(read_chunk_header(&frame.rgba, bit_depth), Ok(h) if h.plausible()))
}

fn read_chunk_header(rgba: &[u8], bit_depth: u8) -> Result<ChunkHeader, StegoError> {
    let bits = lsb::extract_bits(rgba, 0, CHUNK_HEADER_LEN * 8, bit_depth)?;
    Ok(ChunkHeader::from_bytes(&bits_to_bytes(&bits)))
}

/// Collect, validate, order, and concatenate split chunks from all frames.
fn extract_split(frames: &[PixelImage], bit_depth: u8) -> Result<Vec<u8>, StegoError> {
    let mut chunks: Vec<(ChunkHeader, Vec<u8>)> = Vec::new();

    for frame in frames {
        progress::check_cancelled()?;
        let header = match read_chunk_header(&frame.rgba, bit_depth) {
            Ok(h) if h.plausible() => h,
            _ => {
                progress::advance();
                continue;
            }
        };
        let body_bits = match lsb::extract_bits(
            &frame.rgba,
            CHUNK_HEADER_LEN * 8,
            header.size as usize * 8,
            bit_depth,
        ) {
            Ok(bits) => bits,
            // Header looked plausible but the frame cannot hold that chunk.
            Err(_) => {
                progress::advance();
                continue;
            }
        };
        chunks.push((header, bits_to_bytes(&body_bits)));
        progress::advance();
    }

    if chunks.is_empty() {
        return Err(StegoError::NoUsableFrames);
    }

    let total = chunks[0].0.total;
    if chunks.iter().any(|(h, _)| h.total != total) {
        return Err(StegoError::InvalidArgument("frames disagree on total chunk count"));
    }

    chunks.sort_by_key(|(h, _)| h.index);
    let complete = chunks.len() == total as usize
        && chunks
            .iter()
            .enumerate()
            .all(|(i, (h, _))| h.index == i as u32);
    if !complete {
        return Err(StegoError::Truncated {
            expected: total as usize,
            actual: chunks.len(),
        });
    }

    let payload_len: usize = chunks.iter().map(|(h, _)| h.size as usize).sum();
    let mut payload = Vec::with_capacity(payload_len);
    for (_, body) in chunks {
        payload.extend_from_slice(&body);
    }
    Ok(payload)
}
