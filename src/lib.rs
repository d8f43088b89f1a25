// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! # veil-core
//!
//! Steganography core for hiding arbitrary payloads inside ordinary-looking
//! carriers. Three engine families share one framing pipeline:
//!
//! - **Pixel LSB** (`pixel`): low bits of the R/G/B channels of RGBA buffers,
//!   at a configurable bit depth (1–4), alpha never touched. A multi-frame
//!   orchestrator spreads payloads across animated GIF / multi-page TIFF
//!   frames in first, all, or split mode.
//! - **JPEG coefficients** (`jpeg`): LSBs of usable quantized AC
//!   coefficients, so the payload lives in the DCT domain and survives the
//!   JPEG's own pipeline.
//! - **Zero-width text** (`zwc`): payload bytes as base-6 sequences of six
//!   zero-width code points, appended to or scattered through a cover text.
//!
//! Every engine carries the same framed payload: deflate-compressed,
//! optionally AES-256-CTR encrypted under a PBKDF2-derived key, behind a
//! `[kind][len: u32 LE]` header (`codec`). Capacity is checked before and
//! after framing (`validate`), strictly by default.
//!
//! Image file parsing and encoding are external collaborators behind the
//! [`format::ImageCodec`] trait; the engines operate on decoded RGBA buffers
//! and coefficient grids.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use veil_core::{encode_text, decode_text};
//!
//! let stega = encode_text(&cover_text, "secret message", Some("passphrase"))?;
//! let decoded = decode_text(&stega, Some("passphrase"))?;
//! assert_eq!(decoded.secret, "secret message");
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod jpeg;
pub mod pixel;
pub mod progress;
pub mod validate;
pub mod zwc;

pub use codec::{decode_payload, decode_payload_auto, encode_payload, PayloadKind};
pub use error::StegoError;
pub use format::{detect_format, FormatHandler, ImageCodec};
pub use jpeg::{CoeffComponent, CoeffGrid, JpegCoefficients};
pub use pixel::{
    calculate_capacity, embed_data, embed_frames, embed_text, extract_data, extract_frames,
    extract_text, FrameMode, PixelImage,
};
pub use validate::{CapacityWarning, EmbedOptions};
pub use zwc::{
    decode_binary, decode_text, encode_binary, encode_text, has_hidden_data, strip_zwc,
    DecodedText, StegaText,
};
