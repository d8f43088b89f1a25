// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Shared codec layers used by every embedding engine.
//!
//! The encode direction is a fixed pipeline:
//!
//! ```text
//! payload bytes → compress → [encrypt?] → [kind][len u32 LE] header → bit stream
//! ```
//!
//! The decode direction inverts it, driven entirely by the length field in the
//! framing header — decoders never guess boundaries. All layers are purely
//! computational; the compression and cipher adapters are the only places
//! where the host libraries do real work.

pub mod bits;
pub mod compress;
pub mod crypto;
pub mod payload;
pub mod xor;

pub use bits::{bits_to_bytes, bytes_to_bits};
pub use payload::{decode_payload, decode_payload_auto, encode_payload, PayloadKind};
