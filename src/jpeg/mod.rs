// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! JPEG coefficient-domain embedding.
//!
//! Operates on quantized DCT coefficients parsed by an external JPEG codec
//! (see [`crate::format::ImageCodec`]) — no pixel-domain processing happens
//! here, so the embedding survives the JPEG's own lossy pipeline.
//!
//! [`coeffs`] holds the coefficient data model; [`embed`] is the engine. The
//! engine mutates coefficients in place; callers that need the original call
//! [`JpegCoefficients::deep_clone`] first.

pub mod coeffs;
pub mod embed;

pub use coeffs::{CoeffComponent, CoeffGrid, JpegCoefficients};
pub use embed::{
    capacity, embed_bits, embed_payload, extract_bits, extract_framed, extract_payload,
};
