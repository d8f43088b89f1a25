// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Zero-width text embedding.
//!
//! Hides a framed payload inside ordinary Unicode text using six zero-width
//! code points as base-6 digits, four digits per byte. The embedded region is
//! bracketed by three-character START/END sentinels; payload digits are
//! either appended after the cover or scattered at natural break points
//! within it. Visually (and in most editors) the output is indistinguishable
//! from the cover.
//!
//! [`alphabet`] defines the code points and text-level helpers; [`engine`]
//! implements encoding, decoding, detection, and capacity.

pub mod alphabet;
pub mod engine;

use core::fmt;
use core::ops::Deref;

pub use alphabet::{strip_zwc, visualize, ALPHABET, END, START};
pub use engine::{
    capacity, decode_binary, decode_text, encode_binary, encode_text, encode_text_with,
    has_hidden_data, DecodedBinary, DecodedText, TextEmbed, ZwcOptions,
};

/// Text produced by the zero-width encoder.
///
/// The constructor is crate-private: holding a `StegaText` means the value
/// came out of [`encode_text`] or [`encode_binary`] and carries a well-formed
/// embedded region. The decoders accept any `impl AsRef<str>`, so plain
/// strings from the outside world work too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegaText(String);

impl StegaText {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StegaText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for StegaText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StegaText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
