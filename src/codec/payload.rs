// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Payload framing.
//!
//! Every engine carries the same framed payload:
//!
//! ```text
//! [1 byte ] payload kind (0x01 text, 0x02 binary)
//! [4 bytes] body length (little-endian u32), measured AFTER
//!           compression and encryption
//! [N bytes] body: deflate(raw), AES-CTR-encrypted when a password is set
//! ```
//!
//! The decoder reads exactly `length` body bytes after the header and never
//! guesses boundaries. Encoder and decoder must agree on the password; a
//! wrong password surfaces as [`StegoError::DecompressionFailed`] (or
//! [`StegoError::InvalidUtf8`] further up) because CTR mode carries no
//! authentication tag.

use crate::codec::{compress, crypto};
use crate::error::StegoError;

/// Framing header length: kind byte + u32 length.
pub const HEADER_LEN: usize = 5;

/// What the framed bytes decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Binary,
}

impl PayloadKind {
    /// Wire byte for this kind.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Text => 0x01,
            Self::Binary => 0x02,
        }
    }

    /// Parse a wire byte.
    pub fn from_byte(byte: u8) -> Result<Self, StegoError> {
        match byte {
            0x01 => Ok(Self::Text),
            0x02 => Ok(Self::Binary),
            _ => Err(StegoError::InvalidArgument("unknown payload kind byte")),
        }
    }
}

/// Frame raw payload bytes: compress, optionally encrypt, prepend the header.
pub fn encode_payload(
    kind: PayloadKind,
    raw: &[u8],
    password: Option<&str>,
) -> Result<Vec<u8>, StegoError> {
    let mut body = compress::compress(raw);
    if let Some(pw) = password {
        body = crypto::encrypt(&body, pw);
    }
    if body.len() > u32::MAX as usize {
        return Err(StegoError::InvalidArgument("framed payload exceeds u32 length field"));
    }

    let mut framed = Vec::with_capacity(HEADER_LEN + body.len());
    framed.push(kind.as_byte());
    framed.extend_from_slice(&(body.len() as u32).to_le_bytes());
    framed.extend_from_slice(&body);
    Ok(framed)
}

/// Unframe a payload, requiring a specific kind.
///
/// # Errors
/// - [`StegoError::PayloadTypeMismatch`] if the carrier holds the other kind.
/// - [`StegoError::Truncated`] if fewer than `length` body bytes are present.
/// - [`StegoError::DecompressionFailed`] on wrong password or corruption.
pub fn decode_payload(
    framed: &[u8],
    password: Option<&str>,
    expected: PayloadKind,
) -> Result<Vec<u8>, StegoError> {
    let (kind, raw) = decode_payload_auto(framed, password)?;
    if kind != expected {
        return Err(StegoError::PayloadTypeMismatch {
            expected,
            found: kind,
        });
    }
    Ok(raw)
}

/// Unframe a payload, accepting either kind and returning it.
pub fn decode_payload_auto(
    framed: &[u8],
    password: Option<&str>,
) -> Result<(PayloadKind, Vec<u8>), StegoError> {
    if framed.len() < HEADER_LEN {
        return Err(StegoError::Truncated {
            expected: HEADER_LEN,
            actual: framed.len(),
        });
    }

    let kind = PayloadKind::from_byte(framed[0])?;
    let len = u32::from_le_bytes([framed[1], framed[2], framed[3], framed[4]]) as usize;

    let body = framed
        .get(HEADER_LEN..HEADER_LEN + len)
        .ok_or(StegoError::Truncated {
            expected: len,
            actual: framed.len() - HEADER_LEN,
        })?;

    let compressed = match password {
        Some(pw) => crypto::decrypt(body, pw)?,
        None => body.to_vec(),
    };
    let raw = compress::decompress(&compressed)?;
    Ok((kind, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_roundtrip_plain() {
        let framed = encode_payload(PayloadKind::Text, b"hello world", None).unwrap();
        let (kind, raw) = decode_payload_auto(&framed, None).unwrap();
        assert_eq!(kind, PayloadKind::Text);
        assert_eq!(raw, b"hello world");
    }

    #[test]
    fn binary_roundtrip_encrypted() {
        let data = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02];
        let framed = encode_payload(PayloadKind::Binary, &data, Some("pw")).unwrap();
        let raw = decode_payload(&framed, Some("pw"), PayloadKind::Binary).unwrap();
        assert_eq!(raw, data);
    }

    #[test]
    fn header_layout() {
        let framed = encode_payload(PayloadKind::Binary, b"x", None).unwrap();
        assert_eq!(framed[0], 0x02);
        let len = u32::from_le_bytes([framed[1], framed[2], framed[3], framed[4]]) as usize;
        assert_eq!(framed.len(), HEADER_LEN + len);
    }

    #[test]
    fn kind_mismatch_detected() {
        let framed = encode_payload(PayloadKind::Binary, b"data", None).unwrap();
        assert!(matches!(
            decode_payload(&framed, None, PayloadKind::Text),
            Err(StegoError::PayloadTypeMismatch { .. })
        ));
    }

    #[test]
    fn truncated_body_detected() {
        let mut framed = encode_payload(PayloadKind::Text, b"a longer message body", None).unwrap();
        framed.truncate(framed.len() - 3);
        assert!(matches!(
            decode_payload_auto(&framed, None),
            Err(StegoError::Truncated { .. })
        ));
    }

    #[test]
    fn truncated_header_detected() {
        assert!(matches!(
            decode_payload_auto(&[0x01, 0x00], None),
            Err(StegoError::Truncated { .. })
        ));
    }

    #[test]
    fn unknown_kind_rejected() {
        let framed = vec![0x7F, 0, 0, 0, 0];
        assert!(decode_payload_auto(&framed, None).is_err());
    }

    #[test]
    fn wrong_password_fails_downstream() {
        let framed = encode_payload(PayloadKind::Text, b"secret text", Some("right")).unwrap();
        let result = decode_payload_auto(&framed, Some("wrong"));
        assert!(matches!(result, Err(StegoError::DecompressionFailed)));
    }

    #[test]
    fn missing_password_fails_downstream() {
        // Encrypted body is not a deflate stream without decryption.
        let framed = encode_payload(PayloadKind::Text, b"secret text", Some("pw")).unwrap();
        assert!(decode_payload_auto(&framed, None).is_err());
    }

    #[test]
    fn length_counts_post_transform_bytes() {
        let raw = "compressible ".repeat(100);
        let framed = encode_payload(PayloadKind::Text, raw.as_bytes(), None).unwrap();
        let len = u32::from_le_bytes([framed[1], framed[2], framed[3], framed[4]]) as usize;
        assert!(len < raw.len(), "length field must reflect the compressed body");
    }
}
