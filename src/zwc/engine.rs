// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Zero-width encode/decode pipeline.
//!
//! Wire format of the embedded region:
//!
//! ```text
//! START ‖ zwc([kind: u8][len: u32 LE][body]) ‖ END
//! ```
//!
//! where `zwc(..)` writes each byte as four base-6 digits, most-significant
//! digit first, over the ordered alphabet. The framed bytes come from
//! [`crate::codec::payload`], so compression and optional password encryption
//! are already applied.
//!
//! Placement is either *appended* (the whole region after the cover) or
//! *distributed* (digits scattered at natural break points, the sentinels
//! wrapping the whole text). Extraction ignores interleaved visible
//! characters, so both placements decode identically.

use crate::codec::payload::{self, PayloadKind, HEADER_LEN};
use crate::error::StegoError;
use crate::validate::{
    check_capacity, estimate_payload_size, CapacityWarning, EmbedOptions, MAX_COVER_LENGTH,
    MAX_SECRET_LENGTH,
};
use crate::zwc::alphabet::{digit_of, is_zwc, ALPHABET, END, START};
use crate::zwc::StegaText;

/// Zero-width digits per payload byte.
const DIGITS_PER_BYTE: usize = 4;
/// Digits occupied by the 5-byte framing header.
const HEADER_DIGITS: usize = HEADER_LEN * DIGITS_PER_BYTE;
/// Digits occupied by the two sentinels.
const SENTINEL_DIGITS: usize = 6;
/// Minimum digits after START for [`has_hidden_data`] to report a hit.
const DETECT_THRESHOLD: usize = 16;

/// Cover characters a distributed embedding may inject digits after.
const BREAK_CHARS: [char; 9] = ['\n', ' ', '.', ',', ';', ':', '!', '?', '\t'];

const CAPACITY_HINT: &str = "use a longer cover text or a shorter secret";

/// Placement and capacity policy for zero-width encoding.
#[derive(Debug, Clone, Default)]
pub struct ZwcOptions {
    /// Scatter digits through the cover instead of appending them.
    pub distribute: bool,
    /// Capacity policy shared with the image engines.
    pub embed: EmbedOptions,
}

/// Result of an encode: the carrier text plus any capacity warnings raised
/// in non-strict mode.
#[derive(Debug, Clone)]
pub struct TextEmbed {
    pub text: StegaText,
    pub warnings: Vec<CapacityWarning>,
}

/// Result of decoding a text payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The hidden secret.
    pub secret: String,
    /// The cover as a reader sees it: zero-width stripped, trimmed.
    pub visible: String,
}

/// Result of decoding a binary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBinary {
    pub data: Vec<u8>,
    pub visible: String,
}

/// Encode each byte as four base-6 zero-width digits, MSB digit first.
pub fn bytes_to_zwc(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * DIGITS_PER_BYTE * 3);
    for &byte in bytes {
        let mut v = byte as usize;
        let mut digits = [0usize; DIGITS_PER_BYTE];
        for slot in digits.iter_mut().rev() {
            *slot = v % 6;
            v /= 6;
        }
        for d in digits {
            out.push(ALPHABET[d]);
        }
    }
    out
}

/// Decode zero-width digits back to bytes, ignoring non-alphabet characters.
///
/// # Errors
/// - [`StegoError::InvalidZwcLength`] if the digit count is not a multiple
///   of four.
/// - [`StegoError::InvalidArgument`] if a digit group exceeds the byte range
///   (a corrupted carrier).
pub fn zwc_to_bytes(text: &str) -> Result<Vec<u8>, StegoError> {
    let digits: Vec<u8> = text.chars().filter_map(digit_of).collect();
    digits_to_bytes(&digits)
}

fn digits_to_bytes(digits: &[u8]) -> Result<Vec<u8>, StegoError> {
    if digits.len() % DIGITS_PER_BYTE != 0 {
        return Err(StegoError::InvalidZwcLength(digits.len()));
    }
    let mut out = Vec::with_capacity(digits.len() / DIGITS_PER_BYTE);
    for group in digits.chunks_exact(DIGITS_PER_BYTE) {
        let v = group
            .iter()
            .fold(0usize, |acc, &d| acc * 6 + d as usize);
        if v > 0xFF {
            return Err(StegoError::InvalidArgument(
                "zero-width digit group exceeds byte range",
            ));
        }
        out.push(v as u8);
    }
    Ok(out)
}

/// Advisory byte capacity of a cover text.
///
/// Twenty-six positions are reserved for the framing header and the two
/// sentinels. The encoder only refuses to exceed this when the capacity
/// policy says so.
pub fn capacity(cover: &str) -> usize {
    let n = cover.chars().count();
    // TODO: the max() arm makes the 10% branch dead for every non-empty
    // cover; revisit what ceiling was actually intended here.
    let positions = (n / 10).max(n);
    positions.saturating_sub(HEADER_DIGITS + SENTINEL_DIGITS) / DIGITS_PER_BYTE
}

/// Does `text` contain an embedded region?
///
/// True iff START occurs and at least [`DETECT_THRESHOLD`] zero-width
/// characters follow it — enough to rule out a stray sentinel-like sequence.
pub fn has_hidden_data(text: &str) -> bool {
    match text.find(START) {
        Some(idx) => {
            let tail = &text[idx + START.len()..];
            tail.chars().filter(|&c| is_zwc(c)).count() >= DETECT_THRESHOLD
        }
        None => false,
    }
}

/// Hide a text secret in a cover, appended placement, strict capacity.
pub fn encode_text(
    cover: &str,
    secret: &str,
    password: Option<&str>,
) -> Result<StegaText, StegoError> {
    let embed = encode_text_with(cover, secret, password, &ZwcOptions::default())?;
    Ok(embed.text)
}

/// Hide a text secret in a cover with explicit placement and capacity policy.
pub fn encode_text_with(
    cover: &str,
    secret: &str,
    password: Option<&str>,
    options: &ZwcOptions,
) -> Result<TextEmbed, StegoError> {
    encode_with(cover, PayloadKind::Text, secret.as_bytes(), password, options)
}

/// Hide opaque bytes in a cover, appended placement, strict capacity.
pub fn encode_binary(
    cover: &str,
    data: &[u8],
    password: Option<&str>,
) -> Result<StegaText, StegoError> {
    let embed = encode_with(
        cover,
        PayloadKind::Binary,
        data,
        password,
        &ZwcOptions::default(),
    )?;
    Ok(embed.text)
}

fn encode_with(
    cover: &str,
    kind: PayloadKind,
    raw: &[u8],
    password: Option<&str>,
    options: &ZwcOptions,
) -> Result<TextEmbed, StegoError> {
    if cover.chars().count() > MAX_COVER_LENGTH {
        return Err(StegoError::InvalidArgument("cover text exceeds maximum length"));
    }
    if raw.len() > MAX_SECRET_LENGTH {
        return Err(StegoError::InvalidArgument("secret exceeds maximum length"));
    }

    let mut warnings = Vec::new();
    let available = capacity(cover);

    // Cheap pre-flight on the size heuristic, then the exact framed size.
    let estimated = estimate_payload_size(raw.len(), kind, password.is_some());
    check_capacity(estimated, available, false, &options.embed, CAPACITY_HINT, &mut warnings)?;

    let framed = payload::encode_payload(kind, raw, password)?;
    let body_len = framed.len() - HEADER_LEN;
    check_capacity(body_len, available, true, &options.embed, CAPACITY_HINT, &mut warnings)?;

    let zwc = bytes_to_zwc(&framed);
    let text = if options.distribute {
        distribute(cover, &zwc)
    } else {
        append(cover, &zwc)
    };
    Ok(TextEmbed {
        text: StegaText::new(text),
        warnings,
    })
}

/// Appended placement: `cover ‖ START ‖ digits ‖ END`.
fn append(cover: &str, zwc: &str) -> String {
    let mut out = String::with_capacity(cover.len() + START.len() + zwc.len() + END.len());
    out.push_str(cover);
    out.push_str(START);
    out.push_str(zwc);
    out.push_str(END);
    out
}

/// Distributed placement: digits injected after break characters, the whole
/// text wrapped in sentinels. Falls back to appended placement when the
/// cover offers no break points.
fn distribute(cover: &str, zwc: &str) -> String {
    let points = cover.chars().filter(|c| BREAK_CHARS.contains(c)).count();
    if points == 0 {
        return append(cover, zwc);
    }

    let digits: Vec<char> = zwc.chars().collect();
    let chunks_per_point = (digits.len() + points - 1) / points;

    let mut out = String::with_capacity(START.len() + cover.len() + zwc.len() + END.len());
    out.push_str(START);
    let mut next = 0usize;
    for c in cover.chars() {
        out.push(c);
        if BREAK_CHARS.contains(&c) && next < digits.len() {
            let stop = (next + chunks_per_point).min(digits.len());
            for &d in &digits[next..stop] {
                out.push(d);
            }
            next = stop;
        }
    }
    // A short tail of break points can leave digits over; they follow the
    // cover inside the sentinels.
    for &d in &digits[next..] {
        out.push(d);
    }
    out.push_str(END);
    out
}

/// Recover a text secret hidden by [`encode_text`].
///
/// Accepts [`StegaText`] or any plain string.
pub fn decode_text(
    text: impl AsRef<str>,
    password: Option<&str>,
) -> Result<DecodedText, StegoError> {
    let text = text.as_ref();
    let framed = extract_framed(text)?;
    let raw = payload::decode_payload(&framed, password, PayloadKind::Text)?;
    let secret = String::from_utf8(raw).map_err(|_| StegoError::InvalidUtf8)?;
    Ok(DecodedText {
        secret,
        visible: visible_of(text),
    })
}

/// Recover opaque bytes hidden by [`encode_binary`].
pub fn decode_binary(
    text: impl AsRef<str>,
    password: Option<&str>,
) -> Result<DecodedBinary, StegoError> {
    let text = text.as_ref();
    let framed = extract_framed(text)?;
    let data = payload::decode_payload(&framed, password, PayloadKind::Binary)?;
    Ok(DecodedBinary {
        data,
        visible: visible_of(text),
    })
}

fn visible_of(text: &str) -> String {
    crate::zwc::alphabet::strip_zwc(text).trim().to_string()
}

/// Locate the embedded region and reassemble the framed payload bytes.
fn extract_framed(text: &str) -> Result<Vec<u8>, StegoError> {
    let start = text
        .find(START)
        .ok_or(StegoError::InvalidArgument("text contains no hidden data"))?;
    let tail = &text[start + START.len()..];
    let digits: Vec<u8> = tail.chars().filter_map(digit_of).collect();

    if digits.len() < HEADER_DIGITS {
        return Err(StegoError::Truncated {
            expected: HEADER_DIGITS,
            actual: digits.len(),
        });
    }

    let header = digits_to_bytes(&digits[..HEADER_DIGITS])?;
    PayloadKind::from_byte(header[0])?;
    let len = u32::from_le_bytes([header[1], header[2], header[3], header[4]]) as usize;

    let body_digits = len * DIGITS_PER_BYTE;
    if digits.len() - HEADER_DIGITS < body_digits {
        return Err(StegoError::Truncated {
            expected: body_digits,
            actual: digits.len() - HEADER_DIGITS,
        });
    }

    let body = digits_to_bytes(&digits[HEADER_DIGITS..HEADER_DIGITS + body_digits])?;
    let mut framed = header;
    framed.extend_from_slice(&body);
    Ok(framed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zwc::alphabet::strip_zwc;

    // Just over 320 characters, enough capacity for every scenario below.
    const COVER: &str = "The quick brown fox jumps over the lazy dog. \
        Pack my box with five dozen liquor jugs; how vexingly quick daft zebras jump! \
        Sphinx of black quartz, judge my vow. \
        The quick brown fox jumps over the lazy dog. \
        Pack my box with five dozen liquor jugs; how vexingly quick daft zebras jump!";

    #[test]
    fn base6_roundtrip() {
        let bytes: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();
        let zwc = bytes_to_zwc(&bytes);
        assert_eq!(zwc.chars().count(), 256 * 4);
        assert_eq!(zwc_to_bytes(&zwc).unwrap(), bytes);
    }

    #[test]
    fn base6_digit_order_msb_first() {
        // 255 = 1·216 + 1·36 + 0·6 + 3
        let zwc = bytes_to_zwc(&[255]);
        let digits: Vec<char> = zwc.chars().collect();
        assert_eq!(digits, vec![ALPHABET[1], ALPHABET[1], ALPHABET[0], ALPHABET[3]]);
    }

    #[test]
    fn ragged_digit_count_rejected() {
        let mut zwc = bytes_to_zwc(&[42, 43]);
        zwc.push(ALPHABET[0]);
        assert!(matches!(
            zwc_to_bytes(&zwc),
            Err(StegoError::InvalidZwcLength(9))
        ));
    }

    #[test]
    fn out_of_range_group_rejected() {
        // 5555 base-6 = 1295 > 255.
        let zwc: String = [ALPHABET[5]; 4].iter().collect();
        assert!(matches!(
            zwc_to_bytes(&zwc),
            Err(StegoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn appended_roundtrip() {
        let stega = encode_text(COVER, "hidden words", None).unwrap();
        let decoded = decode_text(&stega, None).unwrap();
        assert_eq!(decoded.secret, "hidden words");
        assert_eq!(decoded.visible, COVER.trim());
    }

    #[test]
    fn appended_layout() {
        let stega = encode_text(COVER, "s", None).unwrap();
        assert!(stega.as_str().starts_with(COVER));
        assert!(stega.as_str().ends_with(END));
        let after_cover = &stega.as_str()[COVER.len()..];
        assert!(after_cover.starts_with(START));
    }

    #[test]
    fn distributed_roundtrip() {
        let options = ZwcOptions {
            distribute: true,
            ..ZwcOptions::default()
        };
        let embed = encode_text_with(COVER, "scattered secret", None, &options).unwrap();
        assert!(embed.warnings.is_empty());

        let text = embed.text.as_str();
        assert!(text.starts_with(START));
        assert!(text.ends_with(END));

        let decoded = decode_text(&embed.text, None).unwrap();
        assert_eq!(decoded.secret, "scattered secret");
        assert_eq!(decoded.visible, COVER.trim());
    }

    #[test]
    fn distributed_without_break_points_appends() {
        // No break characters at all, but plenty of capacity.
        let cover: String = "nobreak".repeat(20);
        let options = ZwcOptions {
            distribute: true,
            ..ZwcOptions::default()
        };
        let embed = encode_text_with(&cover, "x", None, &options).unwrap();
        assert!(embed.text.as_str().starts_with(cover.as_str()));
        let decoded = decode_text(&embed.text, None).unwrap();
        assert_eq!(decoded.secret, "x");
    }

    #[test]
    fn password_roundtrip_and_wrong_password() {
        let stega = encode_text(COVER, "Secret message", Some("mypassword")).unwrap();
        let decoded = decode_text(&stega, Some("mypassword")).unwrap();
        assert_eq!(decoded.secret, "Secret message");

        let wrong = decode_text(&stega, Some("not-the-password"));
        assert!(matches!(
            wrong,
            Err(StegoError::DecompressionFailed) | Err(StegoError::DecryptionFailed)
        ));
    }

    #[test]
    fn binary_roundtrip() {
        let data = vec![0u8, 255, 7, 128, 33, 99];
        let stega = encode_binary(COVER, &data, None).unwrap();
        let decoded = decode_binary(&stega, None).unwrap();
        assert_eq!(decoded.data, data);
        assert_eq!(decoded.visible, COVER.trim());
    }

    #[test]
    fn kind_mismatch_across_decoders() {
        let stega = encode_binary(COVER, &[1, 2, 3], None).unwrap();
        assert!(matches!(
            decode_text(&stega, None),
            Err(StegoError::PayloadTypeMismatch { .. })
        ));
    }

    #[test]
    fn detection() {
        let stega = encode_text(COVER, "payload", None).unwrap();
        assert!(has_hidden_data(stega.as_str()));
        assert!(!has_hidden_data(COVER));
        // A bare sentinel without digits behind it is not a hit.
        let stray = format!("text{START}more text");
        assert!(!has_hidden_data(&stray));
    }

    #[test]
    fn strip_restores_cover() {
        let stega = encode_text(COVER, "payload", None).unwrap();
        assert_eq!(strip_zwc(stega.as_str()).trim(), COVER.trim());
    }

    #[test]
    fn plain_text_has_no_payload() {
        assert!(matches!(
            decode_text("just ordinary text", None),
            Err(StegoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn truncated_region_detected() {
        let stega = encode_text(COVER, "a fairly long secret message", None).unwrap();
        // Chop the embedded region mid-payload.
        let cut: String = stega.as_str().chars().take(COVER.chars().count() + 12).collect();
        assert!(matches!(
            decode_text(&cut, None),
            Err(StegoError::Truncated { .. })
        ));
    }

    #[test]
    fn capacity_formula() {
        let cover: String = "x".repeat(426);
        assert_eq!(capacity(&cover), 100);
        assert_eq!(capacity(""), 0);
        assert_eq!(capacity("tiny"), 0);
    }

    #[test]
    fn lenient_capacity_warns_but_embeds() {
        let options = ZwcOptions {
            distribute: false,
            embed: EmbedOptions {
                strict_capacity: false,
                max_payload_bytes: Some(100),
            },
        };
        // Cover long enough that the 100-byte payload cap is what binds.
        let cover: String = COVER.repeat(4);
        let secret = "s".repeat(500);
        let embed = encode_text_with(&cover, &secret, None, &options).unwrap();
        assert!(!embed.warnings.is_empty());
        assert_eq!(embed.warnings[0].available, 100);
        // The carrier was still produced and is even extractable here.
        assert!(has_hidden_data(embed.text.as_str()));
    }

    #[test]
    fn strict_capacity_refuses() {
        let options = ZwcOptions {
            distribute: false,
            embed: EmbedOptions {
                strict_capacity: true,
                max_payload_bytes: Some(10),
            },
        };
        let secret = "this will not fit under ten bytes".repeat(4);
        assert!(matches!(
            encode_text_with(COVER, &secret, None, &options),
            Err(StegoError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn oversized_inputs_rejected() {
        let cover: String = "c".repeat(MAX_COVER_LENGTH + 1);
        assert!(encode_text(&cover, "s", None).is_err());

        let secret = "s".repeat(MAX_SECRET_LENGTH + 1);
        assert!(encode_text(COVER, &secret, None).is_err());
    }
}
