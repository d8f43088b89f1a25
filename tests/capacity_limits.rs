// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Boundary and policy tests: capacity warnings, dimension guards, encrypted
//! blob limits, filename hygiene, and format detection.

use veil_core::codec::crypto;
use veil_core::validate::{sanitize_filename, EmbedOptions, MAX_FILENAME_LENGTH};
use veil_core::zwc::{encode_text_with, has_hidden_data, ZwcOptions};
use veil_core::{calculate_capacity, detect_format, PixelImage, StegoError};

#[test]
fn lenient_mode_warns_and_still_embeds() {
    let cover = "Warnings, not errors, in lenient mode. ".repeat(20);
    let options = ZwcOptions {
        distribute: false,
        embed: EmbedOptions {
            strict_capacity: false,
            max_payload_bytes: Some(100),
        },
    };
    let secret = "x".repeat(500);

    let embed = encode_text_with(&cover, &secret, None, &options).unwrap();
    assert!(!embed.warnings.is_empty(), "over-capacity must be reported");
    assert_eq!(embed.warnings[0].available, 100);
    assert_eq!(embed.warnings[0].required, 300);
    // The carrier was modified regardless; only the warning is guaranteed.
    assert!(has_hidden_data(embed.text.as_str()));
}

#[test]
fn strict_mode_is_the_default() {
    let options = EmbedOptions::default();
    assert!(options.strict_capacity);
    assert!(options.max_payload_bytes.is_none());
}

#[test]
fn dimension_guards_on_both_sides() {
    assert!(matches!(
        calculate_capacity(0, 10, 1),
        Err(StegoError::InvalidArgument(_))
    ));
    assert!(matches!(
        calculate_capacity(10, 0, 1),
        Err(StegoError::InvalidArgument(_))
    ));
    assert!(matches!(
        calculate_capacity(10_001, 10, 1),
        Err(StegoError::InvalidArgument(_))
    ));
    assert!(matches!(
        calculate_capacity(10, 10_001, 1),
        Err(StegoError::InvalidArgument(_))
    ));

    assert!(PixelImage::new(10_001, 1, vec![0; 10_001 * 4]).is_err());
}

#[test]
fn short_encrypted_blob_rejected() {
    for len in [0usize, 1, 16, 32] {
        let blob = vec![0u8; len];
        assert!(
            matches!(
                crypto::decrypt(&blob, "pw"),
                Err(StegoError::InvalidArgument("encrypted data too short"))
            ),
            "blob of {len} bytes must be rejected"
        );
    }
    // 33 bytes is the minimum well-formed blob.
    assert!(crypto::decrypt(&[0u8; 33], "pw").is_ok());
}

#[test]
fn filename_sanitization() {
    // Separators vanish, then leading dots; interior dots survive.
    assert_eq!(sanitize_filename("../secret/../../passwd"), "secret....passwd");
    assert_eq!(sanitize_filename("re:port|v2?.pdf"), "reportv2.pdf");
    assert_eq!(sanitize_filename(""), "file");

    let long = format!("{}.tar.gz", "n".repeat(300));
    let out = sanitize_filename(&long);
    assert_eq!(out.len(), MAX_FILENAME_LENGTH);
    assert!(out.ends_with(".gz"));
}

#[test]
fn format_detection_walks_handlers() {
    assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xDB]).unwrap(), "jpeg");
    assert_eq!(detect_format(b"GIF89a").unwrap(), "gif");
    assert!(matches!(
        detect_format(b"\x00\x01\x02\x03"),
        Err(StegoError::UnsupportedFormat)
    ));
}
