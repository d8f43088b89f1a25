// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Cyclic-key XOR obfuscator.
//!
//! A lightweight scrambler used by the image engines when real encryption is
//! not requested. Self-inverse: applying it twice with the same password
//! restores the input. An empty password is the identity.
//!
//! This is obfuscation, not confidentiality — password-based AES lives in
//! [`crate::codec::crypto`].

/// XOR `data` with the UTF-8 bytes of `password`, cycling the key.
pub fn xor_cipher(data: &[u8], password: &str) -> Vec<u8> {
    let key = password.as_bytes();
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .enumerate()
        .map(|(i, &b)| b ^ key[i % key.len()])
        .collect()
}
