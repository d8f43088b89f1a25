// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Password-based payload encryption.
//!
//! Key derivation is PBKDF2-HMAC-SHA256 with 100 000 iterations over a
//! 16-byte random salt, producing a 256-bit AES key. Encryption is
//! AES-256-CTR with a random 128-bit counter block; the counter proper is the
//! low 64 bits, the high 64 bits act as a fixed per-message nonce.
//!
//! Blob layout:
//!
//! ```text
//! [16 bytes] salt
//! [16 bytes] counter block
//! [N bytes ] ciphertext
//! ```
//!
//! Salt and counter are drawn fresh from the cryptographic RNG on every
//! encryption, so the same plaintext never produces the same blob twice.
//!
//! There is no authentication tag — this layer provides confidentiality
//! only. A wrong password yields garbage bytes that fail downstream
//! decompression or UTF-8 decoding rather than an immediate error here.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::StegoError;

/// AES-256-CTR with a 64-bit big-endian counter in the low half of the block,
/// matching WebCrypto's `AES-CTR` with `length: 64`.
type Aes256Ctr64 = ctr::Ctr64BE<Aes256>;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Counter block length in bytes.
pub const COUNTER_LEN: usize = 16;
/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// Shortest well-formed blob: salt + counter + at least one ciphertext byte.
pub const MIN_ENCRYPTED_LEN: usize = SALT_LEN + COUNTER_LEN + 1;

/// Derive the 256-bit AES key from a password and salt.
///
/// Deterministic: encoder and decoder derive the same key from the same
/// inputs. The key buffer is zeroed on drop.
pub fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key);
    key
}

/// Encrypt plaintext with a password.
///
/// Returns `salt ‖ counter ‖ ciphertext`.
pub fn encrypt(plaintext: &[u8], password: &str) -> Vec<u8> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut counter = [0u8; COUNTER_LEN];
    rng.fill_bytes(&mut counter);

    let key = derive_key(password, &salt);
    let mut cipher =
        Aes256Ctr64::new_from_slices(&*key, &counter).expect("valid key and counter length");

    let mut out = Vec::with_capacity(SALT_LEN + COUNTER_LEN + plaintext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&counter);
    let body_start = out.len();
    out.extend_from_slice(plaintext);
    cipher.apply_keystream(&mut out[body_start..]);
    out
}

/// Decrypt a `salt ‖ counter ‖ ciphertext` blob with a password.
///
/// # Errors
/// [`StegoError::InvalidArgument`] if the blob is shorter than
/// [`MIN_ENCRYPTED_LEN`] (33 bytes). A wrong password is NOT detected here —
/// the output is garbage that fails downstream.
pub fn decrypt(blob: &[u8], password: &str) -> Result<Vec<u8>, StegoError> {
    if blob.len() < MIN_ENCRYPTED_LEN {
        return Err(StegoError::InvalidArgument("encrypted data too short"));
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (counter, ciphertext) = rest.split_at(COUNTER_LEN);

    let key = derive_key(password, salt);
    let mut cipher =
        Aes256Ctr64::new_from_slices(&*key, counter).expect("valid key and counter length");

    let mut out = ciphertext.to_vec();
    cipher.apply_keystream(&mut out);
    Ok(out)
}
