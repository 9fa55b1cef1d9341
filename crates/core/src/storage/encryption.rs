use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Argon2id cost parameters used to stretch the access code into a key.
/// Written into every file header so older files stay readable if the
/// defaults change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost: u32,
    /// Degree of parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65_536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Derive the document key from an access code with Argon2id.
///
/// A fresh random salt is used on every save, so the same access code never
/// produces the same key twice.
pub fn derive_key(
    access_code: &str,
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<[u8; KEY_LEN], CoreError> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(access_code.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("Argon2 key derivation failed: {e}")))?;

    Ok(key)
}

/// Seal a serialized journal book with AES-256-GCM.
/// The 16-byte authentication tag is appended to the returned ciphertext.
pub fn encrypt(
    plaintext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, CoreError> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CoreError::Encryption(format!("Encryption failed: {e}")))
}

/// Open a sealed journal book.
///
/// A wrong access code and a tampered file look the same here: both fail tag
/// verification and return `CoreError::Decryption`.
pub fn decrypt(
    ciphertext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, CoreError> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CoreError::Decryption)
}

/// Random salt from the OS CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN], CoreError> {
    random_bytes::<SALT_LEN>("salt")
}

/// Random nonce from the OS CSPRNG.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], CoreError> {
    random_bytes::<NONCE_LEN>("nonce")
}

fn random_bytes<const N: usize>(what: &str) -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("Failed to generate random {what}: {e}")))?;
    Ok(buf)
}
