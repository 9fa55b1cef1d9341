use crate::errors::CoreError;
use crate::models::book::JournalBook;

use super::encryption::{self, KdfParams};
use super::format::{self, FileHeader};

/// Whole-document persistence of a `JournalBook`, keyed by an access code.
///
/// There is no partial read or write: every save re-encrypts the full book
/// with a fresh salt and nonce.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt a journal book with the default KDF cost.
    ///
    /// Flow: JournalBook → bincode → AES-256-GCM(Argon2id(access code)) → TJNL bytes
    pub fn save_to_bytes(book: &JournalBook, access_code: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_to_bytes_with(book, access_code, KdfParams::default())
    }

    /// Encrypt a journal book with explicit KDF parameters.
    pub fn save_to_bytes_with(
        book: &JournalBook,
        access_code: &str,
        kdf_params: KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(book)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize journal book: {e}")))?;

        let salt = encryption::generate_salt()?;
        let nonce = encryption::generate_nonce()?;
        let key = encryption::derive_key(access_code, &salt, &kdf_params)?;
        let ciphertext = encryption::encrypt(&plaintext, &key, &nonce)?;

        let header = FileHeader {
            version: format::CURRENT_VERSION,
            kdf_params,
            salt,
            nonce,
            ciphertext_len: ciphertext.len() as u64,
        };
        log::info!(
            "Saved journal book: {} journals, {} entries",
            book.journals.len(),
            book.total_entries()
        );
        Ok(format::write_file(&header, &ciphertext))
    }

    /// Decrypt a journal book.
    ///
    /// Flow: TJNL bytes → header → Argon2id(access code, salt) → AES-256-GCM → bincode → JournalBook
    pub fn load_from_bytes(data: &[u8], access_code: &str) -> Result<JournalBook, CoreError> {
        let (header, ciphertext) = format::read_file(data)?;
        let key = encryption::derive_key(access_code, &header.salt, &header.kdf_params)?;
        let plaintext = encryption::decrypt(ciphertext, &key, &header.nonce)?;

        let book: JournalBook = bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize journal book: {e}"))
        })?;
        log::info!("Loaded journal book: {} journals", book.journals.len());
        Ok(book)
    }

    /// Save to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(book: &JournalBook, path: &str, access_code: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(book, access_code)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, access_code: &str) -> Result<JournalBook, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, access_code)
    }
}
