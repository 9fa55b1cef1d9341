use super::encryption::{KdfParams, NONCE_LEN, SALT_LEN};
use crate::errors::CoreError;

/// Magic bytes identifying a trade journal file.
pub const MAGIC: &[u8; 4] = b"TJNL";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const HEADER_SIZE: usize = 54;

/// Header of an encrypted .tjnl file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext_len: u64,
}

/// Assemble a complete file.
///
/// Layout (all integers little-endian):
/// ```text
/// [TJNL: 4B] [version: 2B] [memory_cost: 4B] [time_cost: 4B] [parallelism: 4B]
/// [salt: 16B] [nonce: 12B] [ciphertext_len: 8B] [ciphertext + tag]
/// ```
///
/// `header.ciphertext_len` must equal `ciphertext.len()`.
pub fn write_file(header: &FileHeader, ciphertext: &[u8]) -> Vec<u8> {
    debug_assert_eq!(header.ciphertext_len, ciphertext.len() as u64);
    let mut buf = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&header.version.to_le_bytes());
    buf.extend_from_slice(&header.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&header.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&header.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&header.salt);
    buf.extend_from_slice(&header.nonce);
    buf.extend_from_slice(&header.ciphertext_len.to_le_bytes());
    buf.extend_from_slice(ciphertext);
    buf
}

/// Parse raw file bytes into the header and the ciphertext slice.
///
/// KDF parameters are range-checked before use so a crafted file cannot make
/// key derivation allocate unbounded memory.
pub fn read_file(data: &[u8]) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a trade journal file".into(),
        ));
    }
    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes, not a trade journal file".into(),
        ));
    }

    let mut cursor = Cursor { data, offset: 4 };

    let version = u16::from_le_bytes(cursor.take::<2>()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(cursor.take::<4>()?),
        time_cost: u32::from_le_bytes(cursor.take::<4>()?),
        parallelism: u32::from_le_bytes(cursor.take::<4>()?),
    };
    check_kdf_params(&kdf_params)?;

    let salt = cursor.take::<SALT_LEN>()?;
    let nonce = cursor.take::<NONCE_LEN>()?;
    let ciphertext_len = u64::from_le_bytes(cursor.take::<8>()?);

    let available = (data.len() - cursor.offset) as u64;
    if available < ciphertext_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {ciphertext_len} bytes of ciphertext, got {available}"
        )));
    }
    let end = cursor.offset + ciphertext_len as usize;
    let ciphertext = &data[cursor.offset..end];

    let header = FileHeader {
        version,
        kdf_params,
        salt,
        nonce,
        ciphertext_len,
    };
    Ok((header, ciphertext))
}

/// Limits: memory 8 KiB..=1 GiB, time 1..=20, parallelism 1..=16.
fn check_kdf_params(params: &KdfParams) -> Result<(), CoreError> {
    if !(8..=1_048_576).contains(&params.memory_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory_cost out of safe range: {} KiB (expected 8..1048576)",
            params.memory_cost
        )));
    }
    if !(1..=20).contains(&params.time_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF time_cost out of safe range: {} (expected 1..20)",
            params.time_cost
        )));
    }
    if !(1..=16).contains(&params.parallelism) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF parallelism out of safe range: {} (expected 1..16)",
            params.parallelism
        )));
    }
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Cursor<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let bytes: [u8; N] = self
            .data
            .get(self.offset..self.offset + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                CoreError::InvalidFileFormat(format!("Header truncated at byte {}", self.offset))
            })?;
        self.offset += N;
        Ok(bytes)
    }
}
