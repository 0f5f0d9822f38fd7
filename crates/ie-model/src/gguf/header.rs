use std::io::Read;

use crate::error::{ModelError, Result};

/// The four-byte magic number identifying a GGUF file: ASCII "GGUF".
pub const GGUF_MAGIC: [u8; 4] = [0x47, 0x47, 0x55, 0x46];

/// Default alignment (in bytes) for tensor data within a GGUF file.
pub const GGUF_DEFAULT_ALIGNMENT: usize = 32;

/// Parsed GGUF file header.
#[derive(Debug, Clone, PartialEq)]
pub struct GgufHeader {
    /// GGUF format version (we support v3).
    pub version: u32,
    /// Number of tensors stored in the file.
    pub n_tensors: u64,
    /// Number of key-value metadata entries.
    pub n_kv: u64,
}

impl GgufHeader {
    /// Parse a GGUF header from the beginning of a reader.
    ///
    /// Reads and validates the 4-byte magic, then the version (u32 LE),
    /// tensor count (u64 LE), and KV count (u64 LE). Only version 3 is
    /// supported.
    pub fn parse(reader: &mut impl Read) -> Result<GgufHeader> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != GGUF_MAGIC {
            return Err(ModelError::InvalidMagic(magic));
        }

        let version = read_u32(reader)?;
        if version != 3 {
            return Err(ModelError::UnsupportedVersion(version));
        }

        let n_tensors = read_u64(reader)?;
        let n_kv = read_u64(reader)?;

        Ok(GgufHeader {
            version,
            n_tensors,
            n_kv,
        })
    }
}

pub(crate) fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_u64(reader: &mut impl Read) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a GGUF string: u64 length followed by that many UTF-8 bytes.
///
/// The buffer grows with the bytes actually read, so a corrupt length
/// cannot trigger a huge up-front allocation.
pub(crate) fn read_string(reader: &mut impl Read) -> Result<String> {
    let len = read_u64(reader)?;
    let mut buf = Vec::new();
    reader.take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(ModelError::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    String::from_utf8(buf)
        .map_err(|e| ModelError::Malformed(format!("invalid UTF-8 in GGUF string: {}", e)))
}
