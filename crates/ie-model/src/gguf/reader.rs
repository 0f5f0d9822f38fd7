use std::io::{Cursor, Seek};
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use super::header::{GgufHeader, GGUF_DEFAULT_ALIGNMENT};
use super::metadata::GgufMetadata;
use super::tensor_info::{self, GgufTensorInfo};
use crate::error::{ModelError, Result};

/// Where the file's bytes live.
enum Backing<'a> {
    Mapped(Mmap),
    Borrowed(&'a [u8]),
}

impl Deref for Backing<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Backing::Mapped(m) => &m[..],
            Backing::Borrowed(b) => b,
        }
    }
}

/// A parsed GGUF file, either memory-mapped from disk or borrowed from a
/// caller-supplied buffer.
///
/// The header, metadata and tensor info table are parsed eagerly; tensor
/// data is sliced out of the backing bytes on demand.
pub struct GgufFile<'a> {
    /// Parsed header (version, tensor/KV counts).
    pub header: GgufHeader,
    /// Parsed metadata key-value entries.
    pub metadata: GgufMetadata,
    /// Parsed tensor info entries (name, shape, dtype, offset).
    pub tensor_infos: Vec<GgufTensorInfo>,
    bytes: Backing<'a>,
    /// Byte offset where tensor data begins (aligned).
    data_offset: usize,
}

impl GgufFile<'static> {
    /// Memory-map and parse a GGUF file from disk.
    pub fn open(path: &Path) -> Result<GgufFile<'static>> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as the GgufFile.
        // Concurrent truncation of the file by another process is outside
        // what this loader guards against.
        let mmap = unsafe { Mmap::map(&file)? };
        GgufFile::parse(Backing::Mapped(mmap))
    }
}

impl<'a> GgufFile<'a> {
    /// Parse a GGUF image held in memory.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<GgufFile<'a>> {
        GgufFile::parse(Backing::Borrowed(bytes))
    }

    fn parse(bytes: Backing<'a>) -> Result<GgufFile<'a>> {
        let mut reader = Cursor::new(&*bytes);

        let header = GgufHeader::parse(&mut reader)?;
        let metadata = GgufMetadata::parse_kv(&mut reader, header.n_kv)?;
        let tensor_infos = tensor_info::parse_tensor_infos(&mut reader, header.n_tensors)?;

        let current_pos = reader.stream_position()? as usize;
        let data_offset = current_pos.next_multiple_of(GGUF_DEFAULT_ALIGNMENT);

        Ok(GgufFile {
            header,
            metadata,
            tensor_infos,
            bytes,
            data_offset,
        })
    }

    /// Find a tensor's info entry by name.
    pub fn tensor_info(&self, name: &str) -> Result<&GgufTensorInfo> {
        self.tensor_infos
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ModelError::TensorNotFound(name.to_string()))
    }

    /// Raw bytes of a tensor's data, bounds-checked against the file.
    pub fn tensor_data(&self, info: &GgufTensorInfo) -> Result<&[u8]> {
        let out_of_range = || {
            ModelError::Malformed(format!(
                "tensor '{}' data lies outside the file",
                info.name
            ))
        };
        let size = info.data_size().ok_or_else(out_of_range)?;
        let start = usize::try_from(info.offset)
            .ok()
            .and_then(|o| o.checked_add(self.data_offset))
            .ok_or_else(out_of_range)?;
        let end = start.checked_add(size).ok_or_else(out_of_range)?;
        self.bytes.get(start..end).ok_or_else(out_of_range)
    }

    /// Load a tensor's data by name as row-major f32, widening f16.
    pub fn get_tensor_f32(&self, name: &str) -> Result<Vec<f32>> {
        let info = self.tensor_info(name)?;
        let raw = self.tensor_data(info)?;
        let numel = info.numel().ok_or_else(|| {
            ModelError::Malformed(format!("tensor '{}' element count overflows", name))
        })?;
        Ok(info.dtype.decode_f32(raw, numel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gguf::GGUF_MAGIC;

    fn image_with_nested_arrays(levels: usize) -> Vec<u8> {
        let mut bytes = GGUF_MAGIC.to_vec();
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes()); // n_tensors
        bytes.extend_from_slice(&1u64.to_le_bytes()); // n_kv
        bytes.extend_from_slice(&3u64.to_le_bytes());
        bytes.extend_from_slice(b"key");
        bytes.extend_from_slice(&9u32.to_le_bytes());
        for _ in 0..levels {
            bytes.extend_from_slice(&9u32.to_le_bytes());
            bytes.extend_from_slice(&1u64.to_le_bytes());
        }
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes
    }

    #[test]
    fn test_from_bytes_rejects_deeply_nested_metadata() {
        let bytes = image_with_nested_arrays(1_000_000);
        assert!(matches!(
            GgufFile::from_bytes(&bytes),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_bytes_accepts_shallow_nesting() {
        let bytes = image_with_nested_arrays(3);
        let file = GgufFile::from_bytes(&bytes).unwrap();
        assert!(file.metadata.entries.contains_key("key"));
        assert!(file.tensor_infos.is_empty());
    }
}
