use std::io::Read;

use ie_tensor::DType;

use super::header::{read_string, read_u32, read_u64};
use crate::error::{ModelError, Result};

/// Tensor ranks above this are rejected before any allocation.
const MAX_DIMS: u32 = 8;

/// Describes a single tensor stored within a GGUF file.
#[derive(Debug, Clone)]
pub struct GgufTensorInfo {
    /// Tensor name (e.g. "blk.0.weight").
    pub name: String,
    /// Size of each dimension, innermost first.
    pub dims: Vec<u64>,
    /// Data type of the stored tensor data.
    pub dtype: DType,
    /// Byte offset of this tensor's data from the start of the tensor data section.
    pub offset: u64,
}

impl GgufTensorInfo {
    /// Total number of elements in this tensor, or `None` on overflow.
    pub fn numel(&self) -> Option<usize> {
        self.dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(usize::try_from(d).ok()?))
    }

    /// Total byte size of this tensor's raw data in the file.
    pub fn data_size(&self) -> Option<usize> {
        self.numel()?.checked_mul(self.dtype.size_in_bytes())
    }
}

/// Parse `n_tensors` tensor info entries from a reader.
///
/// Each entry:
/// 1. GGUF string name
/// 2. u32 number of dimensions
/// 3. n_dims x u64 dimension sizes
/// 4. u32 GGUF type ID (mapped via `DType::from_gguf_type`)
/// 5. u64 byte offset within the tensor data section
pub fn parse_tensor_infos(reader: &mut impl Read, n_tensors: u64) -> Result<Vec<GgufTensorInfo>> {
    let mut infos = Vec::new();
    for _ in 0..n_tensors {
        let name = read_string(reader)?;

        let n_dims = read_u32(reader)?;
        if n_dims > MAX_DIMS {
            return Err(ModelError::Malformed(format!(
                "tensor '{}' has {} dimensions",
                name, n_dims
            )));
        }
        let dims = (0..n_dims)
            .map(|_| read_u64(reader))
            .collect::<Result<Vec<_>>>()?;

        let type_id = read_u32(reader)?;
        let dtype = DType::from_gguf_type(type_id).ok_or(ModelError::UnsupportedGgufType(type_id))?;

        let offset = read_u64(reader)?;

        infos.push(GgufTensorInfo {
            name,
            dims,
            dtype,
            offset,
        });
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(dims: Vec<u64>, dtype: DType) -> GgufTensorInfo {
        GgufTensorInfo {
            name: "t".into(),
            dims,
            dtype,
            offset: 0,
        }
    }

    #[test]
    fn test_data_size() {
        assert_eq!(info(vec![4, 3], DType::F32).data_size(), Some(48));
        assert_eq!(info(vec![4, 3], DType::F16).data_size(), Some(24));
    }

    #[test]
    fn test_numel_overflow() {
        assert_eq!(info(vec![u64::MAX, 2], DType::F32).numel(), None);
    }

    #[test]
    fn test_quantized_type_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.push(b'w');
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&4u64.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes()); // Q4_0
        bytes.extend_from_slice(&0u64.to_le_bytes());
        let err = parse_tensor_infos(&mut std::io::Cursor::new(bytes), 1).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedGgufType(2)));
    }
}
