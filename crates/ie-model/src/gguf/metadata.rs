use std::collections::HashMap;
use std::io::Read;

use super::header::{read_string, read_u32, read_u64};
use crate::error::{ModelError, Result};

/// Arrays larger than this are still read, just not pre-reserved.
const MAX_PREALLOC: usize = 4096;

/// Arrays nested deeper than this are rejected.
const MAX_NESTING: usize = 8;

/// A single GGUF metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum GgufMetadataValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    String(String),
    Array(Vec<GgufMetadataValue>),
}

impl GgufMetadataValue {
    /// Human-readable variant name, used in error messages.
    fn type_name(&self) -> &'static str {
        match self {
            GgufMetadataValue::U8(_) => "U8",
            GgufMetadataValue::I8(_) => "I8",
            GgufMetadataValue::U16(_) => "U16",
            GgufMetadataValue::I16(_) => "I16",
            GgufMetadataValue::U32(_) => "U32",
            GgufMetadataValue::I32(_) => "I32",
            GgufMetadataValue::U64(_) => "U64",
            GgufMetadataValue::I64(_) => "I64",
            GgufMetadataValue::F32(_) => "F32",
            GgufMetadataValue::F64(_) => "F64",
            GgufMetadataValue::Bool(_) => "Bool",
            GgufMetadataValue::String(_) => "String",
            GgufMetadataValue::Array(_) => "Array",
        }
    }

    /// Any non-negative integer variant, widened to usize.
    fn as_dim(&self) -> Option<usize> {
        match *self {
            GgufMetadataValue::U8(v) => Some(v as usize),
            GgufMetadataValue::U16(v) => Some(v as usize),
            GgufMetadataValue::U32(v) => Some(v as usize),
            GgufMetadataValue::U64(v) => usize::try_from(v).ok(),
            GgufMetadataValue::I32(v) => usize::try_from(v).ok(),
            GgufMetadataValue::I64(v) => usize::try_from(v).ok(),
            _ => None,
        }
    }
}

/// Collection of GGUF metadata key-value pairs.
#[derive(Debug, Default)]
pub struct GgufMetadata {
    pub entries: HashMap<String, GgufMetadataValue>,
}

impl GgufMetadata {
    fn mismatch(key: &str, expected: &str, got: &GgufMetadataValue) -> ModelError {
        ModelError::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }

    fn get_array(&self, key: &str) -> Result<&[GgufMetadataValue]> {
        match self.entries.get(key) {
            Some(GgufMetadataValue::Array(arr)) => Ok(arr),
            Some(other) => Err(Self::mismatch(key, "Array", other)),
            None => Err(ModelError::MissingKey(key.to_string())),
        }
    }

    /// Retrieve a string value by key.
    pub fn get_string(&self, key: &str) -> Result<&str> {
        match self.entries.get(key) {
            Some(GgufMetadataValue::String(s)) => Ok(s.as_str()),
            Some(other) => Err(Self::mismatch(key, "String", other)),
            None => Err(ModelError::MissingKey(key.to_string())),
        }
    }

    /// Retrieve a u32 value by key.
    pub fn get_u32(&self, key: &str) -> Result<u32> {
        match self.entries.get(key) {
            Some(GgufMetadataValue::U32(v)) => Ok(*v),
            Some(other) => Err(Self::mismatch(key, "U32", other)),
            None => Err(ModelError::MissingKey(key.to_string())),
        }
    }

    /// Retrieve a string array value by key.
    pub fn get_string_array(&self, key: &str) -> Result<Vec<String>> {
        self.get_array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                GgufMetadataValue::String(s) => Ok(s.clone()),
                other => Err(Self::mismatch(&format!("{}[{}]", key, i), "String", other)),
            })
            .collect()
    }

    /// Retrieve an array of non-negative integers (any integer width) as
    /// tensor dimensions.
    pub fn get_dims(&self, key: &str) -> Result<Vec<usize>> {
        self.get_array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_dim()
                    .ok_or_else(|| Self::mismatch(&format!("{}[{}]", key, i), "unsigned integer", v))
            })
            .collect()
    }

    /// Parse `n_kv` key-value metadata entries from a reader.
    ///
    /// Each entry consists of:
    /// 1. A GGUF string key (u64 length + UTF-8 bytes).
    /// 2. A u32 value type ID.
    /// 3. The value payload, whose format depends on the type ID.
    ///
    /// GGUF value type IDs:
    ///   0=U8, 1=I8, 2=U16, 3=I16, 4=U32, 5=I32, 6=F32, 7=Bool,
    ///   8=String, 9=Array, 10=U64, 11=I64, 12=F64
    pub fn parse_kv(reader: &mut impl Read, n_kv: u64) -> Result<GgufMetadata> {
        let mut entries = HashMap::new();
        for _ in 0..n_kv {
            let key = read_string(reader)?;
            let type_id = read_u32(reader)?;
            let value = read_value(reader, type_id, 0)?;
            entries.insert(key, value);
        }
        Ok(GgufMetadata { entries })
    }
}

fn read_bytes<const N: usize>(reader: &mut impl Read) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a single GGUF metadata value given its type ID. `depth` counts the
/// enclosing arrays.
fn read_value(reader: &mut impl Read, type_id: u32, depth: usize) -> Result<GgufMetadataValue> {
    let value = match type_id {
        0 => GgufMetadataValue::U8(read_bytes::<1>(reader)?[0]),
        1 => GgufMetadataValue::I8(read_bytes::<1>(reader)?[0] as i8),
        2 => GgufMetadataValue::U16(u16::from_le_bytes(read_bytes(reader)?)),
        3 => GgufMetadataValue::I16(i16::from_le_bytes(read_bytes(reader)?)),
        4 => GgufMetadataValue::U32(read_u32(reader)?),
        5 => GgufMetadataValue::I32(i32::from_le_bytes(read_bytes(reader)?)),
        6 => GgufMetadataValue::F32(f32::from_le_bytes(read_bytes(reader)?)),
        7 => GgufMetadataValue::Bool(read_bytes::<1>(reader)?[0] != 0),
        8 => GgufMetadataValue::String(read_string(reader)?),
        9 => {
            // Array: u32 element_type, u64 count, then count values of element_type
            if depth >= MAX_NESTING {
                return Err(ModelError::Malformed(format!(
                    "metadata arrays nested deeper than {}",
                    MAX_NESTING
                )));
            }
            let elem_type = read_u32(reader)?;
            let count = read_u64(reader)?;
            let mut values = Vec::with_capacity((count as usize).min(MAX_PREALLOC));
            for _ in 0..count {
                values.push(read_value(reader, elem_type, depth + 1)?);
            }
            GgufMetadataValue::Array(values)
        }
        10 => GgufMetadataValue::U64(read_u64(reader)?),
        11 => GgufMetadataValue::I64(i64::from_le_bytes(read_bytes(reader)?)),
        12 => GgufMetadataValue::F64(f64::from_le_bytes(read_bytes(reader)?)),
        other => return Err(ModelError::UnsupportedGgufType(other)),
    };
    Ok(value)
}
