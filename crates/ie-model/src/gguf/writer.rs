//! Minimal GGUF v3 image builder for test fixtures.

use ie_tensor::DType;

use super::header::{GGUF_DEFAULT_ALIGNMENT, GGUF_MAGIC};

struct PendingTensor {
    name: String,
    dims: Vec<u64>,
    dtype: DType,
    data: Vec<u8>,
}

#[derive(Default)]
pub(crate) struct GgufBuilder {
    version: u32,
    kv: Vec<u8>,
    n_kv: u64,
    tensors: Vec<PendingTensor>,
}

fn put_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

impl GgufBuilder {
    pub fn new() -> Self {
        Self {
            version: 3,
            ..Self::default()
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    fn key(&mut self, key: &str, type_id: u32) {
        put_string(&mut self.kv, key);
        self.kv.extend_from_slice(&type_id.to_le_bytes());
        self.n_kv += 1;
    }

    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.key(key, 8);
        put_string(&mut self.kv, value);
        self
    }

    pub fn u32(mut self, key: &str, value: u32) -> Self {
        self.key(key, 4);
        self.kv.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn dims(mut self, key: &str, dims: &[u64]) -> Self {
        self.key(key, 9);
        self.kv.extend_from_slice(&10u32.to_le_bytes());
        self.kv.extend_from_slice(&(dims.len() as u64).to_le_bytes());
        for d in dims {
            self.kv.extend_from_slice(&d.to_le_bytes());
        }
        self
    }

    pub fn strings(mut self, key: &str, values: &[&str]) -> Self {
        self.key(key, 9);
        self.kv.extend_from_slice(&8u32.to_le_bytes());
        self.kv.extend_from_slice(&(values.len() as u64).to_le_bytes());
        for v in values {
            put_string(&mut self.kv, v);
        }
        self
    }

    pub fn tensor_f32(mut self, name: &str, dims: &[u64], values: &[f32]) -> Self {
        self.tensors.push(PendingTensor {
            name: name.to_string(),
            dims: dims.to_vec(),
            dtype: DType::F32,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        });
        self
    }

    pub fn tensor_f16(mut self, name: &str, dims: &[u64], values: &[f32]) -> Self {
        self.tensors.push(PendingTensor {
            name: name.to_string(),
            dims: dims.to_vec(),
            dtype: DType::F16,
            data: values
                .iter()
                .flat_map(|v| half::f16::from_f32(*v).to_le_bytes())
                .collect(),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&GGUF_MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&(self.tensors.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.n_kv.to_le_bytes());
        out.extend_from_slice(&self.kv);

        let mut offset = 0u64;
        let mut offsets = Vec::with_capacity(self.tensors.len());
        for t in &self.tensors {
            put_string(&mut out, &t.name);
            out.extend_from_slice(&(t.dims.len() as u32).to_le_bytes());
            for d in &t.dims {
                out.extend_from_slice(&d.to_le_bytes());
            }
            out.extend_from_slice(&t.dtype.to_gguf_type().to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            offsets.push(offset);
            offset = (offset + t.data.len() as u64).next_multiple_of(GGUF_DEFAULT_ALIGNMENT as u64);
        }

        let data_start = out.len().next_multiple_of(GGUF_DEFAULT_ALIGNMENT);
        out.resize(data_start, 0);
        for (t, off) in self.tensors.iter().zip(offsets) {
            out.resize(data_start + off as usize, 0);
            out.extend_from_slice(&t.data);
        }
        out
    }
}
