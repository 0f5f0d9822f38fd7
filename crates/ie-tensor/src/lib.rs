//! `ie-tensor` - Shapes, data types, and compute kernels for inference-engine.
//!
//! This crate provides:
//! - A `Shape` type with validated element counts and 2-D views
//! - A `ComputeBackend` trait whose operations write into caller-owned
//!   buffers, so a forward pass can run without touching the heap
//! - A reference `CpuBackend` implementation
//! - Data type definitions (F32, F16)

pub mod backend;
pub mod cpu;
pub mod dtype;
pub mod error;
pub mod shape;

// Re-export primary types at the crate root for convenience.
pub use backend::ComputeBackend;
pub use cpu::CpuBackend;
pub use dtype::DType;
pub use error::{Result, TensorError};
pub use shape::Shape;
