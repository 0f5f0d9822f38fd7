//! Model handles for the inference engine.
//!
//! A [`ModelHandle`] is the opaque, backend-specific side of an inference
//! session: it declares its tensors, accepts the session's buffers once via
//! `bind`, and runs `forward` over them. Loaders produce boxed handles from a
//! [`ModelSource`] in one of the enabled [`ModelFormat`]s.

pub mod dense;
pub mod environment;
pub mod error;
#[cfg(feature = "gguf")]
pub mod gguf;
pub mod handle;
#[cfg(feature = "json")]
pub mod json;
pub mod source;
pub mod static_shape;

pub use dense::{Activation, DenseLayer, DenseNetwork, Layer};
pub use environment::Environment;
pub use error::{ModelError, Result};
pub use handle::{ModelHandle, TensorBindings, TensorSpec};
pub use source::{load, ModelFormat, ModelSource};
pub use static_shape::StaticModel;
