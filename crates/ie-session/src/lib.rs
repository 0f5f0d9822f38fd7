//! `ie-session` - the inference session.
//!
//! Construction loads a model, discovers its shapes, allocates the fixed
//! input/output buffers, binds them and primes the backend. After that,
//! [`InferenceSession::invoke`] copies in, runs forward, copies out,
//! post-processes and picks the arg-max without touching the heap.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod postprocess;
pub mod session;

pub use config::{PostProcess, SessionConfig};
pub use descriptor::ModelDescriptor;
pub use error::{Result, SessionError, TensorRole};
pub use session::{ClassificationResult, InferenceSession};

pub use ie_model::{Environment, ModelFormat, ModelHandle, ModelSource, StaticModel};
