use ie_tensor::{DType, Shape};

use crate::error::Result;

/// Name, shape, and element type of one model input or output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSpec {
    pub name: String,
    pub shape: Shape,
    pub dtype: DType,
}

impl TensorSpec {
    pub fn f32(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype: DType::F32,
        }
    }
}

/// The fixed input and output buffers a session registers with a model.
///
/// Allocated once, at their final sizes; neither buffer is ever resized.
/// A model reads `input` and writes `output` on every forward pass.
#[derive(Debug)]
pub struct TensorBindings {
    input: Box<[f32]>,
    output: Box<[f32]>,
}

impl TensorBindings {
    /// Allocate zero-filled buffers of exactly the given lengths.
    pub fn zeroed(input_len: usize, output_len: usize) -> Self {
        Self {
            input: vec![0.0; input_len].into_boxed_slice(),
            output: vec![0.0; output_len].into_boxed_slice(),
        }
    }

    pub fn input(&self) -> &[f32] {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut [f32] {
        &mut self.input
    }

    pub fn output(&self) -> &[f32] {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut [f32] {
        &mut self.output
    }

    /// Borrow the input for reading and the output for writing at once.
    pub fn split(&mut self) -> (&[f32], &mut [f32]) {
        (&self.input, &mut self.output)
    }
}

/// Capability set an inference session needs from a loaded model.
///
/// Lifecycle: load (backend specific) -> `bind` exactly once -> any number
/// of `forward` calls. A backend may do lazy one-time work on the first
/// `forward`; every later call with the same bindings must not allocate.
pub trait ModelHandle: Send {
    /// Short name of the backend adapter (e.g. "dense-json").
    fn name(&self) -> &str;

    /// Declared input tensors, available right after load.
    fn inputs(&self) -> &[TensorSpec];

    /// Declared output tensors, available right after load.
    fn outputs(&self) -> &[TensorSpec];

    /// Register the session's buffers and size any internal scratch space.
    ///
    /// Fails with `ModelError::AlreadyBound` on a second call, and with
    /// `ModelError::BindingMismatch` if a buffer does not fit the model.
    fn bind(&mut self, bindings: &TensorBindings) -> Result<()>;

    /// Run one forward pass from `bindings.input()` into `bindings.output()`.
    fn forward(&mut self, bindings: &mut TensorBindings) -> Result<()>;
}

impl<H: ModelHandle + ?Sized> ModelHandle for Box<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn inputs(&self) -> &[TensorSpec] {
        (**self).inputs()
    }

    fn outputs(&self) -> &[TensorSpec] {
        (**self).outputs()
    }

    fn bind(&mut self, bindings: &TensorBindings) -> Result<()> {
        (**self).bind(bindings)
    }

    fn forward(&mut self, bindings: &mut TensorBindings) -> Result<()> {
        (**self).forward(bindings)
    }
}
