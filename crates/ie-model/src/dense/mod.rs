//! Feed-forward network of dense layers, the engine behind both file
//! formats this crate reads.

pub mod activation;

pub use activation::Activation;

use std::sync::Arc;

use ie_tensor::{ComputeBackend, Shape};

use crate::environment::Environment;
use crate::error::{ModelError, Result};
use crate::handle::{ModelHandle, TensorBindings, TensorSpec};

/// A fully connected layer: y = act(W @ x + b).
#[derive(Debug, Clone)]
pub struct DenseLayer {
    in_features: usize,
    out_features: usize,
    /// Row-major [out_features, in_features].
    weight: Vec<f32>,
    /// Length out_features.
    bias: Vec<f32>,
    activation: Activation,
}

impl DenseLayer {
    /// Build a layer, checking weight and bias lengths against its widths.
    pub fn new(
        in_features: usize,
        out_features: usize,
        weight: Vec<f32>,
        bias: Vec<f32>,
        activation: Activation,
    ) -> Result<Self> {
        if in_features == 0 || out_features == 0 {
            return Err(ModelError::Malformed(format!(
                "dense layer with zero width ({} -> {})",
                in_features, out_features
            )));
        }
        if weight.len() != in_features * out_features {
            return Err(ModelError::Malformed(format!(
                "dense weight has {} values, expected {}x{}",
                weight.len(),
                out_features,
                in_features
            )));
        }
        if bias.len() != out_features {
            return Err(ModelError::Malformed(format!(
                "dense bias has {} values, expected {}",
                bias.len(),
                out_features
            )));
        }
        Ok(Self {
            in_features,
            out_features,
            weight,
            bias,
            activation,
        })
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weight(&self) -> &[f32] {
        &self.weight
    }

    pub fn bias(&self) -> &[f32] {
        &self.bias
    }
}

/// One step of the network.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(DenseLayer),
    Activation(Activation),
}

/// Ping-pong activation buffers, sized once at bind time.
#[derive(Debug)]
struct Scratch {
    a: Vec<f32>,
    b: Vec<f32>,
    input_len: usize,
    output_len: usize,
}

/// A sequential dense network with a single f32 input and output.
pub struct DenseNetwork {
    name: &'static str,
    inputs: Vec<TensorSpec>,
    outputs: Vec<TensorSpec>,
    layers: Vec<Layer>,
    backend: Arc<dyn ComputeBackend>,
    scratch: Option<Scratch>,
}

impl DenseNetwork {
    /// Assemble a network from its declared shapes and layer stack.
    ///
    /// Successive dense layers must chain (each layer's input width equals
    /// the previous layer's output width). Agreement between the stack and
    /// the declared shapes is checked later, at bind time, so that a bad
    /// declared shape surfaces as a shape problem rather than a load failure.
    pub fn new(
        name: &'static str,
        input_shape: Shape,
        output_shape: Shape,
        layers: Vec<Layer>,
        env: &Environment,
    ) -> Result<Self> {
        let mut width: Option<usize> = None;
        for (i, layer) in layers.iter().enumerate() {
            if let Layer::Dense(d) = layer {
                if let Some(w) = width {
                    if w != d.in_features {
                        return Err(ModelError::InvalidTopology(format!(
                            "layer {} expects {} inputs but the previous dense layer produces {}",
                            i, d.in_features, w
                        )));
                    }
                }
                width = Some(d.out_features);
            }
        }

        Ok(Self {
            name,
            inputs: vec![TensorSpec::f32("input", input_shape)],
            outputs: vec![TensorSpec::f32("output", output_shape)],
            layers,
            backend: Arc::clone(env.backend()),
            scratch: None,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| match l {
                Layer::Dense(d) => d.weight.len() + d.bias.len(),
                Layer::Activation(_) => 0,
            })
            .sum()
    }

    fn dense_layers(&self) -> impl DoubleEndedIterator<Item = &DenseLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Dense(d) => Some(d),
            Layer::Activation(_) => None,
        })
    }
}

impl ModelHandle for DenseNetwork {
    fn name(&self) -> &str {
        self.name
    }

    fn inputs(&self) -> &[TensorSpec] {
        &self.inputs
    }

    fn outputs(&self) -> &[TensorSpec] {
        &self.outputs
    }

    fn bind(&mut self, bindings: &TensorBindings) -> Result<()> {
        if self.scratch.is_some() {
            return Err(ModelError::AlreadyBound);
        }

        let input_len = bindings.input().len();
        let output_len = bindings.output().len();

        let declared_in = self.inputs[0].shape.numel();
        if input_len != declared_in {
            return Err(ModelError::BindingMismatch {
                tensor: "input",
                expected: declared_in,
                got: input_len,
            });
        }
        let declared_out = self.outputs[0].shape.numel();
        if output_len != declared_out {
            return Err(ModelError::BindingMismatch {
                tensor: "output",
                expected: declared_out,
                got: output_len,
            });
        }

        // The layer stack itself must map input_len -> output_len.
        let stack_in = self
            .dense_layers()
            .next()
            .map_or(input_len, |d| d.in_features);
        if stack_in != input_len {
            return Err(ModelError::BindingMismatch {
                tensor: "input",
                expected: stack_in,
                got: input_len,
            });
        }
        let stack_out = self
            .dense_layers()
            .next_back()
            .map_or(input_len, |d| d.out_features);
        if stack_out != output_len {
            return Err(ModelError::BindingMismatch {
                tensor: "output",
                expected: stack_out,
                got: output_len,
            });
        }

        let widest = self
            .dense_layers()
            .map(|d| d.out_features)
            .fold(input_len, usize::max);
        self.scratch = Some(Scratch {
            a: vec![0.0; widest],
            b: vec![0.0; widest],
            input_len,
            output_len,
        });
        Ok(())
    }

    fn forward(&mut self, bindings: &mut TensorBindings) -> Result<()> {
        let scratch = self.scratch.as_mut().ok_or(ModelError::NotBound)?;
        let (input, output) = bindings.split();
        if input.len() != scratch.input_len {
            return Err(ModelError::BindingMismatch {
                tensor: "input",
                expected: scratch.input_len,
                got: input.len(),
            });
        }
        if output.len() != scratch.output_len {
            return Err(ModelError::BindingMismatch {
                tensor: "output",
                expected: scratch.output_len,
                got: output.len(),
            });
        }

        let backend = self.backend.as_ref();
        scratch.a[..input.len()].copy_from_slice(input);
        let mut width = input.len();
        let mut current_is_a = true;

        for layer in &self.layers {
            match layer {
                Layer::Dense(d) => {
                    let (src, dst) = if current_is_a {
                        (&scratch.a, &mut scratch.b)
                    } else {
                        (&scratch.b, &mut scratch.a)
                    };
                    let dst = &mut dst[..d.out_features];
                    backend.matvec_into(
                        &d.weight,
                        &src[..d.in_features],
                        dst,
                        d.out_features,
                        d.in_features,
                    )?;
                    backend.add_assign(dst, &d.bias)?;
                    d.activation.apply(backend, dst);
                    width = d.out_features;
                    current_is_a = !current_is_a;
                }
                Layer::Activation(act) => {
                    let cur = if current_is_a {
                        &mut scratch.a
                    } else {
                        &mut scratch.b
                    };
                    act.apply(backend, &mut cur[..width]);
                }
            }
        }

        let cur = if current_is_a { &scratch.a } else { &scratch.b };
        output.copy_from_slice(&cur[..width]);
        Ok(())
    }
}
