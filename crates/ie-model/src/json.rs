//! Dense networks exported as JSON (the RTNeural / Keras export layout).
//!
//! ```json
//! { "in_shape": [null, 4],
//!   "layers": [ { "type": "dense", "activation": "relu", "shape": [null, 8],
//!                 "weights": [ [[...8 values] x 4 rows], [...8 biases] ] } ] }
//! ```
//!
//! Kernels are stored `[in][out]` and transposed to row-major `[out][in]`
//! on load. `null` dimensions read as 1.

use serde::Deserialize;
use serde_json::Value;

use ie_tensor::Shape;

use crate::dense::{Activation, DenseLayer, DenseNetwork, Layer};
use crate::environment::Environment;
use crate::error::{ModelError, Result};

#[derive(Debug, Deserialize)]
struct JsonModel {
    in_shape: Vec<Option<usize>>,
    layers: Vec<JsonLayer>,
}

#[derive(Debug, Deserialize)]
struct JsonLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    activation: String,
    #[serde(default)]
    shape: Vec<Option<usize>>,
    #[serde(default)]
    weights: Vec<Value>,
}

fn resolve_dims(dims: &[Option<usize>]) -> Vec<usize> {
    dims.iter().map(|d| d.unwrap_or(1)).collect()
}

/// Parse a JSON model document into a [`DenseNetwork`].
pub fn load_json(bytes: &[u8], env: &Environment) -> Result<DenseNetwork> {
    let model: JsonModel = serde_json::from_slice(bytes)
        .map_err(|e| ModelError::Malformed(format!("invalid JSON model: {}", e)))?;

    let input_shape = Shape::new(resolve_dims(&model.in_shape));
    let mut width = input_shape.numel();
    let mut layers = Vec::with_capacity(model.layers.len());
    let mut output_dims: Option<Vec<usize>> = None;

    for (i, raw) in model.layers.iter().enumerate() {
        match raw.kind.as_str() {
            "dense" => {
                let layer = parse_dense(i, raw)?;
                width = layer.out_features();
                layers.push(Layer::Dense(layer));
            }
            "activation" => {
                layers.push(Layer::Activation(Activation::from_name(&raw.activation)?));
            }
            "relu" | "tanh" | "sigmoid" | "elu" | "softmax" => {
                layers.push(Layer::Activation(Activation::from_name(&raw.kind)?));
            }
            "flatten" => {}
            other => return Err(ModelError::UnsupportedLayer(other.to_string())),
        }
        if !raw.shape.is_empty() {
            output_dims = Some(resolve_dims(&raw.shape));
        }
    }

    let output_shape = match output_dims {
        Some(dims) if dims.iter().product::<usize>() == width => Shape::new(dims),
        _ => Shape::new(vec![1, width]),
    };

    DenseNetwork::new("dense-json", input_shape, output_shape, layers, env)
}

fn parse_dense(index: usize, raw: &JsonLayer) -> Result<DenseLayer> {
    let kernel: Vec<Vec<f32>> = match raw.weights.first() {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            ModelError::Malformed(format!("layer {}: kernel is not a 2-D array: {}", index, e))
        })?,
        None => {
            return Err(ModelError::Malformed(format!(
                "layer {}: dense layer has no weights",
                index
            )))
        }
    };

    let in_features = kernel.len();
    let out_features = kernel.first().map_or(0, Vec::len);
    if let Some(bad) = kernel.iter().position(|row| row.len() != out_features) {
        return Err(ModelError::Malformed(format!(
            "layer {}: kernel row {} has {} values, expected {}",
            index,
            bad,
            kernel[bad].len(),
            out_features
        )));
    }

    let bias: Vec<f32> = match raw.weights.get(1) {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            ModelError::Malformed(format!("layer {}: bias is not a 1-D array: {}", index, e))
        })?,
        None => vec![0.0; out_features],
    };

    // [in][out] -> row-major [out][in]
    let mut weight = vec![0.0f32; in_features * out_features];
    for (i, row) in kernel.iter().enumerate() {
        for (o, &w) in row.iter().enumerate() {
            weight[o * in_features + i] = w;
        }
    }

    DenseLayer::new(
        in_features,
        out_features,
        weight,
        bias,
        Activation::from_name(&raw.activation)?,
    )
}
