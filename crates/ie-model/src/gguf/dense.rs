//! Dense networks stored in a GGUF container.
//!
//! Metadata:
//! - `general.architecture` = `"dense"`
//! - `dense.input_shape`, `dense.output_shape`: integer arrays
//! - `dense.block_count`: u32
//! - `dense.activations`: one activation name per block
//!
//! Tensors per block `i`: `blk.{i}.weight` with GGUF dims `[in, out]`
//! (row-major `[out][in]`) and `blk.{i}.bias` with dims `[out]`.

use ie_tensor::Shape;

use super::reader::GgufFile;
use crate::dense::{Activation, DenseLayer, DenseNetwork, Layer};
use crate::environment::Environment;
use crate::error::{ModelError, Result};

pub const ARCHITECTURE: &str = "dense";

/// Build a [`DenseNetwork`] from a parsed GGUF file.
pub fn load_gguf(file: &GgufFile<'_>, env: &Environment) -> Result<DenseNetwork> {
    let arch = file.metadata.get_string("general.architecture")?;
    if arch != ARCHITECTURE {
        return Err(ModelError::UnsupportedArchitecture(arch.to_string()));
    }

    let input_shape = Shape::new(file.metadata.get_dims("dense.input_shape")?);
    let output_shape = Shape::new(file.metadata.get_dims("dense.output_shape")?);
    let block_count = file.metadata.get_u32("dense.block_count")? as usize;
    let activations = file.metadata.get_string_array("dense.activations")?;
    if activations.len() != block_count {
        return Err(ModelError::Malformed(format!(
            "dense.activations has {} entries for {} blocks",
            activations.len(),
            block_count
        )));
    }

    let mut layers = Vec::with_capacity(block_count);
    for (i, act) in activations.iter().enumerate() {
        let weight_name = format!("blk.{}.weight", i);
        let info = file.tensor_info(&weight_name)?;
        let (in_features, out_features) = match info.dims.as_slice() {
            &[n_in, n_out] => (n_in as usize, n_out as usize),
            other => {
                return Err(ModelError::Malformed(format!(
                    "{} must be 2-D, got dims {:?}",
                    weight_name, other
                )))
            }
        };
        let weight = file.get_tensor_f32(&weight_name)?;
        let bias = file.get_tensor_f32(&format!("blk.{}.bias", i))?;
        let activation = Activation::from_name(act)?;
        layers.push(Layer::Dense(DenseLayer::new(
            in_features,
            out_features,
            weight,
            bias,
            activation,
        )?));
    }

    tracing::debug!(
        blocks = block_count,
        version = file.header.version,
        "parsed GGUF dense network"
    );
    DenseNetwork::new("dense-gguf", input_shape, output_shape, layers, env)
}
