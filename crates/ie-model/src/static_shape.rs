use crate::environment::Environment;
use crate::error::{ModelError, Result};
use crate::handle::{ModelHandle, TensorBindings, TensorSpec};
use crate::source::{self, ModelFormat, ModelSource};

/// A model whose input and output element counts are fixed at compile time.
///
/// Construction fails unless the wrapped handle declares exactly `IN` input
/// and `OUT` output elements, so code holding a `StaticModel` can size its
/// buffers as arrays.
pub struct StaticModel<const IN: usize, const OUT: usize, H = Box<dyn ModelHandle>> {
    inner: H,
}

impl<const IN: usize, const OUT: usize, H: ModelHandle> StaticModel<IN, OUT, H> {
    pub const IN: usize = IN;
    pub const OUT: usize = OUT;

    pub fn new(inner: H) -> Result<Self> {
        let input = inner.inputs().first().map_or(0, |s| s.shape.numel());
        let output = inner.outputs().first().map_or(0, |s| s.shape.numel());
        if input != IN || output != OUT {
            return Err(ModelError::StaticShapeMismatch {
                expected_input: IN,
                expected_output: OUT,
                input,
                output,
            });
        }
        Ok(Self { inner })
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<const IN: usize, const OUT: usize> StaticModel<IN, OUT> {
    /// Load any supported format and pin its shape.
    pub fn load(source: ModelSource<'_>, format: ModelFormat, env: &Environment) -> Result<Self> {
        Self::new(source::load(source, format, env)?)
    }
}

impl<const IN: usize, const OUT: usize, H: ModelHandle> ModelHandle for StaticModel<IN, OUT, H> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn inputs(&self) -> &[TensorSpec] {
        self.inner.inputs()
    }

    fn outputs(&self) -> &[TensorSpec] {
        self.inner.outputs()
    }

    fn bind(&mut self, bindings: &TensorBindings) -> Result<()> {
        self.inner.bind(bindings)
    }

    fn forward(&mut self, bindings: &mut TensorBindings) -> Result<()> {
        self.inner.forward(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::{Activation, DenseLayer, DenseNetwork, Layer};
    use ie_tensor::Shape;

    fn net(inputs: usize, outputs: usize) -> DenseNetwork {
        let layer = DenseLayer::new(
            inputs,
            outputs,
            vec![1.0; inputs * outputs],
            vec![0.0; outputs],
            Activation::Linear,
        )
        .unwrap();
        DenseNetwork::new(
            "static-test",
            Shape::new(vec![1, inputs]),
            Shape::new(vec![1, outputs]),
            vec![Layer::Dense(layer)],
            &Environment::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_matching_shape() {
        let model = StaticModel::<4, 3, _>::new(net(4, 3)).unwrap();
        assert_eq!(StaticModel::<4, 3, DenseNetwork>::IN, 4);
        assert_eq!(model.outputs()[0].shape.numel(), 3);
    }

    #[test]
    fn test_mismatched_shape() {
        let err = StaticModel::<4, 2, _>::new(net(4, 3)).err().unwrap();
        assert!(matches!(
            err,
            ModelError::StaticShapeMismatch {
                expected_output: 2,
                output: 3,
                ..
            }
        ));
    }
}
