use std::fmt;

use ie_model::TensorSpec;
use ie_tensor::{DType, Shape};

use crate::error::{Result, SessionError};

/// Shapes and element counts of a loaded model, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub dtype: DType,
    pub input_shape: Shape,
    pub output_shape: Shape,
    pub input_element_count: usize,
    pub output_element_count: usize,
}

impl ModelDescriptor {
    /// Validate a model's declared tensors and compute their element counts.
    ///
    /// Exactly one f32 input and one f32 output are accepted, each with a
    /// non-empty shape and no zero dimension.
    pub fn from_specs(inputs: &[TensorSpec], outputs: &[TensorSpec]) -> Result<Self> {
        let input = single("input", inputs)?;
        let output = single("output", outputs)?;
        let input_element_count = element_count(input)?;
        let output_element_count = element_count(output)?;
        Ok(Self {
            dtype: DType::F32,
            input_shape: input.shape.clone(),
            output_shape: output.shape.clone(),
            input_element_count,
            output_element_count,
        })
    }

    /// `(rows, cols)` when the input is a batch of one 2-D matrix.
    pub fn input_size_2d(&self) -> Option<(usize, usize)> {
        self.input_shape.as_matrix()
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) -> {} ({})",
            self.dtype,
            self.input_shape,
            self.input_element_count,
            self.output_shape,
            self.output_element_count
        )
    }
}

fn single<'a>(role: &str, specs: &'a [TensorSpec]) -> Result<&'a TensorSpec> {
    match specs {
        [spec] => Ok(spec),
        [] => Err(SessionError::shape(format!("model declares no {} tensor", role))),
        many => Err(SessionError::shape(format!(
            "model declares {} {} tensors, exactly one is supported",
            many.len(),
            role
        ))),
    }
}

fn element_count(spec: &TensorSpec) -> Result<usize> {
    if spec.dtype != DType::F32 {
        return Err(SessionError::shape(format!(
            "tensor '{}' is {}, only f32 is supported",
            spec.name, spec.dtype
        )));
    }
    spec.shape
        .element_count()
        .map_err(|e| SessionError::shape(format!("tensor '{}': {}", spec.name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(dims: &[usize]) -> TensorSpec {
        TensorSpec::f32("t", Shape::from_slice(dims))
    }

    #[test]
    fn test_element_counts() {
        let d = ModelDescriptor::from_specs(&[spec(&[1, 4])], &[spec(&[1, 3])]).unwrap();
        assert_eq!(d.input_element_count, 4);
        assert_eq!(d.output_element_count, 3);
        assert_eq!(d.input_size_2d(), None);
        assert_eq!(d.to_string(), "f32 [1, 4] (4) -> [1, 3] (3)");
    }

    #[test]
    fn test_2d_input() {
        let d = ModelDescriptor::from_specs(&[spec(&[1, 8, 16, 1])], &[spec(&[1, 2])]).unwrap();
        assert_eq!(d.input_size_2d(), Some((8, 16)));
        assert_eq!(d.input_element_count, 128);
    }

    #[test]
    fn test_rejects_empty_and_zero() {
        for dims in [&[][..], &[1, 0][..]] {
            let err = ModelDescriptor::from_specs(&[spec(dims)], &[spec(&[1, 3])]).unwrap_err();
            assert!(matches!(err, SessionError::Shape { .. }));
        }
        let err = ModelDescriptor::from_specs(&[spec(&[1, 4])], &[spec(&[0])]).unwrap_err();
        assert!(matches!(err, SessionError::Shape { .. }));
    }

    #[test]
    fn test_rejects_multiple_tensors() {
        let err =
            ModelDescriptor::from_specs(&[spec(&[4]), spec(&[4])], &[spec(&[3])]).unwrap_err();
        assert!(err.to_string().contains("exactly one"));
        let err = ModelDescriptor::from_specs(&[spec(&[4])], &[]).unwrap_err();
        assert!(err.to_string().contains("no output"));
    }

    #[test]
    fn test_rejects_f16() {
        let mut half = spec(&[4]);
        half.dtype = DType::F16;
        let err = ModelDescriptor::from_specs(&[half], &[spec(&[3])]).unwrap_err();
        assert!(matches!(err, SessionError::Shape { .. }));
    }
}
