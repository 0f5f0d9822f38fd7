use std::fmt;

use ie_tensor::ComputeBackend;

use crate::error::{ModelError, Result};

/// Element-wise nonlinearity applied after a dense layer or on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    Elu { alpha: f32 },
    Softmax,
}

impl Activation {
    /// Parse an activation name as written by model exporters.
    ///
    /// An empty string means no activation.
    pub fn from_name(name: &str) -> Result<Activation> {
        match name.to_ascii_lowercase().as_str() {
            "" | "linear" | "none" => Ok(Activation::Linear),
            "relu" => Ok(Activation::Relu),
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            "elu" => Ok(Activation::Elu { alpha: 1.0 }),
            "softmax" => Ok(Activation::Softmax),
            _ => Err(ModelError::UnknownActivation(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::Elu { .. } => "elu",
            Activation::Softmax => "softmax",
        }
    }

    /// Apply in place through `backend`.
    pub fn apply(&self, backend: &dyn ComputeBackend, x: &mut [f32]) {
        match *self {
            Activation::Linear => {}
            Activation::Relu => backend.relu(x),
            Activation::Tanh => backend.tanh(x),
            Activation::Sigmoid => backend.sigmoid(x),
            Activation::Elu { alpha } => backend.elu(x, alpha),
            Activation::Softmax => backend.softmax(x),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ie_tensor::CpuBackend;

    #[test]
    fn test_from_name() {
        assert_eq!(Activation::from_name("").unwrap(), Activation::Linear);
        assert_eq!(Activation::from_name("ReLU").unwrap(), Activation::Relu);
        assert_eq!(
            Activation::from_name("elu").unwrap(),
            Activation::Elu { alpha: 1.0 }
        );
        assert!(matches!(
            Activation::from_name("gelu"),
            Err(ModelError::UnknownActivation(_))
        ));
    }

    #[test]
    fn test_linear_is_identity() {
        let mut x = [-1.0, 2.0];
        Activation::Linear.apply(&CpuBackend::new(), &mut x);
        assert_eq!(x, [-1.0, 2.0]);
    }
}
