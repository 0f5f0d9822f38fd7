use crate::error::{Result, TensorError};
use std::fmt;

/// A tensor shape, wrapping a vector of dimension sizes.
///
/// The first dimension is conventionally a batch size of 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// Product of all dimension sizes, without validation.
    ///
    /// An empty shape yields 1 here; use [`Shape::element_count`] where a
    /// usable buffer size is needed.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Number of elements a buffer for this shape must hold.
    ///
    /// # Errors
    /// Fails for an empty shape, a zero dimension, or a product that
    /// overflows `usize`.
    pub fn element_count(&self) -> Result<usize> {
        if self.dims.is_empty() {
            return Err(self.invalid("shape has no dimensions"));
        }
        if self.dims.contains(&0) {
            return Err(self.invalid("shape has a zero dimension"));
        }
        self.dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| self.invalid("element count overflows usize"))
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Interpret this shape as a batch of one 2-D matrix.
    ///
    /// Shapes of rank >= 3 whose trailing dims (after index 2) are all 1,
    /// such as `[1, R, C]` or `[1, R, C, 1]`, yield `Some((R, C))`.
    pub fn as_matrix(&self) -> Option<(usize, usize)> {
        if self.dims.len() < 3 || self.dims[3..].iter().any(|&d| d != 1) {
            return None;
        }
        Some((self.dims[1], self.dims[2]))
    }

    fn invalid(&self, reason: &'static str) -> TensorError {
        TensorError::InvalidShape {
            dims: self.dims.clone(),
            reason,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(vec![1, 3, 4]);
        assert_eq!(s.dims(), &[1, 3, 4]);
        assert_eq!(s.numel(), 12);
        assert_eq!(s.element_count().unwrap(), 12);
    }

    #[test]
    fn test_empty_shape_rejected() {
        let s = Shape::new(vec![]);
        assert_eq!(s.numel(), 1); // product of empty = 1
        assert!(matches!(
            s.element_count(),
            Err(TensorError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_zero_dim_rejected() {
        assert!(Shape::new(vec![1, 0, 3]).element_count().is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(Shape::new(vec![usize::MAX, 2]).element_count().is_err());
    }

    #[test]
    fn test_as_matrix() {
        assert_eq!(Shape::new(vec![1, 8, 16]).as_matrix(), Some((8, 16)));
        assert_eq!(Shape::new(vec![1, 8, 16, 1]).as_matrix(), Some((8, 16)));
        assert_eq!(Shape::new(vec![1, 8, 16, 2]).as_matrix(), None);
        assert_eq!(Shape::new(vec![1, 128]).as_matrix(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(vec![1, 4]).to_string(), "[1, 4]");
    }
}
