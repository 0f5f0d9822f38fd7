pub mod matmul;
pub mod unary;

use crate::backend::ComputeBackend;
use crate::error::{Result, TensorError};

/// Pure-Rust CPU compute backend.
///
/// Straightforward loops over caller-owned slices. Intended as the
/// reference implementation and the default for the shared environment.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn check_len(op: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(TensorError::LengthMismatch { op, expected, got });
    }
    Ok(())
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn matvec_into(
        &self,
        w: &[f32],
        x: &[f32],
        out: &mut [f32],
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        check_len("matvec weights", rows * cols, w.len())?;
        check_len("matvec input", cols, x.len())?;
        check_len("matvec output", rows, out.len())?;
        if cols == 0 {
            out.fill(0.0);
            return Ok(());
        }
        matmul::matvec(w, x, out, cols);
        Ok(())
    }

    fn add_assign(&self, acc: &mut [f32], b: &[f32]) -> Result<()> {
        check_len("add", acc.len(), b.len())?;
        for (a, v) in acc.iter_mut().zip(b) {
            *a += v;
        }
        Ok(())
    }

    fn relu(&self, x: &mut [f32]) {
        unary::relu(x);
    }

    fn tanh(&self, x: &mut [f32]) {
        unary::tanh(x);
    }

    fn sigmoid(&self, x: &mut [f32]) {
        unary::sigmoid(x);
    }

    fn elu(&self, x: &mut [f32], alpha: f32) {
        unary::elu(x, alpha);
    }

    fn softmax(&self, x: &mut [f32]) {
        unary::softmax_in_place(x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> CpuBackend {
        CpuBackend::new()
    }

    #[test]
    fn test_matvec_identity() {
        let b = backend();
        let w = [1.0, 0.0, 0.0, 1.0];
        let mut out = [0.0; 2];
        b.matvec_into(&w, &[3.0, 4.0], &mut out, 2, 2).unwrap();
        assert_eq!(out, [3.0, 4.0]);
    }

    #[test]
    fn test_matvec_rectangular() {
        let b = backend();
        // [1,2,3;4,5,6] @ [1;0;-1] = [-2;-2]
        let w = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [9.0; 2];
        b.matvec_into(&w, &[1.0, 0.0, -1.0], &mut out, 2, 3).unwrap();
        assert_eq!(out, [-2.0, -2.0]);
    }

    #[test]
    fn test_matvec_length_checks() {
        let b = backend();
        let mut out = [0.0; 2];
        let err = b.matvec_into(&[1.0; 6], &[1.0; 2], &mut out, 2, 3).unwrap_err();
        assert_eq!(
            err,
            TensorError::LengthMismatch {
                op: "matvec input",
                expected: 3,
                got: 2
            }
        );
        let mut short = [0.0; 1];
        assert!(b.matvec_into(&[1.0; 6], &[1.0; 3], &mut short, 2, 3).is_err());
    }

    #[test]
    fn test_add_assign() {
        let b = backend();
        let mut acc = [1.0, 2.0];
        b.add_assign(&mut acc, &[3.0, 4.0]).unwrap();
        assert_eq!(acc, [4.0, 6.0]);
        assert!(b.add_assign(&mut acc, &[1.0]).is_err());
    }

    #[test]
    fn test_softmax_monotonic() {
        let b = backend();
        let mut x = [1.0, 2.0, 3.0];
        b.softmax(&mut x);
        let sum: f32 = x.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(x[0] < x[1]);
        assert!(x[1] < x[2]);
    }

    #[test]
    fn test_tanh_relu() {
        let b = backend();
        let mut x = [0.0, -3.0];
        b.tanh(&mut x);
        assert_eq!(x[0], 0.0);
        b.relu(&mut x);
        assert_eq!(x, [0.0, 0.0]);
    }
}
