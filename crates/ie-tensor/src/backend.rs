use std::fmt::Debug;

use crate::error::Result;

/// Trait for pluggable compute backends.
///
/// Every operation writes into a caller-owned slice. Nothing here may
/// allocate on success, so a model whose scratch buffers were sized up front
/// can run a forward pass from a real-time thread.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// Matrix-vector product: out = W @ x.
    ///
    /// - `w`: row-major data of shape [rows, cols]
    /// - `x`: vector of length `cols`
    /// - `out`: vector of length `rows`, overwritten
    fn matvec_into(
        &self,
        w: &[f32],
        x: &[f32],
        out: &mut [f32],
        rows: usize,
        cols: usize,
    ) -> Result<()>;

    /// Element-wise accumulate: acc[i] += b[i].
    fn add_assign(&self, acc: &mut [f32], b: &[f32]) -> Result<()>;

    /// ReLU in place: x[i] = max(x[i], 0).
    fn relu(&self, x: &mut [f32]);

    /// Hyperbolic tangent in place.
    fn tanh(&self, x: &mut [f32]);

    /// Logistic sigmoid in place: x[i] = 1 / (1 + exp(-x[i])).
    fn sigmoid(&self, x: &mut [f32]);

    /// ELU in place: x[i] = x[i] if x[i] > 0, else alpha * (exp(x[i]) - 1).
    fn elu(&self, x: &mut [f32], alpha: f32);

    /// Numerically stable softmax over the whole slice, in place.
    ///
    /// result[i] = exp(x[i] - max(x)) / sum(exp(x[j] - max(x)))
    fn softmax(&self, x: &mut [f32]);
}
