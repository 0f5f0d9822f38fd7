//! Output post-processing: stable softmax and arg-max.

/// Max-subtracted softmax, in place. Empty input is left as is.
pub use ie_tensor::cpu::unary::softmax_in_place;

/// Index of the largest value, first occurrence on ties.
///
/// NaN entries never win. Returns `None` for an empty slice or one that is
/// entirely NaN.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
