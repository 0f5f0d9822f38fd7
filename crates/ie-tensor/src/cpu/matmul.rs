// Matrix-vector kernel used by CpuBackend::matvec_into.

/// out[r] = dot(w[r * cols .. (r + 1) * cols], x) for every row.
///
/// Callers check slice lengths; this only iterates.
pub fn matvec(w: &[f32], x: &[f32], out: &mut [f32], cols: usize) {
    for (row, o) in w.chunks_exact(cols).zip(out.iter_mut()) {
        *o = dot(row, x);
    }
}

/// Dot product with four independent accumulators.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = [0.0f32; 4];
    let chunks_a = a.chunks_exact(4);
    let chunks_b = b.chunks_exact(4);
    let tail: f32 = chunks_a
        .remainder()
        .iter()
        .zip(chunks_b.remainder())
        .map(|(x, y)| x * y)
        .sum();
    for (ca, cb) in chunks_a.zip(chunks_b) {
        acc[0] += ca[0] * cb[0];
        acc[1] += ca[1] * cb[1];
        acc[2] += ca[2] * cb[2];
        acc[3] += ca[3] * cb[3];
    }
    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_with_tail() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [1.0, 1.0, 1.0, 1.0, 2.0];
        assert_eq!(dot(&a, &b), 20.0);
    }

    #[test]
    fn test_matvec_rows() {
        // [1,2;3,4] @ [1;1] = [3;7]
        let mut out = [0.0; 2];
        matvec(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0], &mut out, 2);
        assert_eq!(out, [3.0, 7.0]);
    }
}
