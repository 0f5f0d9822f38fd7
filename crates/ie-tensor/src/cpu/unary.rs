// In-place activation kernels used by CpuBackend.

pub fn relu(x: &mut [f32]) {
    for v in x.iter_mut() {
        *v = v.max(0.0);
    }
}

pub fn tanh(x: &mut [f32]) {
    for v in x.iter_mut() {
        *v = v.tanh();
    }
}

pub fn sigmoid(x: &mut [f32]) {
    for v in x.iter_mut() {
        *v = 1.0 / (1.0 + (-*v).exp());
    }
}

pub fn elu(x: &mut [f32], alpha: f32) {
    for v in x.iter_mut() {
        if *v <= 0.0 {
            *v = alpha * (v.exp() - 1.0);
        }
    }
}

/// Numerically stable softmax, in place.
///
/// The maximum is subtracted before exponentiating so large logits cannot
/// overflow. An empty slice is left untouched.
///
/// When the maximum is infinite the mass is split evenly across the
/// logits equal to it: `+inf` logits share all of it, and an all `-inf`
/// vector becomes uniform.
pub fn softmax_in_place(x: &mut [f32]) {
    if x.is_empty() {
        return;
    }

    let max_val = x.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if max_val.is_infinite() {
        let mut hits = 0.0f32;
        for v in x.iter_mut() {
            *v = if *v == max_val { 1.0 } else { 0.0 };
            hits += *v;
        }
        for v in x.iter_mut() {
            *v /= hits;
        }
        return;
    }

    let mut sum = 0.0f32;
    for v in x.iter_mut() {
        *v = (*v - max_val).exp();
        sum += *v;
    }

    for v in x.iter_mut() {
        *v /= sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_relu() {
        let mut x = [-1.0, 0.0, 2.0];
        relu(&mut x);
        assert_eq!(x, [0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_sigmoid_zero() {
        let mut x = [0.0];
        sigmoid(&mut x);
        assert_abs_diff_eq!(x[0], 0.5, epsilon = 1e-7);
    }

    #[test]
    fn test_elu() {
        let mut x = [1.5, -1.0];
        elu(&mut x, 1.0);
        assert_eq!(x[0], 1.5);
        assert_abs_diff_eq!(x[1], (-1.0f32).exp() - 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_large_logit() {
        let mut x = [1000.0, 1.0, 0.0];
        softmax_in_place(&mut x);
        assert!(x.iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(x[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_positive_infinity_is_one_hot() {
        let mut x = [f32::INFINITY, 1.0, 0.0];
        softmax_in_place(&mut x);
        assert_eq!(x, [1.0, 0.0, 0.0]);

        let mut y = [2.0, f32::INFINITY, f32::INFINITY];
        softmax_in_place(&mut y);
        assert_eq!(y, [0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_softmax_all_negative_infinity_is_uniform() {
        let mut x = [f32::NEG_INFINITY; 4];
        softmax_in_place(&mut x);
        assert_eq!(x, [0.25; 4]);
    }

    #[test]
    fn test_softmax_empty() {
        let mut x: [f32; 0] = [];
        softmax_in_place(&mut x);
    }

    proptest! {
        #[test]
        fn prop_softmax_is_distribution(v in prop::collection::vec(-1.0e4f32..1.0e4, 1..64)) {
            let mut x = v.clone();
            softmax_in_place(&mut x);
            let sum: f32 = x.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-5, "sum = {}", sum);
            prop_assert!(x.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }
}
