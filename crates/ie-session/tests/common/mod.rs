//! JSON model fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

/// A dense layer in the JSON export layout: kernel is `[in][out]`.
pub fn dense(kernel: Vec<Vec<f32>>, bias: Vec<f32>, activation: &str) -> Value {
    let out = bias.len();
    json!({
        "type": "dense",
        "activation": activation,
        "shape": [null, out],
        "weights": [kernel, bias],
    })
}

pub fn model(in_shape: Value, layers: Vec<Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({ "in_shape": in_shape, "layers": layers }))
        .expect("fixture serializes")
}

/// `[1,4] -> [1,3]` classifier: a relu hidden layer of 5 units, then 3 logits.
pub fn classifier_4x3() -> Vec<u8> {
    let hidden: Vec<Vec<f32>> = (0..4)
        .map(|i| (0..5).map(|j| ((i * 5 + j) as f32 * 0.37).sin()).collect())
        .collect();
    let head: Vec<Vec<f32>> = (0..5)
        .map(|i| (0..3).map(|j| ((i * 3 + j) as f32 * 0.53).cos()).collect())
        .collect();
    model(
        json!([null, 4]),
        vec![
            dense(hidden, vec![0.1, -0.2, 0.3, 0.0, 0.05], "relu"),
            dense(head, vec![0.0, 0.1, -0.1], ""),
        ],
    )
}

/// `n -> n` identity with no activation.
pub fn identity(n: usize) -> Vec<u8> {
    let kernel: Vec<Vec<f32>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    model(json!([null, n]), vec![dense(kernel, vec![0.0; n], "linear")])
}
