use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed model: {0}")]
    Malformed(String),
    #[error("model format '{0}' is not enabled in this build")]
    FormatDisabled(&'static str),
    #[error("invalid GGUF magic: expected 'GGUF', got {0:?}")]
    InvalidMagic([u8; 4]),
    #[error("unsupported GGUF version: {0}")]
    UnsupportedVersion(u32),
    #[error("missing metadata key: {0}")]
    MissingKey(String),
    #[error("type mismatch for key '{key}': expected {expected}, got {got}")]
    TypeMismatch {
        key: String,
        expected: String,
        got: String,
    },
    #[error("unsupported GGUF type ID: {0}")]
    UnsupportedGgufType(u32),
    #[error("tensor not found: {0}")]
    TensorNotFound(String),
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),
    #[error("unsupported layer type: {0}")]
    UnsupportedLayer(String),
    #[error("unknown activation: {0}")]
    UnknownActivation(String),
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
    #[error(
        "static shape mismatch: compiled for {expected_input} -> {expected_output}, model has {input} -> {output}"
    )]
    StaticShapeMismatch {
        expected_input: usize,
        expected_output: usize,
        input: usize,
        output: usize,
    },
    #[error("buffers are already bound to this model")]
    AlreadyBound,
    #[error("forward called before buffers were bound")]
    NotBound,
    #[error("{tensor} binding has {got} elements, model expects {expected}")]
    BindingMismatch {
        tensor: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("tensor error: {0}")]
    TensorError(#[from] ie_tensor::TensorError),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
