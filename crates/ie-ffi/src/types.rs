use ie_session::{ModelFormat, PostProcess, SessionConfig};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IEStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorModelLoad = 2,
    ErrorShape = 3,
    /// Recoverable: the session is unchanged and may be invoked again.
    ErrorSizeMismatch = 4,
    ErrorBackend = 5,
    ErrorInternal = 6,
}

/// Output post-processing applied by `ie_invoke`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IEPostProcess {
    Softmax = 0,
    RawLogits = 1,
}

/// Model file format selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IEModelFormat {
    Auto = 0,
    Json = 1,
    Gguf = 2,
}

/// Session construction parameters. Obtain defaults from
/// `ie_default_params`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IESessionParams {
    pub verbose: bool,
    pub post_process: IEPostProcess,
    /// Warm-up passes at construction; 0 still runs one.
    pub priming_runs: u32,
    pub format: IEModelFormat,
}

impl Default for IESessionParams {
    fn default() -> Self {
        Self {
            verbose: false,
            post_process: IEPostProcess::Softmax,
            priming_runs: 1,
            format: IEModelFormat::Auto,
        }
    }
}

impl From<&IESessionParams> for SessionConfig {
    fn from(params: &IESessionParams) -> Self {
        let post_process = match params.post_process {
            IEPostProcess::Softmax => PostProcess::Softmax,
            IEPostProcess::RawLogits => PostProcess::RawLogits,
        };
        let format = match params.format {
            IEModelFormat::Auto => ModelFormat::Auto,
            IEModelFormat::Json => ModelFormat::Json,
            IEModelFormat::Gguf => ModelFormat::Gguf,
        };
        SessionConfig::default()
            .with_verbose(params.verbose)
            .with_post_process(post_process)
            .with_priming_runs(params.priming_runs as usize)
            .with_format(format)
    }
}
