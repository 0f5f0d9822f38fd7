use ie_model::ModelFormat;

use crate::postprocess;

/// What `invoke` does to the output vector before picking the arg-max.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostProcess {
    /// Leave the model's output untouched, for models whose last layer
    /// already normalizes.
    RawLogits,
    /// Max-subtracted softmax.
    #[default]
    Softmax,
}

impl PostProcess {
    pub fn apply(&self, values: &mut [f32]) {
        match self {
            PostProcess::RawLogits => {}
            PostProcess::Softmax => postprocess::softmax_in_place(values),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostProcess::RawLogits => "raw-logits",
            PostProcess::Softmax => "softmax",
        }
    }
}

/// Session construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Log construction details at `info` instead of `debug`. Never changes
    /// behaviour.
    pub verbose: bool,
    pub post_process: PostProcess,
    /// Zero-input forward passes run during construction. At least one
    /// pass always runs; 0 is treated as 1.
    pub priming_runs: usize,
    pub format: ModelFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            post_process: PostProcess::Softmax,
            priming_runs: 1,
            format: ModelFormat::Auto,
        }
    }
}

impl SessionConfig {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = post_process;
        self
    }

    pub fn with_priming_runs(mut self, runs: usize) -> Self {
        self.priming_runs = runs;
        self
    }

    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = format;
        self
    }
}
