use std::path::Path;

use ie_model::{Environment, ModelError, ModelHandle, ModelSource, StaticModel, TensorBindings};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::descriptor::ModelDescriptor;
use crate::error::{Result, SessionError, TensorRole};
use crate::postprocess::argmax;

/// Logs at `info` when the session is verbose, at `debug` otherwise.
macro_rules! setup_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// The outcome of one [`InferenceSession::classify`] call, borrowing the
/// caller's output vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult<'a> {
    pub class: usize,
    pub probabilities: &'a [f32],
}

impl ClassificationResult<'_> {
    /// Value at the selected index.
    pub fn confidence(&self) -> f32 {
        self.probabilities[self.class]
    }
}

/// A loaded, bound and primed model behind fixed-size buffers.
///
/// Everything that may allocate, do I/O or fail for reasons other than
/// caller misuse happens in the constructors. [`invoke`](Self::invoke)
/// only copies, runs the bound forward pass and post-processes in place.
///
/// A session is not `Sync`; use one per real-time thread.
pub struct InferenceSession<H: ModelHandle = Box<dyn ModelHandle>> {
    handle: H,
    bindings: TensorBindings,
    descriptor: ModelDescriptor,
    config: SessionConfig,
}

impl InferenceSession {
    /// Load from `source` using the process-wide [`Environment`].
    pub fn create(source: ModelSource<'_>, config: SessionConfig) -> Result<Self> {
        Self::create_in(source, config, Environment::global())
    }

    /// Load from `source` with an injected environment.
    pub fn create_in(
        source: ModelSource<'_>,
        config: SessionConfig,
        env: &Environment,
    ) -> Result<Self> {
        setup_event!(config.verbose, %source, format = %config.format, "loading model");
        let handle = ie_model::load(source, config.format, env).map_err(|e| {
            warn!(%source, error = %e, "model load failed");
            SessionError::ModelLoad(e)
        })?;
        Self::from_handle(handle, config)
    }

    pub fn from_path(path: impl AsRef<Path>, config: SessionConfig) -> Result<Self> {
        Self::create(ModelSource::Path(path.as_ref()), config)
    }

    /// Load from a caller-owned buffer; the buffer is not retained.
    pub fn from_bytes(bytes: &[u8], config: SessionConfig) -> Result<Self> {
        Self::create(ModelSource::Bytes(bytes), config)
    }
}

impl<H: ModelHandle> InferenceSession<H> {
    /// Wrap an already-loaded handle: discover shapes, allocate and bind the
    /// buffers, then prime.
    pub fn from_handle(mut handle: H, config: SessionConfig) -> Result<Self> {
        let descriptor = ModelDescriptor::from_specs(handle.inputs(), handle.outputs())
            .inspect_err(|e| warn!(model = handle.name(), error = %e, "unusable model shape"))?;
        setup_event!(
            config.verbose,
            model = handle.name(),
            input_shape = %descriptor.input_shape,
            output_shape = %descriptor.output_shape,
            input_elements = descriptor.input_element_count,
            output_elements = descriptor.output_element_count,
            "discovered model shapes"
        );

        let bindings = TensorBindings::zeroed(
            descriptor.input_element_count,
            descriptor.output_element_count,
        );
        handle.bind(&bindings).map_err(|e| {
            warn!(model = handle.name(), error = %e, "binding buffers failed");
            SessionError::ModelLoad(e)
        })?;

        let mut session = Self {
            handle,
            bindings,
            descriptor,
            config,
        };
        session.prime()?;
        Ok(session)
    }

    /// Run the full inference path on zeros so that any lazy backend setup
    /// happens now rather than on the first real call.
    fn prime(&mut self) -> Result<()> {
        let runs = self.config.priming_runs.max(1);
        for run in 0..runs {
            self.bindings.input_mut().fill(0.0);
            self.handle.forward(&mut self.bindings).map_err(|e| {
                warn!(model = self.handle.name(), run, error = %e, "priming failed");
                SessionError::Backend(e)
            })?;
            let output = self.bindings.output_mut();
            self.config.post_process.apply(output);
            let _ = argmax(output);
        }
        setup_event!(
            self.config.verbose,
            model = self.handle.name(),
            runs,
            post_process = self.config.post_process.as_str(),
            "session primed"
        );
        Ok(())
    }

    /// Run one inference and return the arg-max of the post-processed output.
    ///
    /// `input` must hold exactly [`input_size`](Self::input_size) values and
    /// `output` exactly [`output_size`](Self::output_size); both are checked
    /// before anything is written. On success `output` holds the
    /// post-processed values. Performs no heap allocation when the sizes
    /// match and the backend succeeds. Under softmax, `+inf` outputs share
    /// the probability mass and every finite output gets 0.
    pub fn invoke(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize> {
        self.check_len(TensorRole::Input, self.descriptor.input_element_count, input.len())?;
        self.check_len(TensorRole::Output, self.descriptor.output_element_count, output.len())?;

        self.bindings.input_mut().copy_from_slice(input);
        if let Err(e) = self.handle.forward(&mut self.bindings) {
            warn!(model = self.handle.name(), error = %e, "forward pass failed");
            return Err(SessionError::Backend(e));
        }
        output.copy_from_slice(self.bindings.output());
        self.config.post_process.apply(output);

        match argmax(output) {
            Some(class) => Ok(class),
            None => {
                warn!(model = self.handle.name(), "forward pass produced only NaN");
                Err(SessionError::Backend(ModelError::Other(
                    "model output is entirely NaN".to_string(),
                )))
            }
        }
    }

    /// [`invoke`](Self::invoke) over fixed-length arrays. The lengths are
    /// still checked against the model at run time.
    pub fn invoke_array<const I: usize, const O: usize>(
        &mut self,
        input: &[f32; I],
        output: &mut [f32; O],
    ) -> Result<usize> {
        self.invoke(input, output)
    }

    /// Classify a flat row-major `rows x cols` matrix.
    ///
    /// The model's input must be 2-D (see [`input_size_2d`](Self::input_size_2d))
    /// with the same rows and columns, and `input` must hold `rows * cols`
    /// values.
    pub fn invoke_2d(
        &mut self,
        input: &[f32],
        rows: usize,
        cols: usize,
        output: &mut [f32],
    ) -> Result<usize> {
        let Some((model_rows, model_cols)) = self.input_size_2d() else {
            return Err(SessionError::shape(format!(
                "model input {} is not 2-D",
                self.descriptor.input_shape
            )));
        };
        if (rows, cols) != (model_rows, model_cols) {
            warn!(rows, cols, model_rows, model_cols, "2-D input dimensions mismatch");
            return Err(SessionError::SizeMismatch {
                tensor: TensorRole::Input,
                expected: model_rows * model_cols,
                actual: rows.saturating_mul(cols),
            });
        }
        self.invoke(input, output)
    }

    /// [`invoke`](Self::invoke), returning the selected class together with
    /// the probabilities now in `output`.
    pub fn classify<'o>(
        &mut self,
        input: &[f32],
        output: &'o mut [f32],
    ) -> Result<ClassificationResult<'o>> {
        let class = self.invoke(input, output)?;
        Ok(ClassificationResult {
            class,
            probabilities: output,
        })
    }

    pub fn input_size(&self) -> usize {
        self.descriptor.input_element_count
    }

    pub fn output_size(&self) -> usize {
        self.descriptor.output_element_count
    }

    /// `(rows, cols)` for models with a 2-D input, `None` otherwise.
    pub fn input_size_2d(&self) -> Option<(usize, usize)> {
        self.descriptor.input_size_2d()
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    fn check_len(&self, tensor: TensorRole, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            warn!(%tensor, expected, actual, "vector size mismatch");
            return Err(SessionError::SizeMismatch {
                tensor,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl<const IN: usize, const OUT: usize, H: ModelHandle> InferenceSession<StaticModel<IN, OUT, H>> {
    /// Invoke with array lengths fixed by the model's static shape, so a
    /// wrong-sized call does not compile.
    pub fn invoke_fixed(&mut self, input: &[f32; IN], output: &mut [f32; OUT]) -> Result<usize> {
        self.invoke(input, output)
    }
}
