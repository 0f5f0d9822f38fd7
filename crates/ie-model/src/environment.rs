use std::sync::{Arc, OnceLock};

use ie_tensor::{ComputeBackend, CpuBackend};

static GLOBAL: OnceLock<Environment> = OnceLock::new();

/// Runtime state shared by every model loaded in a process.
///
/// Loaders take an `&Environment` instead of reaching for a hidden static,
/// so tests and embedders can inject their own. [`Environment::global`] is
/// the init-once default; it lives until process exit.
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    backend: Arc<dyn ComputeBackend>,
}

impl Environment {
    /// Environment backed by the reference CPU backend.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_backend(name, Arc::new(CpuBackend::new()))
    }

    pub fn with_backend(name: impl Into<String>, backend: Arc<dyn ComputeBackend>) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    /// The process-wide environment, created on first use.
    pub fn global() -> &'static Environment {
        GLOBAL.get_or_init(|| {
            tracing::debug!("initializing global inference environment");
            Environment::new("ie-global")
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &Arc<dyn ComputeBackend> {
        &self.backend
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new("ie")
    }
}
