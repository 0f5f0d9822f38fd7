use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::environment::Environment;
use crate::error::{ModelError, Result};
use crate::handle::ModelHandle;

#[cfg(feature = "gguf")]
use crate::gguf::GGUF_MAGIC;
#[cfg(not(feature = "gguf"))]
const GGUF_MAGIC: [u8; 4] = *b"GGUF";

/// Where a model's serialized form comes from.
///
/// `Bytes` borrows a caller-owned buffer; it only has to outlive the load.
#[derive(Debug, Clone, Copy)]
pub enum ModelSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl fmt::Display for ModelSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Path(p) => write!(f, "{}", p.display()),
            ModelSource::Bytes(b) => write!(f, "<{} byte buffer>", b.len()),
        }
    }
}

/// Serialized model format. `Auto` sniffs the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelFormat {
    #[default]
    Auto,
    Json,
    Gguf,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Auto => "auto",
            ModelFormat::Json => "json",
            ModelFormat::Gguf => "gguf",
        }
    }

    /// Resolve `Auto` against a concrete source: GGUF when the bytes start
    /// with the GGUF magic or the path ends in `.gguf`, JSON otherwise.
    /// Explicit formats are returned unchanged.
    pub fn resolve(self, source: &ModelSource<'_>) -> Result<ModelFormat> {
        if self != ModelFormat::Auto {
            return Ok(self);
        }
        let is_gguf = match source {
            ModelSource::Bytes(b) => b.starts_with(&GGUF_MAGIC),
            ModelSource::Path(p) => {
                let by_extension = p
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("gguf"));
                by_extension || {
                    let mut magic = [0u8; 4];
                    let mut file = File::open(p)?;
                    file.read_exact(&mut magic).is_ok() && magic == GGUF_MAGIC
                }
            }
        };
        Ok(if is_gguf {
            ModelFormat::Gguf
        } else {
            ModelFormat::Json
        })
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ModelFormat::Auto),
            "json" => Ok(ModelFormat::Json),
            "gguf" => Ok(ModelFormat::Gguf),
            other => Err(ModelError::Other(format!("unknown model format '{}'", other))),
        }
    }
}

/// Load a model handle from `source` with the adapter `format` selects.
pub fn load(
    source: ModelSource<'_>,
    format: ModelFormat,
    env: &Environment,
) -> Result<Box<dyn ModelHandle>> {
    let resolved = format.resolve(&source)?;
    tracing::debug!(%source, format = %resolved, env = env.name(), "loading model");
    match resolved {
        ModelFormat::Gguf => load_gguf_source(source, env),
        _ => load_json_source(source, env),
    }
}

#[cfg(feature = "json")]
fn load_json_source(source: ModelSource<'_>, env: &Environment) -> Result<Box<dyn ModelHandle>> {
    let net = match source {
        ModelSource::Path(p) => crate::json::load_json(&std::fs::read(p)?, env)?,
        ModelSource::Bytes(b) => crate::json::load_json(b, env)?,
    };
    Ok(Box::new(net))
}

#[cfg(not(feature = "json"))]
fn load_json_source(_: ModelSource<'_>, _: &Environment) -> Result<Box<dyn ModelHandle>> {
    Err(ModelError::FormatDisabled("json"))
}

#[cfg(feature = "gguf")]
fn load_gguf_source(source: ModelSource<'_>, env: &Environment) -> Result<Box<dyn ModelHandle>> {
    use crate::gguf::{load_gguf, GgufFile};

    let net = match source {
        ModelSource::Path(p) => load_gguf(&GgufFile::open(p)?, env)?,
        ModelSource::Bytes(b) => load_gguf(&GgufFile::from_bytes(b)?, env)?,
    };
    Ok(Box::new(net))
}

#[cfg(not(feature = "gguf"))]
fn load_gguf_source(_: ModelSource<'_>, _: &Environment) -> Result<Box<dyn ModelHandle>> {
    Err(ModelError::FormatDisabled("gguf"))
}
