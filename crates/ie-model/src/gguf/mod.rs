pub mod dense;
pub mod header;
pub mod metadata;
pub mod reader;
pub mod tensor_info;
#[cfg(test)]
pub(crate) mod writer;

pub use dense::load_gguf;
pub use header::{GgufHeader, GGUF_DEFAULT_ALIGNMENT, GGUF_MAGIC};
pub use metadata::{GgufMetadata, GgufMetadataValue};
pub use reader::GgufFile;
pub use tensor_info::GgufTensorInfo;
