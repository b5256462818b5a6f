//! document codecs
//!
//! A [Parser] turns the bytes of one document into a [Value] tree and writes a tree back out.
//! Documents must decode to structured content (mapping or sequence). A bare scalar is rejected
//! with [DecodeError::BareScalar].
mod hcl_parser;
mod yaml_parser;

pub use hcl_parser::HclParser;
pub use yaml_parser::YamlParser;

use crate::error::{Error, Result};
use crate::value::Value;
use std::path::Path;

pub trait Parser {
    /// File extensions (lowercase, without dot) recognized as documents of this format
    fn extensions(&self) -> &'static [&'static str];

    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError>;

    fn encode(&self, tree: &Value, options: &EncodeOptions) -> Result<String, EncodeError>;

    /// Read and decode a document from disk
    fn decode_file(&self, path: &Path) -> Result<Value> {
        tracing::info!(path=%path.display(), "loading file");

        let bytes = std::fs::read(path)?;
        self.decode(&bytes).map_err(|source| Error::InvalidDocument {
            origin: path.display().to_string(),
            source,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("document must contain a mapping or a sequence, found a bare scalar")]
    BareScalar,
    #[error("Unable to parse yaml document")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unable to parse hcl document")]
    Hcl(#[from] hcl::Error),
    #[error("document is not valid utf-8")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("Unable to write hcl document")]
    Hcl(#[from] hcl::Error),
}

/// Layout of encoded documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct EncodeOptions {
    /// Nesting level from which collections are written inline (flow style)
    pub inline: usize,
    /// Spaces per nesting level
    pub indent: usize,
    /// Bit set of `EncodeOptions::*` flags
    pub flags: u32,
}

impl EncodeOptions {
    /// Write multi-line strings as `|` literal blocks
    pub const MULTI_LINE_LITERAL_BLOCK: u32 = 1;

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            inline: 5,
            indent: 4,
            flags: 0,
        }
    }
}

/// Only structured content is accepted at document level
fn structured(value: Value) -> Result<Value, DecodeError> {
    match value {
        Value::Null => Ok(Value::empty_object()),
        value if value.is_collection() => Ok(value),
        _ => Err(DecodeError::BareScalar),
    }
}
