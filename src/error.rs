//! Error types for the crate.

use thiserror::Error;

use crate::encoding::detect::Format;

/// Errors that can occur while encoding or decoding LLSD values.
///
/// All failures are local and synchronous: they are returned at the point
/// of detection and no partial value is ever produced alongside one.
#[derive(Debug, Error)]
pub enum LlsdError {
    /// A binary element requested a codec name that is not registered.
    #[error("unknown encoding '{0}' for binary element")]
    UnsupportedEncoding(String),

    /// The serialization format was recognized but has no decoder.
    #[error("unsupported serialization format '{0}'")]
    UnsupportedFormat(Format),

    /// No known serialization format header was found in the input.
    #[error("unable to detect serialization format")]
    UnknownFormat,

    /// The decoder met an element tag outside the LLSD vocabulary.
    #[error("unexpected '{0}' element")]
    UnexpectedTag(String),

    /// A map element's children were not in alternating key/value shape.
    #[error("malformed map: {0}")]
    MalformedMapping(String),

    /// The document structure or an element payload was invalid.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A date element's text did not match the timestamp grammar.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// A map was built from pairs whose key was not a string value.
    #[error("map keys must be string values")]
    InvalidKeyType,

    /// A wire format cannot represent the given value variant.
    #[error("value type '{0}' is not representable in this format")]
    UnsupportedValueType(&'static str),

    /// The underlying XML reader or writer reported a syntax error.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
}
