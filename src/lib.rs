//! LLSD structured-data serialization.
//!
//! This crate provides the typed value model and wire codecs for LLSD,
//! the payload format used by the registration protocol services.
//!
//! # Overview
//!
//! - **Values**: [`Value`] enum covering the closed LLSD type universe
//!   (scalars, binary blobs, timestamps, links, maps, arrays)
//! - **XML codec**: [`encode`]/[`encode_with`] and [`decode`], with an
//!   optimize mode that writes default-valued scalars as empty elements
//! - **Binary sub-codecs**: `base64`, `base85`, and `base16` payload
//!   transforms for the `binary` element
//! - **Format detection**: [`detect_format`] classifies raw input from
//!   its header before a decoder is chosen
//!
//! # Example
//!
//! ```
//! use llsd::Value;
//!
//! let request = Value::map([
//!     ("first_name", Value::from("Alice")),
//!     ("agent_id", Value::from(uuid::Uuid::nil())),
//!     ("flags", Value::Array(vec![Value::from(289343i64), Value::from(-3i64)])),
//! ]);
//!
//! let bytes = llsd::encode(&request)?;
//! let reply = llsd::decode(&bytes)?;
//! assert_eq!(reply, request);
//! # Ok::<(), llsd::LlsdError>(())
//! ```
//!
//! # Formats
//!
//! Only the XML encoding is implemented. The notation and binary
//! encodings are recognized by the detector and rejected with
//! [`LlsdError::UnsupportedFormat`] rather than misread as XML.
//!
//! # Modules
//!
//! - [`types`] - the [`Value`] enum
//! - [`encoding`] - wire codecs, sub-codecs, timestamp grammar, detection
//! - [`error`] - error types ([`LlsdError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use encoding::{EncodeOptions, Format};
pub use error::LlsdError;
pub use types::Value;

/// Encodes a value tree as an XML document with default options
/// (optimize on, `base64` binary payloads).
///
/// # Errors
///
/// Returns an error if the configured binary codec is not registered.
pub fn encode(value: &Value) -> Result<Vec<u8>, LlsdError> {
    encoding::xml::encode(value)
}

/// Encodes a value tree as an XML document with explicit options.
///
/// # Errors
///
/// Returns an error if the configured binary codec is not registered.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, LlsdError> {
    encoding::xml::encode_with(value, options)
}

/// Decodes raw input into a value tree, detecting the format from its
/// header.
///
/// # Errors
///
/// Fails with [`LlsdError::UnknownFormat`] when no format header is
/// found, [`LlsdError::UnsupportedFormat`] for the recognized formats
/// that have no decoder, and the XML decoder's errors otherwise.
pub fn decode(input: &[u8]) -> Result<Value, LlsdError> {
    match encoding::detect::detect(input)? {
        Format::Xml => {
            let text = std::str::from_utf8(input).map_err(|e| {
                LlsdError::MalformedDocument(format!("document is not valid UTF-8: {e}"))
            })?;
            encoding::xml::decode(text)
        }
        format => Err(LlsdError::UnsupportedFormat(format)),
    }
}

/// Detects the serialization format of raw input without decoding it.
///
/// # Errors
///
/// Returns [`LlsdError::UnknownFormat`] when no known header is found.
pub fn detect_format(input: &[u8]) -> Result<Format, LlsdError> {
    encoding::detect::detect(input)
}
