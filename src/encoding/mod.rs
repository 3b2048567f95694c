//! Wire format codecs for [`Value`](crate::types::Value) trees.
//!
//! # Modules
//!
//! - [`xml`] - the XML document encoder and decoder
//! - [`codec`] - named byte/text codecs for `binary` payloads
//! - [`date`] - the fixed timestamp grammar for `date` payloads
//! - [`detect`] - header-based serialization format detection
//!
//! Encoding and decoding are pure in-memory tree transforms: no I/O, no
//! shared state, no partial results. Independent trees can be encoded or
//! decoded concurrently without coordination.

pub mod codec;
pub mod date;
pub mod detect;
pub mod xml;


pub use detect::Format;
pub use xml::EncodeOptions;
