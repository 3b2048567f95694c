//! Core data types for LLSD documents.
//!
//! This module defines the [`Value`] enum, the closed universe of types
//! that can travel through the LLSD wire formats.

mod value;

pub use value::Value;
