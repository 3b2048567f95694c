//! Serialization format auto-detection.
//!
//! Inbound documents announce their format in a processing-instruction
//! style header: `<?xml ...?>` for the XML encoding, `<?llsd/notation?>`
//! and `<?llsd/binary?>` for the other two. Only a short prefix of the
//! input is inspected, and the scan for the closing `>` must not be
//! fooled by a `>` inside a quoted attribute value, so the scanner is a
//! small explicit lexer rather than index arithmetic.

use std::fmt;

use crate::error::LlsdError;

/// How far into the input the header scan is allowed to look.
const MAX_HEADER_LEN: usize = 128;

/// A recognized serialization format.
///
/// Only [`Format::Xml`] has a working codec in this crate; the other two
/// are recognized so they can be rejected explicitly instead of being
/// misread as malformed XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// XML element encoding
    Xml,
    /// Notation text encoding
    Notation,
    /// Length-prefixed binary encoding
    Binary,
}

impl Format {
    /// Canonical lowercase name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Notation => "notation",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexer state for the header scan.
enum ScanState {
    Normal,
    /// Inside a quoted run, holding the quote byte that opened it.
    Quoted(u8),
    /// Immediately after a backslash inside a quoted run.
    Escaped(u8),
}

/// Detects the serialization format of raw input from its header.
///
/// # Errors
///
/// Returns [`LlsdError::UnknownFormat`] when no known header is found
/// within the first [`MAX_HEADER_LEN`] bytes.
pub fn detect(input: &[u8]) -> Result<Format, LlsdError> {
    if !input.starts_with(b"<?") {
        return Err(LlsdError::UnknownFormat);
    }

    let window = &input[..input.len().min(MAX_HEADER_LEN)];
    let mut state = ScanState::Normal;
    let mut close = None;
    for (i, &b) in window.iter().enumerate().skip(2) {
        state = match state {
            ScanState::Normal => match b {
                b'>' => {
                    close = Some(i);
                    break;
                }
                b'"' | b'\'' => ScanState::Quoted(b),
                _ => ScanState::Normal,
            },
            ScanState::Quoted(quote) => match b {
                _ if b == quote => ScanState::Normal,
                b'\\' => ScanState::Escaped(quote),
                _ => ScanState::Quoted(quote),
            },
            ScanState::Escaped(quote) => ScanState::Quoted(quote),
        };
    }

    // Header text sits between the opening `<?` and the closing `?>`.
    let close = close.ok_or(LlsdError::UnknownFormat)?;
    if close < 3 {
        return Err(LlsdError::UnknownFormat);
    }
    let header = String::from_utf8_lossy(&window[2..close - 1]).trim().to_ascii_lowercase();

    if header == "llsd/notation" {
        Ok(Format::Notation)
    } else if header == "llsd/binary" {
        Ok(Format::Binary)
    } else if header.starts_with("xml") {
        Ok(Format::Xml)
    } else {
        Err(LlsdError::UnknownFormat)
    }
}
