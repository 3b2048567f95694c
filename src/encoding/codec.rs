//! Named byte/text codecs for the `binary` element.
//!
//! The wire format allows a binary payload to be carried as `base64`
//! (default), `base85`, or `base16` text, selected by the element's
//! `encoding` attribute. Each codec is a pair of pure functions held in a
//! static registry; adding a codec means adding one [`REGISTRY`] entry.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::LlsdError;

/// A registered byte/text transform.
pub struct Codec {
    /// Canonical lowercase name, also written as the `encoding` attribute.
    pub name: &'static str,
    encode: fn(&[u8]) -> String,
    decode: fn(&str) -> Result<Vec<u8>, LlsdError>,
}

impl Codec {
    /// Encodes raw bytes to payload text.
    #[must_use]
    pub fn encode(&self, bytes: &[u8]) -> String {
        (self.encode)(bytes)
    }

    /// Decodes payload text back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LlsdError::MalformedDocument`] when the text is not valid
    /// for this codec.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, LlsdError> {
        (self.decode)(text)
    }
}

/// All codecs known to the encoder and decoder.
static REGISTRY: &[Codec] = &[
    Codec { name: "base64", encode: base64_encode, decode: base64_decode },
    Codec { name: "base85", encode: base85_encode, decode: base85_decode },
    Codec { name: "base16", encode: base16_encode, decode: base16_decode },
];

/// Looks up a codec by name, case-insensitively.
///
/// # Errors
///
/// Returns [`LlsdError::UnsupportedEncoding`] for unregistered names.
pub fn lookup(name: &str) -> Result<&'static Codec, LlsdError> {
    let lower = name.to_ascii_lowercase();
    REGISTRY
        .iter()
        .find(|codec| codec.name == lower)
        .ok_or(LlsdError::UnsupportedEncoding(lower))
}

fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn base64_decode(text: &str) -> Result<Vec<u8>, LlsdError> {
    STANDARD
        .decode(text)
        .map_err(|e| LlsdError::MalformedDocument(format!("invalid base64 payload: {e}")))
}

fn base16_encode(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

fn base16_decode(text: &str) -> Result<Vec<u8>, LlsdError> {
    hex::decode(text)
        .map_err(|e| LlsdError::MalformedDocument(format!("invalid base16 payload: {e}")))
}

/// RFC 1924 digit alphabet, the variant used by the `b85` functions of
/// the reference implementation.
const BASE85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

fn base85_digit_value(c: u8) -> Option<u32> {
    BASE85_ALPHABET.iter().position(|&d| d == c).map(|i| i as u32)
}

fn base85_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(4) * 5);
    for chunk in bytes.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut word = u32::from_be_bytes(group);
        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = BASE85_ALPHABET[(word % 85) as usize];
            word /= 85;
        }
        // A partial group of n bytes keeps n + 1 digits.
        for &digit in &digits[..chunk.len() + 1] {
            out.push(digit as char);
        }
    }
    out
}

fn base85_decode(text: &str) -> Result<Vec<u8>, LlsdError> {
    let invalid = |detail: String| LlsdError::MalformedDocument(detail);
    let raw = text.as_bytes();
    let mut out = Vec::with_capacity(raw.len().div_ceil(5) * 4);
    for chunk in raw.chunks(5) {
        // Short trailing groups are padded with the highest digit. A lone
        // trailing digit therefore contributes no bytes at all.
        let mut group = [b'~'; 5];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut word: u64 = 0;
        for &c in &group {
            let digit = base85_digit_value(c)
                .ok_or_else(|| invalid(format!("invalid base85 character '{}'", c as char)))?;
            word = word * 85 + u64::from(digit);
        }
        if word > u64::from(u32::MAX) {
            return Err(invalid("base85 group out of range".to_owned()));
        }
        let bytes = (word as u32).to_be_bytes();
        out.extend_from_slice(&bytes[..chunk.len() - 1]);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"The quick brown fox jumped over the lazy dog.";

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("base64").unwrap().name, "base64");
        assert_eq!(lookup("Base85").unwrap().name, "base85");
        assert_eq!(lookup("BASE16").unwrap().name, "base16");
    }

    #[test]
    fn lookup_rejects_unregistered_name() {
        assert!(matches!(lookup("base32"), Err(LlsdError::UnsupportedEncoding(name)) if name == "base32"));
    }

    #[test]
    fn codecs_roundtrip_sample_and_empty() {
        for name in ["base64", "base85", "base16"] {
            let codec = lookup(name).unwrap();
            for bytes in [&b""[..], SAMPLE] {
                let text = codec.encode(bytes);
                assert_eq!(codec.decode(&text).unwrap(), bytes, "codec {name}");
            }
        }
    }

    #[test]
    fn base64_known_vector() {
        let codec = lookup("base64").unwrap();
        assert_eq!(codec.encode(b"the quick brown fox"), "dGhlIHF1aWNrIGJyb3duIGZveA==");
        assert_eq!(codec.decode("cmFuZG9t").unwrap(), b"random");
    }

    #[test]
    fn base85_known_vector() {
        // Vector taken from the reference test document.
        let codec = lookup("base85").unwrap();
        assert_eq!(codec.decode("YISXJWn>_4c4cxPbZBJ").unwrap(), b"jumped over the");
        assert_eq!(codec.encode(b"jumped over the"), "YISXJWn>_4c4cxPbZBJ");
    }

    #[test]
    fn base16_known_vector() {
        let codec = lookup("base16").unwrap();
        assert_eq!(codec.encode(b"lazy dog"), "6C617A7920646F67");
        assert_eq!(codec.decode("6C617A7920646F67").unwrap(), b"lazy dog");
        // Lowercase digits are accepted on the way in.
        assert_eq!(codec.decode("6c617a7920646f67").unwrap(), b"lazy dog");
    }

    #[test]
    fn base85_rejects_garbage() {
        let codec = lookup("base85").unwrap();
        assert!(codec.decode("\u{fe}ZZZZ").is_err());
        assert!(codec.decode("~~~~~").is_err()); // 85^5 - 1 > u32::MAX
        assert_eq!(codec.decode("A").unwrap(), b""); // padded to a full group
    }

    #[test]
    fn base64_rejects_garbage() {
        let codec = lookup("base64").unwrap();
        assert!(codec.decode("not base64!").is_err());
    }
}
