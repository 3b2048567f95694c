//! XML wire codec for [`Value`] trees.
//!
//! # Format
//!
//! A document is UTF-8 text: an XML declaration, then a single `<llsd>`
//! wrapper element containing exactly one encoded value. Each variant
//! maps to one element tag:
//!
//! | Variant | Element | Payload text |
//! |---------|---------|--------------|
//! | `Undef` | `undef` | none |
//! | `Boolean` | `boolean` | `true` / `false` |
//! | `Integer` | `integer` | decimal |
//! | `Real` | `real` | decimal |
//! | `Uuid` | `uuid` | hyphenated hex |
//! | `String` | `string` | literal |
//! | `Binary` | `binary` | codec text + `encoding` attribute |
//! | `Date` | `date` | fixed ISO-8601 subset, UTC |
//! | `Uri` | `uri` | literal |
//! | `Map` | `map` | `key` / value child pairs |
//! | `Array` | `array` | value children |
//!
//! # Optimize mode
//!
//! Under [`EncodeOptions::optimize`] (the default), a scalar holding its
//! type's default value is written as an empty element with no payload.
//! The decoder reconstructs the default from the empty element, so the
//! collapse is lossless for the value tree, at the cost of no longer
//! distinguishing "absent" from "explicitly default" on the wire. Dates
//! are always written in full, and map keys are structural and never
//! collapse.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use uuid::Uuid;

use crate::encoding::codec;
use crate::encoding::date::{format_timestamp, parse_timestamp};
use crate::error::LlsdError;
use crate::types::Value;

/// The wrapper element every document must carry at its root.
const WRAPPER_TAG: &str = "llsd";

/// Options for the XML encoder.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Write default-valued scalars as empty elements.
    pub optimize: bool,
    /// Registry name of the codec used for binary payloads.
    pub binary_encoding: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { optimize: true, binary_encoding: "base64".to_owned() }
    }
}

/// Encodes a value tree to an XML document with default options.
///
/// # Errors
///
/// Returns an error if the configured binary codec is not registered.
pub fn encode(value: &Value) -> Result<Vec<u8>, LlsdError> {
    encode_with(value, &EncodeOptions::default())
}

/// Encodes a value tree to an XML document.
///
/// # Errors
///
/// Returns an error if the configured binary codec is not registered.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, LlsdError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(WRAPPER_TAG)))?;
    encode_value(&mut writer, value, options)?;
    writer.write_event(Event::End(BytesEnd::new(WRAPPER_TAG)))?;
    Ok(writer.into_inner())
}

fn encode_value(
    writer: &mut Writer<Vec<u8>>,
    value: &Value,
    options: &EncodeOptions,
) -> Result<(), LlsdError> {
    match value {
        Value::Undef => write_scalar(writer, "undef", None),
        Value::Boolean(b) => {
            let text = if *b {
                Some("true".to_owned())
            } else if options.optimize {
                None
            } else {
                Some("false".to_owned())
            };
            write_scalar(writer, "boolean", text)
        }
        Value::Integer(i) => {
            write_scalar(writer, "integer", payload(options, *i == 0, || i.to_string()))
        }
        Value::Real(r) => write_scalar(writer, "real", payload(options, *r == 0.0, || r.to_string())),
        Value::Uuid(u) => {
            write_scalar(writer, "uuid", payload(options, u.is_nil(), || u.to_string()))
        }
        Value::String(s) => {
            write_scalar(writer, "string", payload(options, s.is_empty(), || s.clone()))
        }
        Value::Binary(bytes) => {
            if bytes.is_empty() && options.optimize {
                // No payload, so no encoding attribute either.
                return write_scalar(writer, "binary", None);
            }
            let codec = codec::lookup(&options.binary_encoding)?;
            let mut elem = BytesStart::new("binary");
            elem.push_attribute(("encoding", codec.name));
            writer.write_event(Event::Start(elem))?;
            writer.write_event(Event::Text(BytesText::new(&codec.encode(bytes))))?;
            writer.write_event(Event::End(BytesEnd::new("binary")))?;
            Ok(())
        }
        // Dates are never optimized away.
        Value::Date(instant) => write_scalar(writer, "date", Some(format_timestamp(*instant))),
        Value::Uri(uri) => {
            write_scalar(writer, "uri", payload(options, uri.is_empty(), || uri.clone()))
        }
        Value::Map(entries) => {
            writer.write_event(Event::Start(BytesStart::new("map")))?;
            for (key, value) in entries {
                write_scalar(writer, "key", Some(key.clone()))?;
                encode_value(writer, value, options)?;
            }
            writer.write_event(Event::End(BytesEnd::new("map")))?;
            Ok(())
        }
        Value::Array(members) => {
            writer.write_event(Event::Start(BytesStart::new("array")))?;
            for member in members {
                encode_value(writer, member, options)?;
            }
            writer.write_event(Event::End(BytesEnd::new("array")))?;
            Ok(())
        }
    }
}

/// Payload text for a scalar: `None` collapses the element when the value
/// is at its type default and optimize mode is on.
fn payload(options: &EncodeOptions, is_default: bool, text: impl FnOnce() -> String) -> Option<String> {
    if is_default && options.optimize {
        None
    } else {
        Some(text())
    }
}

fn write_scalar(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: Option<String>,
) -> Result<(), LlsdError> {
    match text {
        Some(text) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        None => writer.write_event(Event::Empty(BytesStart::new(tag)))?,
    }
    Ok(())
}

/// Decodes an XML document into a value tree.
///
/// # Errors
///
/// Fails when the document is not well-formed XML, its root is not the
/// `llsd` wrapper holding exactly one value, an element tag is outside
/// the vocabulary, or an element payload cannot be read back as its type.
pub fn decode(input: &str) -> Result<Value, LlsdError> {
    let root = parse_document(input)?;
    if root.tag != WRAPPER_TAG {
        return Err(LlsdError::MalformedDocument(format!(
            "unexpected root element '{}', expected '{WRAPPER_TAG}'",
            root.tag
        )));
    }
    match root.children.len() {
        1 => decode_element(&root.children[0]),
        n => Err(LlsdError::MalformedDocument(format!(
            "expected exactly one value inside '{WRAPPER_TAG}', found {n}"
        ))),
    }
}

/// A fully materialized element: the decoder works on a tree, never on a
/// partially read document.
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, LlsdError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element { tag, attributes, text: None, children: Vec::new() })
}

fn parse_document(input: &str) -> Result<Element, LlsdError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let elem = element_from(&start)?;
                close_element(&mut stack, &mut root, elem)?;
            }
            Event::End(_) => {
                // The reader has already checked that the end tag matches.
                let elem = stack.pop().ok_or_else(|| {
                    LlsdError::MalformedDocument("end tag without an open element".to_owned())
                })?;
                close_element(&mut stack, &mut root, elem)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&bytes))?;
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    root.ok_or_else(|| LlsdError::MalformedDocument("document has no root element".to_owned()))
}

fn close_element(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    elem: Element,
) -> Result<(), LlsdError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(elem);
        Ok(())
    } else if root.is_some() {
        Err(LlsdError::MalformedDocument("multiple root elements".to_owned()))
    } else {
        *root = Some(elem);
        Ok(())
    }
}

fn append_text(stack: &mut [Element], text: &str) -> Result<(), LlsdError> {
    if let Some(open) = stack.last_mut() {
        open.text.get_or_insert_with(String::new).push_str(text);
        Ok(())
    } else if text.trim().is_empty() {
        Ok(())
    } else {
        Err(LlsdError::MalformedDocument("text outside the root element".to_owned()))
    }
}

fn decode_element(elem: &Element) -> Result<Value, LlsdError> {
    match elem.tag.as_str() {
        "undef" => Ok(Value::Undef),
        "boolean" => decode_boolean(elem.text.as_deref()),
        "integer" => match elem.text.as_deref() {
            None => Ok(Value::Integer(0)),
            Some(text) => text.trim().parse().map(Value::Integer).map_err(|_| {
                LlsdError::MalformedDocument(format!("invalid integer '{}'", text.trim()))
            }),
        },
        "real" => match elem.text.as_deref() {
            None => Ok(Value::Real(0.0)),
            Some(text) => text.trim().parse().map(Value::Real).map_err(|_| {
                LlsdError::MalformedDocument(format!("invalid real '{}'", text.trim()))
            }),
        },
        "uuid" => match elem.text.as_deref() {
            None => Ok(Value::Uuid(Uuid::nil())),
            Some(text) => Uuid::parse_str(text.trim()).map(Value::Uuid).map_err(|_| {
                LlsdError::MalformedDocument(format!("invalid uuid '{}'", text.trim()))
            }),
        },
        "string" => Ok(Value::String(elem.text.clone().unwrap_or_default())),
        "binary" => match elem.text.as_deref() {
            None => Ok(Value::Binary(Vec::new())),
            Some(text) => {
                let codec = codec::lookup(elem.attr("encoding").unwrap_or("base64"))?;
                Ok(Value::Binary(codec.decode(text.trim())?))
            }
        },
        "date" => match elem.text.as_deref() {
            None => Ok(Value::Date(chrono::DateTime::UNIX_EPOCH)),
            Some(text) => Ok(Value::Date(parse_timestamp(text.trim())?)),
        },
        "uri" => Ok(Value::Uri(elem.text.clone().unwrap_or_default())),
        "map" => decode_map(&elem.children),
        "array" => elem.children.iter().map(decode_element).collect::<Result<_, _>>().map(Value::Array),
        tag => Err(LlsdError::UnexpectedTag(tag.to_owned())),
    }
}

fn decode_boolean(text: Option<&str>) -> Result<Value, LlsdError> {
    let Some(text) = text else {
        return Ok(Value::Boolean(false));
    };
    match text.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(Value::Boolean(true)),
        "" | "0" | "false" => Ok(Value::Boolean(false)),
        other => {
            Err(LlsdError::MalformedDocument(format!("unexpected value '{other}' for boolean")))
        }
    }
}

fn decode_map(children: &[Element]) -> Result<Value, LlsdError> {
    let mut entries: Vec<(String, Value)> = Vec::with_capacity(children.len() / 2);
    for pair in children.chunks(2) {
        if pair[0].tag != "key" {
            return Err(LlsdError::MalformedMapping(format!(
                "unexpected '{}' element, expected 'key'",
                pair[0].tag
            )));
        }
        let key = pair[0].text.clone().unwrap_or_default();
        let Some(value_elem) = pair.get(1) else {
            return Err(LlsdError::MalformedMapping(format!("key '{key}' has no value")));
        };
        let value = decode_element(value_elem)?;
        // A repeated key keeps its first position but takes the new value.
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }
    Ok(Value::Map(entries))
}
