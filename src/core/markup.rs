//! Markup-to-object parsing.
//!
//! The data files are turned into a generic `serde_json::Value` tree:
//!
//! - the document becomes `{RootName: content}`
//! - an element without attributes or child elements becomes its trimmed text
//! - otherwise it becomes an object of its attributes and child elements, with any text under `"_"`
//! - repeated sibling elements become an array, a lone one stays bare
//!
//! The last rule is why readers of the tree go through [`one_or_many`] for every
//! repeatable element instead of matching on the shape themselves.

use crate::utils::error::{ImportError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::{Map, Value};
use std::fmt::Display;

pub const TEXT_KEY: &str = "_";

fn markup_error(e: impl Display) -> ImportError {
    ImportError::MarkupError {
        message: e.to_string(),
    }
}

struct OpenElement {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl OpenElement {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(markup_error)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(markup_error)?.into_owned();
            insert_field(&mut fields, key, Value::String(value));
        }
        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn finish(self) -> (String, Value) {
        let text = self.text.trim();
        if self.fields.is_empty() {
            return (self.name, Value::String(text.to_string()));
        }
        let mut fields = self.fields;
        if !text.is_empty() {
            insert_field(&mut fields, TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        (self.name, Value::Object(fields))
    }
}

fn insert_field(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        None => {
            fields.insert(key, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn close(
    element: OpenElement,
    stack: &mut [OpenElement],
    root: &mut Option<(String, Value)>,
) -> Result<()> {
    let (name, value) = element.finish();
    match stack.last_mut() {
        Some(parent) => insert_field(&mut parent.fields, name, value),
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(markup_error("more than one root element")),
    }
    Ok(())
}

pub fn parse_markup(text: &str) -> Result<Value> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event().map_err(markup_error)? {
            Event::Start(ref e) => stack.push(OpenElement::open(e)?),
            Event::Empty(ref e) => {
                let element = OpenElement::open(e)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape().map_err(markup_error)?);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.to_vec()));
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| markup_error("unexpected closing tag"))?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(markup_error(format!("unclosed element <{}>", open.name)));
    }
    let (name, value) = root.ok_or_else(|| markup_error("document has no root element"))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

/// Walks object keys; `None` as soon as a segment is missing or the value is not an object.
pub fn get_path<'a, S: AsRef<str>>(tree: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(tree, |node, segment| node.as_object()?.get(segment.as_ref()))
}

/// `get_path` with a dot-separated selector such as `Armors.Armor`.
pub fn select<'a>(tree: &'a Value, selector: &str) -> Option<&'a Value> {
    let segments: Vec<&str> = selector.split('.').filter(|s| !s.is_empty()).collect();
    get_path(tree, &segments)
}

/// Normalizes a repeatable element: arrays yield their items, a lone object yields itself,
/// anything else (absent, null, text) yields nothing.
pub fn one_or_many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v @ Value::Object(_)) => vec![v],
        _ => Vec::new(),
    }
}

/// Like [`one_or_many`], but a lone text value also yields itself. For repeatables whose
/// entries may be bare text, such as `Category` or an attribute-less `Source`.
pub fn one_or_many_text(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(v @ Value::String(_)) => vec![v],
        _ => one_or_many(value),
    }
}
