//! XML decoding and rectification.
//!
//! The service encodes associative structures whose keys are not valid tag
//! names as repeated `nodeKeyVal` elements carrying a `nodeKey` child (and a
//! `nodeValue` child for scalar values), and `info` records as `doc`
//! elements. `rectify` folds those back into the shape the JSON encoding
//! produces directly.

use indexmap::IndexMap;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::BitlyError;
use crate::value::Value;

/// An element with its child elements and concatenated text/CDATA content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text content with encoding artifacts undone.
    pub fn content(&self) -> String {
        clean_text(&self.text)
    }
}

/// Embedded newlines come back from the service as a literal `\x1A`.
fn clean_text(text: &str) -> String {
    text.replace("\\x1A", "\n").replace('\u{1A}', "\n")
}

/// Parse a document into its root element.
pub fn parse(xml: &str) -> Result<XmlElement, BitlyError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(XmlElement::new(name));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                attach(&mut stack, &mut root, XmlElement::new(name));
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| BitlyError::Decode("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| BitlyError::Decode(format!("XML parse error: {err}")))?;
                // Whitespace-only runs are indentation between elements.
                if text.trim().is_empty() {
                    continue;
                }
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(BitlyError::Decode(format!("XML parse error: {err}"))),
            Ok(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(BitlyError::Decode(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| BitlyError::Decode("empty XML document".to_string()))
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        // Only the first top-level element counts as the document root.
        None => {
            root.get_or_insert(element);
        }
    }
}

/// Canonical value of `element`.
///
/// Leaves become scalars, everything else goes through the `nodeKeyVal` /
/// `doc` rules. An element with no content at all becomes `""`.
pub fn rectify(element: &XmlElement) -> Value {
    if element.children.is_empty() {
        Value::Scalar(element.content())
    } else {
        let children: Vec<&XmlElement> = element.children.iter().collect();
        rectify_fields(&children)
    }
}

fn rectify_fields(children: &[&XmlElement]) -> Value {
    let mut fields = Fields::default();
    for &child in children {
        if child.name == "doc" {
            if let Some(hash) = child.child("hash") {
                fields.push(hash.content(), rectify(child));
                continue;
            }
        }
        if let Some(key) = child.child("nodeKey") {
            let rest: Vec<&XmlElement> = child
                .children
                .iter()
                .filter(|c| c.name != "nodeKey")
                .collect();
            fields.push(key.content(), rectify_fields(&rest));
        } else if child.child("nodeKeyVal").is_some() {
            fields.push(child.name.clone(), rectify(child));
        } else if child.name == "nodeKeyVal" {
            return rectify(child);
        } else if child.name == "nodeValue" {
            return Value::Scalar(child.content());
        } else {
            fields.push(child.name.clone(), rectify(child));
        }
    }
    fields.finish()
}

/// Collects entries by key; a key seen more than once becomes an
/// index-keyed mapping of its values.
#[derive(Default)]
struct Fields(IndexMap<String, Vec<Value>>);

impl Fields {
    fn push(&mut self, key: String, value: Value) {
        self.0.entry(key).or_default().push(value);
    }

    fn finish(self) -> Value {
        Value::from_mapping(
            self.0
                .into_iter()
                .map(|(key, mut values)| {
                    let value = if values.len() == 1 {
                        values.remove(0)
                    } else {
                        Value::from_sequence(values)
                    };
                    (key, value)
                })
                .collect(),
        )
    }
}
