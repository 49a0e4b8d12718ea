//! XML body → generic feed tree.
//!
//! Produces the same shape the upstream timetable has always been consumed in:
//! - an element with only text becomes a string, an empty element becomes `null`
//! - attributes become `@name` keys, text next to child elements becomes `#text`
//! - a child tag seen once is a plain value, a repeated child tag becomes an array
//!
//! The last rule is why a one-leg flight carries `LEG` as an object and a multi-leg
//! flight carries it as an array.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::catalog::{FEED_FLIGHT_KEY, FEED_ROOT_KEY};
use crate::error::FetchError;

/// Generic nested key/value tree the catalog is built from
pub type RawFeedPayload = Value;

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, FetchError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut children = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| FetchError::Decode(format!("bad attribute: {}", e)))?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr
                .unescape_value()
                .map_err(|e| FetchError::Decode(format!("bad attribute value: {}", e)))?;
            children.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.children.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert("#text".to_string(), Value::String(text.to_string()));
            }
            Value::Object(children)
        };
        (self.name, value)
    }
}

fn attach(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        None => {
            parent.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Decode an XML document into a `RawFeedPayload` rooted at the document element
pub fn decode(xml: &str) -> Result<RawFeedPayload, FetchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = Map::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(Frame::open(&start)?),
            Ok(Event::Empty(start)) => {
                let (name, value) = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.children, name, value),
                    None => attach(&mut document, name, value),
                }
            }
            Ok(Event::End(_)) => {
                let Some(frame) = stack.pop() else {
                    return Err(FetchError::Decode("unbalanced closing tag".to_string()));
                };
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.children, name, value),
                    None => attach(&mut document, name, value),
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(frame) = stack.last_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|e| FetchError::Decode(format!("bad text: {}", e)))?;
                    frame.text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(FetchError::Decode(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(FetchError::Decode(format!(
            "document ended inside <{}>",
            frame.name
        )));
    }
    if document.is_empty() {
        return Err(FetchError::Decode("document has no root element".to_string()));
    }

    Ok(Value::Object(document))
}

/// Decode a timetable document and reject bodies that are not a timetable.
///
/// The root must be `FLIGHT_TYPE`. It may be empty (`null`), otherwise it must hold
/// a `FLIGHT` node that is empty, a single flight or a list of flights. Anything
/// else (an upstream error page, a scalar root or flight node) is a `Decode` error.
pub fn decode_timetable(xml: &str) -> Result<RawFeedPayload, FetchError> {
    let payload = decode(xml)?;
    check_timetable_shape(&payload)?;
    Ok(payload)
}

fn check_timetable_shape(payload: &RawFeedPayload) -> Result<(), FetchError> {
    let root = payload.get(FEED_ROOT_KEY).ok_or_else(|| {
        let found = payload
            .as_object()
            .and_then(|doc| doc.keys().next().cloned())
            .unwrap_or_default();
        FetchError::Decode(format!(
            "expected <{}> root, found <{}>",
            FEED_ROOT_KEY, found
        ))
    })?;

    let flights = match root {
        Value::Null => return Ok(()),
        Value::Object(children) => children.get(FEED_FLIGHT_KEY),
        _ => {
            return Err(FetchError::Decode(format!(
                "<{}> root holds no elements",
                FEED_ROOT_KEY
            )));
        }
    };

    match flights {
        Some(Value::Null | Value::Object(_) | Value::Array(_)) => Ok(()),
        Some(_) => Err(FetchError::Decode(format!(
            "<{}> holds text instead of flight elements",
            FEED_FLIGHT_KEY
        ))),
        None => Err(FetchError::Decode(format!(
            "<{}> root has no <{}> elements",
            FEED_ROOT_KEY, FEED_FLIGHT_KEY
        ))),
    }
}
