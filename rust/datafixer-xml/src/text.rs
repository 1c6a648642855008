//! Reading and writing the XML wire format via `quick_xml`.
//!
//! This module is the only place in this crate that touches `quick_xml`
//! events directly; everything above it works purely in terms of
//! [`XmlNode`](crate::XmlNode) and `DynamicOps`. `quick_xml` is used only to
//! walk the wire format at the edges — the value algebra itself never
//! depends on it.

use std::io::Cursor;

use datafixer_core::Number;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::{XmlNode, ATTRS_KEY};

#[derive(Debug, thiserror::Error)]
pub enum XmlFormatError {
    #[error("xml error: {0}")]
    Quick(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attribute(#[from] AttrError),
    #[error("xml document has no root element")]
    NoRoot,
    #[error("root node must be a map or a scalar, not a list")]
    InvalidRoot,
}

/// Parse a complete XML document's root element into an [`XmlNode`].
pub fn parse(xml: &str) -> Result<XmlNode, XmlFormatError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text = true;

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(&e);
                let attrs = read_attrs(&e)?;
                stack.push(Frame::new(name, attrs));
            }
            Event::Empty(e) => {
                let name = element_name(&e);
                let attrs = read_attrs(&e)?;
                let node = Frame::new(name.clone(), attrs).into_node();
                attach(&mut stack, &mut root, name, node);
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or(XmlFormatError::NoRoot)?;
                let name = frame.name.clone();
                let node = frame.into_node();
                attach(&mut stack, &mut root, name, node);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(XmlFormatError::NoRoot)
}

/// Serialize an [`XmlNode`] as a complete XML document under `root_name`.
pub fn to_string(node: &XmlNode, root_name: &str) -> Result<String, XmlFormatError> {
    if matches!(node, XmlNode::List(_)) {
        return Err(XmlFormatError::InvalidRoot);
    }
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_element(&mut writer, root_name, node)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

struct Frame {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<(String, XmlNode)>,
    text: String,
}

impl Frame {
    fn new(name: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            name,
            attrs,
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Collapses this frame into the node it denotes. A childless,
    /// attribute-less element becomes a scalar parsed from its text content;
    /// otherwise it becomes a map with an `@attrs` entry (if any attributes
    /// were present) plus one entry per distinct child tag name, grouping
    /// repeats into a list.
    fn into_node(self) -> XmlNode {
        if self.children.is_empty() && self.attrs.is_empty() {
            return parse_scalar(self.text.trim());
        }
        let mut entries = Vec::new();
        if !self.attrs.is_empty() {
            let attr_entries = self
                .attrs
                .into_iter()
                .map(|(k, v)| (XmlNode::Str(k), XmlNode::Str(v)))
                .collect();
            entries.push((XmlNode::Str(ATTRS_KEY.to_string()), XmlNode::Map(attr_entries)));
        }
        let mut grouped: Vec<(String, Vec<XmlNode>)> = Vec::new();
        for (tag, node) in self.children {
            match grouped.iter_mut().find(|(t, _)| *t == tag) {
                Some(slot) => slot.1.push(node),
                None => grouped.push((tag, vec![node])),
            }
        }
        for (tag, mut nodes) in grouped {
            let value = if nodes.len() == 1 {
                nodes.remove(0)
            } else {
                XmlNode::List(nodes)
            };
            entries.push((XmlNode::Str(tag), value));
        }
        XmlNode::Map(entries)
    }
}

fn parse_scalar(text: &str) -> XmlNode {
    if text.is_empty() {
        return XmlNode::Null;
    }
    if let Ok(i) = text.parse::<i64>() {
        return XmlNode::Num(Number::Long(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        return XmlNode::Num(Number::Double(f));
    }
    match text {
        "true" => XmlNode::Bool(true),
        "false" => XmlNode::Bool(false),
        _ => XmlNode::Str(text.to_string()),
    }
}

fn attach(stack: &mut [Frame], root: &mut Option<XmlNode>, name: String, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, node)),
        None => *root = Some(node),
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn read_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, XmlFormatError> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    node: &XmlNode,
) -> Result<(), XmlFormatError> {
    match node {
        XmlNode::Map(entries) => write_map_element(writer, name, entries),
        XmlNode::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
            Ok(())
        }
        scalar => {
            let text = scalar_text(scalar);
            if text.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(name)))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Ok(())
        }
    }
}

fn write_map_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    entries: &[(XmlNode, XmlNode)],
) -> Result<(), XmlFormatError> {
    let mut start = BytesStart::new(name);
    let mut children: Vec<(&str, &XmlNode)> = Vec::new();

    for (key, value) in entries {
        let XmlNode::Str(key_str) = key else { continue };
        if key_str == ATTRS_KEY {
            if let XmlNode::Map(attr_entries) = value {
                for (attr_key, attr_value) in attr_entries {
                    if let XmlNode::Str(k) = attr_key {
                        start.push_attribute((k.as_str(), scalar_text(attr_value).as_str()));
                    }
                }
            }
            continue;
        }
        children.push((key_str.as_str(), value));
    }

    if children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for (tag, value) in children {
        match value {
            XmlNode::List(items) => {
                for item in items {
                    write_element(writer, tag, item)?;
                }
            }
            other => write_element(writer, tag, other)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn scalar_text(node: &XmlNode) -> String {
    match node {
        XmlNode::Str(s) => s.clone(),
        XmlNode::Num(n) => n.to_string(),
        XmlNode::Bool(b) => b.to_string(),
        XmlNode::Null | XmlNode::List(_) | XmlNode::Map(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_into_reserved_key() {
        let node = parse(r#"<user id="7"><name>Alice</name></user>"#).unwrap();
        let XmlNode::Map(entries) = node else { panic!("expected map") };
        let attrs = entries
            .iter()
            .find(|(k, _)| *k == XmlNode::Str(ATTRS_KEY.to_string()))
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(
            attrs,
            XmlNode::Map(vec![(XmlNode::Str("id".into()), XmlNode::Str("7".into()))])
        );
        let name = entries
            .iter()
            .find(|(k, _)| *k == XmlNode::Str("name".to_string()))
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(name, XmlNode::Str("Alice".to_string()));
    }

    #[test]
    fn repeated_children_group_into_a_list() {
        let node = parse(r#"<items><item>a</item><item>b</item></items>"#).unwrap();
        let XmlNode::Map(entries) = node else { panic!("expected map") };
        let items = entries
            .iter()
            .find(|(k, _)| *k == XmlNode::Str("item".to_string()))
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(
            items,
            XmlNode::List(vec![XmlNode::Str("a".into()), XmlNode::Str("b".into())])
        );
    }

    #[test]
    fn scalar_leaf_text_is_type_inferred() {
        let node = parse("<count>3</count>").unwrap();
        assert_eq!(node, XmlNode::Num(Number::Long(3)));

        let node = parse("<active>true</active>").unwrap();
        assert_eq!(node, XmlNode::Bool(true));

        let node = parse("<name>Alice</name>").unwrap();
        assert_eq!(node, XmlNode::Str("Alice".to_string()));
    }

    #[test]
    fn empty_element_is_null() {
        let node = parse("<empty/>").unwrap();
        assert_eq!(node, XmlNode::Null);
    }

    #[test]
    fn round_trips_map_with_attrs_and_repeated_children() {
        let original = XmlNode::Map(vec![
            (
                XmlNode::Str(ATTRS_KEY.to_string()),
                XmlNode::Map(vec![(XmlNode::Str("id".into()), XmlNode::Str("7".into()))]),
            ),
            (
                XmlNode::Str("item".to_string()),
                XmlNode::List(vec![XmlNode::Str("a".into()), XmlNode::Str("b".into())]),
            ),
        ]);
        let xml = to_string(&original, "root").unwrap();
        let parsed = parse(&xml).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn list_at_the_root_is_rejected() {
        let err = to_string(&XmlNode::List(vec![XmlNode::Null]), "root").unwrap_err();
        assert!(matches!(err, XmlFormatError::InvalidRoot));
    }
}
