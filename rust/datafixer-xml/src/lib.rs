//! `DynamicOps<XmlNode>` — the XML format provider.
//!
//! XML's tree shape has one concern the other three formats don't: attributes
//! are a second axis alongside child elements. This ops implementation keeps
//! `XmlNode` the same node algebra as every other provider (null, bool,
//! number, string, list, map) and confines the attribute-versus-element
//! distinction to the [`text`] module's reader/writer, which is the only
//! part of this crate that talks to `quick_xml` directly. There, a parsed
//! map entry whose value is a list becomes repeated child elements under
//! that tag name; a scalar entry becomes a single child text element;
//! attributes surface through the reserved [`ATTRS_KEY`] map key, itself
//! holding a map of attribute name to text value (`SPEC_FULL.md` §6).

use datafixer_core::{DataResult, DynamicOps, Number};

pub mod text;

/// The reserved map key under which an element's attributes are nested.
pub const ATTRS_KEY: &str = "@attrs";

/// An owned XML-flavored tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Null,
    Bool(bool),
    Num(Number),
    Str(String),
    List(Vec<XmlNode>),
    Map(Vec<(XmlNode, XmlNode)>),
}

/// Zero-sized, `Copy`, process-wide singleton implementing
/// `DynamicOps<XmlNode>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlOps;

impl XmlOps {
    pub const INSTANCE: XmlOps = XmlOps;
}

impl DynamicOps<XmlNode> for XmlOps {
    fn empty(&self) -> XmlNode {
        XmlNode::Null
    }

    fn empty_list(&self) -> XmlNode {
        XmlNode::List(Vec::new())
    }

    fn empty_map(&self) -> XmlNode {
        XmlNode::Map(Vec::new())
    }

    fn is_empty_value(&self, value: &XmlNode) -> bool {
        matches!(value, XmlNode::Null)
    }

    fn is_map(&self, value: &XmlNode) -> bool {
        matches!(value, XmlNode::Map(_))
    }

    fn is_list(&self, value: &XmlNode) -> bool {
        matches!(value, XmlNode::List(_))
    }

    fn is_string(&self, value: &XmlNode) -> bool {
        matches!(value, XmlNode::Str(_))
    }

    fn is_number(&self, value: &XmlNode) -> bool {
        matches!(value, XmlNode::Num(_))
    }

    fn is_boolean(&self, value: &XmlNode) -> bool {
        matches!(value, XmlNode::Bool(_))
    }

    fn create_string(&self, value: &str) -> XmlNode {
        XmlNode::Str(value.to_string())
    }

    fn create_boolean(&self, value: bool) -> XmlNode {
        XmlNode::Bool(value)
    }

    fn create_numeric(&self, value: Number) -> XmlNode {
        XmlNode::Num(value)
    }

    fn read_string_unchecked(&self, value: &XmlNode) -> String {
        match value {
            XmlNode::Str(s) => s.clone(),
            _ => unreachable!("read_string_unchecked called on non-string value"),
        }
    }

    fn read_number_unchecked(&self, value: &XmlNode) -> Number {
        match value {
            XmlNode::Num(n) => *n,
            _ => unreachable!("read_number_unchecked called on non-number value"),
        }
    }

    fn read_boolean_unchecked(&self, value: &XmlNode) -> bool {
        match value {
            XmlNode::Bool(b) => *b,
            _ => unreachable!("read_boolean_unchecked called on non-boolean value"),
        }
    }

    fn create_list(&self, items: impl Iterator<Item = XmlNode>) -> XmlNode {
        XmlNode::List(items.collect())
    }

    fn read_list_unchecked(&self, value: &XmlNode) -> Vec<XmlNode> {
        match value {
            XmlNode::List(items) => items.clone(),
            _ => unreachable!("read_list_unchecked called on non-list value"),
        }
    }

    fn create_map_entries_unchecked(&self, entries: impl Iterator<Item = (XmlNode, XmlNode)>) -> XmlNode {
        XmlNode::Map(entries.collect())
    }

    fn read_map_unchecked(&self, value: &XmlNode) -> Vec<(XmlNode, XmlNode)> {
        match value {
            XmlNode::Map(entries) => entries.clone(),
            _ => unreachable!("read_map_unchecked called on non-map value"),
        }
    }
}
