//! Addressable document tree for the whole-tree rewrite strategy.
//!
//! Elements live in an arena addressed by [`ElementId`]; everything that is
//! not an element (text, comments, processing instructions, doctype, the XML
//! declaration, CDATA, entity references) is kept as a verbatim slice of the
//! input. An element additionally records the raw bytes of its original start
//! and end tags, so elements the rewrite never touched serialize
//! byte-identically. Only mutated elements are re-rendered, with standard XML
//! attribute escaping.

use crate::xml::errors::XmlError;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;

pub type ElementId = usize;

#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(ElementId),
    /// Character data, raw as written (entities unexpanded).
    Text(String),
    /// Non-element, non-text markup reproduced verbatim.
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct Attr {
    pub name: String,
    /// Value exactly as written in the source, without quotes.
    pub raw_value: String,
}

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attrs: Vec<Attr>,
    children: Vec<XmlNode>,
    self_closing: bool,
    /// Original `<tag ...>` markup; empty for synthesized elements.
    raw_start: String,
    /// Original `</tag>` markup, absent for self-closing and synthesized ones.
    raw_end: Option<String>,
    /// Set on any mutation; forces re-rendering instead of raw replay.
    dirty: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    top: Vec<XmlNode>,
    store: Vec<ElementData>,
}

impl Document {
    /// Parse a complete document. Fails fast on ill-formed input with the
    /// byte position of the offending construct.
    pub fn parse(input: &str) -> Result<Document, XmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(false);

        let mut doc = Document::default();
        let mut stack: Vec<ElementId> = Vec::new();
        let mut last = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Malformed {
                position: reader.buffer_position() as usize,
                message: e.to_string(),
            })?;
            let end = reader.buffer_position() as usize;
            let span = &input[last..end];
            last = end;

            match event {
                Event::Start(e) => {
                    let id = doc.push_element(&e, span, false, reader.buffer_position())?;
                    doc.attach(&stack, XmlNode::Element(id));
                    stack.push(id);
                }
                Event::Empty(e) => {
                    let id = doc.push_element(&e, span, true, reader.buffer_position())?;
                    doc.attach(&stack, XmlNode::Element(id));
                }
                Event::End(_) => {
                    // Unbalanced end tags are rejected by the reader itself.
                    if let Some(id) = stack.pop() {
                        doc.store[id].raw_end = Some(span.to_string());
                    }
                }
                Event::Text(_) | Event::GeneralRef(_) => {
                    doc.attach(&stack, XmlNode::Text(span.to_string()));
                }
                Event::CData(_)
                | Event::Comment(_)
                | Event::PI(_)
                | Event::Decl(_)
                | Event::DocType(_) => {
                    doc.attach(&stack, XmlNode::Raw(span.to_string()));
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Malformed {
                position: input.len(),
                message: format!("element '{}' is never closed", doc.store[open].name),
            });
        }

        Ok(doc)
    }

    fn push_element(
        &mut self,
        start: &quick_xml::events::BytesStart<'_>,
        span: &str,
        self_closing: bool,
        position: u64,
    ) -> Result<ElementId, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| XmlError::Malformed {
                position: position as usize,
                message: e.to_string(),
            })?
            .to_string();

        let mut attrs = Vec::new();
        for attr in start.attributes().with_checks(true) {
            let attr = attr.map_err(|e| XmlError::Malformed {
                position: position as usize,
                message: e.to_string(),
            })?;
            attrs.push(Attr {
                name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                raw_value: String::from_utf8_lossy(&attr.value).into_owned(),
            });
        }

        self.store.push(ElementData {
            name,
            attrs,
            children: Vec::new(),
            self_closing,
            raw_start: span.to_string(),
            raw_end: None,
            dirty: false,
        });
        Ok(self.store.len() - 1)
    }

    fn attach(&mut self, stack: &[ElementId], node: XmlNode) {
        match stack.last() {
            Some(&parent) => self.store[parent].children.push(node),
            None => self.top.push(node),
        }
    }

    /// Create a detached element, to be placed with [`Document::append_child`].
    pub fn create_element(&mut self, name: &str) -> ElementId {
        self.store.push(ElementData {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            self_closing: true,
            raw_start: String::new(),
            raw_end: None,
            dirty: true,
        });
        self.store.len() - 1
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        let data = &mut self.store[parent];
        data.self_closing = false;
        data.dirty = true;
        data.children.push(XmlNode::Element(child));
    }

    pub fn name(&self, id: ElementId) -> &str {
        &self.store[id].name
    }

    /// Unescaped attribute value; raw text is returned when it contains
    /// entities the standard set cannot resolve.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.store[id]
            .attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| match unescape(&a.raw_value) {
                Ok(value) => value.into_owned(),
                Err(_) => a.raw_value.clone(),
            })
    }

    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.store[id].attrs.iter().any(|a| a.name == name)
    }

    /// Set or add an attribute. New attributes append at the end of the bag;
    /// existing ones are replaced in place.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let data = &mut self.store[id];
        data.dirty = true;
        let raw_value = escape(value).into_owned();
        match data.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.raw_value = raw_value,
            None => data.attrs.push(Attr {
                name: name.to_string(),
                raw_value,
            }),
        }
    }

    /// Remove an attribute if present. Absence is a no-op, never an error.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        let data = &mut self.store[id];
        if let Some(pos) = data.attrs.iter().position(|a| a.name == name) {
            data.attrs.remove(pos);
            data.dirty = true;
        }
    }

    /// Direct element children, in document order.
    pub fn child_elements(&self, id: ElementId) -> Vec<ElementId> {
        self.store[id]
            .children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Element(child) => Some(*child),
                _ => None,
            })
            .collect()
    }

    /// All elements whose tag is in `tags`, in document order.
    pub fn elements_by_tags(&self, tags: &[String]) -> Vec<ElementId> {
        let mut found = Vec::new();
        self.collect_by(&self.top, &mut found, &|name| {
            tags.iter().any(|t| t == name)
        });
        found
    }

    pub fn elements_named(&self, tag: &str) -> Vec<ElementId> {
        let mut found = Vec::new();
        self.collect_by(&self.top, &mut found, &|name| name == tag);
        found
    }

    fn collect_by(
        &self,
        nodes: &[XmlNode],
        found: &mut Vec<ElementId>,
        matches: &dyn Fn(&str) -> bool,
    ) {
        for node in nodes {
            if let XmlNode::Element(id) = node {
                if matches(&self.store[*id].name) {
                    found.push(*id);
                }
                self.collect_by(&self.store[*id].children, found, matches);
            }
        }
    }

    /// Concatenated, unescaped character data of the element's direct
    /// children.
    pub fn text(&self, id: ElementId) -> String {
        let mut out = String::new();
        for node in &self.store[id].children {
            if let XmlNode::Text(raw) = node {
                match unescape(raw) {
                    Ok(text) => out.push_str(&text),
                    Err(_) => out.push_str(raw),
                }
            }
        }
        out
    }

    /// Serialize the whole tree. Untouched elements replay their original
    /// markup; mutated ones are re-rendered.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.render_nodes(&self.top, &mut out);
        out
    }

    fn render_nodes(&self, nodes: &[XmlNode], out: &mut String) {
        for node in nodes {
            match node {
                XmlNode::Text(raw) | XmlNode::Raw(raw) => out.push_str(raw),
                XmlNode::Element(id) => self.render_element(*id, out),
            }
        }
    }

    fn render_element(&self, id: ElementId, out: &mut String) {
        let data = &self.store[id];

        if !data.dirty {
            out.push_str(&data.raw_start);
            self.render_nodes(&data.children, out);
            if let Some(raw_end) = &data.raw_end {
                out.push_str(raw_end);
            }
            return;
        }

        out.push('<');
        out.push_str(&data.name);
        for attr in &data.attrs {
            out.push(' ');
            render_attr(out, &attr.name, &attr.raw_value);
        }

        if data.self_closing && data.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            self.render_nodes(&data.children, out);
            out.push_str("</");
            out.push_str(&data.name);
            out.push('>');
        }
    }
}

/// Render `name="raw"`, switching to single quotes when the raw value
/// contains a double quote (only possible when the source used them).
pub(crate) fn render_attr(out: &mut String, name: &str, raw_value: &str) {
    out.push_str(name);
    out.push('=');
    let quote = if raw_value.contains('"') { '\'' } else { '"' };
    out.push(quote);
    out.push_str(raw_value);
    out.push(quote);
}
