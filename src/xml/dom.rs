//! Whole-tree rewrite strategy.
//!
//! The slow but flexible half of the engine: everything that needs an
//! addressable document — index-restricted selection, attribute deletion,
//! and cross-tree preprocessing such as classpath injection — runs here.
//! Scoped (source/target) rules never reach this strategy; they are a
//! streaming concern.

use crate::xml::errors::XmlError;
use crate::xml::tree::Document;

#[derive(Debug, Clone, Default)]
pub struct DomRewriter {
    elements: Vec<String>,
    attributes: Vec<String>,
    /// Paired replacement values; `None` means delete the attributes.
    values: Option<Vec<String>>,
    /// 0-based restriction to a single match over the tag-set union.
    index: Option<usize>,
}

impl DomRewriter {
    pub fn new(
        elements: Vec<String>,
        attributes: Vec<String>,
        values: Option<Vec<String>>,
        index: Option<usize>,
    ) -> Self {
        Self {
            elements,
            attributes,
            values,
            index,
        }
    }

    /// Rewriter that only runs a preprocess callback, applying no rules.
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn rewrite(&self, input: &str) -> Result<String, XmlError> {
        self.rewrite_with(input, |_| {})
    }

    /// Parse, hand the fresh tree to `preprocess`, apply the rules, and
    /// serialize. The callback may freely mutate the tree, including parts no
    /// rule covers.
    pub fn rewrite_with<F>(&self, input: &str, preprocess: F) -> Result<String, XmlError>
    where
        F: FnOnce(&mut Document),
    {
        let mut doc = Document::parse(input)?;
        preprocess(&mut doc);
        self.apply(&mut doc);
        Ok(doc.to_xml())
    }

    fn apply(&self, doc: &mut Document) {
        if self.elements.is_empty() {
            return;
        }

        let matches = doc.elements_by_tags(&self.elements);
        match self.index {
            Some(index) => {
                // Out-of-range index selects nothing; that is a no-op, not
                // an error.
                if let Some(&id) = matches.get(index) {
                    self.change_element(doc, id);
                }
            }
            None => {
                for id in matches {
                    self.change_element(doc, id);
                }
            }
        }
    }

    fn change_element(&self, doc: &mut Document, id: usize) {
        match &self.values {
            Some(values) => {
                for (attr, value) in self.attributes.iter().zip(values) {
                    doc.set_attribute(id, attr, value);
                }
            }
            None => {
                for attr in &self.attributes {
                    doc.remove_attribute(id, attr);
                }
            }
        }
    }
}
