//! Classpath injection macro over the tree strategy.
//!
//! Rewrites Ant `<classpath>` usage to pull in an externally supplied
//! classpath placeholder instead of whatever the build file bundled. A
//! `<classpath refid="X">` gets the placeholder appended to the `<path
//! id="X">` it references, once per id for the whole pass; repeated
//! references and dangling refids fall back to a `<location>` child on the
//! `<classpath>` element itself, as does a `<classpath>` with no refid.

use crate::xml::rules::DEFAULT_CLASSPATH;
use crate::xml::tree::Document;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ClasspathInjector {
    classpath: String,
}

impl Default for ClasspathInjector {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSPATH)
    }
}

impl ClasspathInjector {
    pub fn new(classpath: impl Into<String>) -> Self {
        Self {
            classpath: classpath.into(),
        }
    }

    /// Preprocess callback for [`crate::xml::dom::DomRewriter::rewrite_with`].
    pub fn inject(&self, doc: &mut Document) {
        // RefIndex: path ids that already received the placeholder during
        // this pass.
        let mut injected: HashSet<String> = HashSet::new();

        for classpath in doc.elements_named("classpath") {
            match doc.attribute(classpath, "refid") {
                Some(refid) => {
                    let referenced = doc
                        .elements_named("path")
                        .into_iter()
                        .find(|&path| doc.attribute(path, "id").as_deref() == Some(&refid));

                    match referenced {
                        Some(path) if !injected.contains(&refid) => {
                            self.append_placeholder(doc, path, "pathelement");
                            injected.insert(refid);
                        }
                        // Already injected, or the refid dangles: inject
                        // directly instead of failing.
                        _ => self.append_placeholder(doc, classpath, "location"),
                    }
                }
                None => self.append_placeholder(doc, classpath, "location"),
            }
        }
    }

    fn append_placeholder(&self, doc: &mut Document, parent: usize, tag: &str) {
        let child = doc.create_element(tag);
        doc.set_attribute(child, "path", &self.classpath);
        doc.append_child(parent, child);
    }
}
