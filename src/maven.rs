//! Maven `pom.xml` summaries.
//!
//! Extracts the coordinates an ebuild needs from a pom: group, artifact,
//! version, whether the pom inherits from a parent, and the declared
//! dependencies. Coordinates missing at the project level fall back to the
//! `<parent>` block, matching how Maven resolves inherited values.

use crate::xml::tree::{Document, ElementId};
use crate::xml::XmlError;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinates {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinates {
    fn fill_from(&mut self, doc: &Document, node: ElementId) {
        for child in doc.child_elements(node) {
            let text = doc.text(child);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match doc.name(child) {
                "groupId" => self.group = text.to_string(),
                "artifactId" => self.artifact = text.to_string(),
                "version" => self.version = text.to_string(),
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomSummary {
    pub coordinates: Coordinates,
    pub name: String,
    pub is_child: bool,
    pub dependencies: Vec<Coordinates>,
}

impl PomSummary {
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let doc = Document::parse(input)?;
        let mut summary = PomSummary::default();

        let Some(project) = doc.elements_named("project").into_iter().next() else {
            return Ok(summary);
        };

        // Parent coordinates first, then the project's own values override.
        for child in doc.child_elements(project) {
            if doc.name(child) == "parent" {
                summary.is_child = true;
                summary.coordinates.fill_from(&doc, child);
            }
        }
        summary.coordinates.fill_from(&doc, project);

        for child in doc.child_elements(project) {
            if doc.name(child) == "name" {
                let text = doc.text(child);
                let text = text.trim();
                if !text.is_empty() {
                    summary.name = text.to_string();
                }
            }
        }

        for child in doc.child_elements(project) {
            if doc.name(child) != "dependencies" {
                continue;
            }
            for dep_node in doc.child_elements(child) {
                if doc.name(dep_node) != "dependency" {
                    continue;
                }
                let mut dep = Coordinates::default();
                dep.fill_from(&doc, dep_node);
                summary.dependencies.push(dep);
            }
        }

        Ok(summary)
    }

    /// One `key:value` line per requested field, dependencies numbered
    /// from 1.
    pub fn report(&self, fields: &ReportFields) -> String {
        let mut out = String::new();
        if fields.group {
            let _ = writeln!(out, "pom group:{}", self.coordinates.group);
        }
        if fields.is_child {
            let _ = writeln!(out, "pom ischild:{}", self.is_child);
        }
        if fields.artifact {
            let _ = writeln!(out, "pom artifact:{}", self.coordinates.artifact);
        }
        if fields.version {
            let _ = writeln!(out, "pom version:{}", self.coordinates.version);
        }
        if fields.dependencies {
            for (i, dep) in self.dependencies.iter().enumerate() {
                let i = i + 1;
                let _ = writeln!(out, "{}:dep_group:{}", i, dep.group);
                let _ = writeln!(out, "{}:dep_artifact:{}", i, dep.artifact);
                let _ = writeln!(out, "{}:dep_version:{}", i, dep.version);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFields {
    pub group: bool,
    pub is_child: bool,
    pub artifact: bool,
    pub version: bool,
    pub dependencies: bool,
}

impl ReportFields {
    pub fn all() -> Self {
        Self {
            group: true,
            is_child: true,
            artifact: true,
            version: true,
            dependencies: true,
        }
    }
}
