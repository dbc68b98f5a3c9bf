//! JAR `MANIFEST.MF` files.
//!
//! Entries are `Name: value` lines; a line starting with a single space
//! continues the previous value. Parsing is strict and reports the first
//! malformed line by number, because a silently mangled manifest breaks
//! the jar at runtime instead.

use std::fmt::Write as _;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("malformed line {0}: expected 'Name: value'")]
    MalformedLine(usize),

    #[error("malformed line {0}: continuation with no attribute to continue")]
    DanglingContinuation(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
}

impl Manifest {
    pub fn parse(input: &str) -> Result<Self, ManifestError> {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut current: Option<(String, String)> = None;

        for (idx, line) in input.lines().enumerate() {
            let lineno = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix(' ') {
                let Some((_, value)) = current.as_mut() else {
                    return Err(ManifestError::DanglingContinuation(lineno));
                };
                value.push_str(rest.trim());
                continue;
            }

            let Some((name, value)) = line.split_once(": ") else {
                return Err(ManifestError::MalformedLine(lineno));
            };
            if let Some(done) = current.take() {
                entries.push(done);
            }
            current = Some((name.to_string(), value.trim().to_string()));
        }

        if let Some(done) = current.take() {
            entries.push(done);
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces `name` or appends it at the end when absent.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Long comma-separated values wrap onto continuation lines, one item
    /// per line, the way Eclipse writes Bundle-ClassPath and friends.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            if name.len() + value.len() + 2 > 72 && value.contains(',') {
                let mut parts = value.split(',');
                let _ = write!(out, "{}: {},", name, parts.next().unwrap_or(""));
                let mut rest = parts.peekable();
                while let Some(part) = rest.next() {
                    out.push('\n');
                    out.push(' ');
                    out.push_str(part);
                    if rest.peek().is_some() {
                        out.push(',');
                    }
                }
                out.push('\n');
            } else {
                let _ = writeln!(out, "{}: {}", name, value);
            }
        }
        out
    }
}
