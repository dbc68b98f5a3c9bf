//! Eclipse `build.properties` files.
//!
//! The format is loose: `key = value` lines, `#` comments, backslash line
//! continuations, and comma-separated value lists. Files that are missing
//! or unreadable parse as an empty set, since Eclipse projects frequently
//! ship without one.

use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    entries: Vec<(String, Vec<String>)>,
}

impl BuildProperties {
    /// Reads `path`, treating a missing or unreadable file as empty.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(input: &str) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        let mut lines = input.lines();

        while let Some(line) = lines.next() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(eq) = line.find('=') else { continue };
            let name = line[..eq].trim().to_string();
            let mut value = line[eq + 1..].trim().to_string();

            // A trailing backslash is a continuation marker: drop it and pull
            // in the next line. A blank or comment line ends the continuation
            // early. Backslashes anywhere else in the value are data.
            while value.ends_with('\\') {
                value.pop();
                let Some(next) = lines.next() else { break };
                let next = next.trim();
                if next.is_empty() || next.starts_with('#') {
                    break;
                }
                value.push_str(next);
            }

            let value = value
                .trim()
                .trim_matches(|c| c == '\'' || c == '"')
                .trim()
                .to_string();
            if value.is_empty() {
                continue;
            }

            let values: Vec<String> = value.split(',').map(str::to_string).collect();
            match entries.iter_mut().find(|(k, _)| *k == name) {
                Some((_, existing)) => *existing = values,
                None => entries.push((name, values)),
            }
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Comma-joined value, the way the key appears in the file.
    pub fn value(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.join(","))
    }

    /// Replaces `name` or appends it at the end when absent.
    pub fn set(&mut self, name: &str, value: &str) {
        let values: Vec<String> = value.split(',').map(str::to_string).collect();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((name.to_string(), values)),
        }
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (name, values) in &self.entries {
            out.push_str(name);
            out.push_str(" = ");
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }
}
