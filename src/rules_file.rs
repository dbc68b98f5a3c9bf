//! Declarative rules files.
//!
//! The same operations the `rewrite` command takes as flags can live in a
//! TOML document, which deserializes into a [`RewriteRequest`] and passes
//! through the same validation the engine applies to CLI-built rules.
//!
//! ```toml
//! gentoo-classpath = true
//!
//! [global]
//! elements = ["javac"]
//! attributes = ["srcdir"]
//! values = ["${gentoo.src}"]
//!
//! [delete]
//! elements = ["target"]
//! attributes = ["depends"]
//! ```

use crate::xml::errors::RuleValidationError;
use crate::xml::rules::{AttrRules, DeleteRules, RewriteRequest};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RulesFile {
    pub index: Option<usize>,
    pub gentoo_classpath: bool,
    pub maven_cleanup: bool,
    pub multi_project_dirs: Vec<String>,
    pub classpath: Option<String>,
    pub global: AttrRules,
    pub source: AttrRules,
    pub target: AttrRules,
    pub delete: DeleteRules,
}

impl RulesFile {
    /// Change and delete modes are implied by the presence of their rule
    /// sections; the file format has no separate action flags.
    pub fn into_request(self) -> RewriteRequest {
        let change =
            !(self.global.is_empty() && self.source.is_empty() && self.target.is_empty());
        let delete_mode = !self.delete.is_empty();
        RewriteRequest {
            change,
            delete_mode,
            global: self.global,
            source: self.source,
            target: self.target,
            delete: self.delete,
            index: self.index,
            gentoo_classpath: self.gentoo_classpath,
            maven_cleanup: self.maven_cleanup,
            multi_project_dirs: self.multi_project_dirs,
            classpath: self.classpath,
        }
    }
}

#[derive(Debug)]
pub enum RulesFileError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: RuleValidationError,
    },
}

impl RulesFileError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            RulesFileError::Toml { path: None, source } => RulesFileError::Toml {
                path: Some(path),
                source,
            },
            RulesFileError::Validation { path: None, source } => RulesFileError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for RulesFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesFileError::Io { path, source } => {
                write!(
                    f,
                    "failed to read rules file {}: {}",
                    path.display(),
                    source
                )
            }
            RulesFileError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse rules file ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse rules file: {}", source),
            },
            RulesFileError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid rules file ({}): {}", path.display(), source),
                None => write!(f, "invalid rules file: {}", source),
            },
        }
    }
}

impl std::error::Error for RulesFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RulesFileError::Io { source, .. } => Some(source),
            RulesFileError::Toml { source, .. } => Some(source),
            RulesFileError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<RewriteRequest, RulesFileError> {
    let file: RulesFile = toml::from_str(input)
        .map_err(|source| RulesFileError::Toml { path: None, source })?;
    let request = file.into_request();
    request
        .validate()
        .map_err(|source| RulesFileError::Validation { path: None, source })?;
    Ok(request)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<RewriteRequest, RulesFileError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| RulesFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
