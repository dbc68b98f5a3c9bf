use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("invalid rule configuration:\n{0}")]
    InvalidRules(#[from] RuleValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every configuration problem found in one pass, reported together.
#[derive(Debug, Clone)]
pub struct RuleValidationError {
    pub issues: Vec<RuleIssue>,
}

impl fmt::Display for RuleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuleValidationError {}

#[derive(Debug, Clone)]
pub enum RuleIssue {
    NoAction,
    ChangeWithoutElements,
    ArityMismatch {
        scope: &'static str,
        attributes: usize,
        values: usize,
    },
    ScopeConflict {
        attribute: String,
        scope: &'static str,
    },
    DeleteWithoutTags,
    IndexWithScopedRules,
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleIssue::NoAction => write!(f, "no action was specified"),
            RuleIssue::ChangeWithoutElements => write!(
                f,
                "change mode needs at least one element in some scope"
            ),
            RuleIssue::ArityMismatch {
                scope,
                attributes,
                values,
            } => write!(
                f,
                "{scope} scope needs one value per attribute ({attributes} attributes, {values} values)"
            ),
            RuleIssue::ScopeConflict { attribute, scope } => write!(
                f,
                "attribute '{attribute}' is claimed by both the global and {scope} scope"
            ),
            RuleIssue::DeleteWithoutTags => {
                write!(f, "delete mode needs at least one element to delete from")
            }
            RuleIssue::IndexWithScopedRules => write!(
                f,
                "index restriction only applies to global-scope rules, not source/target scopes"
            ),
        }
    }
}
