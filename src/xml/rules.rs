use crate::xml::errors::{RuleIssue, RuleValidationError};
use serde::Deserialize;

/// Which occurrences of a tag an attribute change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    SourceOnly,
    TargetOnly,
}

impl Scope {
    pub fn label(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::SourceOnly => "source",
            Scope::TargetOnly => "target",
        }
    }
}

/// One scope's tag/attribute/value lists. Attributes and values are paired
/// positionally, so for add/change they must be equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttrRules {
    pub elements: Vec<String>,
    pub attributes: Vec<String>,
    pub values: Vec<String>,
}

impl AttrRules {
    pub fn new<S: Into<String>>(
        elements: Vec<S>,
        attributes: Vec<S>,
        values: Vec<S>,
    ) -> Self {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.attributes.is_empty() && self.values.is_empty()
    }

    pub fn matches_tag(&self, tag: &str) -> bool {
        self.elements.iter().any(|e| e == tag)
    }

    pub fn claims_attribute(&self, attr: &str) -> bool {
        self.attributes.iter().any(|a| a == attr)
    }

    /// Paired (attribute, value) iteration in rule order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Tags and attribute names marked for deletion. No values: deletion means
/// "drop the attribute if present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeleteRules {
    pub elements: Vec<String>,
    pub attributes: Vec<String>,
}

impl DeleteRules {
    pub fn new<S: Into<String>>(elements: Vec<S>, attributes: Vec<S>) -> Self {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.attributes.is_empty()
    }

    pub fn matches_tag(&self, tag: &str) -> bool {
        self.elements.iter().any(|e| e == tag)
    }

    pub fn claims_attribute(&self, attr: &str) -> bool {
        self.attributes.iter().any(|a| a == attr)
    }
}

/// The placeholder injected by the classpath macro when none is configured.
pub const DEFAULT_CLASSPATH: &str = "${gentoo.classpath}";

/// Everything one invocation of the rewrite pipeline was asked to do.
///
/// Built by the CLI layer or deserialized from a rules file; validated here
/// before any parsing begins.
#[derive(Debug, Clone, Default)]
pub struct RewriteRequest {
    pub global: AttrRules,
    pub source: AttrRules,
    pub target: AttrRules,
    pub delete: DeleteRules,
    /// 0-based restriction to the Nth match, global scope only.
    pub index: Option<usize>,
    pub change: bool,
    pub delete_mode: bool,
    pub gentoo_classpath: bool,
    pub maven_cleanup: bool,
    /// Extra classpath entries appended to the placeholder by maven cleanup.
    pub multi_project_dirs: Vec<String>,
    /// Placeholder override; `DEFAULT_CLASSPATH` when absent.
    pub classpath: Option<String>,
}

impl RewriteRequest {
    pub fn has_action(&self) -> bool {
        self.change || self.delete_mode || self.gentoo_classpath || self.maven_cleanup
    }

    pub fn wants_add(&self) -> bool {
        self.change
            && !(self.global.is_empty() && self.source.is_empty() && self.target.is_empty())
    }

    pub fn wants_delete(&self) -> bool {
        self.delete_mode && !self.delete.is_empty()
    }

    /// The placeholder value the injector should use, with multi-project
    /// directories appended in classpath notation.
    pub fn injection_classpath(&self) -> String {
        let mut cp = self
            .classpath
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSPATH.to_string());
        for dir in &self.multi_project_dirs {
            cp.push(':');
            cp.push_str(dir);
        }
        cp
    }

    /// Precondition check: every problem is collected so the caller sees the
    /// whole report at once, and nothing is parsed until this passes.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        let mut issues = Vec::new();

        if !self.has_action() {
            issues.push(RuleIssue::NoAction);
        }

        if self.change {
            if self.global.elements.is_empty()
                && self.source.elements.is_empty()
                && self.target.elements.is_empty()
            {
                issues.push(RuleIssue::ChangeWithoutElements);
            }

            for (scope, rules) in [
                (Scope::Global, &self.global),
                (Scope::SourceOnly, &self.source),
                (Scope::TargetOnly, &self.target),
            ] {
                if rules.attributes.len() != rules.values.len() {
                    issues.push(RuleIssue::ArityMismatch {
                        scope: scope.label(),
                        attributes: rules.attributes.len(),
                        values: rules.values.len(),
                    });
                }
            }

            for (scope, rules) in [
                (Scope::SourceOnly, &self.source),
                (Scope::TargetOnly, &self.target),
            ] {
                for attr in &rules.attributes {
                    if self.global.claims_attribute(attr) {
                        issues.push(RuleIssue::ScopeConflict {
                            attribute: attr.clone(),
                            scope: scope.label(),
                        });
                    }
                }
            }
        }

        if self.delete_mode && self.delete.elements.is_empty() {
            issues.push(RuleIssue::DeleteWithoutTags);
        }

        if self.index.is_some() && (!self.source.is_empty() || !self.target.is_empty()) {
            issues.push(RuleIssue::IndexWithScopedRules);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(RuleValidationError { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change_request() -> RewriteRequest {
        RewriteRequest {
            change: true,
            global: AttrRules::new(vec!["javac"], vec!["srcdir"], vec!["src"]),
            ..Default::default()
        }
    }

    #[test]
    fn valid_change_request() {
        assert!(change_request().validate().is_ok());
    }

    #[test]
    fn no_action_is_rejected() {
        let request = RewriteRequest::default();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("no action"));
    }

    #[test]
    fn change_without_elements_is_rejected() {
        let request = RewriteRequest {
            change: true,
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("at least one element"));
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let mut request = change_request();
        request.global.values.clear();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("one value per attribute"));
    }

    #[test]
    fn scope_conflict_is_rejected() {
        let mut request = change_request();
        request.source = AttrRules::new(vec!["javac"], vec!["srcdir"], vec!["other"]);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("global and source"));
    }

    #[test]
    fn index_with_scoped_rules_is_rejected() {
        let mut request = change_request();
        request.index = Some(0);
        request.target = AttrRules::new(vec!["target"], vec!["depends"], vec!["x"]);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("index restriction"));
    }

    #[test]
    fn multiple_issues_are_collected() {
        let mut request = RewriteRequest {
            delete_mode: true,
            ..Default::default()
        };
        request.change = true;
        request.global = AttrRules::new(vec!["javac"], vec!["srcdir"], vec![]);
        let err = request.validate().unwrap_err();
        assert_eq!(err.issues.len(), 2);
    }

    #[test]
    fn injection_classpath_appends_multi_project_dirs() {
        let request = RewriteRequest {
            maven_cleanup: true,
            multi_project_dirs: vec!["core/target".to_string(), "util/target".to_string()],
            ..Default::default()
        };
        assert_eq!(
            request.injection_classpath(),
            "${gentoo.classpath}:core/target:util/target"
        );
    }
}
