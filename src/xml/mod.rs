//! The XML structural rewrite engine: two strategies behind one contract
//! ("apply rules to a document, produce rewritten bytes"), a pure selector
//! between them, and the classpath-injection macro built on the tree side.

pub mod classpath;
pub mod dom;
pub mod errors;
pub mod pipeline;
pub mod rules;
pub mod stream;
pub mod tree;

pub use classpath::ClasspathInjector;
pub use dom::DomRewriter;
pub use errors::{RuleIssue, RuleValidationError, XmlError};
pub use pipeline::{select_strategy, RewritePipeline, Strategy};
pub use rules::{AttrRules, DeleteRules, RewriteRequest, Scope, DEFAULT_CLASSPATH};
pub use stream::{StreamRewriter, StreamRules};
pub use tree::{Document, ElementId, XmlNode};
