//! Build Patcher: structural rewriting for Java build files
//!
//! A patching toolkit for Ant `build.xml` and Maven `pom.xml` files built
//! on two interchangeable rewrite strategies: a document-tree rewriter for
//! operations that need whole-tree context (index restriction, deletion,
//! classpath injection) and a single-pass stream rewriter for plain
//! attribute rewriting. A pure selector picks the cheapest strategy that
//! can honor the requested rules.
//!
//! # Fidelity
//!
//! Rewritten output is assembled by splicing verbatim byte spans of the
//! input around the tags that actually changed, so entity references,
//! doctypes, comments, and quoting survive untouched in everything the
//! rules did not match.
//!
//! # Example
//!
//! ```no_run
//! use build_patcher::xml::{AttrRules, RewritePipeline, RewriteRequest};
//!
//! let request = RewriteRequest {
//!     change: true,
//!     global: AttrRules::new(
//!         vec!["javac"],
//!         vec!["srcdir", "destdir"],
//!         vec!["${gentoo.src}", "${gentoo.dest}"],
//!     ),
//!     ..Default::default()
//! };
//!
//! let pipeline = RewritePipeline::new(request)?;
//! let patched = pipeline.run("<project><javac srcdir=\"src\"/></project>")?;
//! # Ok::<(), build_patcher::xml::XmlError>(())
//! ```

pub mod apply;
pub mod cvv;
pub mod manifest;
pub mod maven;
pub mod properties;
pub mod rules_file;
pub mod xml;

// Re-exports
pub use apply::{rewrite_file, rewrite_str, RewriteOutcome};
pub use cvv::{parse_target, ClassRecord, CvvError, VersionCheck};
pub use manifest::{Manifest, ManifestError};
pub use maven::{Coordinates, PomSummary, ReportFields};
pub use properties::BuildProperties;
pub use rules_file::{load_from_path, load_from_str, RulesFile, RulesFileError};
pub use xml::{
    select_strategy, AttrRules, ClasspathInjector, DeleteRules, Document, DomRewriter,
    RewritePipeline, RewriteRequest, Strategy, StreamRewriter, StreamRules, XmlError,
};
