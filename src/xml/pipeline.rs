//! Strategy selection and multi-stage composition.
//!
//! The selector is a pure function of the requested rule shape: anything
//! needing an addressable tree (classpath injection, index restriction,
//! attribute deletion) runs on [`DomRewriter`]; scoped add/change rules with
//! no index run on the cheaper [`StreamRewriter`]. Deletion always routes to
//! the tree strategy; the stream rewriter keeps its delete capability as a
//! library feature.
//!
//! Multiple requested operations compose left to right over intermediate
//! buffers: injection, then add/change, then delete, then maven cleanup.

use crate::xml::classpath::ClasspathInjector;
use crate::xml::dom::DomRewriter;
use crate::xml::errors::XmlError;
use crate::xml::rules::{DeleteRules, RewriteRequest};
use crate::xml::stream::{StreamRewriter, StreamRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Tree,
    Stream,
}

/// Pure decision function from the requested rule shape to a strategy.
pub fn select_strategy(index: Option<usize>, deletes: bool, injection: bool) -> Strategy {
    if injection || deletes || index.is_some() {
        Strategy::Tree
    } else {
        Strategy::Stream
    }
}

#[derive(Debug, Clone)]
pub struct RewritePipeline {
    request: RewriteRequest,
}

impl RewritePipeline {
    /// Validation is a precondition: an invalid request is rejected here,
    /// before any document is parsed.
    pub fn new(request: RewriteRequest) -> Result<Self, XmlError> {
        request.validate()?;
        Ok(Self { request })
    }

    pub fn run(&self, input: &str) -> Result<String, XmlError> {
        let request = &self.request;
        let mut buffer = input.to_string();

        if request.gentoo_classpath {
            let injector = ClasspathInjector::new(request.injection_classpath());
            buffer = DomRewriter::passthrough()
                .rewrite_with(&buffer, |doc| injector.inject(doc))?;
        }

        if request.wants_add() {
            buffer = match select_strategy(request.index, false, false) {
                Strategy::Tree => DomRewriter::new(
                    request.global.elements.clone(),
                    request.global.attributes.clone(),
                    Some(request.global.values.clone()),
                    request.index,
                )
                .rewrite(&buffer)?,
                Strategy::Stream => StreamRewriter::new(StreamRules {
                    global: request.global.clone(),
                    source: request.source.clone(),
                    target: request.target.clone(),
                    delete: DeleteRules::default(),
                })
                .rewrite(&buffer)?,
            };
        }

        if request.wants_delete() {
            buffer = DomRewriter::new(
                request.delete.elements.clone(),
                request.delete.attributes.clone(),
                None,
                request.index,
            )
            .rewrite(&buffer)?;
        }

        if request.maven_cleanup {
            buffer = self.maven_cleanup(&buffer)?;
        }

        Ok(buffer)
    }

    /// Maven-generated build.xml cleanup: inject the placeholder (extended by
    /// any multi-project directories), then cut every `<target>` loose from
    /// its `depends` chain.
    fn maven_cleanup(&self, input: &str) -> Result<String, XmlError> {
        let injector = ClasspathInjector::new(self.request.injection_classpath());
        let injected =
            DomRewriter::passthrough().rewrite_with(input, |doc| injector.inject(doc))?;

        DomRewriter::new(
            vec!["target".to_string()],
            vec!["depends".to_string()],
            None,
            None,
        )
        .rewrite(&injected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::rules::AttrRules;

    #[test]
    fn decision_table() {
        assert_eq!(select_strategy(Some(1), false, false), Strategy::Tree);
        assert_eq!(select_strategy(None, true, false), Strategy::Tree);
        assert_eq!(select_strategy(None, false, true), Strategy::Tree);
        assert_eq!(select_strategy(Some(0), true, true), Strategy::Tree);
        assert_eq!(select_strategy(None, false, false), Strategy::Stream);
    }

    #[test]
    fn invalid_request_fails_before_parsing() {
        let err = RewritePipeline::new(RewriteRequest::default()).unwrap_err();
        assert!(matches!(err, XmlError::InvalidRules(_)));
    }

    #[test]
    fn change_without_index_streams() {
        let request = RewriteRequest {
            change: true,
            global: AttrRules::new(vec!["javac"], vec!["srcdir"], vec!["${gentoo.src}"]),
            ..Default::default()
        };
        let out = RewritePipeline::new(request)
            .unwrap()
            .run("<p><javac srcdir=\"a\" debug=\"on\"/></p>")
            .unwrap();
        assert_eq!(out, "<p><javac debug=\"on\" srcdir=\"${gentoo.src}\"/></p>");
    }

    #[test]
    fn change_with_index_hits_exactly_one_match() {
        let request = RewriteRequest {
            change: true,
            index: Some(1),
            global: AttrRules::new(vec!["foo"], vec!["x"], vec!["hit"]),
            ..Default::default()
        };
        let out = RewritePipeline::new(request)
            .unwrap()
            .run("<r><foo x=\"a\"/><foo x=\"b\"/><foo x=\"c\"/></r>")
            .unwrap();
        assert_eq!(out, "<r><foo x=\"a\"/><foo x=\"hit\"/><foo x=\"c\"/></r>");
    }

    #[test]
    fn injection_and_delete_compose_in_order() {
        let request = RewriteRequest {
            gentoo_classpath: true,
            delete_mode: true,
            delete: crate::xml::rules::DeleteRules::new(vec!["target"], vec!["depends"]),
            ..Default::default()
        };
        let out = RewritePipeline::new(request)
            .unwrap()
            .run("<p><target name=\"a\" depends=\"b\"/><classpath/></p>")
            .unwrap();
        assert_eq!(
            out,
            "<p><target name=\"a\"/>\
             <classpath><location path=\"${gentoo.classpath}\"/></classpath></p>"
        );
    }

    #[test]
    fn maven_cleanup_injects_and_strips_depends() {
        let request = RewriteRequest {
            maven_cleanup: true,
            multi_project_dirs: vec!["core/target".to_string()],
            ..Default::default()
        };
        let out = RewritePipeline::new(request)
            .unwrap()
            .run("<p><classpath/><target name=\"jar\" depends=\"compile\"/></p>")
            .unwrap();
        assert_eq!(
            out,
            "<p><classpath><location path=\"${gentoo.classpath}:core/target\"/></classpath>\
             <target name=\"jar\"/></p>"
        );
    }

    #[test]
    fn malformed_input_surfaces_parse_error() {
        let request = RewriteRequest {
            gentoo_classpath: true,
            ..Default::default()
        };
        let err = RewritePipeline::new(request)
            .unwrap()
            .run("<p><broken></p>")
            .unwrap_err();
        assert!(matches!(err, XmlError::Malformed { .. }));
    }
}
