//! Streaming rewrite strategy.
//!
//! One pass over the event sequence, re-emitting as it goes. Every byte that
//! does not belong to a matched start tag is copied verbatim from the input,
//! so doctypes, comments, entity references, and quoting all survive
//! untouched. Matched start tags are rebuilt: kept originals first in their
//! original order, then the source-only, target-only, and global replacement
//! pairs in rule order. That deterministic tail makes repeated rewrites
//! idempotent in attribute content, though not in physical ordering, which is
//! a documented limitation.
//!
//! No index restriction: a ruleset that needs the Nth match belongs on the
//! tree strategy.

use crate::xml::errors::XmlError;
use crate::xml::rules::{AttrRules, DeleteRules};
use crate::xml::tree::render_attr;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Per-scope rule lists consumed in a single pass.
#[derive(Debug, Clone, Default)]
pub struct StreamRules {
    pub global: AttrRules,
    pub source: AttrRules,
    pub target: AttrRules,
    pub delete: DeleteRules,
}

#[derive(Debug, Clone, Default)]
pub struct StreamRewriter {
    rules: StreamRules,
}

impl StreamRewriter {
    pub fn new(rules: StreamRules) -> Self {
        Self { rules }
    }

    pub fn rewrite(&self, input: &str) -> Result<String, XmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(false);

        let mut out = String::with_capacity(input.len());
        let mut last = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Malformed {
                position: reader.buffer_position() as usize,
                message: e.to_string(),
            })?;
            let end = reader.buffer_position() as usize;
            let span = &input[last..end];
            last = end;

            match event {
                Event::Start(e) => self.emit_tag(&e, span, false, end, &mut out)?,
                Event::Empty(e) => self.emit_tag(&e, span, true, end, &mut out)?,
                Event::Eof => break,
                _ => out.push_str(span),
            }
        }

        Ok(out)
    }

    fn emit_tag(
        &self,
        tag: &BytesStart<'_>,
        span: &str,
        self_closing: bool,
        position: usize,
        out: &mut String,
    ) -> Result<(), XmlError> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();

        let rules = &self.rules;
        let matched_global = rules.global.matches_tag(&name);
        let matched_source = rules.source.matches_tag(&name);
        let matched_target = rules.target.matches_tag(&name);
        let matched_delete = rules.delete.matches_tag(&name);

        if !(matched_global || matched_source || matched_target || matched_delete) {
            out.push_str(span);
            return Ok(());
        }

        out.push('<');
        out.push_str(&name);

        for attr in tag.attributes().with_checks(true) {
            let attr = attr.map_err(|e| XmlError::Malformed {
                position,
                message: e.to_string(),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();

            let claimed = (matched_global && rules.global.claims_attribute(&key))
                || (matched_source && rules.source.claims_attribute(&key))
                || (matched_target && rules.target.claims_attribute(&key))
                || (matched_delete && rules.delete.claims_attribute(&key));
            if claimed {
                continue;
            }

            out.push(' ');
            render_attr(out, &key, &String::from_utf8_lossy(&attr.value));
        }

        for scope in [
            matched_source.then_some(&rules.source),
            matched_target.then_some(&rules.target),
            matched_global.then_some(&rules.global),
        ]
        .into_iter()
        .flatten()
        {
            for (attr, value) in scope.pairs() {
                out.push(' ');
                render_attr(out, attr, &escape(value));
            }
        }

        out.push_str(if self_closing { "/>" } else { ">" });
        Ok(())
    }
}
