//! Applies a rewrite pipeline to files on disk.
//!
//! Writes go through a temporary file in the same directory which is synced
//! and renamed over the original, so a crash mid-write never leaves a
//! half-patched build file behind.

use crate::xml::{RewritePipeline, XmlError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The pipeline changed the document and the file was replaced.
    Rewritten,
    /// The pipeline produced byte-identical output; the file was left alone.
    Unchanged,
}

/// Runs `pipeline` over the file at `path`, replacing it in place.
pub fn rewrite_file(path: &Path, pipeline: &RewritePipeline) -> Result<RewriteOutcome, XmlError> {
    let input = fs::read_to_string(path)?;
    let output = pipeline.run(&input)?;
    if output == input {
        return Ok(RewriteOutcome::Unchanged);
    }
    write_atomic(path, &output)?;
    Ok(RewriteOutcome::Rewritten)
}

/// Runs `pipeline` over `input`, returning the output and whether it differs.
pub fn rewrite_str(input: &str, pipeline: &RewritePipeline) -> Result<(String, RewriteOutcome), XmlError> {
    let output = pipeline.run(input)?;
    let outcome = if output == input {
        RewriteOutcome::Unchanged
    } else {
        RewriteOutcome::Rewritten
    };
    Ok((output, outcome))
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), std::io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::rules::{AttrRules, RewriteRequest};

    fn change_pipeline() -> RewritePipeline {
        let request = RewriteRequest {
            change: true,
            global: AttrRules::new(vec!["javac"], vec!["srcdir"], vec!["src"]),
            ..Default::default()
        };
        RewritePipeline::new(request).unwrap()
    }

    #[test]
    fn rewrites_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.xml");
        fs::write(&path, r#"<project><javac srcdir="old"/></project>"#).unwrap();

        let outcome = rewrite_file(&path, &change_pipeline()).unwrap();
        assert_eq!(outcome, RewriteOutcome::Rewritten);
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(r#"srcdir="src""#));
    }

    #[test]
    fn untouched_file_reports_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.xml");
        let original = r#"<project><jar destfile="a.jar"/></project>"#;
        fs::write(&path, original).unwrap();

        let outcome = rewrite_file(&path, &change_pipeline()).unwrap();
        assert_eq!(outcome, RewriteOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xml");
        assert!(matches!(
            rewrite_file(&path, &change_pipeline()),
            Err(XmlError::Io(_))
        ));
    }

    #[test]
    fn malformed_input_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.xml");
        let original = "<project><javac></project>";
        fs::write(&path, original).unwrap();

        assert!(rewrite_file(&path, &change_pipeline()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
