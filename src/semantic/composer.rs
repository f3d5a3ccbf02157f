//! Multi-file composition.
//!
//! The composer drives the grammar front end over a root source and its
//! transitive `#include` targets, folding every per-file result into one
//! duplicate-checked [`ParserContext`]. A file is parsed at most once per
//! composer, keyed by its canonical path, which terminates mutual and
//! self inclusion and collapses diamond include graphs.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::errors::ParseError;
use crate::parser::parse_source;
use crate::syntax::FileContext;

use super::context::ParserContext;

/// Folds a root source and its includes into one [`ParserContext`].
///
/// The processed-file set lives for one composer, so a fresh composer is
/// expected per top-level `parse` call.
#[derive(Debug, Default)]
pub struct Composer {
    processed: FxHashSet<PathBuf>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose inline text. Definition sites are reported against the
    /// `"input string"` origin.
    pub fn compose_str(&mut self, input: &str) -> Result<ParserContext, ParseError> {
        let file = parse_source(input, "input string")?;
        self.fold_includes(file)
    }

    /// Compose a file on disk.
    pub fn compose_file(&mut self, path: impl AsRef<Path>) -> Result<ParserContext, ParseError> {
        let path = path.as_ref();
        let identity = fs::canonicalize(path).map_err(|e| ParseError::io(path, e))?;
        self.compose_identified(path, identity)
    }

    fn compose_identified(
        &mut self,
        path: &Path,
        identity: PathBuf,
    ) -> Result<ParserContext, ParseError> {
        debug!(path = %path.display(), "composing file");
        let text = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        self.processed.insert(identity);
        let file = parse_source(&text, &path.display().to_string())?;
        self.fold_includes(file)
    }

    /// Merge a parsed file's own assignments with the contexts of its
    /// not-yet-processed includes, left to right.
    fn fold_includes(&mut self, file: FileContext) -> Result<ParserContext, ParseError> {
        let mut merged = ParserContext::new(file.assignments)?;
        for include in &file.includes {
            let identity = fs::canonicalize(include).map_err(|e| ParseError::io(include, e))?;
            if self.processed.contains(&identity) {
                trace!(path = %include.display(), "include already composed, skipping");
                continue;
            }
            merged = merged.merge(self.compose_identified(include, identity)?)?;
        }
        Ok(merged)
    }
}
