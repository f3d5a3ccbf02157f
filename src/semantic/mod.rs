//! Semantic analysis: multi-file composition and reference resolution.
//!
//! Workflow: the grammar front end turns each source into a
//! [`FileContext`](crate::syntax::FileContext); the [`Composer`] resolves
//! includes and merges every file into one duplicate-checked
//! [`ParserContext`]; [`resolve`] then rewrites aliases, expressions and
//! formulas into closed trees and returns the final map of named
//! formulas. This module also hosts the public pipeline entry points.

mod composer;
mod context;
mod resolver;

use std::path::Path;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::errors::{DefinitionKind, ParseError};
use crate::syntax::Formula;

pub use composer::Composer;
pub use context::ParserContext;
pub use resolver::resolve;

/// Name under which [`parse_formula`] binds its input. A specification
/// that defines this name itself collides with the wrapper and is
/// rejected as a duplicate definition.
const FORMULA_BINDING: &str = "__formula";

/// Run the full pipeline over inline text.
pub fn parse(input: &str) -> Result<FxHashMap<SmolStr, Formula>, ParseError> {
    let mut composer = Composer::new();
    let context = composer.compose_str(input)?;
    resolve(&context)
}

/// Run the full pipeline over a file on disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<FxHashMap<SmolStr, Formula>, ParseError> {
    let mut composer = Composer::new();
    let context = composer.compose_file(path)?;
    resolve(&context)
}

/// Parse a single formula given as text.
///
/// The text is wrapped as an assignment to a reserved name and run
/// through the full pipeline, so it may reference names it defines on
/// further lines and pull in includes. Text that denotes an arithmetic
/// expression rather than a formula is a kind mismatch.
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let source = format!("{FORMULA_BINDING} = {input}");
    let mut results = parse(&source)?;
    match results.remove(FORMULA_BINDING) {
        Some(formula) => Ok(formula),
        None => Err(ParseError::kind_mismatch(
            FORMULA_BINDING,
            DefinitionKind::Formula,
            DefinitionKind::Expression,
        )),
    }
}
