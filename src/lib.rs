//! # ctlspec-base
//!
//! Core library for CTL specification parsing, AST construction, and
//! reference resolution.
//!
//! A specification is a set of named definitions, spread over a root
//! source and any number of `#include`d files. Each definition binds a
//! name to a temporal formula, an arithmetic expression, or an alias of
//! another name. Parsing composes all files into one namespace, rejects
//! duplicate definitions, and resolves every symbolic reference into a
//! closed tree, detecting cycles and kind mismatches along the way.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → file composition, reference resolution, pipeline entry points
//!   ↓
//! parser    → pest grammar front end, single-pass lowering to AST
//!   ↓
//! syntax    → AST types (Expression, Formula), Assignment, FileContext
//!   ↓
//! errors    → ParseError, DefinitionKind
//! ```
//!
//! ## Example
//!
//! ```
//! let formulas = ctlspec::parse("k = True\nl = EF k").unwrap();
//! assert_eq!(formulas.len(), 2);
//! ```

/// Error types shared by all stages
pub mod errors;

/// Parser: pest grammar front end and AST lowering
pub mod parser;

/// Semantic analysis: composition, resolution, pipeline entry points
pub mod semantic;

/// Syntax: AST types and raw assignment records
pub mod syntax;

pub use errors::{DefinitionKind, ParseError};
pub use semantic::{Composer, ParserContext, parse, parse_file, parse_formula, resolve};
pub use syntax::{
    ArithOp, Assignment, BinaryOp, CompareOp, Direction, Expression, Facet, FileContext, Formula,
    UnaryOp,
};

// Re-export commonly needed items
pub use rustc_hash::FxHashMap;
pub use smol_str::SmolStr;
