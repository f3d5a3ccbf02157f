//! Error types for specification parsing and resolution.
//!
//! Every stage fails fast: the first duplicate, cycle, undefined name or
//! kind mismatch aborts the whole `parse` call. There is no warnings mode.

use std::fmt;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;
use thiserror::Error;

/// The namespace a resolved name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// A temporal formula.
    Formula,
    /// An arithmetic expression.
    Expression,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formula => "formula",
            Self::Expression => "expression",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while composing and resolving a specification.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The same name is defined at two distinct sites.
    #[error("duplicate assignment for {name} defined in {first} and {second}")]
    DuplicateDefinition {
        name: SmolStr,
        first: String,
        second: String,
    },

    /// A name depends on itself through alias, expression or formula
    /// references.
    #[error("cyclic reference {name} in {location}")]
    CyclicReference { name: SmolStr, location: String },

    /// A formula references a name with no definition anywhere in the
    /// merged context.
    #[error("undefined reference: {name}")]
    UndefinedReference { name: SmolStr },

    /// A name is used where the other namespace is required.
    #[error("{name} is a {found}, {expected} needed")]
    KindMismatch {
        name: SmolStr,
        expected: DefinitionKind,
        found: DefinitionKind,
    },

    /// The grammar front end rejected a source.
    #[error("syntax error in {location}: {detail}")]
    MalformedSyntax { location: String, detail: String },

    /// A source or include file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create a duplicate-definition error carrying both sites.
    pub fn duplicate(name: impl Into<SmolStr>, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a cyclic-reference error for a name defined at `location`.
    pub fn cyclic(name: impl Into<SmolStr>, location: impl Into<String>) -> Self {
        Self::CyclicReference {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Create an undefined-reference error.
    pub fn undefined(name: impl Into<SmolStr>) -> Self {
        Self::UndefinedReference { name: name.into() }
    }

    /// Create a kind-mismatch error.
    pub fn kind_mismatch(name: impl Into<SmolStr>, expected: DefinitionKind, found: DefinitionKind) -> Self {
        Self::KindMismatch {
            name: name.into(),
            expected,
            found,
        }
    }

    /// Create a syntax error annotated with the originating source.
    pub fn syntax(location: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedSyntax {
            location: location.into(),
            detail: detail.into(),
        }
    }

    /// Create an I/O error annotated with the offending path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_both_locations() {
        let err = ParseError::duplicate("k", "a.ctl:1", "b.ctl:3");
        let message = err.to_string();
        assert!(message.contains("k"));
        assert!(message.contains("a.ctl:1"));
        assert!(message.contains("b.ctl:3"));
    }

    #[test]
    fn test_kind_mismatch_names_both_kinds() {
        let err = ParseError::kind_mismatch("size", DefinitionKind::Expression, DefinitionKind::Formula);
        assert_eq!(err.to_string(), "size is a formula, expression needed");
    }

    #[test]
    fn test_syntax_error_carries_origin() {
        let err = ParseError::syntax("input string", "unexpected token");
        assert!(err.to_string().starts_with("syntax error in input string"));
    }
}
