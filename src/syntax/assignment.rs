//! Name-to-definition bindings and the per-source parse result.

use std::path::PathBuf;

use smol_str::SmolStr;

use super::expression::Expression;
use super::formula::Formula;

/// One name-to-definition binding, created once per definition site and
/// never mutated.
///
/// The three kinds form disjoint namespaces; an alias's eventual kind is
/// only known after its target resolves. The `location` string is opaque
/// (`"<origin>:<line>"`) and compared only for equality and display.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Formula {
        name: SmolStr,
        formula: Formula,
        location: String,
    },
    Expression {
        name: SmolStr,
        expression: Expression,
        location: String,
    },
    Alias {
        name: SmolStr,
        target: SmolStr,
        location: String,
    },
}

impl Assignment {
    pub fn name(&self) -> &SmolStr {
        match self {
            Self::Formula { name, .. } | Self::Expression { name, .. } | Self::Alias { name, .. } => name,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Formula { location, .. }
            | Self::Expression { location, .. }
            | Self::Alias { location, .. } => location,
        }
    }

    /// Rebind the payload under a different name and definition site,
    /// keeping the kind. Used when an alias adopts its target's value.
    pub fn with_binding(self, name: SmolStr, location: String) -> Self {
        match self {
            Self::Formula { formula, .. } => Self::Formula { name, formula, location },
            Self::Expression { expression, .. } => Self::Expression { name, expression, location },
            Self::Alias { target, .. } => Self::Alias { name, target, location },
        }
    }
}

/// Direct representation of one parsed source: its include targets in
/// source order and its own assignments.
///
/// Include paths are kept as written; resolving them against a working
/// directory is the composer caller's concern.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub includes: Vec<PathBuf>,
    pub assignments: Vec<Assignment>,
}
