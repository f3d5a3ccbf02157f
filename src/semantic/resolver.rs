//! Reference resolution.
//!
//! Three passes over a working copy of the merged assignment table:
//! aliases first (their kind is unknown until the target resolves), then
//! every expression, then every formula. Each pass writes resolved
//! entries back to the table, so a name is fully resolved at most once
//! regardless of iteration order. Cycles are detected with an explicit
//! stack of in-progress names scoped to one `resolve` call.
//!
//! All passes cover the whole table, not just reachable entries, so a
//! bad definition fails the resolution even when nothing references it.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::errors::{DefinitionKind, ParseError};
use crate::syntax::{Assignment, Expression, Formula};

use super::context::ParserContext;

/// Resolve every reference in `context`, returning the final map of
/// formula assignments. Expression assignments are resolved and checked
/// but not part of the output; they exist to be referenced from inside
/// numeric propositions.
pub fn resolve(context: &ParserContext) -> Result<FxHashMap<SmolStr, Formula>, ParseError> {
    Resolver::new(context).run()
}

struct Resolver {
    table: IndexMap<SmolStr, Assignment>,
    /// Names currently being resolved in the active recursive chain.
    stack: Vec<SmolStr>,
}

impl Resolver {
    fn new(context: &ParserContext) -> Self {
        Self {
            table: context.to_table(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<FxHashMap<SmolStr, Formula>, ParseError> {
        trace!(entries = self.table.len(), "resolving aliases");
        for index in 0..self.table.len() {
            let Some((name, assignment)) = self.table.get_index(index) else {
                continue;
            };
            let (name, assignment) = (name.clone(), assignment.clone());
            let resolved = self.resolve_alias(assignment)?;
            self.table.insert(name, resolved);
        }

        trace!("resolving expressions");
        for index in 0..self.table.len() {
            let Some((name, assignment)) = self.table.get_index(index) else {
                continue;
            };
            let Assignment::Expression { expression, location, .. } = assignment.clone() else {
                continue;
            };
            let name = name.clone();
            let resolved = self.resolve_expression(&expression)?;
            self.table.insert(
                name.clone(),
                Assignment::Expression {
                    name,
                    expression: resolved,
                    location,
                },
            );
        }

        trace!("resolving formulas");
        let mut results = FxHashMap::default();
        for index in 0..self.table.len() {
            let Some((name, assignment)) = self.table.get_index(index) else {
                continue;
            };
            let Assignment::Formula { formula, .. } = assignment.clone() else {
                continue;
            };
            let name = name.clone();
            let resolved = self.resolve_formula(&formula)?;
            results.insert(name, resolved);
        }
        Ok(results)
    }

    /// Follow an alias chain to a formula or expression assignment and
    /// rebind the result under the alias's own name and site. An alias
    /// whose target is defined nowhere denotes an external numeric
    /// signal and becomes an expression holding that variable.
    fn resolve_alias(&mut self, assignment: Assignment) -> Result<Assignment, ParseError> {
        let Assignment::Alias { name, target, location } = assignment else {
            return Ok(assignment);
        };
        if self.stack.contains(&name) {
            return Err(ParseError::cyclic(name, location));
        }
        let Some(next) = self.table.get(&target).cloned() else {
            return Ok(Assignment::Expression {
                name,
                expression: Expression::Variable(target),
                location,
            });
        };
        self.stack.push(name.clone());
        let resolved = self.resolve_alias(next);
        self.stack.pop();
        Ok(resolved?.with_binding(name, location))
    }

    fn resolve_expression(&mut self, expression: &Expression) -> Result<Expression, ParseError> {
        match expression {
            Expression::Variable(variable) => {
                if self.stack.contains(variable) {
                    let location = self.location_of(variable);
                    return Err(ParseError::cyclic(variable.clone(), location));
                }
                match self.table.get(variable).cloned() {
                    // Not a table key: a true external variable.
                    None => Ok(expression.clone()),
                    Some(Assignment::Expression { expression: definition, .. }) => {
                        self.stack.push(variable.clone());
                        let resolved = self.resolve_expression(&definition);
                        self.stack.pop();
                        resolved
                    }
                    Some(Assignment::Formula { .. }) => Err(ParseError::kind_mismatch(
                        variable.clone(),
                        DefinitionKind::Expression,
                        DefinitionKind::Formula,
                    )),
                    // Aliases are rewritten by the first pass; a stray one
                    // can only appear when the table is driven directly.
                    Some(alias @ Assignment::Alias { .. }) => {
                        let resolved = self.resolve_alias(alias)?;
                        self.table.insert(variable.clone(), resolved);
                        self.resolve_expression(expression)
                    }
                }
            }
            node => node.try_map(|child| self.resolve_expression(child)),
        }
    }

    fn resolve_formula(&mut self, formula: &Formula) -> Result<Formula, ParseError> {
        match formula {
            Formula::Reference(reference) => {
                if self.stack.contains(reference) {
                    let location = self.location_of(reference);
                    return Err(ParseError::cyclic(reference.clone(), location));
                }
                match self.table.get(reference).cloned() {
                    None => Err(ParseError::undefined(reference.clone())),
                    Some(Assignment::Formula { formula: definition, .. }) => {
                        self.stack.push(reference.clone());
                        let resolved = self.resolve_formula(&definition);
                        self.stack.pop();
                        resolved
                    }
                    Some(Assignment::Expression { .. }) => Err(ParseError::kind_mismatch(
                        reference.clone(),
                        DefinitionKind::Formula,
                        DefinitionKind::Expression,
                    )),
                    Some(alias @ Assignment::Alias { .. }) => {
                        let resolved = self.resolve_alias(alias)?;
                        self.table.insert(reference.clone(), resolved);
                        self.resolve_formula(formula)
                    }
                }
            }
            // Numeric propositions embed expression trees; they resolve
            // against the expression namespace.
            Formula::Proposition { left, op, right } => Ok(Formula::Proposition {
                left: self.resolve_expression(left)?,
                op: *op,
                right: self.resolve_expression(right)?,
            }),
            node => node.try_map(|child| self.resolve_formula(child)),
        }
    }

    fn location_of(&self, name: &SmolStr) -> String {
        self.table
            .get(name)
            .map(|assignment| assignment.location().to_string())
            .unwrap_or_default()
    }
}
