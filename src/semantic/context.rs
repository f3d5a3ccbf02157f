//! Merged definition sets.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::errors::ParseError;
use crate::syntax::Assignment;

/// The set of all assignments gathered from one or more sources.
///
/// Invariant: any two assignments sharing a name carry the same location,
/// i.e. there is at most one physical definition site per name. The check
/// runs at construction and again at every merge, so conflicts surface
/// regardless of merge order.
#[derive(Debug, Clone, Default)]
pub struct ParserContext {
    assignments: Vec<Assignment>,
}

impl ParserContext {
    pub fn new(assignments: Vec<Assignment>) -> Result<Self, ParseError> {
        let context = Self { assignments };
        context.check_duplicates()?;
        Ok(context)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Concatenate two contexts, re-checking the uniqueness invariant.
    pub fn merge(mut self, other: ParserContext) -> Result<ParserContext, ParseError> {
        self.assignments.extend(other.assignments);
        Self::new(self.assignments)
    }

    /// Build the name-keyed working table for resolution. Assignments
    /// repeated at the same site collapse to one entry; insertion order
    /// is kept so diagnostics are deterministic.
    pub fn to_table(&self) -> IndexMap<SmolStr, Assignment> {
        let mut table = IndexMap::with_capacity(self.assignments.len());
        for assignment in &self.assignments {
            table.insert(assignment.name().clone(), assignment.clone());
        }
        table
    }

    fn check_duplicates(&self) -> Result<(), ParseError> {
        let mut seen: FxHashMap<&SmolStr, &str> = FxHashMap::default();
        for assignment in &self.assignments {
            if let Some(first) = seen.insert(assignment.name(), assignment.location())
                && first != assignment.location()
            {
                return Err(ParseError::duplicate(
                    assignment.name().clone(),
                    first,
                    assignment.location(),
                ));
            }
        }
        Ok(())
    }
}
