//! Temporal formula trees.

use smol_str::SmolStr;

use super::expression::Expression;

/// Unary temporal/propositional operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negation,
    ExistsNext,
    AllNext,
    ExistsFuture,
    AllFuture,
    ExistsGlobal,
    AllGlobal,
}

/// Binary temporal/propositional operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Implication,
    Equivalence,
    ExistsUntil,
    AllUntil,
}

/// Comparison operator of a numeric proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Gt,
    Ge,
    Eq,
    Neq,
    Le,
    Lt,
}

/// Transition direction of a direction proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

/// Facet of a direction proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Positive,
    Negative,
}

/// A temporal-logic proposition.
///
/// `Reference` is an unresolved symbolic reference into the formula
/// namespace; resolution inlines every reference, so no `Reference` node
/// is reachable in a resolver result.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    True,
    False,
    Reference(SmolStr),
    /// Atomic proposition about transition direction, e.g. `x:in+`.
    Direction {
        variable: SmolStr,
        direction: Direction,
        facet: Facet,
    },
    /// Atomic numeric proposition comparing two expressions.
    Proposition {
        left: Expression,
        op: CompareOp,
        right: Expression,
    },
    Unary {
        op: UnaryOp,
        inner: Box<Formula>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Formula>,
        right: Box<Formula>,
    },
}

impl Formula {
    pub fn reference(name: impl Into<SmolStr>) -> Self {
        Self::Reference(name.into())
    }

    pub fn direction(variable: impl Into<SmolStr>, direction: Direction, facet: Facet) -> Self {
        Self::Direction {
            variable: variable.into(),
            direction,
            facet,
        }
    }

    pub fn proposition(left: Expression, op: CompareOp, right: Expression) -> Self {
        Self::Proposition { left, op, right }
    }

    pub fn unary(op: UnaryOp, inner: Formula) -> Self {
        Self::Unary {
            op,
            inner: Box::new(inner),
        }
    }

    pub fn binary(op: BinaryOp, left: Formula, right: Formula) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: Formula) -> Self {
        Self::unary(UnaryOp::Negation, inner)
    }

    pub fn ex(inner: Formula) -> Self {
        Self::unary(UnaryOp::ExistsNext, inner)
    }

    pub fn ax(inner: Formula) -> Self {
        Self::unary(UnaryOp::AllNext, inner)
    }

    pub fn ef(inner: Formula) -> Self {
        Self::unary(UnaryOp::ExistsFuture, inner)
    }

    pub fn af(inner: Formula) -> Self {
        Self::unary(UnaryOp::AllFuture, inner)
    }

    pub fn eg(inner: Formula) -> Self {
        Self::unary(UnaryOp::ExistsGlobal, inner)
    }

    pub fn ag(inner: Formula) -> Self {
        Self::unary(UnaryOp::AllGlobal, inner)
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Self::binary(BinaryOp::And, left, right)
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Self::binary(BinaryOp::Or, left, right)
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Self::binary(BinaryOp::Implication, left, right)
    }

    pub fn equiv(left: Formula, right: Formula) -> Self {
        Self::binary(BinaryOp::Equivalence, left, right)
    }

    pub fn exists_until(left: Formula, right: Formula) -> Self {
        Self::binary(BinaryOp::ExistsUntil, left, right)
    }

    pub fn all_until(left: Formula, right: Formula) -> Self {
        Self::binary(BinaryOp::AllUntil, left, right)
    }

    /// Rebuild this node with each immediate sub-formula replaced by the
    /// callback's output. Atoms are cloned unchanged, including the
    /// expression children of a `Proposition`, which belong to the
    /// expression tree and are rewritten by the resolver separately. The
    /// rewrite never recurses on its own.
    pub fn try_map<E>(
        &self,
        mut f: impl FnMut(&Formula) -> Result<Formula, E>,
    ) -> Result<Formula, E> {
        Ok(match self {
            Self::Unary { op, inner } => Self::Unary {
                op: *op,
                inner: Box::new(f(inner)?),
            },
            Self::Binary { op, left, right } => Self::Binary {
                op: *op,
                left: Box::new(f(left)?),
                right: Box::new(f(right)?),
            },
            atom => atom.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_build_expected_shapes() {
        assert_eq!(
            Formula::not(Formula::True),
            Formula::Unary {
                op: UnaryOp::Negation,
                inner: Box::new(Formula::True),
            }
        );
        assert_eq!(
            Formula::exists_until(Formula::True, Formula::False),
            Formula::Binary {
                op: BinaryOp::ExistsUntil,
                left: Box::new(Formula::True),
                right: Box::new(Formula::False),
            }
        );
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Formula::and(Formula::ef(Formula::reference("k")), Formula::True);
        let b = Formula::and(Formula::ef(Formula::reference("k")), Formula::True);
        assert_eq!(a, b);
        assert_ne!(a, Formula::or(Formula::ef(Formula::reference("k")), Formula::True));
    }

    #[test]
    fn test_try_map_visits_immediate_children_only() {
        let tree = Formula::and(
            Formula::not(Formula::reference("a")),
            Formula::reference("b"),
        );

        let mut seen = Vec::new();
        let mapped: Result<_, ()> = tree.try_map(|child| {
            seen.push(child.clone());
            Ok(Formula::True)
        });

        // Only `!a` and `b`; the nested `a` is not visited.
        assert_eq!(seen.len(), 2);
        assert_eq!(mapped.unwrap(), Formula::and(Formula::True, Formula::True));
    }

    #[test]
    fn test_try_map_leaves_atoms_untouched() {
        let atom = Formula::proposition(
            Expression::variable("x"),
            CompareOp::Gt,
            Expression::Constant(3.0),
        );
        let mapped: Result<_, ()> = atom.try_map(|_| unreachable!("atoms have no sub-formulas"));
        assert_eq!(mapped.unwrap(), atom);
    }

    #[test]
    fn test_try_map_propagates_errors() {
        let tree = Formula::ef(Formula::reference("a"));
        let mapped = tree.try_map(|_| Err("missing"));
        assert_eq!(mapped.unwrap_err(), "missing");
    }
}
