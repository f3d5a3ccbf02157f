//! Grammar front end for the CTL specification language.
//!
//! The concrete syntax is handled by a pest grammar (`ctl.pest`); this
//! module lowers the resulting parse pairs into AST nodes and raw
//! [`Assignment`] records in a single pass. Reference resolution happens
//! later, in `semantic`; the adapter only classifies each statement as a
//! formula, expression or alias binding and records its definition site.

use std::path::PathBuf;

use pest::Parser as _;
use pest::iterators::Pair;
use pest_derive::Parser;
use smol_str::SmolStr;
use tracing::trace;

use crate::errors::ParseError;
use crate::syntax::{
    ArithOp, Assignment, BinaryOp, CompareOp, Direction, Expression, Facet, FileContext, Formula,
    UnaryOp,
};

#[derive(Parser)]
#[grammar = "parser/ctl.pest"]
struct CtlParser;

/// Parse one textual source into its includes list and assignments.
///
/// `origin` identifies the source in definition sites and diagnostics
/// (a file path, or `"input string"` for inline text).
pub fn parse_source(input: &str, origin: &str) -> Result<FileContext, ParseError> {
    let mut pairs = CtlParser::parse(Rule::file, input)
        .map_err(|e| ParseError::syntax(origin, e.to_string()))?;
    let Some(root) = pairs.next() else {
        return Err(ParseError::syntax(origin, "empty parse tree"));
    };

    let mut context = FileContext::default();
    for statement in root.into_inner() {
        match statement.as_rule() {
            Rule::include => context.includes.push(lower_include(statement, origin)?),
            Rule::assignment => context.assignments.push(lower_assignment(statement, origin)?),
            Rule::EOI => {}
            other => return Err(unexpected_rule(origin, other)),
        }
    }
    trace!(
        origin,
        includes = context.includes.len(),
        assignments = context.assignments.len(),
        "lowered source"
    );
    Ok(context)
}

fn lower_include(pair: Pair<'_, Rule>, origin: &str) -> Result<PathBuf, ParseError> {
    // include = { "#include" ~ string }, string wraps string_inner
    let Some(raw) = pair.into_inner().next().and_then(|s| s.into_inner().next()) else {
        return Err(ParseError::syntax(origin, "include without a path"));
    };
    Ok(PathBuf::from(raw.as_str()))
}

fn lower_assignment(pair: Pair<'_, Rule>, origin: &str) -> Result<Assignment, ParseError> {
    let line = pair.as_span().start_pos().line_col().0;
    let location = format!("{origin}:{line}");

    let mut inner = pair.into_inner();
    let (Some(name), Some(rhs)) = (inner.next(), inner.next()) else {
        return Err(ParseError::syntax(origin, "malformed assignment"));
    };
    let name = SmolStr::new(name.as_str());

    match rhs.as_rule() {
        Rule::alias => {
            let Some(target) = rhs.into_inner().next() else {
                return Err(ParseError::syntax(origin, "alias without a target"));
            };
            Ok(Assignment::Alias {
                name,
                target: SmolStr::new(target.as_str()),
                location,
            })
        }
        Rule::formula => Ok(Assignment::Formula {
            name,
            formula: lower_formula(rhs, origin)?,
            location,
        }),
        Rule::expression => Ok(Assignment::Expression {
            name,
            expression: lower_expression(rhs, origin)?,
            location,
        }),
        other => Err(unexpected_rule(origin, other)),
    }
}

fn lower_formula(pair: Pair<'_, Rule>, origin: &str) -> Result<Formula, ParseError> {
    match pair.as_rule() {
        Rule::formula | Rule::paren_formula => lower_only_child(pair, origin, lower_formula),
        Rule::equivalence => lower_formula_chain(pair, BinaryOp::Equivalence, origin),
        Rule::disjunction => lower_formula_chain(pair, BinaryOp::Or, origin),
        Rule::conjunction => lower_formula_chain(pair, BinaryOp::And, origin),
        Rule::implication => {
            // right-associative: disjunction ~ ("=>" ~ implication)?
            let mut inner = pair.into_inner();
            let Some(first) = inner.next() else {
                return Err(ParseError::syntax(origin, "empty implication"));
            };
            let left = lower_formula(first, origin)?;
            match inner.next() {
                Some(rest) => Ok(Formula::implies(left, lower_formula(rest, origin)?)),
                None => Ok(left),
            }
        }
        Rule::unary => {
            let mut inner = pair.into_inner();
            let Some(first) = inner.next() else {
                return Err(ParseError::syntax(origin, "empty formula"));
            };
            if first.as_rule() == Rule::unary_op {
                let op = lower_unary_op(first.as_str(), origin)?;
                let Some(operand) = inner.next() else {
                    return Err(ParseError::syntax(origin, "unary operator without operand"));
                };
                Ok(Formula::unary(op, lower_formula(operand, origin)?))
            } else {
                lower_formula(first, origin)
            }
        }
        Rule::boolean => Ok(if pair.as_str() == "True" {
            Formula::True
        } else {
            Formula::False
        }),
        Rule::until => {
            let mut inner = pair.into_inner();
            let (Some(quantifier), Some(left), Some(right)) =
                (inner.next(), inner.next(), inner.next())
            else {
                return Err(ParseError::syntax(origin, "malformed until"));
            };
            let op = if quantifier.as_str() == "E" {
                BinaryOp::ExistsUntil
            } else {
                BinaryOp::AllUntil
            };
            Ok(Formula::binary(
                op,
                lower_formula(left, origin)?,
                lower_formula(right, origin)?,
            ))
        }
        Rule::direction => {
            let mut inner = pair.into_inner();
            let (Some(variable), Some(flow), Some(facet)) =
                (inner.next(), inner.next(), inner.next())
            else {
                return Err(ParseError::syntax(origin, "malformed direction proposition"));
            };
            let direction = if flow.as_str() == "in" { Direction::In } else { Direction::Out };
            let facet = if facet.as_str() == "+" { Facet::Positive } else { Facet::Negative };
            Ok(Formula::direction(variable.as_str(), direction, facet))
        }
        Rule::proposition => {
            let mut inner = pair.into_inner();
            let (Some(left), Some(op), Some(right)) = (inner.next(), inner.next(), inner.next())
            else {
                return Err(ParseError::syntax(origin, "malformed proposition"));
            };
            Ok(Formula::proposition(
                lower_expression(left, origin)?,
                lower_compare_op(op.as_str(), origin)?,
                lower_expression(right, origin)?,
            ))
        }
        Rule::reference => Ok(Formula::reference(pair.as_str())),
        other => Err(unexpected_rule(origin, other)),
    }
}

/// Left-fold a `(operand op operand op ...)` chain where every operator
/// is the same, e.g. `a && b && c`.
fn lower_formula_chain(
    pair: Pair<'_, Rule>,
    op: BinaryOp,
    origin: &str,
) -> Result<Formula, ParseError> {
    let mut inner = pair.into_inner();
    let Some(first) = inner.next() else {
        return Err(ParseError::syntax(origin, "empty formula"));
    };
    let mut folded = lower_formula(first, origin)?;
    for operand in inner {
        folded = Formula::binary(op, folded, lower_formula(operand, origin)?);
    }
    Ok(folded)
}

fn lower_expression(pair: Pair<'_, Rule>, origin: &str) -> Result<Expression, ParseError> {
    match pair.as_rule() {
        Rule::paren_expression => lower_only_child(pair, origin, lower_expression),
        Rule::expression | Rule::term => {
            // operand ~ (op ~ operand)*, left-associative
            let mut inner = pair.into_inner();
            let Some(first) = inner.next() else {
                return Err(ParseError::syntax(origin, "empty expression"));
            };
            let mut folded = lower_expression(first, origin)?;
            while let Some(op) = inner.next() {
                let Some(operand) = inner.next() else {
                    return Err(ParseError::syntax(origin, "operator without operand"));
                };
                folded = Expression::binary(
                    lower_arith_op(op.as_str(), origin)?,
                    folded,
                    lower_expression(operand, origin)?,
                );
            }
            Ok(folded)
        }
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(Expression::Constant)
            .map_err(|e| ParseError::syntax(origin, format!("invalid number literal: {e}"))),
        Rule::variable => Ok(Expression::variable(pair.as_str())),
        other => Err(unexpected_rule(origin, other)),
    }
}

fn lower_only_child<T>(
    pair: Pair<'_, Rule>,
    origin: &str,
    lower: impl Fn(Pair<'_, Rule>, &str) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    match pair.into_inner().next() {
        Some(child) => lower(child, origin),
        None => Err(ParseError::syntax(origin, "empty parse node")),
    }
}

fn lower_unary_op(text: &str, origin: &str) -> Result<UnaryOp, ParseError> {
    match text {
        "!" => Ok(UnaryOp::Negation),
        "EX" => Ok(UnaryOp::ExistsNext),
        "AX" => Ok(UnaryOp::AllNext),
        "EF" => Ok(UnaryOp::ExistsFuture),
        "AF" => Ok(UnaryOp::AllFuture),
        "EG" => Ok(UnaryOp::ExistsGlobal),
        "AG" => Ok(UnaryOp::AllGlobal),
        other => Err(ParseError::syntax(origin, format!("unknown unary operator: {other}"))),
    }
}

fn lower_compare_op(text: &str, origin: &str) -> Result<CompareOp, ParseError> {
    match text {
        ">" => Ok(CompareOp::Gt),
        ">=" => Ok(CompareOp::Ge),
        "==" => Ok(CompareOp::Eq),
        "!=" => Ok(CompareOp::Neq),
        "<=" => Ok(CompareOp::Le),
        "<" => Ok(CompareOp::Lt),
        other => Err(ParseError::syntax(origin, format!("unknown comparison operator: {other}"))),
    }
}

fn lower_arith_op(text: &str, origin: &str) -> Result<ArithOp, ParseError> {
    match text {
        "+" => Ok(ArithOp::Add),
        "-" => Ok(ArithOp::Sub),
        "*" => Ok(ArithOp::Mul),
        "/" => Ok(ArithOp::Div),
        other => Err(ParseError::syntax(origin, format!("unknown arithmetic operator: {other}"))),
    }
}

fn unexpected_rule(origin: &str, rule: Rule) -> ParseError {
    ParseError::syntax(origin, format!("unexpected rule {rule:?}"))
}
