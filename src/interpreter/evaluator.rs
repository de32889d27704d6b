//! Reduction of flat operand/operator sequences.
//!
//! Expressions are folded strictly left to right: there is no operator
//! precedence, so `2 + 3 * 4` is `(2 + 3) * 4`. Identifiers and parenthesized
//! groups have already been replaced by their values when terms reach here.

use super::value::Value;
use crate::errors::{ErrorKind, EvalResult};
use crate::frontend::operator::{CompareOperator, MathOperator};

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Clone)]
pub enum Term {
    Value(Value),
    Math(MathOperator),
    Compare(CompareOperator),
}

/// Evaluates a term sequence that may or may not contain comparisons.
pub fn evaluate_value(terms: &[Term]) -> EvalResult<Value> {
    if terms.iter().any(|term| matches!(term, Term::Compare(_))) {
        evaluate_comparison(terms).map(Value::Bool)
    } else {
        evaluate(terms)
    }
}

/// Left fold of `operand (operator operand)*`.
pub fn evaluate(terms: &[Term]) -> EvalResult<Value> {
    let mut iter = terms.iter();
    let mut anchor = match iter.next() {
        Some(Term::Value(value)) => value.clone(),
        _ => return Err(ErrorKind::MalformedExpression),
    };

    let mut pending = None;
    for term in iter {
        match (term, pending.take()) {
            (Term::Math(op), None) => pending = Some(*op),
            (Term::Value(value), Some(op)) => anchor = apply_math(op, anchor, value.clone())?,
            _ => return Err(ErrorKind::MalformedExpression),
        }
    }

    match pending {
        Some(_) => Err(ErrorKind::MalformedExpression),
        None => Ok(anchor),
    }
}

/// Evaluates clauses joined by `&` and `|`, folded left to right.
pub fn evaluate_comparison(terms: &[Term]) -> EvalResult<bool> {
    let mut result = false;
    let mut joiner: Option<CompareOperator> = None;
    let mut start = 0;

    for idx in 0..=terms.len() {
        let next_joiner = match terms.get(idx) {
            None => None,
            Some(Term::Compare(op)) if op.is_logical() => Some(*op),
            Some(_) => continue,
        };

        let clause = evaluate_clause(&terms[start..idx])?;
        result = match joiner {
            None => clause,
            Some(CompareOperator::And) => result && clause,
            Some(_) => result || clause,
        };

        joiner = next_joiner;
        start = idx + 1;
    }

    Ok(result)
}

/// A clause is either a single bool-valued expression or `expr OP expr`.
fn evaluate_clause(clause: &[Term]) -> EvalResult<bool> {
    if clause.is_empty() {
        return Err(ErrorKind::MalformedComparison);
    }

    let relations: Vec<usize> = clause
        .iter()
        .enumerate()
        .filter(|(_, term)| matches!(term, Term::Compare(_)))
        .map(|(idx, _)| idx)
        .collect();

    match relations.as_slice() {
        [] => match evaluate(clause)? {
            Value::Bool(b) => Ok(b),
            other => Err(ErrorKind::ConditionNotBool(other.type_name())),
        },
        [idx] if *idx > 0 && *idx < clause.len() - 1 => {
            let op = match &clause[*idx] {
                Term::Compare(op) => *op,
                _ => return Err(ErrorKind::MalformedComparison),
            };
            let lhs = evaluate(&clause[..*idx])?;
            let rhs = evaluate(&clause[*idx + 1..])?;
            compare(op, &lhs, &rhs)
        }
        _ => Err(ErrorKind::MalformedComparison),
    }
}

pub fn apply_math(op: MathOperator, lhs: Value, rhs: Value) -> EvalResult<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_binop(op, a, b),
        (Value::String(a), Value::String(b)) => match op {
            MathOperator::Add => Ok(Value::String(a + &b)),
            _ => Err(ErrorKind::InvalidStringOperator(op)),
        },
        (a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => float_binop(op, x, y),
            _ => Err(ErrorKind::InoperableTypes {
                left: a.type_name(),
                right: b.type_name(),
            }),
        },
    }
}

/// Integer arithmetic stays integral unless a division leaves a remainder.
fn int_binop(op: MathOperator, a: i64, b: i64) -> EvalResult<Value> {
    let result = match op {
        MathOperator::Add => a.checked_add(b),
        MathOperator::Subtract => a.checked_sub(b),
        MathOperator::Multiply => a.checked_mul(b),
        MathOperator::Divide => {
            if b == 0 {
                return Err(ErrorKind::DivideByZero);
            }
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                Some(_) => return Ok(Value::Float(a as f64 / b as f64)),
                None => None,
            }
        }
    };

    result.map(Value::Int).ok_or(ErrorKind::IntegerOverflow)
}

fn float_binop(op: MathOperator, a: f64, b: f64) -> EvalResult<Value> {
    let result = match op {
        MathOperator::Add => a + b,
        MathOperator::Subtract => a - b,
        MathOperator::Multiply => a * b,
        MathOperator::Divide => {
            if b == 0.0 {
                return Err(ErrorKind::DivideByZero);
            }
            a / b
        }
    };

    Ok(Value::Float(result))
}

pub fn compare(op: CompareOperator, lhs: &Value, rhs: &Value) -> EvalResult<bool> {
    match op {
        CompareOperator::EqualTo => Ok(values_equal(lhs, rhs)),
        CompareOperator::NotEqualTo => Ok(!values_equal(lhs, rhs)),
        CompareOperator::And | CompareOperator::Or => match (lhs, rhs) {
            (Value::Bool(a), Value::Bool(b)) if op == CompareOperator::And => Ok(*a && *b),
            (Value::Bool(a), Value::Bool(b)) => Ok(*a || *b),
            (Value::Bool(_), other) | (other, _) => {
                Err(ErrorKind::ConditionNotBool(other.type_name()))
            }
        },
        _ => {
            let ordering = match (lhs, rhs) {
                (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
                _ => match (lhs.as_f64(), rhs.as_f64()) {
                    (Some(x), Some(y)) => x.partial_cmp(&y),
                    _ => {
                        return Err(ErrorKind::NotComparable {
                            op,
                            left: lhs.type_name(),
                            right: rhs.type_name(),
                        })
                    }
                },
            };

            // NaN is unordered against everything.
            let ordering = match ordering {
                Some(ordering) => ordering,
                None => return Ok(false),
            };

            Ok(match op {
                CompareOperator::GreaterThan => ordering == Ordering::Greater,
                CompareOperator::GreaterEq => ordering != Ordering::Less,
                CompareOperator::LessThan => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            })
        }
    }
}

/// Numbers compare by value, everything else by printed text.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a == b,
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => lhs.to_string() == rhs.to_string(),
        },
    }
}
