//! FILTER and ORDER BY expressions
//!
//! Expressions evaluate against a single solution. Evaluation errors (an
//! unbound variable, a type mismatch) produce `None`, and a filter whose
//! value is an error rejects the solution instead of failing the query.

use super::results::QuerySolution;
use super::{SparqlError, SparqlResult};
use crate::rdf::{Literal, NamedNode, RdfTerm};
use oxrdf::vocab::xsd;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

/// Built-in functions usable in filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Str,
    Lang,
    Datatype,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Contains,
    StrStarts,
    StrEnds,
    LCase,
    UCase,
    StrLen,
}

impl Builtin {
    /// Number of arguments the function takes
    pub fn arity(&self) -> usize {
        match self {
            Builtin::Contains | Builtin::StrStarts | Builtin::StrEnds => 2,
            _ => 1,
        }
    }
}

/// A filter or ordering expression
#[derive(Debug, Clone)]
pub enum FilterExpression {
    /// A fixed term
    Constant(RdfTerm),
    /// The value bound to a variable
    Variable(String),
    Or(Box<FilterExpression>, Box<FilterExpression>),
    And(Box<FilterExpression>, Box<FilterExpression>),
    Not(Box<FilterExpression>),
    Compare(Comparison, Box<FilterExpression>, Box<FilterExpression>),
    SameTerm(Box<FilterExpression>, Box<FilterExpression>),
    /// `needle IN (list)`
    In(Box<FilterExpression>, Vec<FilterExpression>),
    /// `BOUND(?var)`
    Bound(String),
    Call(Builtin, Vec<FilterExpression>),
    /// `REGEX(text, pattern, flags)` with the pattern compiled up front
    Regex(Box<FilterExpression>, Regex),
}

impl FilterExpression {
    pub fn variable(name: impl Into<String>) -> Self {
        FilterExpression::Variable(name.into())
    }

    pub fn constant(term: impl Into<RdfTerm>) -> Self {
        FilterExpression::Constant(term.into())
    }

    pub fn compare(op: Comparison, left: FilterExpression, right: FilterExpression) -> Self {
        FilterExpression::Compare(op, Box::new(left), Box::new(right))
    }

    pub fn negate(inner: FilterExpression) -> Self {
        FilterExpression::Not(Box::new(inner))
    }

    /// Call a built-in function, checking the argument count
    pub fn call(builtin: Builtin, args: Vec<FilterExpression>) -> SparqlResult<Self> {
        if args.len() != builtin.arity() {
            return Err(SparqlError::Syntax(format!(
                "{:?} expects {} argument(s), got {}",
                builtin,
                builtin.arity(),
                args.len()
            )));
        }
        Ok(FilterExpression::Call(builtin, args))
    }

    /// Compile a `REGEX` call; flags are any of `i`, `m`, `s`, `x`
    pub fn regex(text: FilterExpression, pattern: &str, flags: &str) -> SparqlResult<Self> {
        let mut builder = RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                other => {
                    return Err(SparqlError::Syntax(format!("unknown REGEX flag '{}'", other)))
                }
            };
        }
        let regex = builder
            .build()
            .map_err(|e| SparqlError::Syntax(format!("invalid REGEX pattern: {}", e)))?;
        Ok(FilterExpression::Regex(Box::new(text), regex))
    }

    /// Variables the expression reads
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpression::Constant(_) => {}
            FilterExpression::Variable(v) | FilterExpression::Bound(v) => out.push(v),
            FilterExpression::Or(l, r)
            | FilterExpression::And(l, r)
            | FilterExpression::Compare(_, l, r)
            | FilterExpression::SameTerm(l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
            FilterExpression::Not(e) | FilterExpression::Regex(e, _) => e.collect_variables(out),
            FilterExpression::In(needle, list) => {
                needle.collect_variables(out);
                list.iter().for_each(|e| e.collect_variables(out));
            }
            FilterExpression::Call(_, args) => args.iter().for_each(|e| e.collect_variables(out)),
        }
    }

    /// Evaluate to a term; `None` is an evaluation error
    pub fn evaluate(&self, solution: &QuerySolution) -> Option<RdfTerm> {
        match self {
            FilterExpression::Constant(t) => Some(t.clone()),
            FilterExpression::Variable(v) => solution.get(v).cloned(),
            FilterExpression::Or(l, r) => {
                match (l.effective_boolean_value(solution), r.effective_boolean_value(solution)) {
                    (Some(true), _) | (_, Some(true)) => Some(boolean(true)),
                    (Some(false), Some(false)) => Some(boolean(false)),
                    _ => None,
                }
            }
            FilterExpression::And(l, r) => {
                match (l.effective_boolean_value(solution), r.effective_boolean_value(solution)) {
                    (Some(false), _) | (_, Some(false)) => Some(boolean(false)),
                    (Some(true), Some(true)) => Some(boolean(true)),
                    _ => None,
                }
            }
            FilterExpression::Not(e) => e.effective_boolean_value(solution).map(|b| boolean(!b)),
            FilterExpression::Compare(op, l, r) => {
                let l = l.evaluate(solution)?;
                let r = r.evaluate(solution)?;
                compare(*op, &l, &r).map(boolean)
            }
            FilterExpression::SameTerm(l, r) => {
                Some(boolean(l.evaluate(solution)? == r.evaluate(solution)?))
            }
            FilterExpression::In(needle, list) => {
                let needle = needle.evaluate(solution)?;
                let mut failed = false;
                for item in list {
                    match item.evaluate(solution).and_then(|t| terms_equal(&needle, &t)) {
                        Some(true) => return Some(boolean(true)),
                        Some(false) => {}
                        None => failed = true,
                    }
                }
                if failed {
                    None
                } else {
                    Some(boolean(false))
                }
            }
            FilterExpression::Bound(v) => Some(boolean(solution.contains(v))),
            FilterExpression::Call(builtin, args) => call(*builtin, args, solution),
            FilterExpression::Regex(text, regex) => {
                let text = text.evaluate(solution)?;
                Some(boolean(regex.is_match(string_value(&text)?)))
            }
        }
    }

    /// Effective boolean value; `None` is an evaluation error
    pub fn effective_boolean_value(&self, solution: &QuerySolution) -> Option<bool> {
        self.evaluate(solution)
            .as_ref()
            .and_then(effective_boolean_value)
    }

    /// Whether a solution passes this filter
    pub fn test(&self, solution: &QuerySolution) -> bool {
        self.effective_boolean_value(solution).unwrap_or(false)
    }
}

fn boolean(value: bool) -> RdfTerm {
    Literal::new_typed_literal(value.to_string(), NamedNode::from(xsd::BOOLEAN)).into()
}

fn effective_boolean_value(term: &RdfTerm) -> Option<bool> {
    let literal = term.as_literal()?;
    if literal.datatype_str() == xsd::BOOLEAN.as_str() {
        return match literal.value() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        };
    }
    if let Some(n) = literal.numeric_value() {
        return Some(n != 0.0 && !n.is_nan());
    }
    if literal.is_plain() {
        return Some(!literal.value().is_empty());
    }
    None
}

/// Lexical form of a string literal
fn string_value(term: &RdfTerm) -> Option<&str> {
    term.as_literal()
        .filter(|l| l.is_plain())
        .map(Literal::value)
}

/// `=` over terms; `None` when two literals cannot be compared
fn terms_equal(l: &RdfTerm, r: &RdfTerm) -> Option<bool> {
    let (a, b) = match (l.as_literal(), r.as_literal()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Some(l == r),
    };
    match (numeric(l).is_some(), numeric(r).is_some()) {
        (true, true) => return numeric_order(a, b).map(Ordering::is_eq),
        (true, false) | (false, true) => return None,
        (false, false) => {}
    }
    if a == b {
        Some(true)
    } else if (a.is_plain() && b.is_plain()) || a.datatype_str() == b.datatype_str() {
        Some(false)
    } else {
        None
    }
}

fn numeric(term: &RdfTerm) -> Option<f64> {
    term.as_literal().and_then(Literal::numeric_value)
}

/// Integers compare exactly, any other numeric pair as `f64`
fn numeric_order(a: &Literal, b: &Literal) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.integer_value(), b.integer_value()) {
        return Some(x.cmp(&y));
    }
    a.numeric_value()?.partial_cmp(&b.numeric_value()?)
}

fn compare(op: Comparison, l: &RdfTerm, r: &RdfTerm) -> Option<bool> {
    match op {
        Comparison::Equal => terms_equal(l, r),
        Comparison::NotEqual => terms_equal(l, r).map(|b| !b),
        Comparison::Less => value_order(l, r).map(Ordering::is_lt),
        Comparison::LessOrEqual => value_order(l, r).map(Ordering::is_le),
        Comparison::Greater => value_order(l, r).map(Ordering::is_gt),
        Comparison::GreaterOrEqual => value_order(l, r).map(Ordering::is_ge),
    }
}

/// Order of two comparable literal values
fn value_order(l: &RdfTerm, r: &RdfTerm) -> Option<Ordering> {
    let (a, b) = (l.as_literal()?, r.as_literal()?);
    match (numeric(l).is_some(), numeric(r).is_some()) {
        (true, true) => return numeric_order(a, b),
        (true, false) | (false, true) => return None,
        (false, false) => {}
    }
    if a.datatype_str() == b.datatype_str() && a.language() == b.language() {
        Some(a.value().cmp(b.value()))
    } else {
        None
    }
}

/// Total order used by ORDER BY
///
/// Unbound < blank nodes < IRIs < numeric literals < other literals. Numbers
/// are ordered by value, everything else by term order.
pub(crate) fn order_terms(l: Option<&RdfTerm>, r: Option<&RdfTerm>) -> Ordering {
    match (l, r) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => order_rank(a).cmp(&order_rank(b)).then_with(|| {
            match (numeric(a), numeric(b)) {
                (Some(x), Some(y)) => x
                    .total_cmp(&y)
                    .then_with(|| integer(a).cmp(&integer(b)))
                    .then_with(|| a.cmp(b)),
                _ => a.cmp(b),
            }
        }),
    }
}

fn order_rank(term: &RdfTerm) -> u8 {
    match term {
        RdfTerm::BlankNode(_) => 0,
        RdfTerm::NamedNode(_) => 1,
        RdfTerm::Literal(l) if l.numeric_value().is_some() => 2,
        RdfTerm::Literal(_) => 3,
    }
}

fn integer(term: &RdfTerm) -> Option<i128> {
    term.as_literal().and_then(Literal::integer_value)
}

fn call(builtin: Builtin, args: &[FilterExpression], solution: &QuerySolution) -> Option<RdfTerm> {
    let first = args.first()?.evaluate(solution)?;
    match builtin {
        Builtin::Str => match &first {
            RdfTerm::NamedNode(n) => Some(Literal::new_simple_literal(n.as_str()).into()),
            RdfTerm::Literal(l) => Some(Literal::new_simple_literal(l.value()).into()),
            RdfTerm::BlankNode(_) => None,
        },
        Builtin::Lang => first
            .as_literal()
            .map(|l| Literal::new_simple_literal(l.language().unwrap_or("")).into()),
        Builtin::Datatype => first.as_literal().map(|l| l.datatype().into()),
        Builtin::IsIri => Some(boolean(matches!(first, RdfTerm::NamedNode(_)))),
        Builtin::IsBlank => Some(boolean(matches!(first, RdfTerm::BlankNode(_)))),
        Builtin::IsLiteral => Some(boolean(first.is_literal())),
        Builtin::IsNumeric => Some(boolean(numeric(&first).is_some())),
        Builtin::Contains | Builtin::StrStarts | Builtin::StrEnds => {
            let second = args.get(1)?.evaluate(solution)?;
            let (haystack, needle) = (string_value(&first)?, string_value(&second)?);
            Some(boolean(match builtin {
                Builtin::Contains => haystack.contains(needle),
                Builtin::StrStarts => haystack.starts_with(needle),
                _ => haystack.ends_with(needle),
            }))
        }
        Builtin::LCase => change_case(&first, str::to_lowercase),
        Builtin::UCase => change_case(&first, str::to_uppercase),
        Builtin::StrLen => {
            let length = string_value(&first)?.chars().count();
            Some(Literal::new_integer_literal(length as i64).into())
        }
    }
}

fn change_case(term: &RdfTerm, convert: fn(&str) -> String) -> Option<RdfTerm> {
    let literal = term.as_literal().filter(|l| l.is_plain())?;
    let value = convert(literal.value());
    match literal.language() {
        Some(lang) => Literal::new_language_tagged_literal(value, lang)
            .ok()
            .map(Into::into),
        None => Some(Literal::new_simple_literal(value).into()),
    }
}
