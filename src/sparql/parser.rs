//! SPARQL parser using spargebra library
//!
//! Queries are parsed by `spargebra` and then lowered into the small algebra
//! the executor understands: a flat list of triple patterns, post-filters and
//! solution modifiers. Anything outside that subset is rejected here, before
//! any evaluation starts.

use super::expression::{Builtin, Comparison, FilterExpression};
use super::results::is_hidden_variable;
use super::{SparqlError, SparqlResult};
use crate::rdf::{Literal, NamedNode, RdfTerm};
use indexmap::{IndexMap, IndexSet};
use spargebra::algebra::{Expression, Function, GraphPattern, OrderExpression};
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};
use spargebra::Query;
use tracing::debug;

/// One position of a triple pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    Variable(String),
    Constant(RdfTerm),
}

impl PatternTerm {
    pub fn variable(name: impl Into<String>) -> Self {
        PatternTerm::Variable(name.into())
    }

    pub fn constant(term: impl Into<RdfTerm>) -> Self {
        PatternTerm::Constant(term.into())
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            PatternTerm::Variable(v) => Some(v),
            PatternTerm::Constant(_) => None,
        }
    }
}

impl From<RdfTerm> for PatternTerm {
    fn from(term: RdfTerm) -> Self {
        PatternTerm::Constant(term)
    }
}

/// Triple pattern whose positions are constants or variables
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternTriple {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl PatternTriple {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Variables in subject, predicate, object order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(PatternTerm::as_variable)
    }
}

/// Ordered triple patterns plus filters applied after the join
#[derive(Debug, Clone, Default)]
pub struct QueryPattern {
    pub triples: Vec<PatternTriple>,
    pub filters: Vec<FilterExpression>,
}

impl QueryPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triple pattern
    pub fn with_triple(
        mut self,
        subject: PatternTerm,
        predicate: PatternTerm,
        object: PatternTerm,
    ) -> Self {
        self.triples
            .push(PatternTriple::new(subject, predicate, object));
        self
    }

    /// Append a post-filter
    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filters.push(filter);
        self
    }

    /// A pattern without triples, which never produces a solution
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Every variable the triples can bind, in order of first appearance
    pub fn variables(&self) -> IndexSet<&str> {
        self.triples
            .iter()
            .flat_map(PatternTriple::variables)
            .collect()
    }

    /// Variables a caller may project (blank nodes excluded)
    pub fn visible_variables(&self) -> Vec<String> {
        self.variables()
            .into_iter()
            .filter(|v| !is_hidden_variable(v))
            .map(str::to_string)
            .collect()
    }

    /// Fail if a projected variable can never be bound by the triples
    ///
    /// An empty pattern has no solutions at all and is accepted.
    pub fn check_projection<'a>(
        &self,
        variables: impl IntoIterator<Item = &'a String>,
    ) -> SparqlResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        let bound = self.variables();
        for variable in variables {
            if is_hidden_variable(variable) || !bound.contains(variable.as_str()) {
                return Err(SparqlError::UnboundVariableProjection(variable.clone()));
            }
        }
        Ok(())
    }
}

/// What a DESCRIBE query describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeTarget {
    /// Subjects bound to this variable in at least one solution
    Variable(String),
    /// A fixed resource
    Resource(NamedNode),
}

/// One ORDER BY key
#[derive(Debug, Clone)]
pub struct OrderCondition {
    pub expression: FilterExpression,
    pub descending: bool,
}

impl OrderCondition {
    pub fn ascending(expression: FilterExpression) -> Self {
        Self {
            expression,
            descending: false,
        }
    }

    pub fn descending(expression: FilterExpression) -> Self {
        Self {
            expression,
            descending: true,
        }
    }
}

/// DISTINCT, ORDER BY, OFFSET and LIMIT
#[derive(Debug, Clone, Default)]
pub struct SolutionModifiers {
    pub distinct: bool,
    pub order_by: Vec<OrderCondition>,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// Query form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryForm {
    Select { variables: Vec<String> },
    Ask,
    Describe { targets: Vec<DescribeTarget> },
}

impl QueryForm {
    pub fn name(&self) -> &'static str {
        match self {
            QueryForm::Select { .. } => "SELECT",
            QueryForm::Ask => "ASK",
            QueryForm::Describe { .. } => "DESCRIBE",
        }
    }
}

/// A parsed and validated query, ready to run against any store
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub form: QueryForm,
    pub pattern: QueryPattern,
    pub modifiers: SolutionModifiers,
}

/// SPARQL parser
pub struct SparqlParser;

impl SparqlParser {
    /// Parse a SPARQL query string
    pub fn parse(query: &str) -> SparqlResult<PreparedQuery> {
        Self::parse_with_base(query, None)
    }

    /// Parse a SPARQL query string, resolving relative IRIs against `base_iri`
    pub fn parse_with_base(query: &str, base_iri: Option<&str>) -> SparqlResult<PreparedQuery> {
        let parsed =
            Query::parse(query, base_iri).map_err(|e| SparqlError::Syntax(e.to_string()))?;
        let prepared = lower_query(&parsed)?;
        debug!(
            "Prepared {} query: {} triple patterns, {} filters",
            prepared.form.name(),
            prepared.pattern.triples.len(),
            prepared.pattern.filters.len()
        );
        Ok(prepared)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Form {
    Select,
    Ask,
    Describe,
}

fn lower_query(query: &Query) -> SparqlResult<PreparedQuery> {
    let (form, dataset, pattern) = match query {
        Query::Select {
            dataset, pattern, ..
        } => (Form::Select, dataset, pattern),
        Query::Ask {
            dataset, pattern, ..
        } => (Form::Ask, dataset, pattern),
        Query::Describe {
            dataset, pattern, ..
        } => (Form::Describe, dataset, pattern),
        Query::Construct { .. } => return Err(unsupported("CONSTRUCT")),
    };
    if dataset.is_some() {
        return Err(unsupported("FROM and FROM NAMED"));
    }

    let mut modifiers = SolutionModifiers::default();
    let mut projection: Option<Vec<String>> = None;
    let mut resources: IndexMap<String, NamedNode> = IndexMap::new();
    let mut current = pattern;

    if let GraphPattern::Slice {
        inner,
        start,
        length,
    } = current
    {
        modifiers.offset = *start;
        modifiers.limit = *length;
        current = &**inner;
    }
    match current {
        GraphPattern::Distinct { inner } => {
            modifiers.distinct = true;
            current = &**inner;
        }
        GraphPattern::Reduced { inner } => current = &**inner,
        _ => {}
    }
    if let GraphPattern::Project { inner, variables } = current {
        projection = Some(variables.iter().map(|v| v.as_str().to_string()).collect());
        current = &**inner;
    }
    if let GraphPattern::OrderBy { inner, expression } = current {
        modifiers.order_by = expression
            .iter()
            .map(lower_order)
            .collect::<SparqlResult<_>>()?;
        current = &**inner;
    }
    while let GraphPattern::Extend {
        inner,
        variable,
        expression,
    } = current
    {
        match (form, expression) {
            (Form::Describe, Expression::NamedNode(n)) => {
                resources.insert(variable.as_str().to_string(), NamedNode::from(n.clone()));
            }
            _ => return Err(unsupported("BIND and SELECT expressions")),
        }
        current = &**inner;
    }

    let mut body = QueryPattern::new();
    lower_group(current, &mut body)?;

    let form = match form {
        Form::Select => {
            let variables = projection.unwrap_or_else(|| body.visible_variables());
            body.check_projection(&variables)?;
            QueryForm::Select { variables }
        }
        Form::Ask => QueryForm::Ask,
        Form::Describe => {
            let names = projection.unwrap_or_else(|| resources.keys().cloned().collect());
            let mut targets = Vec::with_capacity(names.len());
            for name in names {
                match resources.get(&name) {
                    Some(resource) => targets.push(DescribeTarget::Resource(resource.clone())),
                    None => {
                        body.check_projection([&name])?;
                        targets.push(DescribeTarget::Variable(name));
                    }
                }
            }
            QueryForm::Describe { targets }
        }
    };

    Ok(PreparedQuery {
        form,
        pattern: body,
        modifiers,
    })
}

fn unsupported(what: &str) -> SparqlError {
    SparqlError::Unsupported(what.to_string())
}

fn lower_group(pattern: &GraphPattern, out: &mut QueryPattern) -> SparqlResult<()> {
    match pattern {
        GraphPattern::Bgp { patterns } => {
            for triple in patterns {
                out.triples.push(lower_triple(triple)?);
            }
            Ok(())
        }
        GraphPattern::Join { left, right } => {
            lower_group(left, out)?;
            lower_group(right, out)
        }
        GraphPattern::Filter { expr, inner } => {
            lower_group(inner, out)?;
            out.filters.push(lower_expression(expr)?);
            Ok(())
        }
        GraphPattern::Path { .. } => Err(unsupported("property paths")),
        GraphPattern::LeftJoin { .. } => Err(unsupported("OPTIONAL")),
        GraphPattern::Union { .. } => Err(unsupported("UNION")),
        GraphPattern::Minus { .. } => Err(unsupported("MINUS")),
        GraphPattern::Graph { .. } => Err(unsupported("GRAPH")),
        GraphPattern::Values { .. } => Err(unsupported("VALUES")),
        GraphPattern::Group { .. } => Err(unsupported("GROUP BY and aggregates")),
        GraphPattern::Service { .. } => Err(unsupported("SERVICE")),
        GraphPattern::Extend { .. } => Err(unsupported("BIND")),
        _ => Err(unsupported("sub-queries")),
    }
}

fn lower_triple(triple: &TriplePattern) -> SparqlResult<PatternTriple> {
    let predicate = match &triple.predicate {
        NamedNodePattern::NamedNode(n) => PatternTerm::constant(NamedNode::from(n.clone())),
        NamedNodePattern::Variable(v) => PatternTerm::variable(v.as_str()),
    };
    Ok(PatternTriple::new(
        lower_term(&triple.subject)?,
        predicate,
        lower_term(&triple.object)?,
    ))
}

fn lower_term(term: &TermPattern) -> SparqlResult<PatternTerm> {
    match term {
        TermPattern::NamedNode(n) => Ok(PatternTerm::constant(NamedNode::from(n.clone()))),
        TermPattern::Literal(l) => Ok(PatternTerm::constant(Literal::from(l.clone()))),
        TermPattern::Variable(v) => Ok(PatternTerm::variable(v.as_str())),
        TermPattern::BlankNode(b) => Ok(PatternTerm::variable(format!("_:{}", b.as_str()))),
        #[allow(unreachable_patterns)]
        _ => Err(unsupported("quoted triples")),
    }
}

fn lower_order(order: &OrderExpression) -> SparqlResult<OrderCondition> {
    Ok(match order {
        OrderExpression::Asc(e) => OrderCondition::ascending(lower_expression(e)?),
        OrderExpression::Desc(e) => OrderCondition::descending(lower_expression(e)?),
    })
}

fn boxed(expr: &Expression) -> SparqlResult<Box<FilterExpression>> {
    lower_expression(expr).map(Box::new)
}

fn compare(op: Comparison, l: &Expression, r: &Expression) -> SparqlResult<FilterExpression> {
    Ok(FilterExpression::Compare(op, boxed(l)?, boxed(r)?))
}

fn lower_expression(expr: &Expression) -> SparqlResult<FilterExpression> {
    match expr {
        Expression::NamedNode(n) => Ok(FilterExpression::constant(NamedNode::from(n.clone()))),
        Expression::Literal(l) => Ok(FilterExpression::constant(Literal::from(l.clone()))),
        Expression::Variable(v) => Ok(FilterExpression::variable(v.as_str())),
        Expression::Or(l, r) => Ok(FilterExpression::Or(boxed(l)?, boxed(r)?)),
        Expression::And(l, r) => Ok(FilterExpression::And(boxed(l)?, boxed(r)?)),
        Expression::Equal(l, r) => compare(Comparison::Equal, l, r),
        Expression::Greater(l, r) => compare(Comparison::Greater, l, r),
        Expression::GreaterOrEqual(l, r) => compare(Comparison::GreaterOrEqual, l, r),
        Expression::Less(l, r) => compare(Comparison::Less, l, r),
        Expression::LessOrEqual(l, r) => compare(Comparison::LessOrEqual, l, r),
        Expression::SameTerm(l, r) => Ok(FilterExpression::SameTerm(boxed(l)?, boxed(r)?)),
        Expression::Not(inner) => match &**inner {
            Expression::Equal(l, r) => compare(Comparison::NotEqual, l, r),
            other => Ok(FilterExpression::negate(lower_expression(other)?)),
        },
        Expression::In(needle, list) => Ok(FilterExpression::In(
            boxed(needle)?,
            list.iter()
                .map(lower_expression)
                .collect::<SparqlResult<_>>()?,
        )),
        Expression::Bound(v) => Ok(FilterExpression::Bound(v.as_str().to_string())),
        Expression::FunctionCall(function, args) => lower_function(function, args),
        Expression::Exists(_) => Err(unsupported("EXISTS")),
        Expression::Add(..)
        | Expression::Subtract(..)
        | Expression::Multiply(..)
        | Expression::Divide(..)
        | Expression::UnaryPlus(_)
        | Expression::UnaryMinus(_) => Err(unsupported("arithmetic")),
        Expression::If(..) => Err(unsupported("IF")),
        Expression::Coalesce(_) => Err(unsupported("COALESCE")),
        #[allow(unreachable_patterns)]
        _ => Err(unsupported("expression")),
    }
}

fn lower_function(function: &Function, args: &[Expression]) -> SparqlResult<FilterExpression> {
    let builtin = match function {
        Function::Str => Builtin::Str,
        Function::Lang => Builtin::Lang,
        Function::Datatype => Builtin::Datatype,
        Function::IsIri => Builtin::IsIri,
        Function::IsBlank => Builtin::IsBlank,
        Function::IsLiteral => Builtin::IsLiteral,
        Function::IsNumeric => Builtin::IsNumeric,
        Function::Contains => Builtin::Contains,
        Function::StrStarts => Builtin::StrStarts,
        Function::StrEnds => Builtin::StrEnds,
        Function::LCase => Builtin::LCase,
        Function::UCase => Builtin::UCase,
        Function::StrLen => Builtin::StrLen,
        Function::Regex => return lower_regex(args),
        other => return Err(SparqlError::Unsupported(format!("function {:?}", other))),
    };
    let args = args
        .iter()
        .map(lower_expression)
        .collect::<SparqlResult<Vec<_>>>()?;
    FilterExpression::call(builtin, args)
}

fn lower_regex(args: &[Expression]) -> SparqlResult<FilterExpression> {
    let constant = |arg: Option<&Expression>| match arg {
        Some(Expression::Literal(l)) => Ok(Some(l.value().to_string())),
        None => Ok(None),
        Some(_) => Err(unsupported("REGEX with a non-constant pattern or flags")),
    };
    let text = args
        .first()
        .ok_or_else(|| SparqlError::Syntax("REGEX needs a text argument".to_string()))?;
    let pattern = constant(args.get(1))?
        .ok_or_else(|| SparqlError::Syntax("REGEX needs a pattern argument".to_string()))?;
    let flags = constant(args.get(2))?.unwrap_or_default();
    FilterExpression::regex(lower_expression(text)?, &pattern, &flags)
}
