//! SPARQL query executor
//!
//! Triple patterns are joined in the order they are written. Each pattern is
//! matched with [`RdfStore::statements_matching`], using the bindings made so
//! far as constants, and every match extends the current solution. The search
//! is depth-first, so ASK and LIMIT stop as soon as they have enough.

use super::expression::order_terms;
use super::parser::{
    DescribeTarget, PatternTerm, PatternTriple, PreparedQuery, QueryForm, QueryPattern,
    SolutionModifiers,
};
use super::results::{QuerySolution, SparqlResults};
use super::SparqlResult;
use crate::rdf::{RdfObject, RdfPredicate, RdfStore, RdfSubject, RdfTerm, Triple};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Scoped handle for one query evaluation
///
/// Borrows the store for as long as the evaluation runs. Dropping it, on any
/// exit path, releases the borrow and logs how much work the join did.
pub struct QueryExecution<'a> {
    store: &'a RdfStore,
    form: &'static str,
    join_steps: usize,
    joined: usize,
}

impl<'a> QueryExecution<'a> {
    fn new(store: &'a RdfStore, form: &'static str) -> Self {
        trace!("Acquired {} execution over {} triples", form, store.len());
        Self {
            store,
            form,
            join_steps: 0,
            joined: 0,
        }
    }

    /// Triples examined so far
    pub fn join_steps(&self) -> usize {
        self.join_steps
    }

    /// Hand every solution that passes the filters to `visit`, until it breaks
    fn for_each_solution<F>(&mut self, pattern: &QueryPattern, mut visit: F)
    where
        F: FnMut(QuerySolution) -> ControlFlow<()>,
    {
        if pattern.is_empty() {
            return;
        }
        let mut accept = |mut solution: QuerySolution| {
            if !pattern.filters.iter().all(|f| f.test(&solution)) {
                return ControlFlow::Continue(());
            }
            solution.remove_hidden();
            visit(solution)
        };
        let _ = self.extend(&pattern.triples, &QuerySolution::new(), &mut accept);
    }

    fn extend(
        &mut self,
        remaining: &[PatternTriple],
        bindings: &QuerySolution,
        visit: &mut dyn FnMut(QuerySolution) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let Some((first, rest)) = remaining.split_first() else {
            self.joined += 1;
            return visit(bindings.clone());
        };
        let Some((subject, predicate, object)) = resolve(first, bindings) else {
            return ControlFlow::Continue(());
        };

        let store = self.store;
        for triple in store.statements_matching(subject.as_ref(), predicate.as_ref(), object.as_ref())
        {
            self.join_steps += 1;
            if let Some(next) = bind(first, triple, bindings) {
                if self.extend(rest, &next, visit).is_break() {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }
}

impl Drop for QueryExecution<'_> {
    fn drop(&mut self) {
        trace!(
            "Released {} execution: {} join steps, {} joined solutions",
            self.form,
            self.join_steps,
            self.joined
        );
    }
}

type Resolved = (Option<RdfSubject>, Option<RdfPredicate>, Option<RdfObject>);

/// Constants for every position that is fixed or already bound
///
/// Returns `None` when a bound value cannot occupy its position (a literal
/// as subject, say), since such a pattern matches nothing.
fn resolve(pattern: &PatternTriple, bindings: &QuerySolution) -> Option<Resolved> {
    let subject = match lookup(&pattern.subject, bindings) {
        Some(term) => Some(RdfSubject::try_from(term.clone()).ok()?),
        None => None,
    };
    let predicate = match lookup(&pattern.predicate, bindings) {
        Some(term) => Some(RdfPredicate::try_from(term.clone()).ok()?),
        None => None,
    };
    let object = lookup(&pattern.object, bindings).map(|term| RdfObject::from(term.clone()));
    Some((subject, predicate, object))
}

fn lookup<'b>(term: &'b PatternTerm, bindings: &'b QuerySolution) -> Option<&'b RdfTerm> {
    match term {
        PatternTerm::Constant(t) => Some(t),
        PatternTerm::Variable(v) => bindings.get(v),
    }
}

/// Extend `bindings` with the variables of `pattern` matched against `triple`
fn bind(pattern: &PatternTriple, triple: &Triple, bindings: &QuerySolution) -> Option<QuerySolution> {
    let mut next = bindings.clone();
    let positions = [
        (&pattern.subject, RdfTerm::from(triple.subject.clone())),
        (&pattern.predicate, RdfTerm::from(triple.predicate.clone())),
        (&pattern.object, RdfTerm::from(triple.object.clone())),
    ];
    for (slot, value) in positions {
        if let PatternTerm::Variable(name) = slot {
            match next.get(name) {
                // a variable repeated inside one pattern must bind consistently
                Some(existing) if existing != &value => return None,
                Some(_) => {}
                None => next.bind(name.clone(), value),
            }
        }
    }
    Some(next)
}

/// Projection, DISTINCT and OFFSET/LIMIT applied one solution at a time
struct Window<'v> {
    variables: &'v [String],
    distinct: bool,
    seen: FxHashSet<Vec<Option<RdfTerm>>>,
    skip: usize,
    limit: Option<usize>,
    rows: Vec<QuerySolution>,
}

impl<'v> Window<'v> {
    fn new(variables: &'v [String], modifiers: &SolutionModifiers) -> Self {
        Self {
            variables,
            distinct: modifiers.distinct,
            seen: FxHashSet::default(),
            skip: modifiers.offset,
            limit: modifiers.limit,
            rows: Vec::new(),
        }
    }

    fn offer(&mut self, solution: &QuerySolution) -> ControlFlow<()> {
        if self.is_full() {
            return ControlFlow::Break(());
        }
        let row = solution.project(self.variables);
        if self.distinct && !self.seen.insert(row.key(self.variables)) {
            return ControlFlow::Continue(());
        }
        if self.skip > 0 {
            self.skip -= 1;
            return ControlFlow::Continue(());
        }
        self.rows.push(row);
        if self.is_full() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn is_full(&self) -> bool {
        matches!(self.limit, Some(limit) if self.rows.len() >= limit)
    }
}

/// SPARQL query executor
pub struct SparqlExecutor<'a> {
    store: &'a RdfStore,
}

impl<'a> SparqlExecutor<'a> {
    /// Create a new executor
    pub fn new(store: &'a RdfStore) -> Self {
        Self { store }
    }

    /// Acquire a scoped execution handle over the store
    pub fn execution(&self, form: &'static str) -> QueryExecution<'a> {
        QueryExecution::new(self.store, form)
    }

    /// Execute a prepared query
    pub fn execute(&self, query: &PreparedQuery) -> SparqlResult<SparqlResults> {
        let results = match &query.form {
            QueryForm::Select { variables } => SparqlResults::Bindings {
                variables: variables.clone(),
                solutions: self.select_with(&query.pattern, variables, &query.modifiers)?,
            },
            QueryForm::Ask => SparqlResults::Boolean(self.ask(&query.pattern)),
            QueryForm::Describe { targets } => {
                SparqlResults::Graph(self.describe_with(&query.pattern, targets, &query.modifiers)?)
            }
        };
        debug!("Executed {} query", query.form.name());
        Ok(results)
    }

    /// Every solution of the pattern, with all of its visible variables
    pub fn solutions(&self, pattern: &QueryPattern) -> Vec<QuerySolution> {
        let mut execution = self.execution("SELECT");
        let mut solutions = Vec::new();
        execution.for_each_solution(pattern, |solution| {
            solutions.push(solution);
            ControlFlow::Continue(())
        });
        solutions
    }

    /// Execute a SELECT: solutions projected onto `variables`
    pub fn select(
        &self,
        pattern: &QueryPattern,
        variables: &[String],
    ) -> SparqlResult<Vec<QuerySolution>> {
        self.select_with(pattern, variables, &SolutionModifiers::default())
    }

    /// Execute a SELECT with DISTINCT, ORDER BY, OFFSET and LIMIT
    pub fn select_with(
        &self,
        pattern: &QueryPattern,
        variables: &[String],
        modifiers: &SolutionModifiers,
    ) -> SparqlResult<Vec<QuerySolution>> {
        pattern.check_projection(variables)?;
        if modifiers.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut window = Window::new(variables, modifiers);
        let mut execution = self.execution("SELECT");

        if modifiers.order_by.is_empty() {
            execution.for_each_solution(pattern, |solution| window.offer(&solution));
        } else {
            let mut keyed = Vec::new();
            execution.for_each_solution(pattern, |solution| {
                let keys: Vec<Option<RdfTerm>> = modifiers
                    .order_by
                    .iter()
                    .map(|condition| condition.expression.evaluate(&solution))
                    .collect();
                keyed.push((keys, solution));
                ControlFlow::Continue(())
            });
            keyed.sort_by(|(a, _), (b, _)| compare_keys(modifiers, a, b));
            for (_, solution) in &keyed {
                if window.offer(solution).is_break() {
                    break;
                }
            }
        }

        Ok(window.rows)
    }

    /// Execute an ASK: whether the pattern has at least one solution
    pub fn ask(&self, pattern: &QueryPattern) -> bool {
        let mut execution = self.execution("ASK");
        let mut found = false;
        execution.for_each_solution(pattern, |_| {
            found = true;
            ControlFlow::Break(())
        });
        found
    }

    /// Execute a DESCRIBE: every triple whose subject is a described resource
    pub fn describe(
        &self,
        pattern: &QueryPattern,
        targets: &[DescribeTarget],
    ) -> SparqlResult<Vec<Triple>> {
        self.describe_with(pattern, targets, &SolutionModifiers::default())
    }

    /// Execute a DESCRIBE whose solutions are first narrowed by `modifiers`
    ///
    /// Variable targets describe the subjects they are bound to; resource
    /// targets are described whether or not the pattern has solutions.
    pub fn describe_with(
        &self,
        pattern: &QueryPattern,
        targets: &[DescribeTarget],
        modifiers: &SolutionModifiers,
    ) -> SparqlResult<Vec<Triple>> {
        let variables: Vec<String> = targets
            .iter()
            .filter_map(|target| match target {
                DescribeTarget::Variable(v) => Some(v.clone()),
                DescribeTarget::Resource(_) => None,
            })
            .collect();

        let mut focus: IndexSet<RdfSubject> = IndexSet::new();
        if !variables.is_empty() {
            for row in self.select_with(pattern, &variables, modifiers)? {
                focus.extend(
                    row.iter()
                        .filter_map(|(_, term)| RdfSubject::try_from(term.clone()).ok()),
                );
            }
        }
        for target in targets {
            if let DescribeTarget::Resource(resource) = target {
                focus.insert(RdfSubject::NamedNode(resource.clone()));
            }
        }

        let _execution = self.execution("DESCRIBE");
        Ok(focus
            .iter()
            .flat_map(|subject| {
                self.store
                    .statements_matching(Some(subject), None, None)
                    .cloned()
            })
            .collect())
    }
}

fn compare_keys(
    modifiers: &SolutionModifiers,
    a: &[Option<RdfTerm>],
    b: &[Option<RdfTerm>],
) -> Ordering {
    for ((condition, x), y) in modifiers.order_by.iter().zip(a).zip(b) {
        let ordering = order_terms(x.as_ref(), y.as_ref());
        let ordering = if condition.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode};
    use crate::sparql::expression::{Comparison, FilterExpression};
    use crate::sparql::parser::OrderCondition;

    const EX: &str = "http://example.org/";

    fn node(local: &str) -> NamedNode {
        NamedNode::new(&format!("{}{}", EX, local)).unwrap()
    }

    fn iri(local: &str) -> PatternTerm {
        PatternTerm::constant(node(local))
    }

    fn var(name: &str) -> PatternTerm {
        PatternTerm::variable(name)
    }

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn store() -> RdfStore {
        let knows = RdfPredicate::from(node("knows"));
        let age = RdfPredicate::from(node("age"));
        let mut store = RdfStore::new();
        for (a, b) in [("alice", "bob"), ("bob", "carol"), ("carol", "alice"), ("dave", "dave")] {
            store.insert(Triple::new(node(a).into(), knows.clone(), node(b).into()));
        }
        for (who, years) in [("alice", 30), ("bob", 25), ("carol", 35)] {
            store.insert(Triple::new(
                node(who).into(),
                age.clone(),
                Literal::new_integer_literal(years).into(),
            ));
        }
        store
    }

    #[test]
    fn test_two_pattern_join() {
        let store = store();
        let pattern = QueryPattern::new()
            .with_triple(var("a"), iri("knows"), var("b"))
            .with_triple(var("b"), iri("knows"), var("c"));

        let rows = SparqlExecutor::new(&store)
            .select(&pattern, &vars(&["a", "c"]))
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 2));
        assert!(rows
            .iter()
            .any(|r| r.get("a") == Some(&node("alice").into())
                && r.get("c") == Some(&node("carol").into())));
    }

    #[test]
    fn test_repeated_variable_binds_consistently() {
        let store = store();
        let pattern = QueryPattern::new().with_triple(var("x"), iri("knows"), var("x"));
        let rows = SparqlExecutor::new(&store).solutions(&pattern);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("x"), Some(&node("dave").into()));
    }

    #[test]
    fn test_literal_bound_into_subject_matches_nothing() {
        let store = store();
        let pattern = QueryPattern::new()
            .with_triple(var("p"), iri("age"), var("n"))
            .with_triple(var("n"), var("q"), var("r"));
        assert!(SparqlExecutor::new(&store).solutions(&pattern).is_empty());
    }

    #[test]
    fn test_filters_run_after_join() {
        let store = store();
        let pattern = QueryPattern::new()
            .with_triple(var("p"), iri("age"), var("age"))
            .with_filter(FilterExpression::compare(
                Comparison::Greater,
                FilterExpression::variable("age"),
                FilterExpression::constant(Literal::new_integer_literal(28)),
            ));
        let rows = SparqlExecutor::new(&store)
            .select(&pattern, &vars(&["p"]))
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_order_limit_offset() {
        let store = store();
        let pattern = QueryPattern::new().with_triple(var("p"), iri("age"), var("age"));
        let modifiers = SolutionModifiers {
            order_by: vec![OrderCondition::descending(FilterExpression::variable("age"))],
            offset: 1,
            limit: Some(1),
            ..SolutionModifiers::default()
        };
        let rows = SparqlExecutor::new(&store)
            .select_with(&pattern, &vars(&["p"]), &modifiers)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("p"), Some(&node("alice").into()));
    }

    #[test]
    fn test_distinct_with_limit_streams() {
        let store = store();
        let pattern = QueryPattern::new().with_triple(var("s"), var("p"), var("o"));
        let modifiers = SolutionModifiers {
            distinct: true,
            limit: Some(2),
            ..SolutionModifiers::default()
        };
        let rows = SparqlExecutor::new(&store)
            .select_with(&pattern, &vars(&["p"]), &modifiers)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0], rows[1]);
    }

    #[test]
    fn test_limit_zero() {
        let store = store();
        let pattern = QueryPattern::new().with_triple(var("s"), var("p"), var("o"));
        let modifiers = SolutionModifiers {
            limit: Some(0),
            ..SolutionModifiers::default()
        };
        assert!(SparqlExecutor::new(&store)
            .select_with(&pattern, &vars(&["s"]), &modifiers)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_ask_matches_select() {
        let store = store();
        let executor = SparqlExecutor::new(&store);
        let present = QueryPattern::new().with_triple(iri("alice"), iri("knows"), var("x"));
        let absent = QueryPattern::new().with_triple(iri("bob"), iri("knows"), iri("alice"));

        assert!(executor.ask(&present));
        assert!(!executor.ask(&absent));
        assert!(!executor.solutions(&present).is_empty());
        assert!(executor.solutions(&absent).is_empty());
    }

    #[test]
    fn test_empty_pattern_and_empty_store() {
        let store = store();
        let executor = SparqlExecutor::new(&store);
        let empty = QueryPattern::new();
        assert!(executor.select(&empty, &vars(&["x"])).unwrap().is_empty());
        assert!(!executor.ask(&empty));
        assert!(executor
            .describe(&empty, &[DescribeTarget::Variable("x".to_string())])
            .unwrap()
            .is_empty());

        let nothing = RdfStore::new();
        let pattern = QueryPattern::new().with_triple(var("s"), var("p"), var("o"));
        assert!(!SparqlExecutor::new(&nothing).ask(&pattern));
    }

    #[test]
    fn test_unbound_projection() {
        let store = store();
        let pattern = QueryPattern::new().with_triple(var("s"), iri("knows"), var("o"));
        let err = SparqlExecutor::new(&store)
            .select(&pattern, &vars(&["nope"]))
            .unwrap_err();
        assert!(matches!(err, crate::sparql::SparqlError::UnboundVariableProjection(_)));
    }

    #[test]
    fn test_describe() {
        let store = store();
        let pattern = QueryPattern::new().with_triple(var("p"), iri("knows"), iri("bob"));
        let executor = SparqlExecutor::new(&store);

        let triples = executor
            .describe(&pattern, &[DescribeTarget::Variable("p".to_string())])
            .unwrap();
        // alice knows bob, alice age 30
        assert_eq!(triples.len(), 2);
        assert!(triples
            .iter()
            .all(|t| t.subject == RdfSubject::NamedNode(node("alice"))));

        let triples = executor
            .describe(&pattern, &[DescribeTarget::Resource(node("dave"))])
            .unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn test_execution_counts_join_steps() {
        let store = store();
        let executor = SparqlExecutor::new(&store);
        let pattern = QueryPattern::new().with_triple(var("s"), iri("age"), var("o"));
        let mut execution = executor.execution("SELECT");
        let mut seen = 0;
        execution.for_each_solution(&pattern, |_| {
            seen += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(seen, 3);
        assert_eq!(execution.join_steps(), 3);
    }
}
