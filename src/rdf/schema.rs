//! RDFS (RDF Schema) reasoning
//!
//! Implements RDFS entailment rules by forward chaining to a fix point:
//!
//! - rdfs:subClassOf transitivity: (A subClassOf B) ∧ (B subClassOf C) → (A subClassOf C)
//! - rdfs:subPropertyOf transitivity: (P subPropertyOf Q) ∧ (Q subPropertyOf R) → (P subPropertyOf R)
//! - property inheritance: (X P Y) ∧ (P subPropertyOf Q) → (X Q Y)
//! - rdfs:domain: (P domain C) ∧ (X P Y) → (X type C)
//! - rdfs:range: (P range C) ∧ (X P Y) → (Y type C)
//! - type inheritance: (X type A) ∧ (A subClassOf B) → (X type B)
//!
//! Each pass applies every enabled rule to the current graph and inserts the
//! triples that are not present yet. The loop stops after the first pass that
//! adds nothing. Closure only ever adds triples built from terms already in the
//! graph, so it terminates for any finite graph, including cyclic hierarchies.

use super::{RdfObject, RdfPredicate, RdfStore, RdfSubject, RdfTerm, Triple};
use indexmap::IndexSet;
use oxrdf::vocab::{rdf, rdfs};
use thiserror::Error;
use tracing::{debug, info};

/// Default bound on inference passes
pub const DEFAULT_MAX_ITERATIONS: usize = 1024;

/// Reasoning errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasoningError {
    /// The fix point was not reached within the configured number of passes
    #[error("Inference did not reach a fix point within {0} passes")]
    IterationLimitExceeded(usize),
}

pub type ReasoningResult<T> = Result<T, ReasoningError>;

/// RDFS inference rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferenceRule {
    /// rdfs:subClassOf transitivity (rdfs11)
    SubClassOfTransitive,

    /// rdfs:subPropertyOf transitivity (rdfs5)
    SubPropertyOfTransitive,

    /// rdfs:domain inference (rdfs2)
    DomainInference,

    /// rdfs:range inference (rdfs3)
    RangeInference,

    /// rdf:type inheritance via rdfs:subClassOf (rdfs9)
    TypeInheritance,

    /// Statement inheritance via rdfs:subPropertyOf (rdfs7)
    PropertyInheritance,
}

impl InferenceRule {
    /// Every supported rule
    pub const ALL: [InferenceRule; 6] = [
        InferenceRule::SubClassOfTransitive,
        InferenceRule::SubPropertyOfTransitive,
        InferenceRule::DomainInference,
        InferenceRule::RangeInference,
        InferenceRule::TypeInheritance,
        InferenceRule::PropertyInheritance,
    ];

    /// Rule name as used in the RDF 1.1 Semantics entailment patterns
    pub fn name(&self) -> &'static str {
        match self {
            InferenceRule::SubClassOfTransitive => "rdfs11",
            InferenceRule::SubPropertyOfTransitive => "rdfs5",
            InferenceRule::DomainInference => "rdfs2",
            InferenceRule::RangeInference => "rdfs3",
            InferenceRule::TypeInheritance => "rdfs9",
            InferenceRule::PropertyInheritance => "rdfs7",
        }
    }
}

/// Outcome of a reasoning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReasoningSummary {
    /// Passes that added at least one triple
    pub iterations: usize,
    /// Triples added in total
    pub inferred: usize,
}

struct Vocabulary {
    rdf_type: RdfPredicate,
    sub_class_of: RdfPredicate,
    sub_property_of: RdfPredicate,
    domain: RdfPredicate,
    range: RdfPredicate,
}

impl Vocabulary {
    fn new() -> Self {
        Self {
            rdf_type: rdf::TYPE.into(),
            sub_class_of: rdfs::SUB_CLASS_OF.into(),
            sub_property_of: rdfs::SUB_PROPERTY_OF.into(),
            domain: rdfs::DOMAIN.into(),
            range: rdfs::RANGE.into(),
        }
    }
}

/// RDFS reasoner with forward chaining
pub struct RdfsReasoner {
    /// Enable specific rules
    enabled_rules: Vec<InferenceRule>,
    /// Safety net on the number of productive passes
    max_iterations: usize,
    vocab: Vocabulary,
}

impl RdfsReasoner {
    /// Create a new reasoner with all rules enabled
    pub fn new() -> Self {
        Self::with_rules(InferenceRule::ALL.to_vec())
    }

    /// Create a reasoner with specific rules
    pub fn with_rules(rules: Vec<InferenceRule>) -> Self {
        Self {
            enabled_rules: rules,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            vocab: Vocabulary::new(),
        }
    }

    /// Override the pass limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Rules this reasoner applies
    pub fn rules(&self) -> &[InferenceRule] {
        &self.enabled_rules
    }

    /// Compute the derived triples without touching `store`
    ///
    /// Returned in the order they were derived.
    pub fn materialize(&self, store: &RdfStore) -> ReasoningResult<Vec<Triple>> {
        let before = store.len();
        let expanded = self.expand(store)?;
        Ok(expanded.iter().skip(before).cloned().collect())
    }

    /// Return a copy of `store` closed under the enabled rules
    pub fn expand(&self, store: &RdfStore) -> ReasoningResult<RdfStore> {
        let mut expanded = store.clone();
        self.reason(&mut expanded)?;
        Ok(expanded)
    }

    /// Apply reasoning and add inferred triples to store
    pub fn reason(&self, store: &mut RdfStore) -> ReasoningResult<ReasoningSummary> {
        let mut summary = ReasoningSummary::default();

        loop {
            let derived = self.infer_pass(store);
            if derived.is_empty() {
                break;
            }
            if summary.iterations >= self.max_iterations {
                return Err(ReasoningError::IterationLimitExceeded(self.max_iterations));
            }

            summary.iterations += 1;
            let added = store.extend(derived);
            summary.inferred += added;
            debug!("Inference pass {} added {} triples", summary.iterations, added);
        }

        info!(
            "RDFS closure reached after {} passes, {} triples inferred",
            summary.iterations, summary.inferred
        );
        Ok(summary)
    }

    /// Whether `subject` has type `class` once `store` is closed under the rules
    pub fn entails_type(
        &self,
        store: &RdfStore,
        subject: &RdfSubject,
        class: &RdfObject,
    ) -> ReasoningResult<bool> {
        let triple = Triple::new(subject.clone(), self.vocab.rdf_type.clone(), class.clone());
        if store.contains(&triple) {
            return Ok(true);
        }
        Ok(self.expand(store)?.contains(&triple))
    }

    fn infer_pass(&self, store: &RdfStore) -> IndexSet<Triple> {
        let mut derived = IndexSet::new();
        for rule in &self.enabled_rules {
            let before = derived.len();
            match rule {
                InferenceRule::SubClassOfTransitive => {
                    self.apply_transitive(store, &self.vocab.sub_class_of, &mut derived)
                }
                InferenceRule::SubPropertyOfTransitive => {
                    self.apply_transitive(store, &self.vocab.sub_property_of, &mut derived)
                }
                InferenceRule::DomainInference => self.apply_domain(store, &mut derived),
                InferenceRule::RangeInference => self.apply_range(store, &mut derived),
                InferenceRule::TypeInheritance => self.apply_type_inheritance(store, &mut derived),
                InferenceRule::PropertyInheritance => {
                    self.apply_property_inheritance(store, &mut derived)
                }
            }
            if derived.len() > before {
                debug!("Rule {} fired {} times", rule.name(), derived.len() - before);
            }
        }
        derived
    }

    // (A p B) ∧ (B p C) → (A p C)
    fn apply_transitive(&self, store: &RdfStore, p: &RdfPredicate, derived: &mut IndexSet<Triple>) {
        for first in store.statements_matching(None, Some(p), None) {
            let Ok(middle) = RdfSubject::try_from(first.object.clone()) else {
                continue;
            };
            for second in store.statements_matching(Some(&middle), Some(p), None) {
                let triple = Triple::new(first.subject.clone(), p.clone(), second.object.clone());
                push_new(store, derived, triple);
            }
        }
    }

    // (X type A) ∧ (A subClassOf B) → (X type B)
    fn apply_type_inheritance(&self, store: &RdfStore, derived: &mut IndexSet<Triple>) {
        let rdf_type = &self.vocab.rdf_type;
        for typed in store.statements_matching(None, Some(rdf_type), None) {
            let Ok(class) = RdfSubject::try_from(typed.object.clone()) else {
                continue;
            };
            for parent in store.statements_matching(Some(&class), Some(&self.vocab.sub_class_of), None) {
                if parent.object.is_literal() {
                    continue;
                }
                let triple = Triple::new(typed.subject.clone(), rdf_type.clone(), parent.object.clone());
                push_new(store, derived, triple);
            }
        }
    }

    // (X P Y) ∧ (P subPropertyOf Q) → (X Q Y)
    fn apply_property_inheritance(&self, store: &RdfStore, derived: &mut IndexSet<Triple>) {
        for declaration in store.statements_matching(None, Some(&self.vocab.sub_property_of), None) {
            let (Some(sub), Ok(sup)) = (
                as_predicate(&declaration.subject),
                RdfPredicate::try_from(declaration.object.clone()),
            ) else {
                continue;
            };
            for statement in store.statements_matching(None, Some(&sub), None) {
                let triple = Triple::new(statement.subject.clone(), sup.clone(), statement.object.clone());
                push_new(store, derived, triple);
            }
        }
    }

    // (P domain C) ∧ (X P Y) → (X type C)
    fn apply_domain(&self, store: &RdfStore, derived: &mut IndexSet<Triple>) {
        for declaration in store.statements_matching(None, Some(&self.vocab.domain), None) {
            let Some(property) = as_predicate(&declaration.subject) else {
                continue;
            };
            if declaration.object.is_literal() {
                continue;
            }
            for statement in store.statements_matching(None, Some(&property), None) {
                let triple = Triple::new(
                    statement.subject.clone(),
                    self.vocab.rdf_type.clone(),
                    declaration.object.clone(),
                );
                push_new(store, derived, triple);
            }
        }
    }

    // (P range C) ∧ (X P Y) → (Y type C), skipped when Y is a literal
    fn apply_range(&self, store: &RdfStore, derived: &mut IndexSet<Triple>) {
        for declaration in store.statements_matching(None, Some(&self.vocab.range), None) {
            let Some(property) = as_predicate(&declaration.subject) else {
                continue;
            };
            if declaration.object.is_literal() {
                continue;
            }
            for statement in store.statements_matching(None, Some(&property), None) {
                let Ok(value) = RdfSubject::try_from(statement.object.clone()) else {
                    continue;
                };
                let triple = Triple::new(value, self.vocab.rdf_type.clone(), declaration.object.clone());
                push_new(store, derived, triple);
            }
        }
    }
}

impl Default for RdfsReasoner {
    fn default() -> Self {
        Self::new()
    }
}

fn as_predicate(subject: &RdfSubject) -> Option<RdfPredicate> {
    RdfPredicate::try_from(RdfTerm::from(subject.clone())).ok()
}

fn push_new(store: &RdfStore, derived: &mut IndexSet<Triple>, triple: Triple) {
    if !store.contains(&triple) {
        derived.insert(triple);
    }
}
