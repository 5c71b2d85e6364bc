//! JSON-LD format implementation (flat, expanded)

use super::{SerializeError, SerializeResult};
use crate::rdf::{Literal, RdfObject, RdfSubject, Triple};
use indexmap::IndexMap;
use oxrdf::vocab::{rdf, xsd};
use serde_json::{json, Map, Value};

/// JSON-LD serializer
pub struct JsonLdSerializerWrapper;

impl JsonLdSerializerWrapper {
    /// Serialize Triples to JSON-LD string
    ///
    /// Produces one node object per subject, in first-seen order. `rdf:type`
    /// statements with IRI objects become `@type` entries.
    pub fn serialize(triples: &[Triple]) -> SerializeResult<String> {
        serde_json::to_string_pretty(&Self::to_value(triples))
            .map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    /// Build the JSON-LD document without rendering it
    pub fn to_value(triples: &[Triple]) -> Value {
        let mut nodes: IndexMap<String, IndexMap<String, Vec<Value>>> = IndexMap::new();

        for triple in triples {
            let properties = nodes.entry(node_id(&triple.subject)).or_default();

            if triple.predicate.as_str() == rdf::TYPE.as_str() {
                if let Some(class) = triple.object.as_named_node() {
                    properties
                        .entry("@type".to_string())
                        .or_default()
                        .push(Value::String(class.as_str().to_string()));
                    continue;
                }
            }

            properties
                .entry(triple.predicate.as_str().to_string())
                .or_default()
                .push(object_value(&triple.object));
        }

        let output: Vec<Value> = nodes
            .into_iter()
            .map(|(id, properties)| {
                let mut node = Map::new();
                node.insert("@id".to_string(), Value::String(id));
                for (key, values) in properties {
                    node.insert(key, Value::Array(values));
                }
                Value::Object(node)
            })
            .collect();

        Value::Array(output)
    }
}

fn node_id(subject: &RdfSubject) -> String {
    match subject {
        RdfSubject::NamedNode(n) => n.as_str().to_string(),
        RdfSubject::BlankNode(b) => format!("_:{}", b.as_str()),
    }
}

fn object_value(object: &RdfObject) -> Value {
    match object {
        RdfObject::NamedNode(n) => json!({ "@id": n.as_str() }),
        RdfObject::BlankNode(b) => json!({ "@id": format!("_:{}", b.as_str()) }),
        RdfObject::Literal(l) => literal_value(l),
    }
}

fn literal_value(literal: &Literal) -> Value {
    if let Some(lang) = literal.language() {
        json!({ "@value": literal.value(), "@language": lang })
    } else if literal.datatype_str() == xsd::STRING.as_str() {
        json!({ "@value": literal.value() })
    } else {
        json!({ "@value": literal.value(), "@type": literal.datatype_str() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{BlankNode, NamedNode, RdfPredicate};

    #[test]
    fn test_jsonld_serialization() {
        let subject = NamedNode::new("http://example.org/alice").unwrap();
        let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
        let object = Literal::new_simple_literal("Alice");

        let triple = Triple::new(subject.into(), predicate, object.into());

        let json = JsonLdSerializerWrapper::serialize(&[triple]).unwrap();
        assert!(json.contains("@id"));
        assert!(json.contains("http://example.org/alice"));
        assert!(json.contains("Alice"));
    }

    #[test]
    fn test_jsonld_groups_by_subject() {
        let alice = NamedNode::new("http://example.org/alice").unwrap();
        let knows = RdfPredicate::new("http://xmlns.com/foaf/0.1/knows").unwrap();
        let age = RdfPredicate::new("http://xmlns.com/foaf/0.1/age").unwrap();
        let friend = BlankNode::from_str("f1").unwrap();

        let triples = vec![
            Triple::new(alice.clone().into(), knows, friend.into()),
            Triple::new(alice.clone().into(), age, Literal::new_integer_literal(30).into()),
            Triple::new(
                alice.into(),
                RdfPredicate::from(rdf::TYPE),
                NamedNode::new("http://xmlns.com/foaf/0.1/Person").unwrap().into(),
            ),
        ];

        let value = JsonLdSerializerWrapper::to_value(&triples);
        let nodes = value.as_array().unwrap();
        assert_eq!(nodes.len(), 1);

        let node = &nodes[0];
        assert_eq!(node["@id"], "http://example.org/alice");
        assert_eq!(node["@type"][0], "http://xmlns.com/foaf/0.1/Person");
        assert_eq!(node["http://xmlns.com/foaf/0.1/knows"][0]["@id"], "_:f1");
        assert_eq!(
            node["http://xmlns.com/foaf/0.1/age"][0]["@type"],
            "http://www.w3.org/2001/XMLSchema#integer"
        );
    }
}
