//! Turtle and N-Triples format implementation

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::{BlankNode, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use oxrdf::vocab::xsd;
use rio_api::formatter::TriplesFormatter;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleError, TurtleFormatter, TurtleParser};
use std::io::{BufReader, Cursor};

/// Turtle parser
pub struct TurtleParserWrapper;

impl TurtleParserWrapper {
    /// Parse Turtle string to Triples
    pub fn parse(input: &str) -> ParseResult<Vec<Triple>> {
        let mut reader = BufReader::new(Cursor::new(input));
        read_all(TurtleParser::new(&mut reader, None))
    }
}

/// N-Triples parser
pub struct NTriplesParserWrapper;

impl NTriplesParserWrapper {
    /// Parse N-Triples string to Triples
    pub fn parse(input: &str) -> ParseResult<Vec<Triple>> {
        let mut reader = BufReader::new(Cursor::new(input));
        read_all(NTriplesParser::new(&mut reader))
    }
}

fn read_all<P>(mut parser: P) -> ParseResult<Vec<Triple>>
where
    P: TriplesParser<Error = TurtleError>,
{
    let mut triples = Vec::new();
    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        let subject = convert_subject(t.subject)?;
        let predicate = convert_predicate(t.predicate)?;
        let object = convert_object(t.object)?;

        triples.push(Triple::new(subject, predicate, object));
        Ok(())
    })?;
    Ok(triples)
}

/// Turtle and N-Triples serializer
pub struct TurtleSerializerWrapper;

impl TurtleSerializerWrapper {
    /// Serialize Triples to Turtle string
    pub fn serialize(triples: &[Triple]) -> SerializeResult<String> {
        let mut output = Vec::new();
        let mut formatter = TurtleFormatter::new(&mut output);
        format_all(&mut formatter, triples)?;
        formatter.finish()?;

        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    /// Serialize Triples to N-Triples string
    pub fn serialize_ntriples(triples: &[Triple]) -> SerializeResult<String> {
        let mut output = Vec::new();
        let mut formatter = NTriplesFormatter::new(&mut output);
        format_all(&mut formatter, triples)?;
        formatter.finish()?;

        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

fn format_all<F: TriplesFormatter>(formatter: &mut F, triples: &[Triple]) -> SerializeResult<()> {
    for triple in triples {
        formatter
            .format(&to_rio(triple))
            .map_err(|e| SerializeError::Serialize(e.to_string()))?;
    }
    Ok(())
}

fn to_rio(triple: &Triple) -> model::Triple<'_> {
    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => model::Subject::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => model::Subject::BlankNode(model::BlankNode { id: b.as_str() }),
    };

    let object = match &triple.object {
        RdfObject::NamedNode(n) => model::Term::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => model::Term::BlankNode(model::BlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => model::Term::Literal(to_rio_literal(l)),
    };

    model::Triple {
        subject,
        predicate: model::NamedNode {
            iri: triple.predicate.as_str(),
        },
        object,
    }
}

fn to_rio_literal(literal: &Literal) -> model::Literal<'_> {
    if let Some(language) = literal.language() {
        model::Literal::LanguageTaggedString {
            value: literal.value(),
            language,
        }
    } else if literal.datatype_str() == xsd::STRING.as_str() {
        model::Literal::Simple {
            value: literal.value(),
        }
    } else {
        model::Literal::Typed {
            value: literal.value(),
            datatype: model::NamedNode {
                iri: literal.datatype_str(),
            },
        }
    }
}

fn convert_subject(s: model::Subject) -> Result<RdfSubject, ParseError> {
    match s {
        model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(
            NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(
            BlankNode::from_str(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode) -> Result<RdfPredicate, ParseError> {
    RdfPredicate::new(p.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_object(o: model::Term) -> Result<RdfObject, ParseError> {
    match o {
        model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(
            NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(
            BlankNode::from_str(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        model::Term::Literal(l) => match l {
            model::Literal::Simple { value } => Ok(RdfObject::Literal(Literal::new_simple_literal(value))),
            model::Literal::LanguageTaggedString { value, language } => Ok(RdfObject::Literal(
                Literal::new_language_tagged_literal(value, language)
                    .map_err(|e| ParseError::Parse(e.to_string()))?,
            )),
            model::Literal::Typed { value, datatype } => {
                let dt = NamedNode::new(datatype.iri).map_err(|e| ParseError::Parse(e.to_string()))?;
                Ok(RdfObject::Literal(Literal::new_typed_literal(value, dt)))
            }
        },
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turtle_roundtrip() {
        let input = r#"<http://example.org/a> <http://example.org/b> "c" ."#;
        let triples = TurtleParserWrapper::parse(input).unwrap();
        assert_eq!(triples.len(), 1);
        let output = TurtleSerializerWrapper::serialize(&triples).unwrap();
        assert!(output.contains("http://example.org/a"));
    }

    #[test]
    fn test_turtle_prefixes_and_a_keyword() {
        let input = r#"
            @prefix fs: <https://fakeschema.org/> .
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            fs:Cat rdfs:subClassOf fs:Mammal .
            fs:tom a fs:Cat ; fs:age 7 ; fs:name "Tom"@en .
        "#;
        let triples = TurtleParserWrapper::parse(input).unwrap();
        assert_eq!(triples.len(), 4);

        let age = triples
            .iter()
            .find_map(|t| t.object.as_literal().filter(|l| l.numeric_value().is_some()))
            .unwrap();
        assert_eq!(age.value(), "7");
        assert!(triples
            .iter()
            .any(|t| t.object.as_literal().and_then(|l| l.language()) == Some("en")));
    }

    #[test]
    fn test_ntriples_output_keeps_literal_kinds() {
        let input = r#"<http://example.org/a> <http://example.org/age> "30"^^<http://www.w3.org/2001/XMLSchema#integer> .
<http://example.org/a> <http://example.org/name> "Anna"@no .
_:b0 <http://example.org/name> "plain" .
"#;
        let triples = NTriplesParserWrapper::parse(input).unwrap();
        let output = TurtleSerializerWrapper::serialize_ntriples(&triples).unwrap();
        assert!(output.contains("\"30\"^^<http://www.w3.org/2001/XMLSchema#integer>"));
        assert!(output.contains("\"Anna\"@no"));
        assert!(output.contains("\"plain\""));
        assert_eq!(NTriplesParserWrapper::parse(&output).unwrap(), triples);
    }
}
