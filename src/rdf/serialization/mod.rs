//! RDF serialization formats
//!
//! Supports:
//! - N-Triples (NT)
//! - Turtle (TTL)
//! - JSON-LD, flat expanded form (write only)
//!
//! These are boundary adapters: they turn text into [`Triple`]s for an
//! [`RdfStore`] and back. Nested JSON-LD framing is left to the caller.

mod jsonld;
mod turtle;

pub use jsonld::JsonLdSerializerWrapper;
pub use turtle::{NTriplesParserWrapper, TurtleParserWrapper, TurtleSerializerWrapper};

use super::{RdfStore, Triple};
use thiserror::Error;
use tracing::debug;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// JSON-LD format (.jsonld)
    JsonLd,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "jsonld" => Some(RdfFormat::JsonLd),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(RdfFormat),
}

impl From<rio_turtle::TurtleError> for ParseError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF data from a string
    ///
    /// Every statement becomes exactly one triple. A malformed IRI fails the
    /// whole import.
    pub fn parse(input: &str, format: RdfFormat) -> ParseResult<Vec<Triple>> {
        let triples = match format {
            RdfFormat::NTriples => NTriplesParserWrapper::parse(input)?,
            RdfFormat::Turtle => TurtleParserWrapper::parse(input)?,
            RdfFormat::JsonLd => return Err(ParseError::UnsupportedFormat(format)),
        };
        debug!("Parsed {} triples from {:?}", triples.len(), format);
        Ok(triples)
    }

    /// Parse RDF data straight into a new store
    pub fn parse_store(input: &str, format: RdfFormat) -> ParseResult<RdfStore> {
        Ok(RdfStore::from_triples(Self::parse(input, format)?))
    }

    /// Parse RDF data and add it to an existing store, returning how many triples were new
    pub fn parse_into(store: &mut RdfStore, input: &str, format: RdfFormat) -> ParseResult<usize> {
        Ok(store.extend(Self::parse(input, format)?))
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize triples to a string
    pub fn serialize(triples: &[Triple], format: RdfFormat) -> SerializeResult<String> {
        let output = match format {
            RdfFormat::Turtle => TurtleSerializerWrapper::serialize(triples)?,
            RdfFormat::NTriples => TurtleSerializerWrapper::serialize_ntriples(triples)?,
            RdfFormat::JsonLd => JsonLdSerializerWrapper::serialize(triples)?,
        };
        debug!("Serialized {} triples as {:?}", triples.len(), format);
        Ok(output)
    }

    /// Serialize RDF store to a string
    pub fn serialize_store(store: &RdfStore, format: RdfFormat) -> SerializeResult<String> {
        let triples: Vec<Triple> = store.iter().cloned().collect();
        Self::serialize(&triples, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"<http://example.org/a> <http://example.org/b> "c" .
<http://example.org/a> <http://example.org/d> <http://example.org/e> .
"#;

    #[test]
    fn test_parse_ntriples() {
        let triples = RdfParser::parse(SIMPLE, RdfFormat::NTriples).unwrap();
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn test_parse_into_collapses_duplicates() {
        let mut store = RdfStore::new();
        assert_eq!(RdfParser::parse_into(&mut store, SIMPLE, RdfFormat::NTriples).unwrap(), 2);
        assert_eq!(RdfParser::parse_into(&mut store, SIMPLE, RdfFormat::Turtle).unwrap(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_malformed_input_fails_import() {
        let result = RdfParser::parse("<not closed", RdfFormat::NTriples);
        assert!(matches!(result, Err(ParseError::Parse(_))));
    }

    #[test]
    fn test_jsonld_parsing_unsupported() {
        let result = RdfParser::parse("{}", RdfFormat::JsonLd);
        assert!(matches!(result, Err(ParseError::UnsupportedFormat(RdfFormat::JsonLd))));
    }

    #[test]
    fn test_serialize_store() {
        let store = RdfParser::parse_store(SIMPLE, RdfFormat::NTriples).unwrap();
        let output = RdfSerializer::serialize_store(&store, RdfFormat::NTriples).unwrap();
        let reparsed = RdfParser::parse(&output, RdfFormat::NTriples).unwrap();
        assert_eq!(reparsed.len(), 2);
        assert!(reparsed.iter().all(|t| store.contains(t)));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RdfFormat::from_extension("TTL"), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_extension("nt"), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_extension("xml"), None);
    }
}
