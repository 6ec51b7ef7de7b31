//! Construction of the terms read from the document.

use crate::model::{LiteralAnnotation, QuotedTriple, Term};
use oxilangtag::LanguageTag;
use oxrdf::{
    BlankNode, BlankNodeIdParseError, IriParseError, LanguageTagParseError, Literal, NamedNode,
    Variable, VariableNameParseError,
};

/// Builds the [`Term`]s and [`Variable`]s found while parsing.
///
/// The parser calls it once per `<uri>`, `<bnode>`, `<literal>` and `<triple>` element and once per declared variable.
/// An error returned by the factory aborts the parsing.
///
/// Implementations must be shareable between threads: a single parser might be used for several documents at the same time.
pub trait TermFactory: Send + Sync {
    fn named_node(&self, iri: String) -> Result<Term, TermFactoryError>;

    fn blank_node(&self, label: String) -> Result<Term, TermFactoryError>;

    fn literal(
        &self,
        value: String,
        annotation: Option<LiteralAnnotation>,
    ) -> Result<Term, TermFactoryError>;

    fn triple(&self, subject: Term, predicate: Term, object: Term)
    -> Result<Term, TermFactoryError>;

    fn variable(&self, name: String) -> Result<Variable, TermFactoryError> {
        Ok(Variable::new_unchecked(name))
    }
}

/// The default [`TermFactory`]: builds terms from the document content as is, without validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTermFactory;

impl TermFactory for DefaultTermFactory {
    #[inline]
    fn named_node(&self, iri: String) -> Result<Term, TermFactoryError> {
        Ok(NamedNode::new_unchecked(iri).into())
    }

    #[inline]
    fn blank_node(&self, label: String) -> Result<Term, TermFactoryError> {
        Ok(BlankNode::new_unchecked(label).into())
    }

    #[inline]
    fn literal(
        &self,
        value: String,
        annotation: Option<LiteralAnnotation>,
    ) -> Result<Term, TermFactoryError> {
        Ok(literal_unchecked(value, annotation).into())
    }

    #[inline]
    fn triple(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
    ) -> Result<Term, TermFactoryError> {
        Ok(QuotedTriple::new(subject, predicate, object).into())
    }
}

/// A [`TermFactory`] validating the terms against the RDF 1.2 abstract syntax.
///
/// It checks that IRIs are absolute [RFC 3987](https://www.ietf.org/rfc/rfc3987.html) IRIs,
/// that language tags are [BCP47](https://tools.ietf.org/html/bcp47) tags (and lowercases them),
/// that blank node labels and variable names follow the SPARQL grammar,
/// and that quoted triples have an IRI as predicate and no literal as subject.
///
/// ```
/// use sparxml::{CheckedTermFactory, TermFactory};
///
/// assert!(CheckedTermFactory.named_node("http://example.com/".into()).is_ok());
/// assert!(CheckedTermFactory.named_node("not an iri".into()).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckedTermFactory;

impl TermFactory for CheckedTermFactory {
    fn named_node(&self, iri: String) -> Result<Term, TermFactoryError> {
        match NamedNode::new(iri.as_str()) {
            Ok(node) => Ok(node.into()),
            Err(error) => Err(TermFactoryError::InvalidIri { iri, error }),
        }
    }

    fn blank_node(&self, label: String) -> Result<Term, TermFactoryError> {
        match BlankNode::new(label.as_str()) {
            Ok(node) => Ok(node.into()),
            Err(error) => Err(TermFactoryError::InvalidBlankNode { label, error }),
        }
    }

    fn literal(
        &self,
        value: String,
        annotation: Option<LiteralAnnotation>,
    ) -> Result<Term, TermFactoryError> {
        let annotation = match annotation {
            Some(LiteralAnnotation::Language {
                mut language,
                direction,
            }) => {
                language.make_ascii_lowercase();
                let checked = LanguageTag::parse(language.as_str()).map(|_| ());
                if let Err(error) = checked {
                    return Err(TermFactoryError::InvalidLanguageTag {
                        tag: language,
                        error,
                    });
                }
                Some(LiteralAnnotation::Language {
                    language,
                    direction,
                })
            }
            Some(LiteralAnnotation::Datatype(datatype)) => {
                if let Err(error) = NamedNode::new(datatype.as_str()) {
                    return Err(TermFactoryError::InvalidIri {
                        iri: datatype.into_string(),
                        error,
                    });
                }
                Some(LiteralAnnotation::Datatype(datatype))
            }
            None => None,
        };
        Ok(literal_unchecked(value, annotation).into())
    }

    fn triple(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
    ) -> Result<Term, TermFactoryError> {
        if subject.is_literal() {
            return Err(TermFactoryError::InvalidTriple(format!(
                "the subject {subject} is a literal"
            )));
        }
        if !predicate.is_named_node() {
            return Err(TermFactoryError::InvalidTriple(format!(
                "the predicate {predicate} is not an IRI"
            )));
        }
        Ok(QuotedTriple::new(subject, predicate, object).into())
    }

    fn variable(&self, name: String) -> Result<Variable, TermFactoryError> {
        match Variable::new(name.as_str()) {
            Ok(variable) => Ok(variable),
            Err(error) => Err(TermFactoryError::InvalidVariable { name, error }),
        }
    }
}

fn literal_unchecked(value: String, annotation: Option<LiteralAnnotation>) -> Literal {
    match annotation {
        None => Literal::new_simple_literal(value),
        Some(LiteralAnnotation::Datatype(datatype)) => Literal::new_typed_literal(value, datatype),
        Some(LiteralAnnotation::Language {
            language,
            direction: None,
        }) => Literal::new_language_tagged_literal_unchecked(value, language),
        Some(LiteralAnnotation::Language {
            language,
            direction: Some(direction),
        }) => {
            Literal::new_directional_language_tagged_literal_unchecked(value, language, direction)
        }
    }
}

/// An error raised by a [`TermFactory`] when it refuses to build a term.
#[derive(Debug, thiserror::Error)]
pub enum TermFactoryError {
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    #[error("Invalid language tag '{tag}': {error}")]
    InvalidLanguageTag {
        tag: String,
        #[source]
        error: LanguageTagParseError,
    },
    #[error("Invalid blank node label '{label}': {error}")]
    InvalidBlankNode {
        label: String,
        #[source]
        error: BlankNodeIdParseError,
    },
    #[error("Invalid variable name '{name}': {error}")]
    InvalidVariable {
        name: String,
        #[source]
        error: VariableNameParseError,
    },
    #[error("Invalid quoted triple: {0}")]
    InvalidTriple(String),
}
