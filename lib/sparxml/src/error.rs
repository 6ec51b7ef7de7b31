use crate::factory::TermFactoryError;
use crate::triple::TripleComponent;
use std::error::Error;
use std::sync::Arc;
use std::{fmt, io};

/// Error returned during SPARQL XML results parsing.
#[derive(Debug, thiserror::Error)]
pub enum XmlResultsParseError {
    /// I/O error during parsing (file not found...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the file syntax.
    #[error(transparent)]
    Syntax(#[from] XmlResultsSyntaxError),
}

impl From<XmlResultsParseError> for io::Error {
    #[inline]
    fn from(error: XmlResultsParseError) -> Self {
        match error {
            XmlResultsParseError::Io(error) => error,
            XmlResultsParseError::Syntax(error) => error.into(),
        }
    }
}

impl XmlResultsParseError {
    /// Wraps an error of the XML tokenizer, keeping I/O failures apart from malformed XML.
    pub(crate) fn xml(error: quick_xml::Error, line: u64) -> Self {
        match error {
            quick_xml::Error::Io(error) => {
                Self::Io(Arc::try_unwrap(error).unwrap_or_else(|e| io::Error::new(e.kind(), e)))
            }
            _ => XmlResultsSyntaxError::new(XmlResultsSyntaxErrorKind::Xml(error), line).into(),
        }
    }
}

/// An error in the syntax of the parsed file.
///
/// The [`kind`](Self::kind) tells what went wrong and [`line`](Self::line) where.
#[derive(Debug)]
pub struct XmlResultsSyntaxError {
    kind: XmlResultsSyntaxErrorKind,
    line: Option<u64>,
}

/// The different kinds of [`XmlResultsSyntaxError`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum XmlResultsSyntaxErrorKind {
    /// The XML itself is malformed.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("No name attribute found for the <variable> tag")]
    MissingVariableName,
    #[error("Found a value inside of a <binding> tag without a name attribute")]
    MissingBindingName,
    #[error("Expecting <uri>, <bnode>, <literal> or <triple>, found <{0}>")]
    InvalidTermType(String),
    #[error("Unexpected <{0}> element inside of a term")]
    UnexpectedElementInTerm(String),
    #[error("The <binding> of variable '{0}' contains more than one value")]
    DuplicateBindingValue(String),
    #[error("Expecting <subject>, <predicate> or <object> inside of <triple>, found <{0}>")]
    IllegalTripleComponent(String),
    #[error("A <triple> should contain a <subject>, a <predicate> and an <object>")]
    IncompleteTripleComponent,
    #[error("The <{0}> of a <triple> is given twice")]
    DuplicateTripleComponent(TripleComponent),
    #[error("Invalid literal base direction '{0}', expecting 'ltr' or 'rtl'")]
    InvalidDirection(String),
    #[error(transparent)]
    InvalidTerm(#[from] TermFactoryError),
    #[error("Detected unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("No <results> element has been found in the document")]
    NoResultsFound,
    #[error("No valid ASK response was found")]
    NoBooleanFound,
}

impl XmlResultsSyntaxError {
    #[inline]
    pub(crate) fn new(kind: XmlResultsSyntaxErrorKind, line: u64) -> Self {
        Self {
            kind,
            line: Some(line),
        }
    }

    /// Builds an error not attached to a position in the document.
    #[inline]
    pub(crate) fn unlocated(kind: XmlResultsSyntaxErrorKind) -> Self {
        Self { kind, line: None }
    }

    /// What went wrong.
    #[inline]
    pub fn kind(&self) -> &XmlResultsSyntaxErrorKind {
        &self.kind
    }

    /// The line of the error inside of the file, starting from 1.
    #[inline]
    pub fn line(&self) -> Option<u64> {
        self.line
    }
}

impl fmt::Display for XmlResultsSyntaxError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "{} on line {line}", self.kind)
        } else {
            self.kind.fmt(f)
        }
    }
}

impl Error for XmlResultsSyntaxError {
    #[inline]
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            XmlResultsSyntaxErrorKind::Xml(error) => Some(error),
            XmlResultsSyntaxErrorKind::InvalidTerm(error) => Some(error),
            _ => None,
        }
    }
}

impl From<XmlResultsSyntaxError> for io::Error {
    #[inline]
    fn from(error: XmlResultsSyntaxError) -> Self {
        match error.kind {
            XmlResultsSyntaxErrorKind::Xml(quick_xml::Error::Io(error)) => {
                Arc::try_unwrap(error).unwrap_or_else(|e| Self::new(e.kind(), e))
            }
            _ => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}
