//! The terms and bindings produced by the parser.
//!
//! IRIs, blank nodes, literals and variables are the [`oxrdf`] ones.
//! Triple terms have their own type: the XML results grammar allows them in any position of a triple, subject included.

use oxrdf::{BaseDirection, BlankNode, Literal, NamedNode};
use std::fmt;

/// What a `<literal>` element is annotated with.
///
/// A language tag (with its optional base direction) and a datatype are mutually exclusive.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LiteralAnnotation {
    Language {
        language: String,
        direction: Option<BaseDirection>,
    },
    Datatype(NamedNode),
}

/// A quoted triple, i.e. a triple used as a term ([RDF 1.2 triple term](https://www.w3.org/TR/rdf12-concepts/#dfn-triple-term)).
///
/// Any term is allowed in any position.
/// Use [`CheckedTermFactory`](crate::CheckedTermFactory) to only get triples with an IRI predicate and no literal subject.
///
/// ```
/// use oxrdf::{Literal, NamedNode};
/// use sparxml::QuotedTriple;
///
/// let triple = QuotedTriple::new(
///     NamedNode::new_unchecked("http://example.com/s"),
///     NamedNode::new_unchecked("http://example.com/p"),
///     Literal::new_simple_literal("o"),
/// );
/// assert_eq!(
///     "<<( <http://example.com/s> <http://example.com/p> \"o\" )>>",
///     triple.to_string()
/// );
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct QuotedTriple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl QuotedTriple {
    #[inline]
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for QuotedTriple {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<<( {} {} {} )>>", self.subject, self.predicate, self.object)
    }
}

/// An owned RDF term, i.e. the value bound to a variable.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Triple(Box<QuotedTriple>),
}

impl Term {
    #[inline]
    pub fn is_named_node(&self) -> bool {
        matches!(self, Self::NamedNode(_))
    }

    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    #[inline]
    pub fn is_triple(&self) -> bool {
        matches!(self, Self::Triple(_))
    }
}

impl fmt::Display for Term {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode(node) => node.fmt(f),
            Self::BlankNode(node) => node.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
            Self::Triple(triple) => triple.fmt(f),
        }
    }
}

impl From<NamedNode> for Term {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<Literal> for Term {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<QuotedTriple> for Term {
    #[inline]
    fn from(triple: QuotedTriple) -> Self {
        Self::Triple(Box::new(triple))
    }
}

impl From<Box<QuotedTriple>> for Term {
    #[inline]
    fn from(triple: Box<QuotedTriple>) -> Self {
        Self::Triple(triple)
    }
}

/// Converts to an [`oxrdf::Term`], failing if a triple term has a subject or a predicate RDF 1.2 does not allow.
impl TryFrom<Term> for oxrdf::Term {
    type Error = TripleTermConversionError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        Ok(match term {
            Term::NamedNode(node) => node.into(),
            Term::BlankNode(node) => node.into(),
            Term::Literal(literal) => literal.into(),
            Term::Triple(triple) => oxrdf::Triple::try_from(*triple)?.into(),
        })
    }
}

impl TryFrom<QuotedTriple> for oxrdf::Triple {
    type Error = TripleTermConversionError;

    fn try_from(triple: QuotedTriple) -> Result<Self, Self::Error> {
        let Term::NamedNode(predicate) = triple.predicate else {
            return Err(TripleTermConversionError::Predicate(triple.predicate));
        };
        let object = oxrdf::Term::try_from(triple.object)?;
        match triple.subject {
            Term::NamedNode(subject) => Ok(Self::new(subject, predicate, object)),
            Term::BlankNode(subject) => Ok(Self::new(subject, predicate, object)),
            subject => Err(TripleTermConversionError::Subject(subject)),
        }
    }
}

/// A [`QuotedTriple`] that is not a valid RDF 1.2 triple.
#[derive(Debug, thiserror::Error)]
pub enum TripleTermConversionError {
    #[error("{0} is not allowed as the subject of an RDF triple")]
    Subject(Term),
    #[error("{0} is not allowed as the predicate of an RDF triple")]
    Predicate(Term),
}

/// One row of the results: the terms bound in a `<result>` element, keyed by variable name.
///
/// Keys are unique and kept in document order.
/// Depending on the parser configuration, keys are either the bare variable name or the name prefixed by `?`.
///
/// ```
/// use oxrdf::Literal;
/// use sparxml::Binding;
///
/// let mut binding = Binding::default();
/// binding.insert("foo", Literal::from("a"));
/// binding.insert("bar", Literal::from("b"));
/// binding.insert("foo", Literal::from("c"));
/// assert_eq!(binding.get("foo"), Some(&Literal::from("c").into()));
/// assert_eq!(binding.keys().collect::<Vec<_>>(), ["foo", "bar"]);
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct Binding {
    entries: Vec<(String, Term)>,
}

impl Binding {
    /// Binds `key` to `term`.
    ///
    /// If `key` is already bound, its value is replaced in place and the previous one is returned.
    pub fn insert(&mut self, key: impl Into<String>, term: impl Into<Term>) -> Option<Term> {
        let key = key.into();
        let term = term.into();
        if let Some((_, value)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(std::mem::replace(value, term))
        } else {
            self.entries.push((key, term));
            None
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Term> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The number of bound keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.into_iter()
    }
}

impl<'a> IntoIterator for &'a Binding {
    type Item = (&'a str, &'a Term);
    type IntoIter = BindingIter<'a>;

    #[inline]
    fn into_iter(self) -> BindingIter<'a> {
        BindingIter {
            inner: self.entries.iter(),
        }
    }
}

impl IntoIterator for Binding {
    type Item = (String, Term);
    type IntoIter = std::vec::IntoIter<(String, Term)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, T: Into<Term>> FromIterator<(K, T)> for Binding {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut binding = Self::default();
        for (key, term) in iter {
            binding.insert(key, term);
        }
        binding
    }
}

/// An iterator over the entries of a [`Binding`].
pub struct BindingIter<'a> {
    inner: std::slice::Iter<'a, (String, Term)>,
}

impl<'a> Iterator for BindingIter<'a> {
    type Item = (&'a str, &'a Term);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
