use std::fmt;

/// The elements of the SPARQL XML results grammar.
///
/// Elements are identified by their local name, the namespace prefix is ignored.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) enum Tag {
    Sparql,
    Head,
    Variable,
    Link,
    Results,
    Result,
    Binding,
    Uri,
    BNode,
    Literal,
    Triple,
    Subject,
    Predicate,
    Object,
    Boolean,
    Other(String),
}

impl Tag {
    pub(crate) fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"sparql" => Self::Sparql,
            b"head" => Self::Head,
            b"variable" => Self::Variable,
            b"link" => Self::Link,
            b"results" => Self::Results,
            b"result" => Self::Result,
            b"binding" => Self::Binding,
            b"uri" => Self::Uri,
            b"bnode" => Self::BNode,
            b"literal" => Self::Literal,
            b"triple" => Self::Triple,
            b"subject" => Self::Subject,
            b"predicate" => Self::Predicate,
            b"object" => Self::Object,
            b"boolean" => Self::Boolean,
            _ => Self::Other(String::from_utf8_lossy(name).into_owned()),
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Sparql => "sparql",
            Self::Head => "head",
            Self::Variable => "variable",
            Self::Link => "link",
            Self::Results => "results",
            Self::Result => "result",
            Self::Binding => "binding",
            Self::Uri => "uri",
            Self::BNode => "bnode",
            Self::Literal => "literal",
            Self::Triple => "triple",
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) const HEAD_PATH: [Tag; 2] = [Tag::Sparql, Tag::Head];
pub(crate) const RESULTS_PATH: [Tag; 2] = [Tag::Sparql, Tag::Results];
pub(crate) const RESULT_PATH: [Tag; 3] = [Tag::Sparql, Tag::Results, Tag::Result];
pub(crate) const BINDING_PATH: [Tag; 4] = [Tag::Sparql, Tag::Results, Tag::Result, Tag::Binding];
pub(crate) const BOOLEAN_PATH: [Tag; 2] = [Tag::Sparql, Tag::Boolean];

/// The path of the currently open elements, from the root.
#[derive(Default)]
pub(crate) struct TagStack {
    tags: Vec<Tag>,
}

impl TagStack {
    #[inline]
    pub(crate) fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Tag> {
        self.tags.pop()
    }

    /// Is the path exactly `expected`?
    #[inline]
    pub(crate) fn path_equals(&self, expected: &[Tag]) -> bool {
        self.tags == expected
    }

    /// Does the path start with `prefix`? The path might be longer.
    #[inline]
    pub(crate) fn path_begins_with(&self, prefix: &[Tag]) -> bool {
        self.tags.starts_with(prefix)
    }

    #[inline]
    pub(crate) fn innermost(&self) -> Option<&Tag> {
        self.tags.last()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.tags.len()
    }
}
