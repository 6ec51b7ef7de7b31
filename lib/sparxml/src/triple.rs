use crate::context::Tag;
use crate::error::XmlResultsSyntaxErrorKind;
use crate::model::Term;
use std::fmt;

/// A position inside of a quoted triple.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TripleComponent {
    Subject,
    Predicate,
    Object,
}

impl TripleComponent {
    pub(crate) fn from_tag(tag: &Tag) -> Option<Self> {
        match tag {
            Tag::Subject => Some(Self::Subject),
            Tag::Predicate => Some(Self::Predicate),
            Tag::Object => Some(Self::Object),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TripleComponent {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<triple>` element being read.
#[derive(Default)]
struct QuotedTripleFrame {
    active: Option<TripleComponent>,
    subject: Option<Term>,
    predicate: Option<Term>,
    object: Option<Term>,
}

impl QuotedTripleFrame {
    fn slot(&mut self, component: TripleComponent) -> &mut Option<Term> {
        match component {
            TripleComponent::Subject => &mut self.subject,
            TripleComponent::Predicate => &mut self.predicate,
            TripleComponent::Object => &mut self.object,
        }
    }
}

/// One frame per currently open `<triple>` element, the innermost one on top.
#[derive(Default)]
pub(crate) struct TripleBuilderStack {
    frames: Vec<QuotedTripleFrame>,
}

impl TripleBuilderStack {
    #[inline]
    pub(crate) fn push_frame(&mut self) {
        self.frames.push(QuotedTripleFrame::default());
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    /// Sets the component the next terms are going to.
    pub(crate) fn activate(&mut self, component: TripleComponent) {
        if let Some(frame) = self.frames.last_mut() {
            frame.active = Some(component);
        }
    }

    pub(crate) fn deactivate(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.active = None;
        }
    }

    /// Stores a term in the active component of the innermost triple.
    pub(crate) fn fill(&mut self, term: Term) -> Result<(), XmlResultsSyntaxErrorKind> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(XmlResultsSyntaxErrorKind::IllegalTripleComponent(
                Tag::Binding.to_string(),
            ));
        };
        let Some(component) = frame.active else {
            return Err(XmlResultsSyntaxErrorKind::IllegalTripleComponent(
                Tag::Triple.to_string(),
            ));
        };
        let slot = frame.slot(component);
        if slot.is_some() {
            return Err(XmlResultsSyntaxErrorKind::DuplicateTripleComponent(
                component,
            ));
        }
        *slot = Some(term);
        Ok(())
    }

    /// Pops the innermost triple, failing if one of its components is missing.
    pub(crate) fn pop_frame(&mut self) -> Result<(Term, Term, Term), XmlResultsSyntaxErrorKind> {
        match self.frames.pop() {
            Some(QuotedTripleFrame {
                subject: Some(subject),
                predicate: Some(predicate),
                object: Some(object),
                ..
            }) => Ok((subject, predicate, object)),
            _ => Err(XmlResultsSyntaxErrorKind::IncompleteTripleComponent),
        }
    }
}
