use crate::context::{
    BINDING_PATH, BOOLEAN_PATH, HEAD_PATH, RESULT_PATH, RESULTS_PATH, Tag, TagStack,
};
use crate::error::{XmlResultsSyntaxError, XmlResultsSyntaxErrorKind};
use crate::factory::TermFactory;
use crate::model::{Binding, LiteralAnnotation, Term};
use crate::triple::{TripleBuilderStack, TripleComponent};
use crate::version::VersionPolicy;
use oxrdf::{BaseDirection, NamedNode, Variable};
use quick_xml::errors::IllFormedError;
use std::collections::VecDeque;
use std::mem::take;
use std::sync::Arc;

/// An event emitted while reading a SPARQL XML results document.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum XmlResultsEvent {
    /// The value of the `version` attribute of the root `<sparql>` element.
    ///
    /// Emitted at most once, before the version is validated.
    Version(String),
    /// The variables declared in `<head>`.
    ///
    /// Emitted exactly once: when `<head>` closes, or at the end of the document if there is no `<head>`.
    Variables(Vec<Variable>),
    /// A `<result>` element, emitted as soon as it closes.
    Binding(Binding),
}

/// The attributes of an opening tag, keyed by qualified name.
#[derive(Default)]
pub(crate) struct TagAttributes {
    attributes: Vec<(String, String)>,
}

impl TagAttributes {
    pub(crate) fn push(&mut self, name: String, value: String) {
        self.attributes.push((name, value));
    }

    /// Looks up an attribute by its qualified name, like `xml:lang`.
    fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }

    /// Looks up an attribute by its local name, ignoring any namespace prefix.
    fn get_local(&self, local_name: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(k, v)| {
            let local = k.rsplit_once(':').map_or(k.as_str(), |(_, local)| local);
            (local == local_name).then_some(v.as_str())
        })
    }
}

/// Validates the `version` attribute of the root element, if any.
fn check_root_version(
    attributes: &TagAttributes,
    versions: &VersionPolicy,
    line: u64,
) -> Result<(), XmlResultsSyntaxError> {
    if let Some(version) = attributes.get_local("version") {
        tracing::debug!(version, "Found SPARQL results version");
        versions
            .check(version)
            .map_err(|e| XmlResultsSyntaxError::new(e, line))?;
    }
    Ok(())
}

/// Where the `<binding>` element being read stands.
#[derive(Default)]
enum BindingValue {
    /// No name attribute.
    #[default]
    Nameless,
    /// The value bound to this name is still to be read.
    Expected(String),
    /// The value bound to this name has been read.
    Read(String),
}

/// Builds the bindings of a results document from its tag and text events.
///
/// Everything it holds is specific to one document.
pub(crate) struct SolutionsAssembler {
    factory: Arc<dyn TermFactory>,
    prefix_variable_names: bool,
    versions: VersionPolicy,
    stack: TagStack,
    triples: TripleBuilderStack,
    variables: Vec<Variable>,
    variables_emitted: bool,
    version: Option<String>,
    results_seen: bool,
    binding: Option<Binding>,
    binding_value: BindingValue,
    term_type: Option<Tag>,
    annotation: Option<LiteralAnnotation>,
    text: String,
}

impl SolutionsAssembler {
    pub(crate) fn new(
        factory: Arc<dyn TermFactory>,
        prefix_variable_names: bool,
        versions: VersionPolicy,
    ) -> Self {
        Self {
            factory,
            prefix_variable_names,
            versions,
            stack: TagStack::default(),
            triples: TripleBuilderStack::default(),
            variables: Vec::new(),
            variables_emitted: false,
            version: None,
            results_seen: false,
            binding: None,
            binding_value: BindingValue::Nameless,
            term_type: None,
            annotation: None,
            text: String::new(),
        }
    }

    /// The declared variables, once they have been emitted.
    pub(crate) fn variables(&self) -> Option<&[Variable]> {
        self.variables_emitted.then_some(self.variables.as_slice())
    }

    pub(crate) fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub(crate) fn open(
        &mut self,
        tag: Tag,
        attributes: &TagAttributes,
        line: u64,
        results: &mut VecDeque<XmlResultsEvent>,
    ) -> Result<(), XmlResultsSyntaxError> {
        let result = self.dispatch_open(&tag, attributes, line, results);
        self.stack.push(tag);
        result
    }

    fn dispatch_open(
        &mut self,
        tag: &Tag,
        attributes: &TagAttributes,
        line: u64,
        results: &mut VecDeque<XmlResultsEvent>,
    ) -> Result<(), XmlResultsSyntaxError> {
        if self.stack.is_empty() {
            if *tag == Tag::Sparql {
                if let Some(version) = attributes.get_local("version") {
                    if self.version.is_none() {
                        self.version = Some(version.to_owned());
                        results.push_back(XmlResultsEvent::Version(version.to_owned()));
                    }
                }
                check_root_version(attributes, &self.versions, line)?;
            }
        } else if self.stack.path_equals(&HEAD_PATH) {
            if *tag == Tag::Variable {
                let name = attributes.get_local("name").ok_or_else(|| {
                    XmlResultsSyntaxError::new(XmlResultsSyntaxErrorKind::MissingVariableName, line)
                })?;
                let variable = self
                    .factory
                    .variable(name.to_owned())
                    .map_err(|e| XmlResultsSyntaxError::new(e.into(), line))?;
                self.variables.push(variable);
            }
        } else if self.stack.path_equals(&[Tag::Sparql]) {
            if *tag == Tag::Results {
                self.results_seen = true;
            }
        } else if self.stack.path_equals(&RESULTS_PATH) {
            if *tag == Tag::Result {
                self.binding = Some(Binding::default());
            }
        } else if self.stack.path_equals(&RESULT_PATH) {
            if *tag == Tag::Binding {
                self.binding_value = match attributes.get_local("name") {
                    Some(name) if !name.is_empty() => BindingValue::Expected(name.to_owned()),
                    _ => BindingValue::Nameless,
                };
                self.term_type = None;
                self.annotation = None;
                self.text.clear();
                self.triples.clear();
            }
        } else if self.stack.path_begins_with(&BINDING_PATH) {
            if self.term_type.is_some() && self.stack.innermost() == self.term_type.as_ref() {
                return Err(XmlResultsSyntaxError::new(
                    XmlResultsSyntaxErrorKind::UnexpectedElementInTerm(tag.to_string()),
                    line,
                ));
            }
            if self.stack.innermost() == Some(&Tag::Triple) {
                let component = TripleComponent::from_tag(tag).ok_or_else(|| {
                    XmlResultsSyntaxError::new(
                        XmlResultsSyntaxErrorKind::IllegalTripleComponent(tag.to_string()),
                        line,
                    )
                })?;
                self.triples.activate(component);
            } else if *tag == Tag::Triple {
                self.triples.push_frame();
                self.term_type = None;
                self.text.clear();
            } else {
                self.annotation = if *tag == Tag::Literal {
                    read_literal_annotation(attributes)
                        .map_err(|e| XmlResultsSyntaxError::new(e, line))?
                } else {
                    None
                };
                self.term_type = Some(tag.clone());
                self.text.clear();
            }
        }
        Ok(())
    }

    pub(crate) fn text(&mut self, text: &str) {
        if self.term_type.is_some()
            && self.stack.path_begins_with(&BINDING_PATH)
            && self.stack.innermost() == self.term_type.as_ref()
        {
            self.text.push_str(text);
        }
    }

    pub(crate) fn close(
        &mut self,
        line: u64,
        results: &mut VecDeque<XmlResultsEvent>,
    ) -> Result<(), XmlResultsSyntaxError> {
        let result = self.dispatch_close(line, results);
        self.stack.pop();
        result
    }

    fn dispatch_close(
        &mut self,
        line: u64,
        results: &mut VecDeque<XmlResultsEvent>,
    ) -> Result<(), XmlResultsSyntaxError> {
        if self.stack.path_equals(&HEAD_PATH) {
            self.emit_variables(results);
        } else if self.stack.path_equals(&RESULT_PATH) {
            let binding = self.binding.take().unwrap_or_default();
            tracing::trace!(size = binding.len(), "Read SPARQL result");
            results.push_back(XmlResultsEvent::Binding(binding));
        } else if self.stack.path_begins_with(&BINDING_PATH)
            && self.stack.depth() > BINDING_PATH.len()
        {
            let Some(closing) = self.stack.innermost().cloned() else {
                return Ok(());
            };
            if closing == Tag::Triple {
                self.resolve_triple()
                    .map_err(|e| XmlResultsSyntaxError::new(e, line))?;
            } else if self.term_type.as_ref() == Some(&closing) {
                self.resolve_term(closing)
                    .map_err(|e| XmlResultsSyntaxError::new(e, line))?;
            } else if TripleComponent::from_tag(&closing).is_some() {
                self.triples.deactivate();
            }
        }
        Ok(())
    }

    /// Builds the term of the element that just closed.
    fn resolve_term(&mut self, term_type: Tag) -> Result<(), XmlResultsSyntaxErrorKind> {
        if matches!(self.binding_value, BindingValue::Nameless) {
            return Err(XmlResultsSyntaxErrorKind::MissingBindingName);
        }
        let text = take(&mut self.text);
        self.term_type = None;
        let term = match term_type {
            Tag::Uri => self.factory.named_node(text),
            Tag::BNode => self.factory.blank_node(text),
            Tag::Literal => self.factory.literal(text, self.annotation.take()),
            other => {
                return Err(XmlResultsSyntaxErrorKind::InvalidTermType(
                    other.to_string(),
                ));
            }
        }?;
        self.route(term)
    }

    fn resolve_triple(&mut self) -> Result<(), XmlResultsSyntaxErrorKind> {
        if matches!(self.binding_value, BindingValue::Nameless) {
            return Err(XmlResultsSyntaxErrorKind::MissingBindingName);
        }
        let (subject, predicate, object) = self.triples.pop_frame()?;
        let term = self.factory.triple(subject, predicate, object)?;
        self.route(term)
    }

    /// Sends a term to the innermost open triple or, if there is none, to the current binding.
    fn route(&mut self, term: Term) -> Result<(), XmlResultsSyntaxErrorKind> {
        if !self.triples.is_empty() {
            return self.triples.fill(term);
        }
        let name = match take(&mut self.binding_value) {
            BindingValue::Expected(name) => name,
            BindingValue::Read(name) => {
                return Err(XmlResultsSyntaxErrorKind::DuplicateBindingValue(name));
            }
            BindingValue::Nameless => return Err(XmlResultsSyntaxErrorKind::MissingBindingName),
        };
        let key = if self.prefix_variable_names {
            format!("?{name}")
        } else {
            name.clone()
        };
        self.binding
            .get_or_insert_with(Binding::default)
            .insert(key, term);
        self.binding_value = BindingValue::Read(name);
        Ok(())
    }

    fn emit_variables(&mut self, results: &mut VecDeque<XmlResultsEvent>) {
        if !self.variables_emitted {
            tracing::debug!(
                count = self.variables.len(),
                "Read SPARQL results variables"
            );
            self.variables_emitted = true;
            results.push_back(XmlResultsEvent::Variables(self.variables.clone()));
        }
    }

    /// Handles the end of the document.
    ///
    /// Elements left open mean the document was truncated.
    pub(crate) fn finish(
        &mut self,
        line: u64,
        results: &mut VecDeque<XmlResultsEvent>,
    ) -> Result<(), XmlResultsSyntaxError> {
        self.emit_variables(results);
        if let Some(innermost) = self.stack.innermost() {
            Err(XmlResultsSyntaxError::new(
                XmlResultsSyntaxErrorKind::Xml(quick_xml::Error::IllFormed(
                    IllFormedError::MissingEndTag(innermost.to_string()),
                )),
                line,
            ))
        } else if self.results_seen {
            Ok(())
        } else {
            Err(XmlResultsSyntaxError::new(
                XmlResultsSyntaxErrorKind::NoResultsFound,
                line,
            ))
        }
    }
}

fn read_literal_annotation(
    attributes: &TagAttributes,
) -> Result<Option<LiteralAnnotation>, XmlResultsSyntaxErrorKind> {
    if let Some(language) = attributes.get("xml:lang") {
        let direction = attributes
            .get_local("dir")
            .map(|dir| {
                parse_direction(dir)
                    .ok_or_else(|| XmlResultsSyntaxErrorKind::InvalidDirection(dir.to_owned()))
            })
            .transpose()?;
        Ok(Some(LiteralAnnotation::Language {
            language: language.to_owned(),
            direction,
        }))
    } else {
        Ok(attributes
            .get_local("datatype")
            .map(|datatype| LiteralAnnotation::Datatype(NamedNode::new_unchecked(datatype))))
    }
}

fn parse_direction(value: &str) -> Option<BaseDirection> {
    match value {
        "ltr" => Some(BaseDirection::Ltr),
        "rtl" => Some(BaseDirection::Rtl),
        _ => None,
    }
}

/// Resolves the value of an ASK results document.
pub(crate) struct BooleanAssembler {
    versions: VersionPolicy,
    stack: TagStack,
    text: Option<String>,
}

impl BooleanAssembler {
    pub(crate) fn new(versions: VersionPolicy) -> Self {
        Self {
            versions,
            stack: TagStack::default(),
            text: None,
        }
    }

    pub(crate) fn open(
        &mut self,
        tag: Tag,
        attributes: &TagAttributes,
        line: u64,
    ) -> Result<(), XmlResultsSyntaxError> {
        if self.stack.is_empty() && tag == Tag::Sparql {
            check_root_version(attributes, &self.versions, line)?;
        }
        self.stack.push(tag);
        Ok(())
    }

    pub(crate) fn text(&mut self, text: &str) {
        if self.stack.path_equals(&BOOLEAN_PATH) {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    /// Returns the boolean value when `<boolean>` closes.
    pub(crate) fn close(&mut self) -> Option<bool> {
        let value = if self.stack.path_equals(&BOOLEAN_PATH) {
            self.text.take().map(|text| text.trim() == "true")
        } else {
            None
        };
        self.stack.pop();
        if let Some(value) = value {
            tracing::debug!(value, "Read SPARQL boolean result");
        }
        value
    }

    pub(crate) fn finish(line: u64) -> XmlResultsSyntaxError {
        XmlResultsSyntaxError::new(XmlResultsSyntaxErrorKind::NoBooleanFound, line)
    }
}
