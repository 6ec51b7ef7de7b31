use crate::assembler::{BooleanAssembler, SolutionsAssembler, TagAttributes, XmlResultsEvent};
use crate::context::Tag;
use crate::error::{XmlResultsParseError, XmlResultsSyntaxError, XmlResultsSyntaxErrorKind};
use crate::factory::{DefaultTermFactory, TermFactory};
use crate::version::VersionPolicy;
use oxrdf::Variable;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Decoder, Reader};
use std::collections::VecDeque;
use std::io::{BufReader, Read};
use std::sync::Arc;
#[cfg(feature = "async-tokio")]
use tokio::io::{AsyncRead, BufReader as AsyncBufReader};

/// A [SPARQL Query Results XML Format](https://www.w3.org/TR/sparql12-results-xml/) streaming parser.
///
/// It supports [RDF 1.2 triple terms](https://www.w3.org/TR/rdf12-concepts/#section-triple-terms) written with the `<triple>` element
/// and [directional language-tagged strings](https://www.w3.org/TR/rdf12-concepts/#dfn-dir-lang-string).
///
/// It reads the file in streaming: each [`Binding`](crate::Binding) is returned as soon as its `<result>` element closes.
/// It does not keep data in memory except a stack of the open XML tags, the quoted triples being read and the current binding.
///
/// The parser itself only holds configuration and can be cloned and reused for any number of documents.
///
/// Count the number of results:
/// ```
/// use sparxml::{XmlResultsEvent, XmlResultsParser};
///
/// let file = r#"<?xml version="1.0"?>
/// <sparql xmlns="http://www.w3.org/2005/sparql-results#">
///   <head><variable name="s"/></head>
///   <results>
///     <result><binding name="s"><uri>http://example.com/a</uri></binding></result>
///     <result><binding name="s"><bnode>b</bnode></binding></result>
///   </results>
/// </sparql>"#;
///
/// let mut count = 0;
/// for event in XmlResultsParser::new().for_reader(file.as_bytes()) {
///     if let XmlResultsEvent::Binding(_) = event? {
///         count += 1;
///     }
/// }
/// assert_eq!(2, count);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone)]
#[must_use]
pub struct XmlResultsParser {
    factory: Arc<dyn TermFactory>,
    prefix_variable_names: bool,
    versions: VersionPolicy,
    expected_version: Option<String>,
}

impl Default for XmlResultsParser {
    fn default() -> Self {
        Self {
            factory: Arc::new(DefaultTermFactory),
            prefix_variable_names: false,
            versions: VersionPolicy::default(),
            expected_version: None,
        }
    }
}

impl XmlResultsParser {
    /// Builds a new [`XmlResultsParser`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the factory used to build the terms and variables.
    ///
    /// By default [`DefaultTermFactory`] is used.
    #[inline]
    pub fn with_term_factory(mut self, factory: impl TermFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Prefixes the keys of the returned bindings with `?`.
    ///
    /// ```
    /// use sparxml::{XmlResultsEvent, XmlResultsParser};
    ///
    /// let file = r#"<sparql><results><result><binding name="x"><uri>http://e/</uri></binding></result></results></sparql>"#;
    /// for event in XmlResultsParser::new().prefix_variable_names_with_question_mark().for_slice(file) {
    ///     if let XmlResultsEvent::Binding(binding) = event? {
    ///         assert_eq!(binding.keys().collect::<Vec<_>>(), ["?x"]);
    ///     }
    /// }
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn prefix_variable_names_with_question_mark(mut self) -> Self {
        self.prefix_variable_names = true;
        self
    }

    /// Accepts documents declaring any format version.
    #[inline]
    pub fn permit_unsupported_versions(mut self) -> Self {
        self.versions = self.versions.permit_unsupported();
        self
    }

    /// Replaces the set of the supported format versions.
    ///
    /// By default, versions `1.1`, `1.2` and `1.2-basic` are supported.
    #[inline]
    pub fn with_supported_versions(
        mut self,
        versions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.versions = self.versions.with_supported_versions(versions);
        self
    }

    /// Sets the version declared outside of the document, for example in the media type `version` parameter.
    ///
    /// It is validated against the supported versions before reading the document,
    /// independently of the version declared in the document itself.
    #[inline]
    pub fn with_expected_version(mut self, version: impl Into<String>) -> Self {
        self.expected_version = Some(version.into());
        self
    }

    /// Parses a results file from a [`Read`] implementation.
    ///
    /// Reads are buffered.
    pub fn for_reader<R: Read>(self, reader: R) -> ReaderXmlResultsParser<R> {
        ReaderXmlResultsParser {
            parser: self.into_internal(BufReader::new(reader)),
            reader_buffer: Vec::default(),
        }
    }

    /// Parses a results file from a [`AsyncRead`] implementation.
    ///
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use sparxml::{XmlResultsEvent, XmlResultsParser};
    ///
    /// let file = r#"<sparql><head><variable name="s"/></head><results><result><binding name="s"><bnode>b</bnode></binding></result></results></sparql>"#;
    ///
    /// let mut count = 0;
    /// let mut parser = XmlResultsParser::new().for_tokio_async_reader(file.as_bytes());
    /// while let Some(event) = parser.next().await {
    ///     if let XmlResultsEvent::Binding(_) = event? {
    ///         count += 1;
    ///     }
    /// }
    /// assert_eq!(1, count);
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "async-tokio")]
    pub fn for_tokio_async_reader<R: AsyncRead + Unpin>(
        self,
        reader: R,
    ) -> TokioAsyncReaderXmlResultsParser<R> {
        TokioAsyncReaderXmlResultsParser {
            parser: self.into_internal(AsyncBufReader::new(reader)),
            reader_buffer: Vec::default(),
        }
    }

    /// Parses a results file from a byte slice.
    pub fn for_slice(self, slice: &(impl AsRef<[u8]> + ?Sized)) -> SliceXmlResultsParser<'_> {
        SliceXmlResultsParser {
            parser: self.into_internal(slice.as_ref()),
        }
    }

    /// Parses an ASK results file from a [`Read`] implementation.
    ///
    /// ```
    /// use sparxml::XmlResultsParser;
    ///
    /// let file = r#"<sparql xmlns="http://www.w3.org/2005/sparql-results#"><head/><boolean>true</boolean></sparql>"#;
    /// assert!(XmlResultsParser::new().parse_boolean_read(file.as_bytes())?);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn parse_boolean_read(self, reader: impl Read) -> Result<bool, XmlResultsParseError> {
        let mut parser = self.into_internal_boolean(BufReader::new(reader))?;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            let event = parser
                .reader
                .read_event_into(&mut buffer)
                .map_err(|e| XmlResultsParseError::xml(e, parser.line))?;
            if let Some(value) = parser.parse_event(event)? {
                return Ok(value);
            }
        }
    }

    /// Parses an ASK results file from an [`AsyncRead`] implementation.
    #[cfg(feature = "async-tokio")]
    pub async fn parse_boolean_tokio_async_read(
        self,
        reader: impl AsyncRead + Unpin,
    ) -> Result<bool, XmlResultsParseError> {
        let mut parser = self.into_internal_boolean(AsyncBufReader::new(reader))?;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            let event = parser
                .reader
                .read_event_into_async(&mut buffer)
                .await
                .map_err(|e| XmlResultsParseError::xml(e, parser.line))?;
            if let Some(value) = parser.parse_event(event)? {
                return Ok(value);
            }
        }
    }

    /// Parses an ASK results file from a byte slice.
    pub fn parse_boolean_slice(
        self,
        slice: &(impl AsRef<[u8]> + ?Sized),
    ) -> Result<bool, XmlResultsSyntaxError> {
        let mut parser = self
            .into_internal_boolean(slice.as_ref())
            .map_err(into_syntax_error)?;
        loop {
            let event = parser
                .reader
                .read_event()
                .map_err(|e| into_syntax_error(XmlResultsParseError::xml(e, parser.line)))?;
            if let Some(value) = parser.parse_event(event).map_err(into_syntax_error)? {
                return Ok(value);
            }
        }
    }

    fn check_expected_version(&self) -> Result<(), XmlResultsSyntaxError> {
        if let Some(version) = &self.expected_version {
            self.versions
                .check(version)
                .map_err(XmlResultsSyntaxError::unlocated)?;
        }
        Ok(())
    }

    fn into_internal<T>(self, reader: T) -> InternalXmlResultsParser<T> {
        let error = self.check_expected_version().err().map(Into::into);
        InternalXmlResultsParser {
            reader: new_reader(reader),
            assembler: SolutionsAssembler::new(
                self.factory,
                self.prefix_variable_names,
                self.versions,
            ),
            results: VecDeque::new(),
            is_end: error.is_some(),
            error,
            line: 1,
        }
    }

    fn into_internal_boolean<T>(
        self,
        reader: T,
    ) -> Result<InternalXmlBooleanParser<T>, XmlResultsParseError> {
        self.check_expected_version()?;
        Ok(InternalXmlBooleanParser {
            reader: new_reader(reader),
            assembler: BooleanAssembler::new(self.versions),
            line: 1,
        })
    }
}

fn new_reader<T>(reader: T) -> Reader<T> {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().expand_empty_elements = true;
    reader
}

fn into_syntax_error(error: XmlResultsParseError) -> XmlResultsSyntaxError {
    match error {
        XmlResultsParseError::Syntax(error) => error,
        // I/O errors can't happen when reading a slice
        XmlResultsParseError::Io(error) => XmlResultsSyntaxError::unlocated(
            XmlResultsSyntaxErrorKind::Xml(quick_xml::Error::Io(Arc::new(error))),
        ),
    }
}

/// Parses a results file from a [`Read`] implementation.
///
/// Can be built using [`XmlResultsParser::for_reader`].
///
/// It yields the [`XmlResultsEvent`]s of the document in order.
/// After an error, nothing more is returned.
///
/// ```
/// use oxrdf::Variable;
/// use sparxml::{XmlResultsEvent, XmlResultsParser};
///
/// let file = r#"<sparql version="1.2"><head><variable name="s"/></head><results/></sparql>"#;
///
/// let mut parser = XmlResultsParser::new().for_reader(file.as_bytes());
/// assert_eq!(parser.version(), None);
/// assert_eq!(parser.variables(), None);
/// let events = parser.by_ref().collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(events, [
///     XmlResultsEvent::Version("1.2".into()),
///     XmlResultsEvent::Variables(vec![Variable::new_unchecked("s")])
/// ]);
/// assert_eq!(parser.version(), Some("1.2"));
/// assert_eq!(parser.variables(), Some([Variable::new_unchecked("s")].as_slice()));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct ReaderXmlResultsParser<R: Read> {
    parser: InternalXmlResultsParser<BufReader<R>>,
    reader_buffer: Vec<u8>,
}

impl<R: Read> Iterator for ReaderXmlResultsParser<R> {
    type Item = Result<XmlResultsEvent, XmlResultsParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.parser.results.pop_front() {
                return Some(Ok(event));
            } else if let Some(error) = self.parser.error.take() {
                return Some(Err(error));
            } else if self.parser.is_end {
                return None;
            }
            if let Err(e) = self.parse_step() {
                self.parser.fail(e);
            }
        }
    }
}

impl<R: Read> ReaderXmlResultsParser<R> {
    /// The variables declared in the document `<head>`, once the [`XmlResultsEvent::Variables`] event has been returned.
    pub fn variables(&self) -> Option<&[Variable]> {
        self.parser.assembler.variables()
    }

    /// The version declared in the document, once the [`XmlResultsEvent::Version`] event has been returned.
    pub fn version(&self) -> Option<&str> {
        self.parser.assembler.version()
    }

    /// The current line in the input data, starting from 1.
    pub fn line(&self) -> u64 {
        self.parser.line
    }

    fn parse_step(&mut self) -> Result<(), XmlResultsParseError> {
        self.reader_buffer.clear();
        let event = self
            .parser
            .reader
            .read_event_into(&mut self.reader_buffer)
            .map_err(|e| XmlResultsParseError::xml(e, self.parser.line))?;
        self.parser.parse_event(event)
    }
}

/// Parses a results file from an [`AsyncRead`] implementation.
///
/// Can be built using [`XmlResultsParser::for_tokio_async_reader`].
#[cfg(feature = "async-tokio")]
#[must_use]
pub struct TokioAsyncReaderXmlResultsParser<R: AsyncRead + Unpin> {
    parser: InternalXmlResultsParser<AsyncBufReader<R>>,
    reader_buffer: Vec<u8>,
}

#[cfg(feature = "async-tokio")]
impl<R: AsyncRead + Unpin> TokioAsyncReaderXmlResultsParser<R> {
    /// Reads the next event or returns `None` if the file is finished or an error has been returned.
    pub async fn next(&mut self) -> Option<Result<XmlResultsEvent, XmlResultsParseError>> {
        loop {
            if let Some(event) = self.parser.results.pop_front() {
                return Some(Ok(event));
            } else if let Some(error) = self.parser.error.take() {
                return Some(Err(error));
            } else if self.parser.is_end {
                return None;
            }
            if let Err(e) = self.parse_step().await {
                self.parser.fail(e);
            }
        }
    }

    /// The variables declared in the document `<head>`, once the [`XmlResultsEvent::Variables`] event has been returned.
    pub fn variables(&self) -> Option<&[Variable]> {
        self.parser.assembler.variables()
    }

    /// The version declared in the document, once the [`XmlResultsEvent::Version`] event has been returned.
    pub fn version(&self) -> Option<&str> {
        self.parser.assembler.version()
    }

    /// The current line in the input data, starting from 1.
    pub fn line(&self) -> u64 {
        self.parser.line
    }

    async fn parse_step(&mut self) -> Result<(), XmlResultsParseError> {
        self.reader_buffer.clear();
        let event = self
            .parser
            .reader
            .read_event_into_async(&mut self.reader_buffer)
            .await
            .map_err(|e| XmlResultsParseError::xml(e, self.parser.line))?;
        self.parser.parse_event(event)
    }
}

/// Parses a results file from a byte slice.
///
/// Can be built using [`XmlResultsParser::for_slice`].
#[must_use]
pub struct SliceXmlResultsParser<'a> {
    parser: InternalXmlResultsParser<&'a [u8]>,
}

impl Iterator for SliceXmlResultsParser<'_> {
    type Item = Result<XmlResultsEvent, XmlResultsSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.parser.results.pop_front() {
                return Some(Ok(event));
            } else if let Some(error) = self.parser.error.take() {
                return Some(Err(into_syntax_error(error)));
            } else if self.parser.is_end {
                return None;
            }
            if let Err(e) = self.parse_step() {
                self.parser.fail(e);
            }
        }
    }
}

impl SliceXmlResultsParser<'_> {
    /// The variables declared in the document `<head>`, once the [`XmlResultsEvent::Variables`] event has been returned.
    pub fn variables(&self) -> Option<&[Variable]> {
        self.parser.assembler.variables()
    }

    /// The version declared in the document, once the [`XmlResultsEvent::Version`] event has been returned.
    pub fn version(&self) -> Option<&str> {
        self.parser.assembler.version()
    }

    /// The current line in the input data, starting from 1.
    pub fn line(&self) -> u64 {
        self.parser.line
    }

    fn parse_step(&mut self) -> Result<(), XmlResultsParseError> {
        let event = self
            .parser
            .reader
            .read_event()
            .map_err(|e| XmlResultsParseError::xml(e, self.parser.line))?;
        self.parser.parse_event(event)
    }
}

struct InternalXmlResultsParser<R> {
    reader: Reader<R>,
    assembler: SolutionsAssembler,
    results: VecDeque<XmlResultsEvent>,
    error: Option<XmlResultsParseError>,
    is_end: bool,
    line: u64,
}

impl<R> InternalXmlResultsParser<R> {
    fn parse_event(&mut self, event: Event<'_>) -> Result<(), XmlResultsParseError> {
        let line = self.line;
        let line_breaks = count_line_breaks(&event);
        match event {
            Event::Start(event) => {
                let (tag, attributes) = read_start_tag(&event, self.reader.decoder(), line)?;
                self.assembler
                    .open(tag, &attributes, line, &mut self.results)?;
            }
            Event::Empty(event) => {
                let (tag, attributes) = read_start_tag(&event, self.reader.decoder(), line)?;
                self.assembler
                    .open(tag, &attributes, line, &mut self.results)?;
                self.assembler.close(line, &mut self.results)?;
            }
            Event::End(_) => self.assembler.close(line, &mut self.results)?,
            Event::Text(event) => {
                let text = event
                    .unescape()
                    .map_err(|e| XmlResultsParseError::xml(e, line))?;
                self.assembler.text(&text);
            }
            Event::CData(event) => {
                let text = self
                    .reader
                    .decoder()
                    .decode(&event)
                    .map_err(|e| XmlResultsParseError::xml(e.into(), line))?;
                self.assembler.text(&text);
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => (),
            Event::Eof => {
                self.is_end = true;
                self.assembler.finish(line, &mut self.results)?;
            }
        }
        self.line += line_breaks;
        Ok(())
    }

    fn fail(&mut self, error: XmlResultsParseError) {
        self.error = Some(error);
        self.is_end = true;
    }
}

struct InternalXmlBooleanParser<R> {
    reader: Reader<R>,
    assembler: BooleanAssembler,
    line: u64,
}

impl<R> InternalXmlBooleanParser<R> {
    fn parse_event(&mut self, event: Event<'_>) -> Result<Option<bool>, XmlResultsParseError> {
        let line = self.line;
        let line_breaks = count_line_breaks(&event);
        let value = match event {
            Event::Start(event) => {
                let (tag, attributes) = read_start_tag(&event, self.reader.decoder(), line)?;
                self.assembler.open(tag, &attributes, line)?;
                None
            }
            Event::Empty(event) => {
                let (tag, attributes) = read_start_tag(&event, self.reader.decoder(), line)?;
                self.assembler.open(tag, &attributes, line)?;
                self.assembler.close()
            }
            Event::End(_) => self.assembler.close(),
            Event::Text(event) => {
                let text = event
                    .unescape()
                    .map_err(|e| XmlResultsParseError::xml(e, line))?;
                self.assembler.text(&text);
                None
            }
            Event::CData(event) => {
                let text = self
                    .reader
                    .decoder()
                    .decode(&event)
                    .map_err(|e| XmlResultsParseError::xml(e.into(), line))?;
                self.assembler.text(&text);
                None
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => None,
            Event::Eof => return Err(BooleanAssembler::finish(line).into()),
        };
        self.line += line_breaks;
        Ok(value)
    }
}

/// Reads the local name and the attributes of an opening tag.
fn read_start_tag(
    event: &BytesStart<'_>,
    decoder: Decoder,
    line: u64,
) -> Result<(Tag, TagAttributes), XmlResultsParseError> {
    let tag = Tag::from_local_name(event.local_name().as_ref());
    let mut attributes = TagAttributes::default();
    for attribute in event.attributes() {
        let attribute = attribute
            .map_err(|e| XmlResultsParseError::xml(quick_xml::Error::InvalidAttr(e), line))?;
        let value = attribute
            .decode_and_unescape_value(decoder)
            .map_err(|e| XmlResultsParseError::xml(e, line))?;
        let key = decoder
            .decode(attribute.key.as_ref())
            .map_err(|e| XmlResultsParseError::xml(e.into(), line))?;
        attributes.push(key.into_owned(), value.into_owned());
    }
    Ok((tag, attributes))
}

/// The number of line breaks in the raw bytes of an event.
fn count_line_breaks(event: &Event<'_>) -> u64 {
    let bytes: &[u8] = match event {
        Event::Start(e) | Event::Empty(e) => e,
        Event::End(e) => e,
        Event::Text(e) | Event::Comment(e) | Event::DocType(e) => e,
        Event::CData(e) => e,
        Event::Decl(_) | Event::PI(_) | Event::Eof => &[],
    };
    u64::try_from(memchr::memchr_iter(b'\n', bytes).count()).unwrap_or(u64::MAX)
}
