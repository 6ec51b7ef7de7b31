#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxrdf::{BaseDirection, BlankNode, Literal, NamedNode, Variable};
use quick_xml::errors::IllFormedError;
use sparxml::{
    Binding, CheckedTermFactory, QuotedTriple, Term, TermFactoryError, TripleComponent,
    XmlResultsEvent, XmlResultsParseError, XmlResultsParser, XmlResultsSyntaxError,
    XmlResultsSyntaxErrorKind,
};
use std::error::Error;
use std::io::{self, Read};

fn parse(file: &str) -> Result<Vec<XmlResultsEvent>, XmlResultsSyntaxError> {
    XmlResultsParser::new().for_slice(file).collect()
}

fn bindings(file: &str) -> Result<Vec<Binding>, XmlResultsSyntaxError> {
    Ok(parse(file)?
        .into_iter()
        .filter_map(|event| match event {
            XmlResultsEvent::Binding(binding) => Some(binding),
            _ => None,
        })
        .collect())
}

fn single_term(file: &str) -> Result<Term, Box<dyn Error>> {
    let mut bindings = bindings(file)?;
    assert_eq!(bindings.len(), 1);
    let binding = bindings.remove(0);
    assert_eq!(binding.len(), 1);
    Ok(binding
        .into_iter()
        .next()
        .map(|(_, term)| term)
        .ok_or("empty binding")?)
}

fn syntax_error(file: &str) -> XmlResultsSyntaxError {
    match parse(file) {
        Ok(events) => panic!("parsing should have failed, got {events:?}"),
        Err(error) => error,
    }
}

fn iri(value: &str) -> Term {
    NamedNode::new_unchecked(value).into()
}

/// Wraps a binding value in a full document.
fn document(value: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<sparql xmlns="http://www.w3.org/2005/sparql-results#" xmlns:its="http://www.w3.org/2005/11/its">
<head><variable name="x"/></head>
<results><result><binding name="x">{value}</binding></result></results>
</sparql>"#
    )
}

#[test]
fn test_empty_results() -> Result<(), Box<dyn Error>> {
    let events = parse(
        r#"<sparql xmlns="http://www.w3.org/2005/sparql-results#"><head><variable name="a"/><variable name="b"/></head><results></results></sparql>"#,
    )?;
    assert_eq!(
        events,
        [XmlResultsEvent::Variables(vec![
            Variable::new_unchecked("a"),
            Variable::new_unchecked("b")
        ])]
    );
    Ok(())
}

#[test]
fn test_results_keep_document_order() -> Result<(), Box<dyn Error>> {
    let events = parse(
        r#"<sparql>
  <head><variable name="a"/><variable name="b"/></head>
  <results>
    <result>
      <binding name="a"><uri>http://example.com/1</uri></binding>
      <binding name="b"><bnode>b1</bnode></binding>
    </result>
    <result/>
    <result>
      <binding name="b"><literal>2</literal></binding>
    </result>
  </results>
</sparql>"#,
    )?;
    assert_eq!(
        events,
        [
            XmlResultsEvent::Variables(vec![
                Variable::new_unchecked("a"),
                Variable::new_unchecked("b")
            ]),
            XmlResultsEvent::Binding(
                [
                    ("a", iri("http://example.com/1")),
                    ("b", Term::from(BlankNode::new_unchecked("b1")))
                ]
                .into_iter()
                .collect()
            ),
            XmlResultsEvent::Binding(Binding::default()),
            XmlResultsEvent::Binding([("b", Literal::from("2"))].into_iter().collect()),
        ]
    );
    Ok(())
}

#[test]
fn test_binding_keys_order() -> Result<(), Box<dyn Error>> {
    let bindings = bindings(&document(
        r#"<uri>http://example.com/1</uri></binding><binding name="b"><uri>http://example.com/2</uri>"#,
    ))?;
    assert_eq!(bindings[0].keys().collect::<Vec<_>>(), ["x", "b"]);
    Ok(())
}

#[test]
fn test_question_mark_prefix() -> Result<(), Box<dyn Error>> {
    let file = document("<uri>http://example.com/</uri>");
    let events = XmlResultsParser::new()
        .prefix_variable_names_with_question_mark()
        .for_slice(&file)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(
        events,
        [
            XmlResultsEvent::Variables(vec![Variable::new_unchecked("x")]),
            XmlResultsEvent::Binding(
                [("?x", iri("http://example.com/"))].into_iter().collect()
            )
        ]
    );
    Ok(())
}

#[test]
fn test_repeated_binding_name_keeps_last_value() -> Result<(), Box<dyn Error>> {
    let bindings = bindings(&document(
        r#"<uri>http://example.com/1</uri></binding><binding name="y"><bnode>y</bnode></binding><binding name="x"><uri>http://example.com/2</uri>"#,
    ))?;
    assert_eq!(
        bindings[0].iter().collect::<Vec<_>>(),
        [
            ("x", &iri("http://example.com/2")),
            ("y", &Term::from(BlankNode::new_unchecked("y")))
        ]
    );
    Ok(())
}

#[test]
fn test_literals() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        single_term(&document("<literal>foo</literal>"))?,
        Literal::new_simple_literal("foo").into()
    );
    assert_eq!(
        single_term(&document("<literal></literal>"))?,
        Literal::new_simple_literal("").into()
    );
    assert_eq!(
        single_term(&document(
            r#"<literal datatype="http://www.w3.org/2001/XMLSchema#integer">1</literal>"#
        ))?,
        Literal::new_typed_literal(
            "1",
            NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#integer")
        )
        .into()
    );
    assert_eq!(
        single_term(&document(r#"<literal xml:lang="en">foo</literal>"#))?,
        Literal::new_language_tagged_literal_unchecked("foo", "en").into()
    );
    assert_eq!(
        single_term(&document(
            r#"<literal xml:lang="ar" its:dir="rtl">foo</literal>"#
        ))?,
        Literal::new_directional_language_tagged_literal_unchecked(
            "foo",
            "ar",
            BaseDirection::Rtl
        )
        .into()
    );
    Ok(())
}

#[test]
fn test_language_wins_over_datatype() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        single_term(&document(
            r#"<literal xml:lang="en" datatype="http://www.w3.org/2001/XMLSchema#string">foo</literal>"#
        ))?,
        Literal::new_language_tagged_literal_unchecked("foo", "en").into()
    );
    Ok(())
}

#[test]
fn test_direction_without_language_is_ignored() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        single_term(&document(r#"<literal its:dir="ltr">foo</literal>"#))?,
        Literal::new_simple_literal("foo").into()
    );
    Ok(())
}

#[test]
fn test_invalid_direction() {
    let error = syntax_error(&document(
        r#"<literal xml:lang="en" its:dir="up">foo</literal>"#,
    ));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::InvalidDirection(dir) if dir == "up"
    ));
}

#[test]
fn test_escaped_text() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        single_term(&document("<literal>a &lt; b &amp; c</literal>"))?,
        Literal::from("a < b & c").into()
    );
    assert_eq!(
        single_term(&document("<literal><![CDATA[<b>]]></literal>"))?,
        Literal::from("<b>").into()
    );
    Ok(())
}

#[test]
fn test_quoted_triple() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        single_term(&document(
            r#"<triple>
  <subject><uri>http://example.com/s</uri></subject>
  <predicate><uri>http://example.com/p</uri></predicate>
  <object><literal xml:lang="en">o</literal></object>
</triple>"#
        ))?,
        QuotedTriple::new(
            NamedNode::new_unchecked("http://example.com/s"),
            NamedNode::new_unchecked("http://example.com/p"),
            Literal::new_language_tagged_literal_unchecked("o", "en")
        )
        .into()
    );
    Ok(())
}

#[test]
fn test_nested_quoted_triples() -> Result<(), Box<dyn Error>> {
    let inner = r#"<triple>
  <subject><bnode>b</bnode></subject>
  <predicate><uri>http://example.com/p</uri></predicate>
  <object><literal>o</literal></object>
</triple>"#;
    let expected_inner = QuotedTriple::new(
        BlankNode::new_unchecked("b"),
        NamedNode::new_unchecked("http://example.com/p"),
        Literal::from("o"),
    );

    // Depth 1 as subject
    assert_eq!(
        single_term(&document(&format!(
            r#"<triple><subject>{inner}</subject><predicate><uri>http://example.com/q</uri></predicate><object><uri>http://example.com/o</uri></object></triple>"#
        )))?,
        QuotedTriple::new(
            expected_inner.clone(),
            NamedNode::new_unchecked("http://example.com/q"),
            NamedNode::new_unchecked("http://example.com/o")
        )
        .into()
    );

    // Depth 2 as subject
    let middle = format!(
        r#"<triple><subject>{inner}</subject><predicate><uri>http://example.com/q</uri></predicate><object><uri>http://example.com/o</uri></object></triple>"#
    );
    assert_eq!(
        single_term(&document(&format!(
            r#"<triple><subject>{middle}</subject><predicate><uri>http://example.com/r</uri></predicate><object><literal>o2</literal></object></triple>"#
        )))?,
        QuotedTriple::new(
            QuotedTriple::new(
                expected_inner.clone(),
                NamedNode::new_unchecked("http://example.com/q"),
                NamedNode::new_unchecked("http://example.com/o")
            ),
            NamedNode::new_unchecked("http://example.com/r"),
            Literal::from("o2")
        )
        .into()
    );

    // Depth 2 as object
    let middle = format!(
        r#"<triple><subject><uri>http://example.com/s</uri></subject><predicate><uri>http://example.com/q</uri></predicate><object>{inner}</object></triple>"#
    );
    assert_eq!(
        single_term(&document(&format!(
            r#"<triple><subject><uri>http://example.com/s</uri></subject><predicate><uri>http://example.com/r</uri></predicate><object>{middle}</object></triple>"#
        )))?,
        QuotedTriple::new(
            NamedNode::new_unchecked("http://example.com/s"),
            NamedNode::new_unchecked("http://example.com/r"),
            QuotedTriple::new(
                NamedNode::new_unchecked("http://example.com/s"),
                NamedNode::new_unchecked("http://example.com/q"),
                expected_inner
            )
        )
        .into()
    );
    Ok(())
}

#[test]
fn test_incomplete_triple() {
    let error = syntax_error(&document(
        r#"<triple><subject><uri>http://example.com/s</uri></subject><predicate><uri>http://example.com/p</uri></predicate></triple>"#,
    ));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::IncompleteTripleComponent
    ));
    assert_eq!(error.line(), Some(4));
}

#[test]
fn test_duplicate_triple_component() {
    let error = syntax_error(&document(
        r#"<triple><subject><uri>http://example.com/s1</uri></subject><subject><uri>http://example.com/s2</uri></subject></triple>"#,
    ));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::DuplicateTripleComponent(TripleComponent::Subject)
    ));
}

#[test]
fn test_illegal_triple_component() {
    let error = syntax_error(&document(
        r#"<triple><uri>http://example.com/s</uri></triple>"#,
    ));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::IllegalTripleComponent(tag) if tag == "uri"
    ));
}

#[test]
fn test_missing_binding_name() {
    let error = syntax_error(
        r#"<sparql><head/><results><result><binding><uri>http://example.com/</uri></binding></result></results></sparql>"#,
    );
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::MissingBindingName
    ));
}

#[test]
fn test_missing_variable_name() {
    let error = syntax_error(r#"<sparql><head><variable/></head><results/></sparql>"#);
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::MissingVariableName
    ));
}

#[test]
fn test_unknown_term_type() {
    let error = syntax_error(&document("<foo>bar</foo>"));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::InvalidTermType(tag) if tag == "foo"
    ));
}

#[test]
fn test_element_inside_of_term() {
    let error = syntax_error(&document(
        "<literal>a<uri>http://example.com/</uri>b</literal>",
    ));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::UnexpectedElementInTerm(tag) if tag == "uri"
    ));
    assert_eq!(error.line(), Some(4));
}

#[test]
fn test_two_values_in_one_binding() {
    let error = syntax_error(&document(
        "<uri>http://example.com/</uri><bnode>b</bnode>",
    ));
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::DuplicateBindingValue(name) if name == "x"
    ));
}

#[test]
fn test_truncated_document() {
    let mut parser = XmlResultsParser::new().for_slice(
        r#"<sparql><head><variable name="x"/></head><results><result><binding name="x"><bnode>b</bnode></binding></result>"#,
    );
    assert!(matches!(
        parser.next(),
        Some(Ok(XmlResultsEvent::Variables(_)))
    ));
    assert!(matches!(parser.next(), Some(Ok(XmlResultsEvent::Binding(_)))));
    let Some(Err(error)) = parser.next() else {
        panic!("the truncation should be reported")
    };
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::Xml(quick_xml::Error::IllFormed(
            IllFormedError::MissingEndTag(tag)
        )) if tag == "results"
    ));
    assert!(parser.next().is_none());
}

#[test]
fn test_truncated_inside_of_triple() {
    let error = syntax_error(
        r#"<sparql><head><variable name="x"/></head><results><result><binding name="x"><triple><subject><uri>http://example.com/s</uri></subject>"#,
    );
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::Xml(quick_xml::Error::IllFormed(
            IllFormedError::MissingEndTag(tag)
        )) if tag == "triple"
    ));
}

#[test]
fn test_invalid_utf8_in_cdata() {
    let file = [
        br#"<sparql><head/><results><result><binding name="x"><literal><![CDATA["#.as_slice(),
        &[0xFF_u8, 0xFE],
        b"]]></literal></binding></result></results></sparql>".as_slice(),
    ]
    .concat();
    let error = XmlResultsParser::new()
        .for_slice(&file)
        .find_map(Result::err)
        .unwrap_or_else(|| panic!("the invalid UTF-8 should be rejected"));
    assert!(matches!(error.kind(), XmlResultsSyntaxErrorKind::Xml(_)));
}

#[test]
fn test_missing_head_emits_empty_variables() -> Result<(), Box<dyn Error>> {
    let events = parse(
        r#"<sparql><results><result><binding name="x"><bnode>b</bnode></binding></result></results></sparql>"#,
    )?;
    assert_eq!(
        events,
        [
            XmlResultsEvent::Binding([("x", BlankNode::new_unchecked("b"))].into_iter().collect()),
            XmlResultsEvent::Variables(Vec::new())
        ]
    );
    Ok(())
}

#[test]
fn test_missing_results() {
    let mut parser = XmlResultsParser::new()
        .for_slice(r#"<sparql><head><variable name="x"/></head></sparql>"#);
    assert!(matches!(
        parser.next(),
        Some(Ok(XmlResultsEvent::Variables(variables)))
            if variables == [Variable::new_unchecked("x")]
    ));
    assert!(matches!(
        parser.next(),
        Some(Err(e)) if matches!(e.kind(), XmlResultsSyntaxErrorKind::NoResultsFound)
    ));
    assert!(parser.next().is_none());
}

#[test]
fn test_malformed_xml() {
    let mut parser = XmlResultsParser::new()
        .for_slice("<sparql>\n<head></foo>\n<results/></sparql>");
    let Some(Err(error)) = parser.next() else {
        panic!("the mismatched end tag should be reported")
    };
    assert!(matches!(error.kind(), XmlResultsSyntaxErrorKind::Xml(_)));
    assert_eq!(error.line(), Some(2));
    assert!(parser.next().is_none());
}

#[test]
fn test_version_event() -> Result<(), Box<dyn Error>> {
    let mut parser = XmlResultsParser::new().for_reader(
        r#"<sparql version="1.2"><head><variable name="x"/></head><results/></sparql>"#.as_bytes(),
    );
    assert_eq!(parser.version(), None);
    assert_eq!(
        parser.next().transpose()?,
        Some(XmlResultsEvent::Version("1.2".into()))
    );
    assert_eq!(parser.version(), Some("1.2"));
    assert_eq!(parser.variables(), None);
    assert_eq!(
        parser.next().transpose()?,
        Some(XmlResultsEvent::Variables(vec![Variable::new_unchecked("x")]))
    );
    assert_eq!(parser.variables(), Some([Variable::new_unchecked("x")].as_slice()));
    assert!(parser.next().is_none());
    Ok(())
}

#[test]
fn test_unsupported_version() {
    let file = r#"<sparql version="1.2-unknown"><head/><results/></sparql>"#;
    let mut parser = XmlResultsParser::new().for_slice(file);
    assert!(matches!(
        parser.next(),
        Some(Ok(XmlResultsEvent::Version(version))) if version == "1.2-unknown"
    ));
    let Some(Err(error)) = parser.next() else {
        panic!("the version should be rejected")
    };
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::UnsupportedVersion(version) if version == "1.2-unknown"
    ));
    assert_eq!(
        error.to_string(),
        "Detected unsupported version: 1.2-unknown on line 1"
    );
    assert!(parser.next().is_none());
}

#[test]
fn test_permit_unsupported_version() -> Result<(), Box<dyn Error>> {
    let events = XmlResultsParser::new()
        .permit_unsupported_versions()
        .for_slice(r#"<sparql version="1.2-unknown"><head/><results/></sparql>"#)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(
        events,
        [
            XmlResultsEvent::Version("1.2-unknown".into()),
            XmlResultsEvent::Variables(Vec::new())
        ]
    );
    Ok(())
}

#[test]
fn test_custom_supported_versions() -> Result<(), Box<dyn Error>> {
    let parser = XmlResultsParser::new().with_supported_versions(["2.0"]);
    assert!(
        parser
            .clone()
            .for_slice(r#"<sparql version="2.0"><results/></sparql>"#)
            .collect::<Result<Vec<_>, _>>()
            .is_ok()
    );
    assert!(
        parser
            .for_slice(r#"<sparql version="1.1"><results/></sparql>"#)
            .collect::<Result<Vec<_>, _>>()
            .is_err()
    );
    Ok(())
}

#[test]
fn test_expected_version() -> Result<(), Box<dyn Error>> {
    let file = r#"<sparql><head/><results/></sparql>"#;
    let mut parser = XmlResultsParser::new()
        .with_expected_version("2.0")
        .for_slice(file);
    let Some(Err(error)) = parser.next() else {
        panic!("the expected version should be rejected")
    };
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::UnsupportedVersion(version) if version == "2.0"
    ));
    assert_eq!(error.line(), None);
    assert!(parser.next().is_none());

    assert_eq!(
        XmlResultsParser::new()
            .with_expected_version("1.1")
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()?,
        [XmlResultsEvent::Variables(Vec::new())]
    );
    Ok(())
}

#[test]
fn test_checked_term_factory() -> Result<(), Box<dyn Error>> {
    let parser = XmlResultsParser::new().with_term_factory(CheckedTermFactory);
    let valid = document(r#"<literal xml:lang="EN">foo</literal>"#);
    let events = parser
        .clone()
        .for_slice(&valid)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(
        events[1],
        XmlResultsEvent::Binding(
            [("x", Literal::new_language_tagged_literal_unchecked("foo", "en"))]
                .into_iter()
                .collect()
        )
    );

    let invalid = document("<uri>not an iri</uri>");
    let error = parser
        .for_slice(&invalid)
        .find_map(Result::err)
        .ok_or("the IRI should be rejected")?;
    assert!(matches!(
        error.kind(),
        XmlResultsSyntaxErrorKind::InvalidTerm(TermFactoryError::InvalidIri { iri, .. }) if iri == "not an iri"
    ));
    Ok(())
}

/// Returns its content and then fails.
struct FailingAfter<'a>(&'a [u8]);

impl Read for FailingAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::other("connection lost"));
        }
        self.0.read(buf)
    }
}

#[test]
fn test_results_are_streamed() -> Result<(), Box<dyn Error>> {
    let mut parser = XmlResultsParser::new().for_reader(FailingAfter(
        br#"<sparql><head><variable name="x"/></head><results><result><binding name="x"><bnode>b</bnode></binding></result>"#,
    ));
    assert_eq!(
        parser.next().transpose()?,
        Some(XmlResultsEvent::Variables(vec![Variable::new_unchecked("x")]))
    );
    assert_eq!(
        parser.next().transpose()?,
        Some(XmlResultsEvent::Binding(
            [("x", BlankNode::new_unchecked("b"))].into_iter().collect()
        ))
    );
    assert!(matches!(parser.next(), Some(Err(XmlResultsParseError::Io(_)))));
    assert!(parser.next().is_none());
    Ok(())
}

#[test]
fn test_line_is_tracked() -> Result<(), Box<dyn Error>> {
    let mut parser = XmlResultsParser::new()
        .for_slice("<sparql>\n<head>\n<variable name=\"x\"/>\n</head>\n<results/>\n</sparql>");
    assert_eq!(parser.line(), 1);
    parser.next().transpose()?;
    assert_eq!(parser.line(), 4);
    Ok(())
}

#[test]
fn test_boolean() -> Result<(), Box<dyn Error>> {
    assert!(XmlResultsParser::new().parse_boolean_slice(
        r#"<sparql xmlns="http://www.w3.org/2005/sparql-results#"><head/><boolean>true</boolean></sparql>"#
    )?);
    assert!(!XmlResultsParser::new().parse_boolean_slice(
        r#"<sparql xmlns="http://www.w3.org/2005/sparql-results#"><head/><boolean>false</boolean></sparql>"#
    )?);
    let file = b"<sparql>\n  <boolean>\n    true\n  </boolean>\n</sparql>";
    assert!(XmlResultsParser::new().parse_boolean_read(file.as_slice())?);
    Ok(())
}

#[test]
fn test_boolean_not_found() {
    for file in [
        "<sparql></sparql>",
        "<sparql/>",
        r#"<sparql><head><variable name="x"/></head><results/></sparql>"#,
        "<boolean>true</boolean>",
    ] {
        let error = XmlResultsParser::new()
            .parse_boolean_slice(file)
            .err()
            .unwrap_or_else(|| panic!("{file} should not contain a boolean"));
        assert!(
            matches!(error.kind(), XmlResultsSyntaxErrorKind::NoBooleanFound),
            "unexpected error {error} for {file}"
        );
    }
}

#[test]
fn test_boolean_versions() {
    let file = r#"<sparql version="1.2-unknown"><boolean>true</boolean></sparql>"#;
    assert!(matches!(
        XmlResultsParser::new().parse_boolean_slice(file),
        Err(e) if matches!(e.kind(), XmlResultsSyntaxErrorKind::UnsupportedVersion(_))
    ));
    assert!(matches!(
        XmlResultsParser::new()
            .permit_unsupported_versions()
            .parse_boolean_slice(file),
        Ok(true)
    ));
    assert!(matches!(
        XmlResultsParser::new()
            .with_expected_version("0.1")
            .parse_boolean_read(FailingAfter(b"")),
        Err(XmlResultsParseError::Syntax(e)) if e.line().is_none()
    ));
}

#[cfg(feature = "async-tokio")]
#[tokio::test]
async fn test_async_parser() -> Result<(), Box<dyn Error>> {
    let file = document("<uri>http://example.com/</uri>");
    let mut parser = XmlResultsParser::new().for_tokio_async_reader(file.as_bytes());
    let mut events = Vec::new();
    while let Some(event) = parser.next().await {
        events.push(event?);
    }
    assert_eq!(
        events,
        [
            XmlResultsEvent::Variables(vec![Variable::new_unchecked("x")]),
            XmlResultsEvent::Binding([("x", iri("http://example.com/"))].into_iter().collect())
        ]
    );
    assert_eq!(parser.variables(), Some([Variable::new_unchecked("x")].as_slice()));
    Ok(())
}

#[cfg(feature = "async-tokio")]
#[tokio::test]
async fn test_async_boolean() -> Result<(), Box<dyn Error>> {
    assert!(
        XmlResultsParser::new()
            .parse_boolean_tokio_async_read(b"<sparql><boolean>true</boolean></sparql>".as_slice())
            .await?
    );
    Ok(())
}
