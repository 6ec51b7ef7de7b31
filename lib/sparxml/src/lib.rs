#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod assembler;
mod context;
mod error;
mod factory;
mod model;
mod parser;
mod triple;
mod version;

pub use crate::assembler::XmlResultsEvent;
pub use crate::error::{XmlResultsParseError, XmlResultsSyntaxError, XmlResultsSyntaxErrorKind};
pub use crate::factory::{CheckedTermFactory, DefaultTermFactory, TermFactory, TermFactoryError};
pub use crate::model::{
    Binding, BindingIter, LiteralAnnotation, QuotedTriple, Term, TripleTermConversionError,
};
#[cfg(feature = "async-tokio")]
pub use crate::parser::TokioAsyncReaderXmlResultsParser;
pub use crate::parser::{ReaderXmlResultsParser, SliceXmlResultsParser, XmlResultsParser};
pub use crate::triple::TripleComponent;
pub use crate::version::{DEFAULT_SUPPORTED_VERSIONS, VersionPolicy};
