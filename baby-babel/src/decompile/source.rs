//! XML input for the decompile direction

use crate::error::ConvertError;
use crate::syntax::LineIndex;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One node of an XML document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    StartElement {
        name: String,
        /// `(name, value)` pairs in document order, values unescaped
        attributes: Vec<(String, String)>,
        self_closing: bool,
        /// 1-based line of the start tag
        line: usize,
    },
    EndElement {
        name: String,
    },
    Comment(String),
    /// Character data, including whitespace between elements and CDATA
    Text(String),
}

/// Forward-only cursor over XML nodes.
pub trait XmlSource {
    /// The next node, or `None` at the end of the document.
    fn next_node(&mut self) -> Result<Option<XmlNode>, ConvertError>;
}

/// [`XmlSource`] over an in-memory document, backed by `quick_xml::Reader`.
///
/// Declarations, processing instructions and doctypes are skipped.
pub struct XmlReaderSource<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineIndex<'a>,
}

impl<'a> XmlReaderSource<'a> {
    pub fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
            lines: LineIndex::new(xml),
        }
    }

    fn start_element(
        &self,
        start: &BytesStart<'_>,
        self_closing: bool,
        offset: usize,
    ) -> Result<XmlNode, ConvertError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            attributes.push((
                decode(attribute.key.as_ref()),
                attribute.unescape_value()?.into_owned(),
            ));
        }

        Ok(XmlNode::StartElement {
            name: decode(start.name().as_ref()),
            attributes,
            self_closing,
            line: self.lines.line(offset),
        })
    }
}

impl XmlSource for XmlReaderSource<'_> {
    fn next_node(&mut self) -> Result<Option<XmlNode>, ConvertError> {
        loop {
            let offset = self.reader.buffer_position();
            let node = match self.reader.read_event()? {
                Event::Start(start) => self.start_element(&start, false, offset)?,
                Event::Empty(start) => self.start_element(&start, true, offset)?,
                Event::End(end) => XmlNode::EndElement {
                    name: decode(end.name().as_ref()),
                },
                Event::Comment(text) => XmlNode::Comment(decode(&text)),
                Event::Text(text) => XmlNode::Text(text.unescape()?.into_owned()),
                Event::CData(data) => XmlNode::Text(decode(&data)),
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => continue,
                Event::Eof => return Ok(None),
            };
            return Ok(Some(node));
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
