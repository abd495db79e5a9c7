//! XML output for the compile direction
//!
//! [`XmlWriterSink`] holds back each start tag until it knows whether the
//! element gets children, so a childless element comes out self-closing.

use crate::error::ConvertError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Receiver of the XML events the forward converter produces.
pub trait XmlSink {
    fn start_element(&mut self, name: &str) -> Result<(), ConvertError>;
    /// Adds an attribute to the most recently started element. Ignored once
    /// that element has content.
    fn attribute(&mut self, name: &str, value: &str) -> Result<(), ConvertError>;
    fn end_element(&mut self) -> Result<(), ConvertError>;
    fn comment(&mut self, text: &str) -> Result<(), ConvertError>;
    fn flush(&mut self) -> Result<(), ConvertError>;
}

pub struct XmlWriterSink<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl<W: Write> XmlWriterSink<W> {
    /// Wrap `inner`. An `indent_size` of zero writes everything on one line.
    pub fn new(inner: W, indent_size: usize, declaration: bool) -> Result<Self, ConvertError> {
        let mut writer = if indent_size > 0 {
            Writer::new_with_indent(inner, b' ', indent_size)
        } else {
            Writer::new(inner)
        };
        if declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        }

        Ok(Self {
            writer,
            pending: None,
            open: Vec::new(),
        })
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_pending(&mut self) -> Result<(), ConvertError> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }
}

impl<W: Write> XmlSink for XmlWriterSink<W> {
    fn start_element(&mut self, name: &str) -> Result<(), ConvertError> {
        self.write_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), ConvertError> {
        if let Some(start) = self.pending.as_mut() {
            start.push_attribute((name, value));
        }
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), ConvertError> {
        let Some(name) = self.open.pop() else {
            return Ok(());
        };
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), ConvertError> {
        self.write_pending()?;
        let text = sanitize_comment(text);
        self.writer
            .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ConvertError> {
        self.write_pending()?;
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

/// XML comments may not contain `--` or end with `-`.
pub(crate) fn sanitize_comment(text: &str) -> String {
    let mut text = text.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    if text.ends_with('-') {
        text.push(' ');
    }
    text
}
