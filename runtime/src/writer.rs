use crate::{element::ElementRef, error::Error};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

#[derive(Debug)]
struct OpenElement {
    name: String,
    namespace: Option<String>,
}

/// Streaming XML serializer that generated `output_xml` implementations write to.
///
/// A start tag stays pending until content or an end tag follows, so attributes can be added
/// after [start_element](Self::start_element) and childless elements come out self-closed. A
/// default namespace declaration is written whenever an element's namespace differs from its
/// parent's.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
    open: Vec<OpenElement>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            pending: None,
            open: Vec::new(),
        }
    }

    /// A writer that puts each element on its own line, indented by two spaces per level.
    pub fn indented() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            pending: None,
            open: Vec::new(),
        }
    }

    pub fn declaration(&mut self) -> Result<(), Error> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), Error> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    pub fn start_element(&mut self, name: &str, namespace: Option<&str>) -> Result<(), Error> {
        self.flush_pending()?;

        let mut start = BytesStart::new(name.to_string());
        let in_scope = self.open.last().and_then(|open| open.namespace.as_deref());
        if namespace != in_scope {
            start.push_attribute(("xmlns", namespace.unwrap_or_default()));
        }
        self.pending = Some(start);
        self.open.push(OpenElement {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        });
        Ok(())
    }

    /// Adds an attribute to the element started last; only valid before any content is written.
    pub fn attribute(&mut self, name: &str, value: impl AsRef<str>) -> Result<(), Error> {
        let start = self
            .pending
            .as_mut()
            .ok_or_else(|| Error::AttributeOutsideStartTag(name.to_string()))?;
        start.push_attribute((name, value.as_ref()));
        Ok(())
    }

    pub fn text(&mut self, text: impl AsRef<str>) -> Result<(), Error> {
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::new(text.as_ref())))?;
        Ok(())
    }

    pub fn end_element(&mut self) -> Result<(), Error> {
        let open = self.open.pop().ok_or(Error::UnbalancedEndElement)?;
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(open.name)))?,
        }
        Ok(())
    }

    pub fn into_string(mut self) -> Result<String, Error> {
        self.flush_pending()?;
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}

/// Serializes `element` and everything below it into a standalone document.
pub fn to_xml_string(element: &ElementRef, indent: bool) -> Result<String, Error> {
    let mut writer = if indent {
        XmlWriter::indented()
    } else {
        XmlWriter::new()
    };
    writer.declaration()?;
    element.borrow().output_xml(&mut writer)?;
    writer.into_string()
}
