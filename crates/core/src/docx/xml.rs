//! Minimal XML tree for WordprocessingML parts.
//!
//! Element names and attributes are kept as raw qualified bytes (`w:tc`,
//! `w:val`) so namespace prefixes and declarations round-trip untouched.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::error::{DocxError, xml_error};

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Comments, CDATA, processing instructions.
    Other(Event<'static>),
}

impl Node {
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|e| e.is(name))
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_owned()),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_owned()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn name(&self) -> &[u8] {
        self.start.name().into_inner()
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name() == name.as_bytes()
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<String> {
        self.start
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key.as_bytes())
            .and_then(|a| a.unescape_value().ok().map(Cow::into_owned))
    }

    /// Sets or replaces an attribute, keeping the raw form of the others.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        let kept: Vec<(Vec<u8>, Vec<u8>)> = self
            .start
            .attributes()
            .flatten()
            .filter(|a| a.key.as_ref() != key.as_bytes())
            .map(|a| (a.key.as_ref().to_vec(), a.value.into_owned()))
            .collect();

        self.start.clear_attributes();
        for (k, v) in &kept {
            self.start.push_attribute(Attribute {
                key: QName(k.as_slice()),
                value: Cow::Borrowed(v),
            });
        }
        self.start.push_attribute((key, value));
    }

    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Self> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|e| e.is(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.elements_mut().find(|e| e.is(name))
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|n| n.is_element(name))
    }

    pub fn push(&mut self, child: Self) {
        self.children.push(Node::Element(child));
    }

    pub fn remove_children(&mut self, name: &str) {
        self.children.retain(|n| !n.is_element(name));
    }

    /// Removes and returns the first child element called `name`.
    pub fn take_child(&mut self, name: &str) -> Option<Self> {
        let idx = self.position(name)?;
        match self.children.remove(idx) {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the child `name`, inserting an empty one at the position the
    /// schema `order` dictates if it is missing.
    pub fn child_in_sequence(&mut self, name: &str, order: &[&str]) -> &mut Self {
        let idx = match self.position(name) {
            Some(idx) => idx,
            None => self.insert_in_sequence(Self::new(name), order),
        };
        let Node::Element(element) = &mut self.children[idx] else {
            unreachable!("position() only returns element indices")
        };
        element
    }

    /// Inserts `child` before the first existing sibling that must follow it in `order`.
    pub fn insert_in_sequence(&mut self, child: Self, order: &[&str]) -> usize {
        let following: &[&str] = order
            .iter()
            .position(|n| child.is(n))
            .map_or(&order[..0], |pos| &order[pos + 1..]);

        let idx = self
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| following.iter().any(|f| e.is(f))))
            .unwrap_or(self.children.len());
        self.children.insert(idx, Node::Element(child));
        idx
    }

    /// Concatenated `w:t` text of every descendant.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let is_text = self.is("w:t");
        for child in &self.children {
            match child {
                Node::Text(text) if is_text => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                _ => {}
            }
        }
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), DocxError> {
        if self.children.is_empty() {
            writer.write_event(Event::Empty(self.start.borrow())).map_err(xml_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(self.start.borrow())).map_err(xml_error)?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(xml_error)?,
                Node::Other(event) => writer.write_event(event.clone()).map_err(xml_error)?,
            }
        }
        writer.write_event(Event::End(self.start.to_end())).map_err(xml_error)?;
        Ok(())
    }
}

/// A parsed XML part: declaration and other prolog events plus the root element.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    prolog: Vec<Event<'static>>,
    pub root: Element,
}

impl XmlDocument {
    /// # Errors
    ///
    /// Returns [`DocxError::Xml`] if the input is not well-formed or has no root element.
    pub fn parse(xml: &str) -> Result<Self, DocxError> {
        let mut reader = Reader::from_str(xml);
        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => stack.push(Element {
                    start: start.into_owned(),
                    children: Vec::new(),
                }),
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DocxError::Xml("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Empty(start) => {
                    let element = Element {
                        start: start.into_owned(),
                        children: Vec::new(),
                    };
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    // whitespace between prolog and root is not kept
                    if let Some(parent) = stack.last_mut() {
                        let value = text.unescape().map_err(xml_error)?;
                        parent.children.push(Node::Text(value.into_owned()));
                    }
                }
                Event::Eof => break,
                other => {
                    let event = other.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Other(event)),
                        None if root.is_none() => prolog.push(event),
                        None => {}
                    }
                }
            }
        }

        if !stack.is_empty() {
            return Err(DocxError::Xml("unclosed element at end of input".into()));
        }
        let root = root.ok_or_else(|| DocxError::Xml("document has no root element".into()))?;
        Ok(Self { prolog, root })
    }

    /// # Errors
    ///
    /// Returns [`DocxError::Xml`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.prolog {
            writer.write_event(event.clone()).map_err(xml_error)?;
        }
        self.root.write(&mut writer)?;
        Ok(writer.into_inner())
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), DocxError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(DocxError::Xml("more than one root element".into()))
    }
}
