// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal owned SVG element tree on top of `quick-xml` events.
//
// Only elements get structure; every other event (text, comments, the XML
// declaration, processing instructions) is kept verbatim so an untouched tree
// writes back out equivalent to its input.

use cutcontour_core::error::{CutlineError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Elements that carry no artwork and are copied into every layer.
const STRUCTURAL: [&[u8]; 7] = [
    b"defs",
    b"metadata",
    b"namedview",
    b"style",
    b"title",
    b"desc",
    b"script",
];

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Element(Element),
    Other(Event<'static>),
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) start: BytesStart<'static>,
    pub(crate) children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    fn new(start: BytesStart<'static>, self_closing: bool) -> Self {
        Self {
            start,
            children: Vec::new(),
            self_closing,
        }
    }

    /// Unescaped value of the attribute named `key`.
    pub(crate) fn attr(&self, key: &str) -> Option<String> {
        self.start
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key.as_bytes())
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
    }

    /// `id` and `inkscape:label`, the two names a user can give an element.
    pub(crate) fn names(&self) -> impl Iterator<Item = String> + '_ {
        ["id", "inkscape:label"]
            .into_iter()
            .filter_map(|key| self.attr(key))
    }

    pub(crate) fn is_structural(&self) -> bool {
        let local = self.start.local_name();
        STRUCTURAL.iter().any(|s| *s == local.as_ref())
    }

    /// Drop `display:none` / `visibility:hidden` from the element itself.
    pub(crate) fn force_visible(&mut self) {
        let name = String::from_utf8_lossy(self.start.name().as_ref()).into_owned();
        let mut rebuilt = BytesStart::new(name);
        for attr in self.start.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_default();
            match attr.key.as_ref() {
                b"display" if value.trim() == "none" => {}
                b"visibility" if value.trim() != "visible" => {}
                b"style" => {
                    let cleaned = strip_hidden_declarations(&value);
                    if !cleaned.is_empty() {
                        rebuilt.push_attribute(("style", cleaned.as_str()));
                    }
                }
                _ => rebuilt.push_attribute(attr),
            }
        }
        self.start = rebuilt;
    }
}

/// Remove hiding declarations from an inline CSS `style` value.
fn strip_hidden_declarations(style: &str) -> String {
    style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            let compact: String = decl.chars().filter(|c| !c.is_whitespace()).collect();
            compact != "display:none" && !compact.starts_with("visibility:hidden")
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// A parsed SVG document.
#[derive(Debug, Clone)]
pub(crate) struct SvgDocument {
    nodes: Vec<Node>,
}

impl SvgDocument {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|err| {
                CutlineError::Drawing(format!(
                    "XML error at byte {}: {err}",
                    reader.buffer_position()
                ))
            })?;
            match event {
                Event::Start(start) => stack.push(Element::new(start.into_owned(), false)),
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        CutlineError::Drawing("closing tag without opening tag".into())
                    })?;
                    attach(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::Empty(start) => attach(
                    &mut stack,
                    &mut nodes,
                    Node::Element(Element::new(start.into_owned(), true)),
                ),
                Event::Eof => break,
                other => attach(&mut stack, &mut nodes, Node::Other(other.into_owned())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(CutlineError::Drawing(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(open.start.name().as_ref())
            )));
        }

        let doc = Self { nodes };
        if doc.root().is_none() {
            return Err(CutlineError::Drawing("document has no root element".into()));
        }
        Ok(doc)
    }

    pub(crate) fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Other(_) => None,
        })
    }

    pub(crate) fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Other(_) => None,
        })
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|err| CutlineError::Drawing(format!("serialised SVG is not UTF-8: {err}")))
    }
}

fn attach(stack: &mut [Element], nodes: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    let written = match node {
        Node::Other(event) => writer.write_event(event.borrow()),
        Node::Element(element) if element.self_closing && element.children.is_empty() => {
            writer.write_event(Event::Empty(element.start.borrow()))
        }
        Node::Element(element) => {
            writer
                .write_event(Event::Start(element.start.borrow()))
                .map_err(|err| CutlineError::Drawing(format!("failed to write SVG: {err}")))?;
            for child in &element.children {
                write_node(writer, child)?;
            }
            writer.write_event(Event::End(element.start.to_end()))
        }
    };
    written.map_err(|err| CutlineError::Drawing(format!("failed to write SVG: {err}")))
}
