use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::error::{Error, Result};

/// A paragraph or list from the source document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Paragraph { text: String },
    List { items: Vec<String> },
}

impl Element {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Element::Paragraph { text: text.into() }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Element::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn read_html(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Error::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::ReadInput {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|source| Error::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        reason: format!("input is not valid UTF-8 ({e})"),
    })
}

pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Every `<p>` and `<ul>` in the tree, pre-order. Matches nested inside other
/// matches are reported too, so an inner list shows up both among its parent's
/// items and on its own. `<template>` content lives outside `children` and is
/// not visited.
pub fn collect_elements(dom: &RcDom) -> Vec<Element> {
    let mut out = Vec::new();
    walk(&dom.document, &mut out);
    out
}

pub fn load_elements(path: &Path) -> Result<Vec<Element>> {
    let html = read_html(path)?;
    debug!(path = %path.display(), bytes = html.len(), "read html");
    let dom = parse_html(&html);
    let elements = collect_elements(&dom);
    debug!(count = elements.len(), "collected paragraph and list elements");
    Ok(elements)
}

/// Concatenation of every descendant text node, each trimmed, empty ones dropped.
pub fn stripped_text(node: &Handle) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn elem_tag_lower(h: &Handle) -> Option<String> {
    match &h.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn is_hidden_text_tag(lower: &str) -> bool {
    matches!(lower, "script" | "style" | "template")
}

fn walk(node: &Handle, out: &mut Vec<Element>) {
    match elem_tag_lower(node).as_deref() {
        Some("p") => out.push(Element::Paragraph {
            text: stripped_text(node),
        }),
        Some("ul") => {
            let mut items = Vec::new();
            list_items(node, &mut items);
            out.push(Element::List { items });
        }
        _ => {}
    }

    for child in node.children.borrow().iter() {
        walk(child, out);
    }
}

fn list_items(node: &Handle, items: &mut Vec<String>) {
    for child in node.children.borrow().iter() {
        if elem_tag_lower(child).as_deref() == Some("li") {
            items.push(stripped_text(child));
        }
        list_items(child, items);
    }
}

fn push_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => {
            let text = contents.borrow();
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push_str(trimmed);
            }
        }
        NodeData::Element { name, .. } => {
            if is_hidden_text_tag(&name.local.to_string().to_ascii_lowercase()) {
                return;
            }
            for child in node.children.borrow().iter() {
                push_text(child, out);
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                push_text(child, out);
            }
        }
    }
}
