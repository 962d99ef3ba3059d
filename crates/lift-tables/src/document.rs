//! Loading LIFT documents and walking their element tree.
//!
//! [`LiftDocument`] owns the raw bytes (memory-mapped or read into a buffer,
//! see [`LoadMode`]) and hands out a parsed `roxmltree` tree that borrows from
//! them. The converter only ever looks at that tree through [`Element`], a
//! small read-only accessor: children by role, first match, attribute lookup
//! and own text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Strategy for loading the lexicon file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    #[default]
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

impl LoadMode {
    /// Parse `mmap` / `owned`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Raw LIFT document held in memory for the duration of one conversion.
pub struct LiftDocument {
    buffer: Buffer,
}

impl LiftDocument {
    /// Load a lexicon file, memory-mapping it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Mmap)
    }

    /// Load a lexicon file choosing between mmap and an owned buffer.
    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        let buffer = match mode {
            LoadMode::Mmap => {
                let map = unsafe { Mmap::map(&file) }.map_err(|e| ConvertError::io(path, e))?;
                Buffer::Mmap(map)
            }
            LoadMode::Owned => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)
                    .map_err(|e| ConvertError::io(path, e))?;
                Buffer::Owned(buf)
            }
        };
        debug!(
            "loaded {} bytes from {} ({:?})",
            buffer.as_slice().len(),
            path.display(),
            mode
        );
        Ok(Self { buffer })
    }

    /// Wrap markup that is already in memory.
    pub fn from_string(markup: impl Into<String>) -> Self {
        Self {
            buffer: Buffer::Owned(markup.into().into_bytes()),
        }
    }

    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(self.buffer.as_slice())?)
    }

    /// Parse the markup into a tree borrowing from this document.
    pub fn parse(&self) -> Result<Document<'_>> {
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;
        Ok(Document::parse_with_options(self.text()?, options)?)
    }
}

/// Read-only view of one element node.
#[derive(Clone, Copy, Debug)]
pub struct Element<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input: 'a> Element<'a, 'input> {
    pub fn root(doc: &'a Document<'input>) -> Self {
        Self {
            node: doc.root_element(),
        }
    }

    /// Tag name without namespace prefix.
    pub fn role(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// Direct element children in document order.
    pub fn children(self) -> impl Iterator<Item = Element<'a, 'input>> {
        self.node
            .children()
            .filter(|n| n.is_element())
            .map(|node| Element { node })
    }

    pub fn children_named(self, role: &str) -> impl Iterator<Item = Element<'a, 'input>> {
        self.children().filter(move |e| e.role() == role)
    }

    pub fn first_child(self, role: &str) -> Option<Element<'a, 'input>> {
        self.children_named(role).next()
    }

    /// Element descendants with the given role, excluding `self`.
    pub fn descendants_named(self, role: &str) -> impl Iterator<Item = Element<'a, 'input>> {
        self.node
            .descendants()
            .skip(1)
            .filter(|n| n.is_element())
            .map(|node| Element { node })
            .filter(move |e| e.role() == role)
    }

    pub fn first_descendant(self, role: &str) -> Option<Element<'a, 'input>> {
        self.descendants_named(role).next()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// Attributes in document order as `(local name, value)`.
    pub fn attrs(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.node
            .attributes()
            .map(|a| -> (&'a str, &'a str) { (a.name(), a.value()) })
    }

    /// Concatenated descendant text with surrounding whitespace trimmed.
    pub fn text(&self) -> String {
        let raw: String = self
            .node
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        raw.trim().to_string()
    }

    pub fn lang(&self) -> Option<&'a str> {
        self.attr("lang")
    }

    /// Value of the direct-child `<trait name="..." value="..."/>`, if any.
    pub fn trait_value(self, name: &str) -> Option<&'a str> {
        self.children_named("trait")
            .find(|t| t.attr("name") == Some(name))
            .and_then(|t| t.attr("value"))
    }

    /// Whether any descendant `<trait>` carries `name`.
    pub fn has_trait(self, name: &str) -> bool {
        self.descendants_named("trait")
            .any(|t| t.attr("name") == Some(name))
    }
}
