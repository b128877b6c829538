//! Minimal XML element tree.
//!
//! Project files are small, so they are read fully into a tree of
//! [`Element`]s and queried from there.

use std::io::Read;

use xml::reader::{EventReader, XmlEvent};

/// An XML element with its attributes and child elements.
///
/// Text content is not kept; project files carry everything in attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    /// Read a document and return its root element.
    pub fn parse<R: Read>(source: R) -> Result<Element, xml::reader::Error> {
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        for event in EventReader::new(source) {
            match event? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    stack.push(Element {
                        name: name.local_name,
                        attributes: attributes
                            .into_iter()
                            .map(|a| (a.name.local_name, a.value))
                            .collect(),
                        children: Vec::new(),
                    });
                }
                XmlEvent::EndElement { .. } => {
                    if let Some(done) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(done),
                            None => root = Some(done),
                        }
                    }
                }
                _ => {}
            }
        }

        // The reader rejects documents without a root element, so this only
        // triggers on an empty tree.
        Ok(root.unwrap_or_default())
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given tag.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants with the given tag, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        self.descendants_in(&[name])
    }

    /// All descendants whose tag is one of `names`, in document order.
    pub fn descendants_in<'a>(&'a self, names: &[&str]) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_named(names, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, names: &[&str], out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if names.contains(&child.name.as_str()) {
                out.push(child);
            }
            child.collect_named(names, out);
        }
    }
}
