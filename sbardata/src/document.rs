//! Loading, saving and structural edits of SBARDEF documents.

use crate::error::DocumentError;
use crate::types::{Document, DocumentData, Element, ElementId, ElementKind, NumberFontDef, StatusBar};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Where a new element is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Top level of the status bar with this index.
    Bar(usize),
    Element(ElementId),
}

impl Document {
    /// An empty document with the standard header.
    pub fn new() -> Self {
        let mut doc = Self {
            kind: "statusbar".to_string(),
            version: "1.0.0".to_string(),
            metadata: Some(Value::Null),
            data: DocumentData {
                number_fonts: Vec::new(),
                status_bars: Vec::new(),
                extra: Map::new(),
            },
            extra: Map::new(),
            next_id: 0,
        };
        doc.assign_ids();
        doc
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let mut doc: Document = serde_json::from_str(json)?;
        doc.assign_ids();
        log::debug!(
            "Parsed SBARDEF {} with {} status bars, {} number fonts, {} elements",
            doc.version,
            doc.data.status_bars.len(),
            doc.data.number_fonts.len(),
            doc.next_id - 1
        );
        Ok(doc)
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let json = fs::read_to_string(path)?;
        let doc = Self::from_json(&json)?;
        log::info!("Loaded status bar definition from {:?}", path);
        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        fs::write(path, self.to_json_pretty()?)?;
        log::info!("Saved status bar definition to {:?}", path);
        Ok(())
    }

    pub fn status_bars(&self) -> &[StatusBar] {
        &self.data.status_bars
    }

    pub fn number_fonts(&self) -> &[NumberFontDef] {
        &self.data.number_fonts
    }

    pub fn status_bar(&self, index: usize) -> Result<&StatusBar, DocumentError> {
        let count = self.data.status_bars.len();
        self.data
            .status_bars
            .get(index)
            .ok_or(DocumentError::UnknownStatusBar { index, count })
    }

    pub fn status_bar_mut(&mut self, index: usize) -> Result<&mut StatusBar, DocumentError> {
        let count = self.data.status_bars.len();
        self.data
            .status_bars
            .get_mut(index)
            .ok_or(DocumentError::UnknownStatusBar { index, count })
    }

    /// Gives every element a fresh id in pre-order across all bars.
    pub(crate) fn assign_ids(&mut self) {
        let mut next = 1;
        for bar in &mut self.data.status_bars {
            for elem in bar.children.iter_mut().flatten() {
                assign_subtree(elem, &mut next);
            }
        }
        self.next_id = next;
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Finds an element anywhere in the document.
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.data
            .status_bars
            .iter()
            .find_map(|bar| find_in(bar.children(), id))
    }

    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.data
            .status_bars
            .iter_mut()
            .find_map(|bar| find_in_mut(bar.children.as_deref_mut()?, id))
    }

    /// Index of the status bar containing `id`.
    pub fn bar_of(&self, id: ElementId) -> Option<usize> {
        self.data
            .status_bars
            .iter()
            .position(|bar| find_in(bar.children(), id).is_some())
    }

    /// Appends a new element of `kind` at `(0, 0)`, anchored left/top, without
    /// conditions or children.
    ///
    /// Returns `None` when the parent does not exist.
    pub fn add_child(&mut self, parent: Parent, kind: ElementKind) -> Option<ElementId> {
        let id = self.allocate_id();
        let mut elem = Element::new(kind);
        elem.id = id;

        let children = match parent {
            Parent::Bar(index) => &mut self.data.status_bars.get_mut(index)?.children,
            Parent::Element(parent_id) => {
                let Some(parent) = self.find_mut(parent_id) else {
                    log::debug!("add_child: parent {} no longer exists", parent_id);
                    return None;
                };
                &mut parent.children
            }
        };
        children.get_or_insert_with(Vec::new).push(elem);
        log::debug!("Added element {} under {:?}", id, parent);
        Some(id)
    }

    /// Removes the first element with identity `id` from the tree of bar `bar`,
    /// searching depth first. Returns the removed subtree.
    pub fn remove_element(&mut self, bar: usize, id: ElementId) -> Option<Element> {
        let status_bar = self.data.status_bars.get_mut(bar)?;
        let removed = remove_from(&mut status_bar.children, id);
        match &removed {
            Some(_) => log::debug!("Removed element {} from bar {}", id, bar),
            None => log::debug!("remove_element: {} not found in bar {}", id, bar),
        }
        removed
    }

    /// Overwrites the relative position of an element. Returns `false` for a
    /// stale id.
    pub fn set_position(&mut self, id: ElementId, x: i32, y: i32) -> bool {
        match self.find_mut(id) {
            Some(elem) => {
                elem.x = x;
                elem.y = y;
                true
            }
            None => false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_subtree(elem: &mut Element, next: &mut u32) {
    elem.id = ElementId(*next);
    *next += 1;
    for child in elem.children.iter_mut().flatten() {
        assign_subtree(child, next);
    }
}

fn find_in(elems: &[Element], id: ElementId) -> Option<&Element> {
    elems.iter().find_map(|elem| {
        if elem.id == id {
            Some(elem)
        } else {
            find_in(elem.children(), id)
        }
    })
}

fn find_in_mut(elems: &mut [Element], id: ElementId) -> Option<&mut Element> {
    for elem in elems {
        if elem.id == id {
            return Some(elem);
        }
        if let Some(found) = elem
            .children
            .as_deref_mut()
            .and_then(|children| find_in_mut(children, id))
        {
            return Some(found);
        }
    }
    None
}

fn remove_from(children: &mut Option<Vec<Element>>, id: ElementId) -> Option<Element> {
    let list = children.as_mut()?;
    for i in 0..list.len() {
        if list[i].id == id {
            return Some(list.remove(i));
        }
        if let Some(found) = remove_from(&mut list[i].children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
