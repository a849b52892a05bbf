//! An editing session over one document.
//!
//! Every mutating call finishes its change and re-runs layout before it
//! returns, so [`EditorSession::nodes`] always matches the document.

use crate::edit::commit_drag;
use crate::font::FontSet;
use crate::layout::{PositionedNode, layout};
use crate::lump::LumpProvider;
use sbardata::{Document, DocumentError, Element, ElementId, ElementKind, GameState, Parent, StatusBar};

pub struct EditorSession<L> {
    doc: Document,
    state: GameState,
    lumps: L,
    fonts: FontSet,
    bar: usize,
    nodes: Vec<PositionedNode>,
}

impl<L: LumpProvider> EditorSession<L> {
    /// Opens `doc` on its first status bar.
    pub fn new(doc: Document, lumps: L, state: GameState) -> Self {
        let fonts = FontSet::load(doc.number_fonts(), &lumps);
        let mut session = Self {
            doc,
            state,
            lumps,
            fonts,
            bar: 0,
            nodes: Vec::new(),
        };
        session.relayout();
        session
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn lumps(&self) -> &L {
        &self.lumps
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn active_bar(&self) -> usize {
        self.bar
    }

    pub fn status_bar(&self) -> Option<&StatusBar> {
        self.doc.status_bar(self.bar).ok()
    }

    /// Canvas height of the active bar.
    pub fn canvas_height(&self) -> i32 {
        self.status_bar().map_or(0, |bar| bar.height)
    }

    /// Layout of the active bar for the current state.
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn node(&self, id: ElementId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.element == id)
    }

    /// Topmost node under a canvas point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<ElementId> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.contains(x, y))
            .map(|node| node.element)
    }

    pub fn select_bar(&mut self, index: usize) -> Result<(), DocumentError> {
        self.doc.status_bar(index)?;
        self.bar = index;
        self.relayout();
        Ok(())
    }

    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
        self.relayout();
    }

    /// Changes the game state in place.
    pub fn update_state(&mut self, f: impl FnOnce(&mut GameState)) {
        f(&mut self.state);
        self.relayout();
    }

    /// Drops the element at `raw_top_left`. `None` if it is not on the canvas.
    pub fn drag(&mut self, id: ElementId, raw_top_left: (i32, i32)) -> Option<(i32, i32)> {
        let Some(node) = self.node(id).cloned() else {
            log::debug!("Drag of {} ignored: not laid out", id);
            return None;
        };
        let height = self.canvas_height();
        let moved = commit_drag(&mut self.doc, &node, raw_top_left, height);
        self.relayout();
        moved
    }

    pub fn add_child(&mut self, parent: Parent, kind: ElementKind) -> Option<ElementId> {
        let id = self.doc.add_child(parent, kind);
        self.relayout();
        id
    }

    /// Removes `id` (with its subtree) from the active bar.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.doc.remove_element(self.bar, id);
        self.relayout();
        removed
    }

    fn relayout(&mut self) {
        self.nodes = match self.doc.status_bar(self.bar) {
            Ok(bar) => layout(bar, &self.state, &self.lumps, &self.fonts),
            Err(_) => Vec::new(),
        };
    }
}
