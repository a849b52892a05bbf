//! Status bar layout.
//!
//! Walks the element tree of one bar, resolves each element's raster and
//! turns its anchor point into a top-left draw position.

use crate::font::{FontSet, compose};
use crate::lump::LumpProvider;
use image::RgbaImage;
use sbardata::conditions;
use sbardata::doom::FACE_PATCH;
use sbardata::{Alignment, Element, ElementId, ElementKind, GameState, HAlign, StatusBar, VAlign};
use std::sync::Arc;

/// A drawable element produced by [`layout`].
#[derive(Debug, Clone)]
pub struct PositionedNode {
    /// Source element in the document.
    pub element: ElementId,
    /// Absolute top-left on the canvas.
    pub draw_pos: (i32, i32),
    pub size: (u32, u32),
    pub alignment: Alignment,
    /// Anchor at layout time minus the element's own `x`/`y`. Inverts the
    /// tree walk for drag commits.
    pub origin_diff: (i32, i32),
    pub raster: Arc<RgbaImage>,
}

impl PositionedNode {
    /// Absolute anchor point, i.e. `draw_pos` with anchor correction undone.
    pub fn anchor(&self) -> (i32, i32) {
        top_left_to_anchor(self.draw_pos, self.size, self.alignment)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (left, top) = self.draw_pos;
        let (w, h) = (self.size.0 as i32, self.size.1 as i32);
        x >= left && x < left + w && y >= top && y < top + h
    }
}

/// Top-left corner of a box of `size` anchored at `anchor`.
pub fn anchor_to_top_left(anchor: (i32, i32), size: (u32, u32), alignment: Alignment) -> (i32, i32) {
    let (w, h) = (size.0 as i32, size.1 as i32);
    let x = match alignment.horizontal() {
        HAlign::Left => anchor.0,
        HAlign::Middle => anchor.0 - w / 2,
        HAlign::Right => anchor.0 - w,
    };
    let y = match alignment.vertical() {
        VAlign::Top => anchor.1,
        VAlign::Middle => anchor.1 - h / 2,
        VAlign::Bottom => anchor.1 - h,
    };
    (x, y)
}

/// Inverse of [`anchor_to_top_left`].
pub fn top_left_to_anchor(top_left: (i32, i32), size: (u32, u32), alignment: Alignment) -> (i32, i32) {
    let (w, h) = (size.0 as i32, size.1 as i32);
    let x = match alignment.horizontal() {
        HAlign::Left => top_left.0,
        HAlign::Middle => top_left.0 + w / 2,
        HAlign::Right => top_left.0 + w,
    };
    let y = match alignment.vertical() {
        VAlign::Top => top_left.1,
        VAlign::Middle => top_left.1 + h / 2,
        VAlign::Bottom => top_left.1 + h,
    };
    (x, y)
}

/// Lays out `bar` for `state`, in pre-order.
///
/// Elements whose conditions fail are dropped together with their subtree.
/// Elements without a raster (missing lump or font, unknown kind) are
/// dropped alone; their children still lay out.
pub fn layout(
    bar: &StatusBar,
    state: &GameState,
    lumps: &impl LumpProvider,
    fonts: &FontSet,
) -> Vec<PositionedNode> {
    let mut walker = Walker {
        state,
        lumps,
        fonts,
        nodes: Vec::new(),
    };
    for elem in bar.children() {
        walker.visit(elem, (0, 0));
    }
    log::debug!("Laid out {} nodes", walker.nodes.len());
    walker.nodes
}

struct Walker<'a, L> {
    state: &'a GameState,
    lumps: &'a L,
    fonts: &'a FontSet,
    nodes: Vec<PositionedNode>,
}

impl<L: LumpProvider> Walker<'_, L> {
    fn visit(&mut self, elem: &Element, parent: (i32, i32)) {
        let origin = (parent.0 + elem.x, parent.1 + elem.y);

        if !conditions::is_visible(elem, self.state) {
            log::trace!("Element {} hidden with its subtree", elem.id);
            return;
        }

        match self.raster(elem) {
            Some((raster, (off_x, off_y))) => {
                let anchor = (origin.0 - off_x, origin.1 - off_y);
                let size = raster.dimensions();
                self.nodes.push(PositionedNode {
                    element: elem.id,
                    draw_pos: anchor_to_top_left(anchor, size, elem.alignment),
                    size,
                    alignment: elem.alignment,
                    origin_diff: (anchor.0 - elem.x, anchor.1 - elem.y),
                    raster,
                });
            }
            None => log::trace!("Element {} ({}) has nothing to draw", elem.id, elem.kind.name()),
        }

        for child in elem.children() {
            self.visit(child, origin);
        }
    }

    /// Raster and lump offset of an element.
    fn raster(&self, elem: &Element) -> Option<(Arc<RgbaImage>, (i32, i32))> {
        let patch = match &elem.kind {
            ElementKind::Graphic { patch } => patch.as_str(),
            ElementKind::Face => FACE_PATCH,
            ElementKind::Number(spec) | ElementKind::Percent(spec) => {
                let font = self.fonts.get(&spec.font)?;
                let percent = matches!(elem.kind, ElementKind::Percent(_));
                let strip = compose(font, 0, spec.max_length, percent)?;
                return Some((Arc::new(strip), (0, 0)));
            }
            ElementKind::Other(_) => return None,
        };
        let lump = self.lumps.lookup(patch)?;
        Some((Arc::clone(&lump.image), (lump.x_offset, lump.y_offset)))
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
