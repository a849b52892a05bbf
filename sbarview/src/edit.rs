//! Writing a drag back into the document.

use crate::layout::{PositionedNode, top_left_to_anchor};
use sbardata::doom::SCREEN_WIDTH;
use sbardata::{Alignment, Document, HAlign, VAlign};

fn clamp(lo: i32, hi: i32, n: i32) -> i32 {
    lo.max(n.min(hi))
}

/// Keeps a dropped box on a canvas of `SCREEN_WIDTH` x `canvas_height`.
///
/// An axis anchored in the middle is left free. The upper bound is
/// `extent - size + 1`, so a box may hang one pixel past the edge.
pub fn clamp_top_left(
    top_left: (i32, i32),
    size: (u32, u32),
    alignment: Alignment,
    canvas_height: i32,
) -> (i32, i32) {
    let (w, h) = (size.0 as i32, size.1 as i32);
    let x = match alignment.horizontal() {
        HAlign::Middle => top_left.0,
        HAlign::Left | HAlign::Right => clamp(0, SCREEN_WIDTH - w + 1, top_left.0),
    };
    let y = match alignment.vertical() {
        VAlign::Middle => top_left.1,
        VAlign::Top | VAlign::Bottom => clamp(0, canvas_height - h + 1, top_left.1),
    };
    (x, y)
}

/// Moves the element behind `node` so that it draws at `raw_top_left`
/// (after clamping).
///
/// Only the element's `x`/`y` change. Returns the new relative position, or
/// `None` when the element is no longer in the document.
pub fn commit_drag(
    doc: &mut Document,
    node: &PositionedNode,
    raw_top_left: (i32, i32),
    canvas_height: i32,
) -> Option<(i32, i32)> {
    let top_left = clamp_top_left(raw_top_left, node.size, node.alignment, canvas_height);
    let anchor = top_left_to_anchor(top_left, node.size, node.alignment);
    let (x, y) = (anchor.0 - node.origin_diff.0, anchor.1 - node.origin_diff.1);

    if !doc.set_position(node.element, x, y) {
        log::debug!("Drag of {} ignored: element no longer exists", node.element);
        return None;
    }
    log::debug!(
        "Moved {} to ({}, {}), drawn at ({}, {})",
        node.element,
        x,
        y,
        top_left.0,
        top_left.1
    );
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSet;
    use crate::layout::layout;
    use crate::lump::{Lump, LumpStore};
    use image::RgbaImage;
    use proptest::prelude::*;
    use sbardata::testing::{DocumentBuilder, ElementBuilder, StatusBarBuilder};
    use sbardata::{ElementId, GameState};

    fn store(glyphs: &[(&str, u32, u32, i32, i32)]) -> LumpStore {
        let mut store = LumpStore::new();
        for &(name, w, h, ox, oy) in glyphs {
            store.insert(name, Lump::new(RgbaImage::new(w, h)).with_offset(ox, oy));
        }
        store
    }

    fn node_for(doc: &Document, lumps: &LumpStore, id: ElementId) -> Option<PositionedNode> {
        let bar = doc.status_bar(0).ok()?;
        layout(bar, &GameState::default(), lumps, &FontSet::default())
            .into_iter()
            .find(|n| n.element == id)
    }

    #[test]
    fn test_clamp_skips_only_middle_axes() {
        let size = (16, 16);
        assert_eq!(clamp_top_left((400, -9), size, Alignment::empty(), 32), (305, 0));
        assert_eq!(clamp_top_left((400, 90), size, Alignment::H_RIGHT | Alignment::V_BOTTOM, 32), (305, 17));
        assert_eq!(clamp_top_left((400, 90), size, Alignment::H_MIDDLE, 32), (400, 17));
        assert_eq!(clamp_top_left((-7, -90), size, Alignment::V_MIDDLE, 32), (0, -90));
    }

    #[test]
    fn test_clamp_oversized_box() {
        // No room on the canvas: the lower bound wins.
        assert_eq!(clamp_top_left((50, 50), (400, 300), Alignment::empty(), 200), (0, 0));
    }

    #[test]
    fn test_drag_example_clamps_to_right_edge() {
        let mut doc = DocumentBuilder::new()
            .with_bar(StatusBarBuilder::new(32).child(ElementBuilder::graphic("FOO").at(10, 10)))
            .build();
        let lumps = store(&[("FOO", 16, 16, 0, 0)]);

        let node = node_for(&doc, &lumps, ElementId(1)).unwrap();
        assert_eq!(node.draw_pos, (10, 10));

        assert_eq!(commit_drag(&mut doc, &node, (400, 10), 32), Some((305, 10)));
        let node = node_for(&doc, &lumps, ElementId(1)).unwrap();
        assert_eq!(node.draw_pos, (305, 10));
    }

    #[test]
    fn test_drag_nested_right_aligned_with_offset() {
        let mut doc = DocumentBuilder::new()
            .with_bar(
                StatusBarBuilder::new(200).child(
                    ElementBuilder::graphic("PARENT").at(100, 50).child(
                        ElementBuilder::graphic("KID")
                            .at(-5, 7)
                            .aligned(Alignment::H_RIGHT | Alignment::V_BOTTOM),
                    ),
                ),
            )
            .build();
        let lumps = store(&[("PARENT", 8, 8, 2, 2), ("KID", 10, 6, 1, -3)]);

        let node = node_for(&doc, &lumps, ElementId(2)).unwrap();
        // Anchor (100 - 5 - 1, 50 + 7 + 3), shifted by the full size.
        assert_eq!(node.draw_pos, (84, 54));

        let (x, y) = commit_drag(&mut doc, &node, (40, 30), 200).unwrap();
        assert_eq!((x, y), (-49, -17));
        let node = node_for(&doc, &lumps, ElementId(2)).unwrap();
        assert_eq!(node.draw_pos, (40, 30));

        let parent = doc.find(ElementId(1)).unwrap();
        assert_eq!((parent.x, parent.y), (100, 50));
    }

    #[test]
    fn test_drag_stale_node_is_noop() {
        let mut doc = DocumentBuilder::new()
            .with_bar(StatusBarBuilder::new(32).child(ElementBuilder::graphic("FOO").at(3, 4)))
            .build();
        let lumps = store(&[("FOO", 16, 16, 0, 0)]);
        let node = node_for(&doc, &lumps, ElementId(1)).unwrap();

        doc.remove_element(0, ElementId(1)).unwrap();
        let before = doc.clone();
        assert_eq!(commit_drag(&mut doc, &node, (50, 5), 32), None);
        assert_eq!(doc, before);
    }

    fn any_alignment() -> impl Strategy<Value = Alignment> {
        (0..3u32, 0..3u32).prop_map(|(h, v)| {
            let h = [Alignment::empty(), Alignment::H_MIDDLE, Alignment::H_RIGHT][h as usize];
            let v = [Alignment::empty(), Alignment::V_MIDDLE, Alignment::V_BOTTOM][v as usize];
            h | v
        })
    }

    proptest! {
        #[test]
        fn prop_drag_then_layout_is_stable(
            parent_pos in (-50..350i32, -50..250i32),
            child_pos in (-40..40i32, -40..40i32),
            size in (1..40u32, 1..40u32),
            offset in (-8..8i32, -8..8i32),
            alignment in any_alignment(),
            drags in proptest::collection::vec((-400..800i32, -300..500i32), 1..4),
            height in 20..200i32,
        ) {
            let mut doc = DocumentBuilder::new()
                .with_bar(
                    StatusBarBuilder::new(height).child(
                        ElementBuilder::graphic("PARENT").at(parent_pos.0, parent_pos.1).child(
                            ElementBuilder::graphic("KID")
                                .at(child_pos.0, child_pos.1)
                                .aligned(alignment),
                        ),
                    ),
                )
                .build();
            let lumps = store(&[("PARENT", 4, 4, 0, 0), ("KID", size.0, size.1, offset.0, offset.1)]);

            for raw in drags {
                let node = node_for(&doc, &lumps, ElementId(2)).unwrap();
                let expected = clamp_top_left(raw, node.size, node.alignment, height);
                prop_assert!(commit_drag(&mut doc, &node, raw, height).is_some());

                let node = node_for(&doc, &lumps, ElementId(2)).unwrap();
                prop_assert_eq!(node.draw_pos, expected);
            }
            let parent = doc.find(ElementId(1)).unwrap();
            prop_assert_eq!((parent.x, parent.y), parent_pos);
        }

        #[test]
        fn prop_clamp_bounds(
            raw in (-1000..1000i32, -1000..1000i32),
            size in (1..64u32, 1..64u32),
            alignment in any_alignment(),
            height in 16..200i32,
        ) {
            let (x, y) = clamp_top_left(raw, size, alignment, height);
            if alignment.horizontal() == HAlign::Middle {
                prop_assert_eq!(x, raw.0);
            } else {
                prop_assert!(x >= 0 && x <= SCREEN_WIDTH - size.0 as i32 + 1);
            }
            if alignment.vertical() == VAlign::Middle {
                prop_assert_eq!(y, raw.1);
            } else {
                prop_assert!(y >= 0 && y <= (height - size.1 as i32 + 1).max(0));
            }
        }
    }
}
