//! Flattening a layout into a preview image.

use crate::layout::PositionedNode;
use crate::lump::KEY_COLOR;
use image::{RgbaImage, imageops};
use sbardata::doom::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Paints `nodes` in order over a `SCREEN_WIDTH` x `height` canvas filled
/// with the key colour. Parts outside the canvas are cut off.
///
/// `height` is clamped to `0..=SCREEN_HEIGHT`.
pub fn render_canvas(nodes: &[PositionedNode], height: i32) -> RgbaImage {
    let height = height.clamp(0, SCREEN_HEIGHT) as u32;
    let mut canvas = RgbaImage::from_pixel(SCREEN_WIDTH as u32, height, KEY_COLOR);
    for node in nodes {
        imageops::overlay(
            &mut canvas,
            node.raster.as_ref(),
            i64::from(node.draw_pos.0),
            i64::from(node.draw_pos.1),
        );
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use sbardata::{Alignment, ElementId};
    use std::sync::Arc;

    fn node(x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) -> PositionedNode {
        PositionedNode {
            element: ElementId(1),
            draw_pos: (x, y),
            size: (w, h),
            alignment: Alignment::empty(),
            origin_diff: (0, 0),
            raster: Arc::new(RgbaImage::from_pixel(w, h, color)),
        }
    }

    #[test]
    fn test_background_and_overlay_order() {
        let red = Rgba([255, 0, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let canvas = render_canvas(&[node(0, 0, 4, 4, red), node(2, 2, 4, 4, blue)], 32);

        assert_eq!(canvas.dimensions(), (320, 32));
        assert_eq!(*canvas.get_pixel(1, 1), red);
        assert_eq!(*canvas.get_pixel(3, 3), blue);
        assert_eq!(*canvas.get_pixel(10, 10), KEY_COLOR);
    }

    #[test]
    fn test_transparent_pixels_show_background() {
        let clear = Rgba([1, 2, 3, 0]);
        let canvas = render_canvas(&[node(0, 0, 4, 4, clear)], 8);
        assert_eq!(*canvas.get_pixel(0, 0), KEY_COLOR);
    }

    #[test]
    fn test_clips_offscreen_nodes() {
        let red = Rgba([255, 0, 0, 255]);
        let canvas = render_canvas(&[node(318, -2, 4, 4, red), node(-2, 40, 4, 4, red)], 32);
        assert_eq!(*canvas.get_pixel(319, 0), red);
        assert_eq!(*canvas.get_pixel(319, 2), KEY_COLOR);
        assert_eq!(*canvas.get_pixel(0, 31), KEY_COLOR);
    }

    #[test]
    fn test_height_limited_to_screen() {
        assert_eq!(render_canvas(&[], i32::MAX).dimensions(), (320, 200));
        assert_eq!(render_canvas(&[], -5).dimensions(), (320, 0));
    }
}
