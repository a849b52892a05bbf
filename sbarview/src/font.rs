//! Number fonts built from `<stem>NUM0`..`<stem>NUM9`, `<stem>MINUS` and
//! `<stem>PRCNT` lumps, and the strip compositor for number widgets.

use crate::lump::LumpProvider;
use image::{RgbaImage, imageops};
use sbardata::NumberFontDef;
use std::sync::Arc;

/// Widest strip `compose` will allocate.
pub const MAX_STRIP_WIDTH: u32 = 4096;

/// Glyphs of one number font. Any glyph may be missing.
#[derive(Debug, Clone)]
pub struct NumberFont {
    pub name: String,
    digits: [Option<Arc<RgbaImage>>; 10],
    minus: Option<Arc<RgbaImage>>,
    percent: Option<Arc<RgbaImage>>,
    max_width: u32,
    max_height: u32,
}

impl NumberFont {
    /// Resolves the glyph lumps of `def`.
    pub fn load(def: &NumberFontDef, lumps: &impl LumpProvider) -> Self {
        let glyph = |suffix: &str| {
            lumps
                .lookup(&format!("{}{}", def.stem, suffix))
                .map(|lump| Arc::clone(&lump.image))
        };

        let digits: [Option<Arc<RgbaImage>>; 10] =
            std::array::from_fn(|n| glyph(&format!("NUM{n}")));
        let max_width = digits.iter().flatten().map(|d| d.width()).max().unwrap_or(0);
        let max_height = digits.iter().flatten().map(|d| d.height()).max().unwrap_or(0);

        let font = Self {
            name: def.name.clone(),
            digits,
            minus: glyph("MINUS"),
            percent: glyph("PRCNT"),
            max_width,
            max_height,
        };

        let count = font.digit_count();
        if count == 0 {
            log::warn!("Number font {} (stem {}) has no digit glyphs", def.name, def.stem);
        } else {
            log::debug!("Number font {}: {} digit glyphs", def.name, count);
        }
        font
    }

    pub fn digit(&self, n: usize) -> Option<&RgbaImage> {
        self.digits.get(n)?.as_deref()
    }

    pub fn digit_count(&self) -> usize {
        self.digits.iter().flatten().count()
    }

    pub fn minus(&self) -> Option<&RgbaImage> {
        self.minus.as_deref()
    }

    pub fn percent(&self) -> Option<&RgbaImage> {
        self.percent.as_deref()
    }

    /// Widest digit glyph.
    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Tallest digit glyph.
    pub fn max_height(&self) -> u32 {
        self.max_height
    }
}

/// The fonts of a document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    fonts: Vec<NumberFont>,
}

impl FontSet {
    pub fn load(defs: &[NumberFontDef], lumps: &impl LumpProvider) -> Self {
        Self {
            fonts: defs.iter().map(|def| NumberFont::load(def, lumps)).collect(),
        }
    }

    /// First font called `name`.
    pub fn get(&self, name: &str) -> Option<&NumberFont> {
        self.fonts.iter().find(|font| font.name == name)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Draws a number widget: `max_length` slots of the widest digit, plus the
/// percent glyph flush right when `show_percent` is set and the font has one.
///
/// Returns `None` when the font has no digits or the strip would be wider
/// than [`MAX_STRIP_WIDTH`]. Slots hold the zero glyph, advanced by its own
/// width; without a zero glyph they stay empty.
pub fn compose(
    font: &NumberFont,
    _value: i32,
    max_length: i32,
    show_percent: bool,
) -> Option<RgbaImage> {
    // TODO: split `_value` into digits (and a minus sign) instead of repeating zero.
    if font.digit_count() == 0 {
        return None;
    }

    let slots = u32::try_from(max_length).unwrap_or(0);
    let percent = font.percent().filter(|_| show_percent);

    let width = font
        .max_width()
        .checked_mul(slots)
        .and_then(|w| w.checked_add(percent.map_or(0, |pct| pct.width())))
        .filter(|&w| w <= MAX_STRIP_WIDTH);
    let Some(width) = width else {
        log::warn!(
            "Number font {}: {} slots do not fit in {} pixels",
            font.name,
            max_length,
            MAX_STRIP_WIDTH
        );
        return None;
    };

    let mut strip = RgbaImage::new(width, font.max_height());
    if let Some(zero) = font.digit(0) {
        for i in 0..slots {
            imageops::overlay(&mut strip, zero, i64::from(i) * i64::from(zero.width()), 0);
        }
    }
    if let Some(pct) = percent {
        imageops::overlay(&mut strip, pct, i64::from(width - pct.width()), 0);
    }
    Some(strip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lump::{Lump, LumpStore};
    use image::Rgba;

    const ZERO: Rgba<u8> = Rgba([200, 0, 0, 255]);
    const PCT: Rgba<u8> = Rgba([0, 0, 200, 255]);

    fn store_with(glyphs: &[(&str, u32, u32, Rgba<u8>)]) -> LumpStore {
        let mut store = LumpStore::new();
        for &(name, w, h, color) in glyphs {
            store.insert(name, Lump::new(RgbaImage::from_pixel(w, h, color)));
        }
        store
    }

    fn big_red(store: &LumpStore) -> NumberFont {
        NumberFont::load(&NumberFontDef::new("BigRed", "STT"), store)
    }

    #[test]
    fn test_load_glyphs() {
        let store = store_with(&[
            ("STTNUM0", 14, 16, ZERO),
            ("STTNUM1", 10, 16, ZERO),
            ("STTPRCNT", 14, 16, PCT),
        ]);
        let font = big_red(&store);
        assert_eq!(font.digit_count(), 2);
        assert!(font.digit(1).is_some());
        assert!(font.digit(2).is_none());
        assert!(font.minus().is_none());
        assert!(font.percent().is_some());
        assert_eq!((font.max_width(), font.max_height()), (14, 16));
    }

    #[test]
    fn test_compose_repeats_zero() {
        let store = store_with(&[("STTNUM0", 4, 6, ZERO)]);
        let strip = compose(&big_red(&store), 123, 3, false).unwrap();
        assert_eq!(strip.dimensions(), (12, 6));
        for x in [0, 5, 11] {
            assert_eq!(*strip.get_pixel(x, 3), ZERO);
        }
    }

    #[test]
    fn test_compose_percent_flush_right() {
        let store = store_with(&[("STTNUM0", 4, 6, ZERO), ("STTPRCNT", 5, 3, PCT)]);
        let font = big_red(&store);

        let strip = compose(&font, 0, 3, true).unwrap();
        assert_eq!(strip.dimensions(), (17, 6));
        assert_eq!(*strip.get_pixel(12, 0), PCT);
        assert_eq!(*strip.get_pixel(16, 2), PCT);
        assert_eq!(strip.get_pixel(12, 4).0[3], 0);

        // Percent glyph only counts for percent widgets.
        assert_eq!(compose(&font, 0, 3, false).unwrap().width(), 12);
    }

    #[test]
    fn test_compose_uses_widest_digit_for_slots() {
        let store = store_with(&[("STTNUM0", 4, 6, ZERO), ("STTNUM1", 7, 8, ZERO)]);
        let strip = compose(&big_red(&store), 0, 2, false).unwrap();
        assert_eq!(strip.dimensions(), (14, 8));
        // Zero glyphs advance by their own width.
        assert_eq!(*strip.get_pixel(7, 0), ZERO);
        assert_eq!(strip.get_pixel(8, 0).0[3], 0);
    }

    #[test]
    fn test_compose_without_zero_glyph() {
        let store = store_with(&[("STTNUM5", 4, 6, ZERO)]);
        let strip = compose(&big_red(&store), 5, 2, false).unwrap();
        assert_eq!(strip.dimensions(), (8, 6));
        assert!(strip.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_compose_without_digits() {
        let store = store_with(&[("STTPRCNT", 5, 3, PCT)]);
        assert!(compose(&big_red(&store), 0, 3, true).is_none());
    }

    #[test]
    fn test_compose_rejects_oversized_strip() {
        let store = store_with(&[("STTNUM0", 14, 16, ZERO), ("STTPRCNT", 14, 16, PCT)]);
        let font = big_red(&store);
        // 14 * 400M overflows u32.
        assert!(compose(&font, 0, 400_000_000, false).is_none());
        assert!(compose(&font, 0, i32::MAX, true).is_none());
        // Fits without the percent glyph, not with it.
        let slots = (MAX_STRIP_WIDTH / 14) as i32;
        assert!(compose(&font, 0, slots, false).is_some());
        assert!(compose(&font, 0, slots, true).is_none());
    }

    #[test]
    fn test_font_set_first_match_wins() {
        let store = store_with(&[("STTNUM0", 4, 6, ZERO), ("STGNUM0", 2, 2, ZERO)]);
        let defs = vec![
            NumberFontDef::new("Dup", "STG"),
            NumberFontDef::new("Dup", "STT"),
        ];
        let fonts = FontSet::load(&defs, &store);
        assert_eq!(fonts.len(), 2);
        assert_eq!(fonts.get("Dup").unwrap().max_width(), 2);
        assert!(fonts.get("Missing").is_none());
    }
}
