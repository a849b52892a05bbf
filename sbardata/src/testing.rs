//! Builders and fixtures for tests across the workspace.

use crate::types::{
    Alignment, Condition, ConditionCode, Document, Element, ElementKind, NumberFontDef,
    NumberSpec, StatusBar,
};

/// A trimmed Doom status bar plus a fullscreen HUD.
///
/// Element ids in pre-order: bar 0 holds 1..=8 (STBAR, ammo number, health
/// percent, STARMS with two slot children, face, armor percent), bar 1 holds
/// 9..=11 (face, animation, frag number).
pub const SAMPLE_SBARDEF: &str = r#"{
  "type": "statusbar",
  "version": "1.0.0",
  "metadata": null,
  "data": {
    "numberfonts": [
      { "name": "BigRed", "type": 0, "stem": "STT" },
      { "name": "SmallGray", "type": 0, "stem": "STG" }
    ],
    "statusbars": [
      {
        "height": 32,
        "fullscreenrender": false,
        "fillflat": null,
        "children": [
          { "graphic": { "x": 0, "y": 0, "alignment": 0, "tranmap": null, "translation": null,
                         "conditions": null, "children": null, "patch": "STBAR" } },
          { "number": { "x": 44, "y": 3, "alignment": 2, "tranmap": null, "translation": null,
                        "conditions": [ { "condition": 4, "param": 0 } ], "children": null,
                        "font": "BigRed", "type": 4, "param": 0, "maxlength": 3 } },
          { "percent": { "x": 90, "y": 3, "alignment": 2, "tranmap": null, "translation": null,
                         "conditions": null, "children": null,
                         "font": "BigRed", "type": 0, "param": 0, "maxlength": 3 } },
          { "graphic": { "x": 104, "y": 0, "alignment": 0, "tranmap": null, "translation": null,
                         "conditions": [ { "condition": 14, "param": 0 } ],
                         "children": [
                           { "graphic": { "x": 7, "y": 4, "alignment": 0,
                                          "conditions": [ { "condition": 6, "param": 2 } ],
                                          "children": null, "patch": "STYSNUM2" } },
                           { "graphic": { "x": 7, "y": 4, "alignment": 0,
                                          "conditions": [ { "condition": 7, "param": 2 } ],
                                          "children": null, "patch": "STGNUM2" } }
                         ],
                         "patch": "STARMS" } },
          { "face": { "x": 143, "y": 0, "alignment": 0, "tranmap": null, "translation": null,
                      "conditions": null, "children": null } },
          { "percent": { "x": 221, "y": 3, "alignment": 2, "tranmap": null, "translation": null,
                         "conditions": null, "children": null,
                         "font": "BigRed", "type": 1, "param": 0, "maxlength": 3 } }
        ]
      },
      {
        "height": 200,
        "fullscreenrender": true,
        "fillflat": null,
        "children": [
          { "face": { "x": 160, "y": 198, "alignment": 9,
                      "conditions": [ { "condition": 18, "param": 0 } ], "children": null } },
          { "animation": { "x": 4, "y": 4, "alignment": 0, "conditions": null,
                           "children": [
                             { "number": { "x": 2, "y": 2, "alignment": 0, "conditions": null,
                                           "children": null, "font": "SmallGray", "type": 2,
                                           "param": 0, "maxlength": 2 } }
                           ],
                           "frames": [ { "lump": "STFST00", "duration": 1.0 } ] } }
        ]
      }
    ]
  }
}"#;

/// Fluent construction of elements for tests.
pub struct ElementBuilder {
    element: Element,
}

impl ElementBuilder {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            element: Element::new(kind),
        }
    }

    pub fn graphic(patch: &str) -> Self {
        Self::new(ElementKind::Graphic {
            patch: patch.to_string(),
        })
    }

    pub fn number(font: &str, max_length: i32) -> Self {
        Self::new(ElementKind::Number(NumberSpec::new(font, max_length)))
    }

    pub fn percent(font: &str, max_length: i32) -> Self {
        Self::new(ElementKind::Percent(NumberSpec::new(font, max_length)))
    }

    pub fn face() -> Self {
        Self::new(ElementKind::Face)
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.element.x = x;
        self.element.y = y;
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.element.alignment = alignment;
        self
    }

    pub fn when(mut self, code: ConditionCode, param: i32) -> Self {
        self.element
            .conditions
            .get_or_insert_with(Vec::new)
            .push(Condition::new(code, param));
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.element
            .children
            .get_or_insert_with(Vec::new)
            .push(child.build());
        self
    }

    pub fn build(self) -> Element {
        self.element
    }
}

pub struct StatusBarBuilder {
    bar: StatusBar,
}

impl StatusBarBuilder {
    pub fn new(height: i32) -> Self {
        Self {
            bar: StatusBar::new(height, false),
        }
    }

    pub fn fullscreen(mut self) -> Self {
        self.bar.fullscreen_render = true;
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.bar
            .children
            .get_or_insert_with(Vec::new)
            .push(child.build());
        self
    }

    pub fn build(self) -> StatusBar {
        self.bar
    }
}

pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
        }
    }

    pub fn with_font(mut self, name: &str, stem: &str) -> Self {
        self.doc
            .data
            .number_fonts
            .push(NumberFontDef::new(name, stem));
        self
    }

    pub fn with_bar(mut self, bar: StatusBarBuilder) -> Self {
        self.doc.data.status_bars.push(bar.build());
        self
    }

    /// Assigns element ids in pre-order, like a freshly loaded file.
    pub fn build(mut self) -> Document {
        self.doc.assign_ids();
        self.doc
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses [`SAMPLE_SBARDEF`].
pub fn sample_document() -> Document {
    match Document::from_json(SAMPLE_SBARDEF) {
        Ok(doc) => doc,
        Err(e) => panic!("sample SBARDEF must parse: {e}"),
    }
}
