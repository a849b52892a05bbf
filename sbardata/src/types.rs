//! Core types for SBARDEF status bar documents.
//!
//! These mirror the JSON lump shipped in Doom resource archives. Fields the
//! editor does not understand are kept in `extra` maps and written back
//! unchanged.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

bitflags! {
    /// Anchor flags of an element.
    ///
    /// Left and top are the absence of a flag. Middle wins over right/bottom
    /// when both bits of a group are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Alignment: u32 {
        const H_MIDDLE = 0x01;
        const H_RIGHT = 0x02;
        const V_MIDDLE = 0x04;
        const V_BOTTOM = 0x08;

        // Newer ports define more bits; keep them intact.
        const _ = !0;
    }
}

bitflags! {
    /// Optional keys that were absent when an element or bar was loaded.
    ///
    /// They stay out of the saved file while they hold their default value.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct OmittedKeys: u8 {
        const CONDITIONS = 0x01;
        const CHILDREN = 0x02;
        /// `type` of number and percent widgets.
        const SOURCE = 0x04;
        const PARAM = 0x08;
    }
}

/// Horizontal anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Middle,
    Right,
}

/// Vertical anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl Alignment {
    pub fn new(h: HAlign, v: VAlign) -> Self {
        let h = match h {
            HAlign::Left => Alignment::empty(),
            HAlign::Middle => Alignment::H_MIDDLE,
            HAlign::Right => Alignment::H_RIGHT,
        };
        let v = match v {
            VAlign::Top => Alignment::empty(),
            VAlign::Middle => Alignment::V_MIDDLE,
            VAlign::Bottom => Alignment::V_BOTTOM,
        };
        h | v
    }

    pub fn horizontal(self) -> HAlign {
        if self.contains(Alignment::H_MIDDLE) {
            HAlign::Middle
        } else if self.contains(Alignment::H_RIGHT) {
            HAlign::Right
        } else {
            HAlign::Left
        }
    }

    pub fn vertical(self) -> VAlign {
        if self.contains(Alignment::V_MIDDLE) {
            VAlign::Middle
        } else if self.contains(Alignment::V_BOTTOM) {
            VAlign::Bottom
        } else {
            VAlign::Top
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::empty()
    }
}

impl Serialize for Alignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Alignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Alignment::from_bits_retain)
    }
}

/// Condition codes, numbered as in the SBARDEF format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ConditionCode {
    WeaponOwned,
    WeaponSelected,
    WeaponNotSelected,
    WeaponHasAmmo,
    SelectedWeaponHasAmmo,
    SelectedWeaponAmmoType,
    WeaponSlotOwned,
    WeaponSlotNotOwned,
    WeaponSlotSelected,
    WeaponSlotNotSelected,
    ItemOwned,
    ItemNotOwned,
    FeatureLevelGreaterEqual,
    FeatureLevelLess,
    SessionTypeEqual,
    SessionTypeNotEqual,
    ModeEqual,
    ModeNotEqual,
    HudModeEqual,
    /// A code this editor does not know.
    Other(i32),
}

const CONDITION_CODES: [(ConditionCode, &str); 19] = [
    (ConditionCode::WeaponOwned, "weaponowned"),
    (ConditionCode::WeaponSelected, "weaponselected"),
    (ConditionCode::WeaponNotSelected, "weaponnotselected"),
    (ConditionCode::WeaponHasAmmo, "weaponhasammo"),
    (ConditionCode::SelectedWeaponHasAmmo, "selectedweaponhasammo"),
    (ConditionCode::SelectedWeaponAmmoType, "selectedweaponammotype"),
    (ConditionCode::WeaponSlotOwned, "weaponslotowned"),
    (ConditionCode::WeaponSlotNotOwned, "weaponslotnotowned"),
    (ConditionCode::WeaponSlotSelected, "weaponslotselected"),
    (ConditionCode::WeaponSlotNotSelected, "weaponslotnotselected"),
    (ConditionCode::ItemOwned, "itemowned"),
    (ConditionCode::ItemNotOwned, "itemnotowned"),
    (ConditionCode::FeatureLevelGreaterEqual, "featurelevelgreaterequal"),
    (ConditionCode::FeatureLevelLess, "featurelevelless"),
    (ConditionCode::SessionTypeEqual, "sessiontypeequal"),
    (ConditionCode::SessionTypeNotEqual, "sessiontypenotequal"),
    (ConditionCode::ModeEqual, "modeequal"),
    (ConditionCode::ModeNotEqual, "modenotequal"),
    (ConditionCode::HudModeEqual, "hudmodeequal"),
];

impl ConditionCode {
    pub fn name(self) -> Option<&'static str> {
        CONDITION_CODES
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, name)| *name)
    }
}

impl From<i32> for ConditionCode {
    fn from(raw: i32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|i| CONDITION_CODES.get(i))
            .map_or(ConditionCode::Other(raw), |(code, _)| *code)
    }
}

impl From<ConditionCode> for i32 {
    fn from(code: ConditionCode) -> Self {
        match code {
            ConditionCode::Other(raw) => raw,
            known => CONDITION_CODES
                .iter()
                .position(|(c, _)| *c == known)
                .and_then(|i| i32::try_from(i).ok())
                .unwrap_or(-1),
        }
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "condition{}", i32::from(*self)),
        }
    }
}

/// A visibility rule attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "condition")]
    pub code: ConditionCode,
    pub param: i32,
}

impl Condition {
    pub fn new(code: ConditionCode, param: i32) -> Self {
        Self { code, param }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.param)
    }
}

/// Value a number or percent widget displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum NumberSource {
    #[default]
    Health,
    Armor,
    Frags,
    Ammo,
    AmmoSelected,
    MaxAmmo,
    WeaponAmmo,
    WeaponMaxAmmo,
    Other(i32),
}

const NUMBER_SOURCES: [NumberSource; 8] = [
    NumberSource::Health,
    NumberSource::Armor,
    NumberSource::Frags,
    NumberSource::Ammo,
    NumberSource::AmmoSelected,
    NumberSource::MaxAmmo,
    NumberSource::WeaponAmmo,
    NumberSource::WeaponMaxAmmo,
];

impl From<i32> for NumberSource {
    fn from(raw: i32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|i| NUMBER_SOURCES.get(i).copied())
            .unwrap_or(NumberSource::Other(raw))
    }
}

impl From<NumberSource> for i32 {
    fn from(source: NumberSource) -> Self {
        match source {
            NumberSource::Other(raw) => raw,
            known => NUMBER_SOURCES
                .iter()
                .position(|s| *s == known)
                .and_then(|i| i32::try_from(i).ok())
                .unwrap_or(-1),
        }
    }
}

/// Kind-specific fields of number and percent widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSpec {
    /// Name of a [`NumberFontDef`].
    pub font: String,
    pub source: NumberSource,
    pub param: i32,
    /// Number of digit slots.
    pub max_length: i32,
}

impl NumberSpec {
    pub fn new(font: &str, max_length: i32) -> Self {
        Self {
            font: font.to_string(),
            source: NumberSource::default(),
            param: 0,
            max_length,
        }
    }
}

/// The element variant. Serialised as the single key of the element object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Graphic { patch: String },
    Number(NumberSpec),
    Percent(NumberSpec),
    Face,
    /// Widget kinds the editor cannot draw (e.g. `animation`). Children still lay out.
    Other(String),
}

impl ElementKind {
    pub fn name(&self) -> &str {
        match self {
            ElementKind::Graphic { .. } => "graphic",
            ElementKind::Number(_) => "number",
            ElementKind::Percent(_) => "percent",
            ElementKind::Face => "face",
            ElementKind::Other(name) => name,
        }
    }
}

/// Runtime identity of an element, unique within a [`Document`].
///
/// Never serialised. Zero means "not yet assigned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A positioned node of a status bar tree.
///
/// `x`/`y` are relative to the parent's resolved origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub x: i32,
    pub y: i32,
    pub alignment: Alignment,
    /// `None` means unconditionally visible.
    pub conditions: Option<Vec<Condition>>,
    pub children: Option<Vec<Element>>,
    pub kind: ElementKind,
    /// Body fields not modelled above (`tranmap`, `translation`, ...).
    pub extra: Map<String, Value>,
    pub omitted: OmittedKeys,
}

impl Element {
    /// A fresh element at the parent's origin, anchored left/top.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::default(),
            x: 0,
            y: 0,
            alignment: Alignment::empty(),
            conditions: None,
            children: None,
            kind,
            extra: Map::new(),
            omitted: OmittedKeys::empty(),
        }
    }

    pub fn children(&self) -> &[Element] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn conditions(&self) -> &[Condition] {
        self.conditions.as_deref().unwrap_or_default()
    }

    /// Key/value view of the element for a property panel. Children are omitted.
    pub fn properties(&self) -> Vec<(String, String)> {
        let mut props = vec![
            ("kind".to_string(), self.kind.name().to_string()),
            ("x".to_string(), self.x.to_string()),
            ("y".to_string(), self.y.to_string()),
            ("alignment".to_string(), self.alignment.bits().to_string()),
        ];

        let conditions = match &self.conditions {
            None => "none".to_string(),
            Some(list) => list
                .iter()
                .map(Condition::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        };
        props.push(("conditions".to_string(), conditions));

        match &self.kind {
            ElementKind::Graphic { patch } => props.push(("patch".to_string(), patch.clone())),
            ElementKind::Number(spec) | ElementKind::Percent(spec) => {
                props.push(("font".to_string(), spec.font.clone()));
                props.push(("type".to_string(), i32::from(spec.source).to_string()));
                props.push(("param".to_string(), spec.param.to_string()));
                props.push(("maxlength".to_string(), spec.max_length.to_string()));
            }
            ElementKind::Face | ElementKind::Other(_) => {}
        }

        for (key, value) in &self.extra {
            props.push((key.clone(), value.to_string()));
        }
        props
    }
}

/// One selectable HUD layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    pub height: i32,
    pub fullscreen_render: bool,
    pub children: Option<Vec<Element>>,
    pub extra: Map<String, Value>,
    pub omitted: OmittedKeys,
}

impl StatusBar {
    pub fn new(height: i32, fullscreen_render: bool) -> Self {
        Self {
            height,
            fullscreen_render,
            children: None,
            extra: Map::new(),
            omitted: OmittedKeys::empty(),
        }
    }

    pub fn children(&self) -> &[Element] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Name shown in a bar selector.
    pub fn label(&self) -> &'static str {
        if self.fullscreen_render {
            "Fullscreen"
        } else {
            "Statusbar"
        }
    }
}

/// A number font: glyph lumps are `<stem>NUM0`..`<stem>NUM9`, `<stem>MINUS`, `<stem>PRCNT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFontDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub font_type: i32,
    pub stem: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NumberFontDef {
    pub fn new(name: &str, stem: &str) -> Self {
        Self {
            name: name.to_string(),
            font_type: 0,
            stem: stem.to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(rename = "numberfonts", default)]
    pub number_fonts: Vec<NumberFontDef>,
    #[serde(rename = "statusbars")]
    pub status_bars: Vec<StatusBar>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parsed SBARDEF lump.
///
/// Build one with [`Document::from_json`] or [`Document::load`] so element
/// ids get assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    /// `None` when the file has no `metadata` key.
    #[serde(
        default,
        deserialize_with = "crate::raw::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<Value>,
    pub data: DocumentData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub(crate) next_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_groups() {
        let a = Alignment::from_bits_retain(0x02 | 0x04);
        assert_eq!(a.horizontal(), HAlign::Right);
        assert_eq!(a.vertical(), VAlign::Middle);
        assert_eq!(Alignment::empty().horizontal(), HAlign::Left);
        assert_eq!(Alignment::empty().vertical(), VAlign::Top);
    }

    #[test]
    fn test_middle_wins_over_right() {
        let a = Alignment::H_MIDDLE | Alignment::H_RIGHT;
        assert_eq!(a.horizontal(), HAlign::Middle);
    }

    #[test]
    fn test_alignment_keeps_unknown_bits() {
        let a: Alignment = serde_json::from_str("48").unwrap();
        assert_eq!(a.bits(), 48);
        assert_eq!(serde_json::to_string(&a).unwrap(), "48");
    }

    #[test]
    fn test_condition_codes_round_trip_numbers() {
        assert_eq!(ConditionCode::from(1), ConditionCode::WeaponSelected);
        assert_eq!(ConditionCode::from(18), ConditionCode::HudModeEqual);
        assert_eq!(ConditionCode::from(42), ConditionCode::Other(42));
        assert_eq!(i32::from(ConditionCode::ModeEqual), 16);
        assert_eq!(i32::from(ConditionCode::Other(-3)), -3);
    }

    #[test]
    fn test_condition_json_shape() {
        let c: Condition = serde_json::from_str(r#"{"condition": 14, "param": 2}"#).unwrap();
        assert_eq!(c, Condition::new(ConditionCode::SessionTypeEqual, 2));
        assert_eq!(c.to_string(), "sessiontypeequal 2");
    }

    #[test]
    fn test_properties_skip_children() {
        let mut elem = Element::new(ElementKind::Graphic {
            patch: "STBAR".to_string(),
        });
        elem.children = Some(vec![Element::new(ElementKind::Face)]);
        elem.conditions = Some(vec![Condition::new(ConditionCode::WeaponOwned, 3)]);

        let props = elem.properties();
        assert!(props.iter().all(|(k, _)| k != "children"));
        assert!(props.contains(&("patch".to_string(), "STBAR".to_string())));
        assert!(props.contains(&("conditions".to_string(), "weaponowned 3".to_string())));
    }

    #[test]
    fn test_bar_labels() {
        assert_eq!(StatusBar::new(32, false).label(), "Statusbar");
        assert_eq!(StatusBar::new(200, true).label(), "Fullscreen");
    }
}
