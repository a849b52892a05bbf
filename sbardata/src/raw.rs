//! JSON representation of elements.
//!
//! An element is an object with exactly one key naming its kind, whose value
//! holds the common fields, the kind fields and anything else the file carries:
//!
//! ```json
//! { "graphic": { "x": 0, "y": 168, "alignment": 0, "conditions": null,
//!                "children": null, "patch": "STBAR" } }
//! ```
//!
//! Optional keys missing from the file are remembered in [`OmittedKeys`] and
//! left out again on save.

use crate::types::{
    Alignment, Condition, Element, ElementId, ElementKind, NumberSource, NumberSpec, OmittedKeys,
    StatusBar,
};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Tells an absent key (`None`) from a present one, even when it is `null`.
/// Use with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Value to write for an optional key, or `None` to leave it out.
fn keep<T: PartialEq>(value: T, default: T, omitted: OmittedKeys, key: OmittedKeys) -> Option<T> {
    (!omitted.contains(key) || value != default).then_some(value)
}

fn keep_list<T>(
    list: &Option<Vec<T>>,
    omitted: OmittedKeys,
    key: OmittedKeys,
) -> Option<&Option<Vec<T>>> {
    (!omitted.contains(key) || list.is_some()).then_some(list)
}

#[derive(Deserialize)]
struct Body<K> {
    x: i32,
    y: i32,
    alignment: Alignment,
    #[serde(default, deserialize_with = "present")]
    conditions: Option<Option<Vec<Condition>>>,
    #[serde(default, deserialize_with = "present")]
    children: Option<Option<Vec<Element>>>,
    #[serde(flatten)]
    fields: K,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct BodyRef<'a, K> {
    x: i32,
    y: i32,
    alignment: Alignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    conditions: Option<&'a Option<Vec<Condition>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a Option<Vec<Element>>>,
    #[serde(flatten)]
    fields: K,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Deserialize)]
struct GraphicFields {
    patch: String,
}

#[derive(Serialize)]
struct GraphicRef<'a> {
    patch: &'a str,
}

#[derive(Deserialize)]
struct NumberFields {
    font: String,
    #[serde(rename = "type", default)]
    source: Option<NumberSource>,
    #[serde(default)]
    param: Option<i32>,
    maxlength: i32,
}

#[derive(Serialize)]
struct NumberRef<'a> {
    font: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    source: Option<NumberSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    param: Option<i32>,
    maxlength: i32,
}

impl<'a> NumberRef<'a> {
    fn new(spec: &'a NumberSpec, omitted: OmittedKeys) -> Self {
        Self {
            font: &spec.font,
            source: keep(spec.source, NumberSource::default(), omitted, OmittedKeys::SOURCE),
            param: keep(spec.param, 0, omitted, OmittedKeys::PARAM),
            maxlength: spec.max_length,
        }
    }
}

impl NumberFields {
    fn omitted(&self) -> OmittedKeys {
        let mut omitted = OmittedKeys::empty();
        omitted.set(OmittedKeys::SOURCE, self.source.is_none());
        omitted.set(OmittedKeys::PARAM, self.param.is_none());
        omitted
    }
}

impl From<NumberFields> for NumberSpec {
    fn from(fields: NumberFields) -> Self {
        Self {
            font: fields.font,
            source: fields.source.unwrap_or_default(),
            param: fields.param.unwrap_or_default(),
            max_length: fields.maxlength,
        }
    }
}

#[derive(Deserialize)]
struct StatusBarFields {
    height: i32,
    fullscreenrender: bool,
    #[serde(default, deserialize_with = "present")]
    children: Option<Option<Vec<Element>>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct StatusBarRef<'a> {
    height: i32,
    fullscreenrender: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a Option<Vec<Element>>>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl Serialize for StatusBar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StatusBarRef {
            height: self.height,
            fullscreenrender: self.fullscreen_render,
            children: keep_list(&self.children, self.omitted, OmittedKeys::CHILDREN),
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatusBar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = StatusBarFields::deserialize(deserializer)?;
        let mut omitted = OmittedKeys::empty();
        omitted.set(OmittedKeys::CHILDREN, fields.children.is_none());
        Ok(Self {
            height: fields.height,
            fullscreen_render: fields.fullscreenrender,
            children: fields.children.flatten(),
            extra: fields.extra,
            omitted,
        })
    }
}

#[derive(Deserialize, Serialize)]
struct NoFields {}

fn parse_body<K: for<'de> Deserialize<'de>>(
    kind: &str,
    body: Value,
) -> Result<Body<K>, String> {
    serde_json::from_value(body).map_err(|e| format!("{kind}: {e}"))
}

impl Element {
    fn from_body<K>(
        body: Body<K>,
        field_omissions: impl FnOnce(&K) -> OmittedKeys,
        kind: impl FnOnce(K) -> ElementKind,
    ) -> Self {
        let mut omitted = field_omissions(&body.fields);
        omitted.set(OmittedKeys::CONDITIONS, body.conditions.is_none());
        omitted.set(OmittedKeys::CHILDREN, body.children.is_none());
        Self {
            id: ElementId::default(),
            x: body.x,
            y: body.y,
            alignment: body.alignment,
            conditions: body.conditions.flatten(),
            children: body.children.flatten(),
            kind: kind(body.fields),
            extra: body.extra,
            omitted,
        }
    }

    fn body_ref<K>(&self, fields: K) -> BodyRef<'_, K> {
        BodyRef {
            x: self.x,
            y: self.y,
            alignment: self.alignment,
            conditions: keep_list(&self.conditions, self.omitted, OmittedKeys::CONDITIONS),
            children: keep_list(&self.children, self.omitted, OmittedKeys::CHILDREN),
            fields,
            extra: &self.extra,
        }
    }

    fn from_raw(raw: Map<String, Value>) -> Result<Self, String> {
        if raw.len() != 1 {
            return Err(format!(
                "expected exactly one kind key, found {} ({:?})",
                raw.len(),
                raw.keys().collect::<Vec<_>>()
            ));
        }
        let Some((kind, body)) = raw.into_iter().next() else {
            return Err("empty element".to_string());
        };

        let element = match kind.as_str() {
            "graphic" => Element::from_body(
                parse_body::<GraphicFields>(&kind, body)?,
                |_| OmittedKeys::empty(),
                |f| ElementKind::Graphic { patch: f.patch },
            ),
            "number" => Element::from_body(
                parse_body::<NumberFields>(&kind, body)?,
                NumberFields::omitted,
                |f| ElementKind::Number(f.into()),
            ),
            "percent" => Element::from_body(
                parse_body::<NumberFields>(&kind, body)?,
                NumberFields::omitted,
                |f| ElementKind::Percent(f.into()),
            ),
            "face" => Element::from_body(
                parse_body::<NoFields>(&kind, body)?,
                |_| OmittedKeys::empty(),
                |_| ElementKind::Face,
            ),
            _ => {
                log::debug!("Keeping element of unknown kind '{}'", kind);
                let body = parse_body::<NoFields>(&kind, body)?;
                Element::from_body(body, |_| OmittedKeys::empty(), |_| ElementKind::Other(kind))
            }
        };
        Ok(element)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match &self.kind {
            ElementKind::Graphic { patch } => {
                map.serialize_entry("graphic", &self.body_ref(GraphicRef { patch }))?;
            }
            ElementKind::Number(spec) => {
                let fields = NumberRef::new(spec, self.omitted);
                map.serialize_entry("number", &self.body_ref(fields))?;
            }
            ElementKind::Percent(spec) => {
                let fields = NumberRef::new(spec, self.omitted);
                map.serialize_entry("percent", &self.body_ref(fields))?;
            }
            ElementKind::Face => {
                map.serialize_entry("face", &self.body_ref(NoFields {}))?;
            }
            ElementKind::Other(name) => {
                map.serialize_entry(name, &self.body_ref(NoFields {}))?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Element::from_raw(raw).map_err(D::Error::custom)
    }
}
