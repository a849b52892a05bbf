//! SBARDEF status bar documents: the JSON model, Doom's static tables, the
//! game state used for previews and the condition rules that decide which
//! elements are visible.

pub mod conditions;
pub mod document;
pub mod doom;
pub mod error;
mod raw;
pub mod state;
pub mod testing;
pub mod types;

pub use document::Parent;
pub use error::DocumentError;
pub use state::GameState;
pub use types::{
    Alignment, Condition, ConditionCode, Document, Element, ElementId, ElementKind, HAlign,
    NumberFontDef, NumberSource, NumberSpec, OmittedKeys, StatusBar, VAlign,
};
