//! Everything between a parsed SBARDEF document and pixels: lump and font
//! lookup, layout of a status bar for a given game state, drag commits and an
//! editing session tying them together.

pub mod edit;
pub mod font;
pub mod layout;
pub mod lump;
pub mod render;
pub mod session;

pub use edit::{clamp_top_left, commit_drag};
pub use font::{FontSet, NumberFont, compose};
pub use layout::{PositionedNode, anchor_to_top_left, layout, top_left_to_anchor};
pub use lump::{Lump, LumpError, LumpProvider, LumpStore};
pub use render::render_canvas;
pub use session::EditorSession;
