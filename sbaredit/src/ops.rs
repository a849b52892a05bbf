use crate::args::{KindArg, StateOverrides};
use anyhow::{Context, Result, bail};
use sbardata::{
    Document, Element, ElementId, ElementKind, GameState, NumberSpec, Parent, StatusBar,
};
use sbarview::{EditorSession, LumpProvider, LumpStore, render_canvas};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub fn require_sbardef(path: Option<&Path>) -> Result<&Path> {
    path.context("no status bar definition given (use --sbardef or SBAREDIT_SBARDEF)")
}

pub fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).with_context(|| format!("Failed to load {:?}", path))
}

/// Lumps from `dir`, or an empty store when no directory is given.
pub fn load_lumps(dir: Option<&Path>) -> Result<LumpStore> {
    match dir {
        Some(dir) => LumpStore::load_dir(dir)
            .with_context(|| format!("Failed to load lumps from {:?}", dir)),
        None => {
            log::warn!("No lump directory given; nothing will be drawn");
            Ok(LumpStore::new())
        }
    }
}

/// Defaults, then the state file, then command line overrides.
pub fn load_state(path: Option<&Path>, overrides: &StateOverrides) -> Result<GameState> {
    let mut state = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read game state {:?}", path))?;
            serde_json::from_str::<GameState>(&json)
                .with_context(|| format!("Failed to parse game state {:?}", path))?
        }
        None => GameState::default(),
    };
    apply_overrides(&mut state, overrides)?;
    Ok(state)
}

pub fn apply_overrides(state: &mut GameState, overrides: &StateOverrides) -> Result<()> {
    if let Some(weapon) = overrides.weapon {
        state.selected_weapon = weapon;
    }
    if let Some(slot) = overrides.slot {
        state.selected_slot = slot;
    }
    if let Some(session) = overrides.session {
        state.session = session;
    }
    if let Some(mode) = overrides.mode {
        state.game_mode = mode;
    }
    if overrides.compact {
        state.compact_hud = true;
    }
    for &weapon in &overrides.without_weapons {
        state.set_weapon_owned(weapon, false);
    }
    for &ammo in &overrides.without_ammo {
        state.set_ammo_owned(ammo, false);
    }
    for &slot in &overrides.without_slots {
        if !state.set_slot_owned(slot, false) {
            bail!("Weapon slot {} out of range (1-7)", slot);
        }
    }
    Ok(())
}

fn count_elements(elems: &[Element]) -> usize {
    elems
        .iter()
        .map(|elem| 1 + count_elements(elem.children()))
        .sum()
}

fn describe_bar(index: usize, bar: &StatusBar) -> String {
    format!(
        "{}: {} (height {}, {} elements)",
        index,
        bar.label(),
        bar.height,
        count_elements(bar.children())
    )
}

pub fn list_bars(doc: &Document) -> String {
    let mut out = String::new();
    for (i, bar) in doc.status_bars().iter().enumerate() {
        let _ = writeln!(out, "{}", describe_bar(i, bar));
    }
    out
}

fn describe_kind(kind: &ElementKind) -> String {
    match kind {
        ElementKind::Graphic { patch } => format!("graphic {}", patch),
        ElementKind::Number(spec) => format!("number {} x{}", spec.font, spec.max_length),
        ElementKind::Percent(spec) => format!("percent {} x{}", spec.font, spec.max_length),
        other => other.name().to_string(),
    }
}

/// One line per drawn node, in draw order.
pub fn describe_layout<L: LumpProvider>(session: &EditorSession<L>) -> String {
    let mut out = String::new();
    for node in session.nodes() {
        let kind = session
            .document()
            .find(node.element)
            .map_or_else(|| "?".to_string(), |elem| describe_kind(&elem.kind));
        let _ = writeln!(
            out,
            "{} {} at ({}, {}) size {}x{}",
            node.element, kind, node.draw_pos.0, node.draw_pos.1, node.size.0, node.size.1
        );
    }
    out
}

pub fn inspect(doc: &Document, id: ElementId) -> Result<String> {
    let Some(elem) = doc.find(id) else {
        bail!("No element {}", id);
    };
    let mut out = String::new();
    if let Some(bar) = doc.bar_of(id) {
        let _ = writeln!(out, "bar: {}", bar);
    }
    for (key, value) in elem.properties() {
        let _ = writeln!(out, "{}: {}", key, value);
    }
    let _ = writeln!(out, "children: {}", elem.children().len());
    Ok(out)
}

pub fn render(session: &EditorSession<LumpStore>, output: &Path) -> Result<()> {
    let canvas = render_canvas(session.nodes(), session.canvas_height());
    canvas
        .save(output)
        .with_context(|| format!("Failed to write {:?}", output))?;
    log::info!("Wrote {} nodes to {:?}", session.nodes().len(), output);
    Ok(())
}

pub fn build_kind(
    kind: KindArg,
    patch: Option<String>,
    font: Option<String>,
    max_length: i32,
) -> Result<ElementKind> {
    Ok(match kind {
        KindArg::Graphic => ElementKind::Graphic {
            patch: patch.context("--patch is required for graphics")?,
        },
        KindArg::Number => {
            let font = font.context("--font is required for numbers")?;
            ElementKind::Number(NumberSpec::new(&font, max_length))
        }
        KindArg::Percent => {
            let font = font.context("--font is required for percents")?;
            ElementKind::Percent(NumberSpec::new(&font, max_length))
        }
        KindArg::Face => ElementKind::Face,
    })
}

pub fn move_element<L: LumpProvider>(
    session: &mut EditorSession<L>,
    id: ElementId,
    top_left: (i32, i32),
) -> Result<(i32, i32)> {
    match session.drag(id, top_left) {
        Some(pos) => Ok(pos),
        None => bail!(
            "Element {} is not drawn on status bar {} (hidden, missing graphics, or removed)",
            id,
            session.active_bar()
        ),
    }
}

pub fn add_element<L: LumpProvider>(
    session: &mut EditorSession<L>,
    parent: Option<u32>,
    kind: ElementKind,
) -> Result<ElementId> {
    let parent = match parent {
        Some(id) => Parent::Element(ElementId(id)),
        None => Parent::Bar(session.active_bar()),
    };
    session
        .add_child(parent, kind)
        .with_context(|| format!("No parent {:?}", parent))
}

pub fn remove_element<L: LumpProvider>(
    session: &mut EditorSession<L>,
    id: ElementId,
) -> Result<Element> {
    session
        .remove(id)
        .with_context(|| format!("No element {} in status bar {}", id, session.active_bar()))
}

pub fn save(doc: &Document, path: &Path) -> Result<()> {
    doc.save(path)
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Where an edited document is written.
pub fn output_path(sbardef: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| sbardef.to_path_buf())
}

pub fn list_lumps(lumps: &LumpStore, filter: Option<&str>) -> String {
    let mut out = String::new();
    for name in lumps.names(filter) {
        if let Some(lump) = lumps.lookup(name) {
            let _ = writeln!(
                out,
                "{} {}x{} offset ({}, {})",
                name,
                lump.width(),
                lump.height(),
                lump.x_offset,
                lump.y_offset
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use sbardata::doom::{AmmoType, SessionType, Weapon};
    use sbardata::testing::sample_document;
    use sbarview::Lump;

    fn sample_session() -> EditorSession<LumpStore> {
        let mut lumps = LumpStore::new();
        lumps.insert("STBAR", Lump::new(RgbaImage::new(320, 32)));
        lumps.insert("STFST00", Lump::new(RgbaImage::new(24, 29)));
        EditorSession::new(sample_document(), lumps, GameState::default())
    }

    #[test]
    fn test_list_bars() {
        let out = list_bars(&sample_document());
        assert_eq!(
            out,
            "0: Statusbar (height 32, 8 elements)\n1: Fullscreen (height 200, 3 elements)\n"
        );
    }

    #[test]
    fn test_describe_layout() {
        let out = describe_layout(&sample_session());
        assert_eq!(
            out,
            "#1 graphic STBAR at (0, 0) size 320x32\n#7 face at (143, 0) size 24x29\n"
        );
    }

    #[test]
    fn test_inspect() {
        let out = inspect(&sample_document(), ElementId(2)).unwrap();
        assert!(out.starts_with("bar: 0\nkind: number\n"));
        assert!(out.contains("conditions: selectedweaponhasammo 0\n"));
        assert!(out.contains("maxlength: 3\n"));
        assert!(out.ends_with("children: 0\n"));
        assert!(inspect(&sample_document(), ElementId(99)).is_err());
    }

    #[test]
    fn test_overrides() {
        let overrides = StateOverrides {
            weapon: Some(Weapon::Bfg),
            session: Some(SessionType::Cooperative),
            compact: true,
            without_weapons: vec![Weapon::Chainsaw],
            without_slots: vec![4],
            without_ammo: vec![AmmoType::Clip],
            ..StateOverrides::default()
        };
        let state = load_state(None, &overrides).unwrap();
        assert_eq!(state.selected_weapon, Weapon::Bfg);
        assert_eq!(state.session, SessionType::Cooperative);
        assert!(state.compact_hud);
        assert!(!state.weapon_owned(Weapon::Chainsaw.code()));
        assert!(!state.slot_owned(4));
        assert!(!state.owns_ammo(AmmoType::Clip));
        assert!(state.owns_ammo(AmmoType::Shell));

        let bad = StateOverrides {
            without_slots: vec![9],
            ..StateOverrides::default()
        };
        assert!(load_state(None, &bad).is_err());
    }

    #[test]
    fn test_state_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"selected_weapon": "shotgun", "selected_slot": 3}"#).unwrap();

        let overrides = StateOverrides {
            slot: Some(5),
            ..StateOverrides::default()
        };
        let state = load_state(Some(path.as_path()), &overrides).unwrap();
        assert_eq!(state.selected_weapon, Weapon::Shotgun);
        assert_eq!(state.selected_slot, 5);
    }

    #[test]
    fn test_build_kind_requires_fields() {
        assert!(build_kind(KindArg::Graphic, None, None, 3).is_err());
        assert!(build_kind(KindArg::Number, Some("X".into()), None, 3).is_err());
        assert_eq!(
            build_kind(KindArg::Face, None, None, 3).unwrap(),
            ElementKind::Face
        );
    }

    #[test]
    fn test_edit_ops() {
        let mut session = sample_session();
        assert_eq!(move_element(&mut session, ElementId(7), (400, 0)).unwrap(), (297, 0));
        // Hidden STGNUM2 cannot be dragged.
        assert!(move_element(&mut session, ElementId(6), (0, 0)).is_err());

        let id = add_element(&mut session, Some(7), ElementKind::Face).unwrap();
        assert_eq!(session.document().find(id).unwrap().x, 0);
        assert!(add_element(&mut session, Some(404), ElementKind::Face).is_err());

        assert!(remove_element(&mut session, ElementId(7)).is_ok());
        assert!(session.document().find(id).is_none());
        assert!(remove_element(&mut session, ElementId(7)).is_err());
    }

    #[test]
    fn test_output_path() {
        let sbardef = Path::new("SBARDEF.json");
        assert_eq!(output_path(sbardef, None), PathBuf::from("SBARDEF.json"));
        assert_eq!(
            output_path(sbardef, Some(PathBuf::from("out.json"))),
            PathBuf::from("out.json")
        );
    }
}
