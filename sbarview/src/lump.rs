//! Graphic lumps exported from a WAD as PNG files.
//!
//! Doom ports store patch offsets in a private `grAb` PNG chunk and use pure
//! magenta as the transparent colour.

use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Transparent colour of Doom graphics.
pub const KEY_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Error, Debug)]
pub enum LumpError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),
}

/// A decoded lump with its authoring offset.
#[derive(Debug, Clone)]
pub struct Lump {
    pub image: Arc<RgbaImage>,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Lump {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
            x_offset: 0,
            y_offset: 0,
        }
    }

    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.x_offset = x;
        self.y_offset = y;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Name to lump lookup used by layout and font loading.
///
/// Lookups never fail hard: a missing lump just means nothing is drawn.
pub trait LumpProvider {
    fn lookup(&self, name: &str) -> Option<&Lump>;
}

/// In-memory lump table. Names are case-insensitive.
#[derive(Debug, Default, Clone)]
pub struct LumpStore {
    lumps: HashMap<String, Lump>,
}

impl LumpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, lump: Lump) {
        self.lumps.insert(name.to_ascii_uppercase(), lump);
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    /// Sorted lump names containing `filter` (case-insensitive).
    pub fn names(&self, filter: Option<&str>) -> Vec<&str> {
        let filter = filter.map(str::to_ascii_uppercase);
        let mut names: Vec<&str> = self
            .lumps
            .keys()
            .map(String::as_str)
            .filter(|name| filter.as_deref().is_none_or(|f| name.contains(f)))
            .collect();
        names.sort_unstable();
        names
    }

    /// Loads every `*.png` in `dir`. The lump name is the upper-cased file stem.
    ///
    /// Files that fail to decode are skipped with a warning; an unreadable
    /// directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, LumpError> {
        if !dir.is_dir() {
            return Err(LumpError::NotADirectory(dir.to_path_buf()));
        }
        let entries = fs::read_dir(dir).map_err(|source| LumpError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut store = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|source| LumpError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_png {
                continue;
            }

            match load_png(&path) {
                Ok(lump) => {
                    log::debug!(
                        "Lump {} {}x{} offset ({}, {})",
                        stem.to_ascii_uppercase(),
                        lump.width(),
                        lump.height(),
                        lump.x_offset,
                        lump.y_offset
                    );
                    store.insert(stem, lump);
                }
                Err(e) => log::warn!("Skipping lump: {}", e),
            }
        }

        log::info!("Loaded {} lumps from {:?}", store.len(), dir);
        Ok(store)
    }
}

impl LumpProvider for LumpStore {
    fn lookup(&self, name: &str) -> Option<&Lump> {
        self.lumps.get(&name.to_ascii_uppercase())
    }
}

/// Decodes a PNG lump, keying out [`KEY_COLOR`] and reading `grAb` offsets.
pub fn load_png(path: &Path) -> Result<Lump, LumpError> {
    let bytes = fs::read(path).map_err(|source| LumpError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| LumpError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .to_rgba8();

    let (x, y) = grab_offsets(&bytes).unwrap_or((0, 0));
    Ok(Lump::new(key_out(image)).with_offset(x, y))
}

/// Makes every [`KEY_COLOR`] pixel fully transparent.
pub fn key_out(mut image: RgbaImage) -> RgbaImage {
    for pixel in image.pixels_mut() {
        if pixel.0[..3] == KEY_COLOR.0[..3] {
            pixel.0[3] = 0;
        }
    }
    image
}

/// Reads the `grAb` chunk of a PNG file: two big-endian i32 offsets.
pub fn grab_offsets(png: &[u8]) -> Option<(i32, i32)> {
    let mut rest = png.strip_prefix(&PNG_SIGNATURE)?;

    while rest.len() >= 12 {
        let len = u32::from_be_bytes(rest[0..4].try_into().ok()?) as usize;
        let kind = &rest[4..8];
        let data = rest.get(8..8 + len)?;

        match kind {
            b"grAb" if len >= 8 => {
                let x = i32::from_be_bytes(data[0..4].try_into().ok()?);
                let y = i32::from_be_bytes(data[4..8].try_into().ok()?);
                return Some((x, y));
            }
            // Offsets precede the image data.
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }
        rest = rest.get(8 + len + 4..)?;
    }
    None
}
