//! Font catalog
//!
//! Resolves the enumerated caption font families against font files installed
//! on the system. The catalog is loaded once at startup and shared with the
//! render workers; a family whose file is missing falls back to the first
//! family that did load, so preview and export always agree on the glyphs.

use std::collections::HashMap;
use std::path::PathBuf;

use ab_glyph::FontArc;

use crate::style::FontFamily;

/// Directories searched for font files, in priority order.
fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts/truetype/dejavu"),
        PathBuf::from("/usr/share/fonts/truetype/liberation"),
        PathBuf::from("/usr/share/fonts/truetype/liberation2"),
        PathBuf::from("/usr/share/fonts/truetype/noto"),
        PathBuf::from("/usr/share/fonts/truetype/freefont"),
        PathBuf::from("/usr/share/fonts/dejavu"),
        PathBuf::from("/usr/share/fonts/liberation"),
        PathBuf::from("/usr/share/fonts/liberation-fonts"),
        PathBuf::from("/usr/share/fonts/noto"),
        PathBuf::from("/usr/share/fonts/gnu-free"),
        PathBuf::from("/usr/share/fonts/TTF"),
        PathBuf::from("/usr/local/share/fonts"),
    ];

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }

    dirs
}

/// File names tried for each family, in priority order.
fn candidate_files(family: FontFamily) -> &'static [&'static str] {
    match family {
        FontFamily::DejaVuSans => &["DejaVuSans.ttf"],
        FontFamily::DejaVuSerif => &["DejaVuSerif.ttf"],
        FontFamily::DejaVuSansMono => &["DejaVuSansMono.ttf"],
        FontFamily::LiberationSans => &["LiberationSans-Regular.ttf"],
        FontFamily::LiberationSerif => &["LiberationSerif-Regular.ttf"],
        FontFamily::LiberationMono => &["LiberationMono-Regular.ttf"],
        FontFamily::NotoSans => &["NotoSans-Regular.ttf", "NotoSans[wdth,wght].ttf"],
        FontFamily::NotoSerif => &["NotoSerif-Regular.ttf", "NotoSerif[wdth,wght].ttf"],
        FontFamily::FreeSans => &["FreeSans.ttf", "FreeSans.otf"],
    }
}

/// Loaded fonts for the enumerated families.
pub struct FontCatalog {
    fonts: HashMap<FontFamily, FontArc>,
    fallback: Option<FontArc>,
}

impl FontCatalog {
    /// Scan the system font directories and load whatever resolves.
    ///
    /// Never fails; an empty catalog simply makes rasterization report
    /// a font failure later.
    pub fn load() -> Self {
        let dirs = search_dirs();
        let mut fonts = HashMap::new();
        let mut fallback = None;

        for &family in FontFamily::all() {
            for name in candidate_files(family) {
                let Some(path) = dirs.iter().map(|d| d.join(name)).find(|p| p.is_file()) else {
                    continue;
                };
                let Ok(bytes) = std::fs::read(&path) else {
                    continue;
                };
                if let Ok(font) = FontArc::try_from_vec(bytes) {
                    if fallback.is_none() {
                        fallback = Some(font.clone());
                    }
                    fonts.insert(family, font);
                    break;
                }
            }
        }

        Self { fonts, fallback }
    }

    /// Catalog with no fonts at all; rasterization reports a font failure.
    pub fn empty() -> Self {
        Self {
            fonts: HashMap::new(),
            fallback: None,
        }
    }

    /// Resolve a family to a loaded font, falling back to the first loaded
    /// font when the family's own file is missing.
    pub fn resolve(&self, family: FontFamily) -> Option<&FontArc> {
        self.fonts.get(&family).or(self.fallback.as_ref())
    }

    /// True when no font file at all could be loaded.
    pub fn is_empty(&self) -> bool {
        self.fallback.is_none()
    }
}
