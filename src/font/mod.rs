//! # Font Management
//!
//! Two pieces with distinct lifecycles:
//!
//! - [`FontLibrary`] is the name → file table. It is built once per run by
//!   scanning font directories and is read-only afterwards. The markup parser
//!   uses it to canonicalize font names.
//! - [`FontContext`] holds the loaded faces for one document. Every font
//!   identity the document references is loaded exactly once, up front. A
//!   font that cannot be found or parsed is replaced by the built-in face and
//!   reported with a warning; it never aborts a render.

pub mod builtin;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Why a font identity could not be turned into a usable face.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("no font named '{0}' in the font library")]
    NotFound(String),
    #[error("failed to read font file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a valid TrueType/OpenType font", .0.display())]
    Parse(PathBuf),
}

/// Lookup table from normalized font names to font files.
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    entries: HashMap<String, PathBuf>,
}

impl FontLibrary {
    /// A library that knows no fonts. Every lookup falls through to paths.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan the given directories (recursively) and register every font file.
    ///
    /// Unreadable directories are skipped silently; an empty library is a
    /// valid outcome.
    pub fn discover(dirs: &[PathBuf]) -> Self {
        let mut library = Self::empty();
        for dir in dirs {
            library.scan_dir(dir, 0);
        }
        log::debug!("font library: {} names registered", library.len());
        library
    }

    /// The usual places fonts live on this platform.
    pub fn system_dirs() -> Vec<PathBuf> {
        let mut dirs = vec![
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
            PathBuf::from("/Library/Fonts"),
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("C:\\Windows\\Fonts"),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join("Library/Fonts"));
        }
        dirs
    }

    fn scan_dir(&mut self, dir: &Path, depth: usize) {
        // Symlink loops in font trees are common enough to bound the walk.
        if depth > 8 {
            return;
        }
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.scan_dir(&path, depth + 1);
            } else if is_font_file(&path) {
                self.register_file(&path);
            }
        }
    }

    /// Register a font file under its file stem and the names in its name table.
    pub fn register_file(&mut self, path: &Path) {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.entries.insert(normalize(stem), path.to_path_buf());
        }
        let Ok(data) = fs::read(path) else {
            return;
        };
        let Ok(face) = ttf_parser::Face::parse(&data, 0) else {
            return;
        };
        for name in face.names() {
            let wanted = name.name_id == ttf_parser::name_id::FAMILY
                || name.name_id == ttf_parser::name_id::FULL_NAME;
            if !wanted || !name.is_unicode() {
                continue;
            }
            if let Some(text) = name.to_string() {
                self.entries
                    .entry(normalize(&text))
                    .or_insert_with(|| path.to_path_buf());
            }
        }
    }

    /// Register a font file under an explicit name.
    pub fn register(&mut self, name: &str, path: impl Into<PathBuf>) {
        self.entries.insert(normalize(name), path.into());
    }

    /// Find the file for a font identity.
    ///
    /// An identity that is already a path to an existing file wins; otherwise
    /// the normalized name (with any font extension stripped) is looked up.
    pub fn locate(&self, id: &str) -> Option<PathBuf> {
        let as_path = Path::new(id);
        if is_font_file(as_path) && as_path.is_file() {
            return Some(as_path.to_path_buf());
        }
        self.entries.get(&normalize(id)).cloned()
    }

    /// The identity text lines should carry for `id`.
    ///
    /// Aliases of one font (family name, full name, file name, path) all map
    /// to the same file path, so they end up in the same style group. Names
    /// the library doesn't know are kept as written.
    pub fn canonical_id(&self, id: &str) -> String {
        match self.locate(id) {
            Some(path) => path.to_string_lossy().into_owned(),
            None => id.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lowercase, drop a trailing font extension and any whitespace.
fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stem = FONT_EXTENSIONS
        .iter()
        .find_map(|ext| lower.strip_suffix(&format!(".{ext}")))
        .unwrap_or(&lower);
    stem.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A TrueType/OpenType font loaded into memory.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl TrueTypeFont {
    pub fn from_data(path: PathBuf, data: Vec<u8>) -> Result<Self, FontLoadError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|_| FontLoadError::Parse(path.clone()))?;
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();
        Ok(Self {
            path,
            data,
            units_per_em,
            ascender,
            descender,
        })
    }

    pub fn open(path: &Path) -> Result<Self, FontLoadError> {
        let data = fs::read(path).map_err(|source| FontLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_data(path.to_path_buf(), data)
    }

    /// Re-parse the face. Parsing only reads table offsets, so this is cheap.
    pub fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }

    pub fn scale(&self, font_size: f64) -> f64 {
        font_size / f64::from(self.units_per_em)
    }
}

/// A face that text can be measured and drawn with.
#[derive(Debug, Clone)]
pub enum FontFace {
    /// The built-in block face, see [`builtin`].
    Builtin,
    TrueType(TrueTypeFont),
}

static BUILTIN_FACE: FontFace = FontFace::Builtin;

/// The faces one document renders with, keyed by font identity.
#[derive(Debug, Default)]
pub struct FontContext {
    faces: HashMap<String, FontFace>,
}

impl FontContext {
    /// A context in which every identity resolves to the built-in face.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load every listed font identity, substituting the built-in face for
    /// any that fail.
    pub fn load<'a>(library: &FontLibrary, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut faces = HashMap::new();
        for id in ids {
            if faces.contains_key(id) {
                continue;
            }
            let face = match load_face(library, id) {
                Ok(font) => {
                    log::debug!("font '{}' loaded from {}", id, font.path.display());
                    FontFace::TrueType(font)
                }
                Err(e) => {
                    log::warn!("{e}; falling back to the built-in font");
                    FontFace::Builtin
                }
            };
            faces.insert(id.to_string(), face);
        }
        Self { faces }
    }

    /// The face for a font identity. Unknown identities get the built-in face.
    pub fn face(&self, id: &str) -> &FontFace {
        self.faces.get(id).unwrap_or(&BUILTIN_FACE)
    }

    /// Whether `id` resolved to a real font file.
    pub fn is_loaded(&self, id: &str) -> bool {
        matches!(self.faces.get(id), Some(FontFace::TrueType(_)))
    }
}

fn load_face(library: &FontLibrary, id: &str) -> Result<TrueTypeFont, FontLoadError> {
    let path = library
        .locate(id)
        .ok_or_else(|| FontLoadError::NotFound(id.to_string()))?;
    TrueTypeFont::open(&path)
}
