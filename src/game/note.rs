//=========================================================================
// Notes
//=========================================================================
//
// Note assets and the marker capability that attaches them to entities.
//
// Responsibilities:
// - `NoteContent`: a named text asset, loadable from TOML
// - `NoteMarker`: entity capability holding a shared note reference
// - `NoteLibrary`: notes loaded from a directory, resolved by name
//
// Ownership:
// ```text
//   NoteLibrary ──┬─► SharedNote (Arc<RwLock<NoteContent>>)
//   NoteMarker ───┘        ▲
//   NoteMarker ────────────┘   any number of markers per note
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::entity::{Capability, Readable};
use crate::error::{NotesError, Result};

//=== NoteContent =========================================================

/// A named, multi-line text asset.
///
/// File format:
/// ```toml
/// name = "first-entry"
/// text = """
/// Day one. The lights in the east wing flicker again.
/// """
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteContent {
    #[serde(default)]
    name: String,

    #[serde(default)]
    text: String,
}

/// A note shared between the library and every marker that shows it.
pub type SharedNote = Arc<RwLock<NoteContent>>;

impl NoteContent {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current text.
    pub fn content(&self) -> &str {
        &self.text
    }

    /// Overwrites the text.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Loads a note file. A missing `name` falls back to the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| NotesError::io(path, e))?;
        let mut note: Self = toml::from_str(&source).map_err(|e| NotesError::parse(path, e))?;

        if note.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                note.name = stem.to_string_lossy().into_owned();
            }
        }
        Ok(note)
    }

    pub fn into_shared(self) -> SharedNote {
        Arc::new(RwLock::new(self))
    }
}

//=== NoteMarker ==========================================================

/// Capability marking an entity as a readable note.
#[derive(Debug, Clone, Default)]
pub struct NoteMarker {
    note: Option<SharedNote>,
}

impl NoteMarker {
    pub fn new(note: SharedNote) -> Self {
        Self { note: Some(note) }
    }

    /// A marker with no note attached. It reads as empty text.
    pub fn empty() -> Self {
        Self { note: None }
    }

    /// Text of the attached note, or `""` when there is none.
    pub fn content(&self) -> String {
        self.note
            .as_ref()
            .map(|note| note.read().content().to_owned())
            .unwrap_or_default()
    }

    pub fn note(&self) -> Option<&SharedNote> {
        self.note.as_ref()
    }
}

impl Readable for NoteMarker {
    fn read(&self) -> String {
        self.content()
    }
}

impl Capability for NoteMarker {
    fn as_readable(&self) -> Option<&dyn Readable> {
        Some(self)
    }
}

//=== NoteLibrary =========================================================

/// Notes available to a level, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct NoteLibrary {
    notes: BTreeMap<String, SharedNote>,
}

impl NoteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.toml` file in `dir`, in file name order.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| NotesError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| NotesError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut library = Self::new();
        for path in &paths {
            let note = NoteContent::load(path)?;
            debug!("Loaded note '{}' from {}", note.name(), path.display());
            library.insert(note);
        }

        info!("Loaded {} notes from {}", library.len(), dir.display());
        Ok(library)
    }

    /// Adds a note, replacing any note of the same name.
    pub fn insert(&mut self, note: NoteContent) -> SharedNote {
        let name = note.name().to_owned();
        let shared = note.into_shared();
        if self.notes.insert(name.clone(), Arc::clone(&shared)).is_some() {
            warn!("Note '{}' defined twice, keeping the later one", name);
        }
        shared
    }

    pub fn get(&self, name: &str) -> Option<SharedNote> {
        self.notes.get(name).cloned()
    }

    /// Marker for a named note. An unknown name yields an empty marker.
    pub fn marker(&self, name: &str) -> NoteMarker {
        match self.get(name) {
            Some(note) => NoteMarker::new(note),
            None => {
                warn!("Unknown note '{}', marker left empty", name);
                NoteMarker::empty()
            }
        }
    }

    /// Copies every note of `other` into this library.
    pub fn merge(&mut self, other: &NoteLibrary) {
        for (name, note) in &other.notes {
            self.notes.insert(name.clone(), Arc::clone(note));
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.notes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
