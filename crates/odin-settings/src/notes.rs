//! Quick notes.

use crate::error::{Result, SettingsError};
use chrono::{DateTime, Utc};
use odin_core::{keys, read_json_or_default, write_json, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Sticky-note colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    /// Default
    #[default]
    Yellow,
    /// Blue
    Blue,
    /// Green
    Green,
    /// Pink
    Pink,
    /// Purple
    Purple,
}

impl NoteColor {
    /// Every color, in picker order.
    pub const ALL: [Self; 5] = [
        Self::Yellow,
        Self::Blue,
        Self::Green,
        Self::Pink,
        Self::Purple,
    ];

    /// Storage identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for NoteColor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown note color: {s}"))
    }
}

/// One quick note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickNote {
    /// Unique id
    pub id: Uuid,
    /// Note text
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Display color
    #[serde(default)]
    pub color: NoteColor,
}

/// Quick notes persisted under `quickNotes`, newest first.
#[derive(Debug, Clone)]
pub struct QuickNotes<S> {
    store: S,
}

impl<S: KeyValueStore> QuickNotes<S> {
    /// Create a note list over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All notes. A corrupt list reads as empty.
    #[must_use]
    pub fn list(&self) -> Vec<QuickNote> {
        read_json_or_default(&self.store, keys::QUICK_NOTES)
    }

    /// Look up a note by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<QuickNote> {
        self.list().into_iter().find(|note| note.id == id)
    }

    /// Add a note at the front of the list.
    pub fn add(&self, content: &str, color: NoteColor) -> Result<QuickNote> {
        let note = QuickNote {
            id: Uuid::new_v4(),
            content: content.to_string(),
            created_at: Utc::now(),
            color,
        };

        let mut notes = self.list();
        notes.insert(0, note.clone());
        self.save(&notes)?;

        debug!(note_id = %note.id, "note added");
        Ok(note)
    }

    /// Replace a note's text and, optionally, its color.
    pub fn update(&self, id: Uuid, content: &str, color: Option<NoteColor>) -> Result<QuickNote> {
        let mut notes = self.list();
        let note = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| SettingsError::NoteNotFound(id.to_string()))?;

        content.clone_into(&mut note.content);
        if let Some(color) = color {
            note.color = color;
        }
        let updated = note.clone();

        self.save(&notes)?;
        debug!(note_id = %id, "note updated");
        Ok(updated)
    }

    /// Delete a note. Returns whether it existed.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let mut notes = self.list();
        let before = notes.len();
        notes.retain(|note| note.id != id);

        if notes.len() == before {
            return Ok(false);
        }

        self.save(&notes)?;
        debug!(note_id = %id, "note deleted");
        Ok(true)
    }

    fn save(&self, notes: &[QuickNote]) -> Result<()> {
        write_json(&self.store, keys::QUICK_NOTES, notes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odin_core::MemoryStore;

    #[test]
    fn test_add_lists_newest_first() {
        let notes = QuickNotes::new(MemoryStore::new());
        let first = notes.add("buy agar", NoteColor::Yellow).unwrap();
        let second = notes.add("autoclave at 3", NoteColor::Blue).unwrap();

        let listed = notes.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], second);
        assert_eq!(listed[1], first);
    }

    #[test]
    fn test_update() {
        let notes = QuickNotes::new(MemoryStore::new());
        let note = notes.add("draft", NoteColor::Yellow).unwrap();

        let updated = notes.update(note.id, "final", Some(NoteColor::Green)).unwrap();
        assert_eq!(updated.content, "final");
        assert_eq!(updated.color, NoteColor::Green);
        assert_eq!(updated.created_at, note.created_at);
        assert_eq!(notes.get(note.id), Some(updated));

        let kept = notes.update(note.id, "again", None).unwrap();
        assert_eq!(kept.color, NoteColor::Green);
    }

    #[test]
    fn test_update_unknown() {
        let notes = QuickNotes::new(MemoryStore::new());
        let err = notes.update(Uuid::new_v4(), "x", None).unwrap_err();
        assert!(matches!(err, SettingsError::NoteNotFound(_)));
    }

    #[test]
    fn test_delete() {
        let notes = QuickNotes::new(MemoryStore::new());
        let note = notes.add("gone soon", NoteColor::Pink).unwrap();

        assert!(notes.delete(note.id).unwrap());
        assert!(!notes.delete(note.id).unwrap());
        assert!(notes.list().is_empty());
    }

    #[test]
    fn test_corrupt_list_reads_empty() {
        let store = MemoryStore::with_entries([(keys::QUICK_NOTES, "[{\"id\": 12}")]);
        assert!(QuickNotes::new(store).list().is_empty());
    }

    #[test]
    fn test_stored_shape() {
        let store = MemoryStore::new();
        let notes = QuickNotes::new(store.clone());
        notes.add("shape", NoteColor::Purple).unwrap();

        let raw = store.get(keys::QUICK_NOTES).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let stored = &value[0];
        assert!(stored["id"].is_string());
        assert!(stored["createdAt"].is_string());
        assert_eq!(stored["content"], "shape");
        assert_eq!(stored["color"], "purple");
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("Green".parse::<NoteColor>().unwrap(), NoteColor::Green);
        assert!("teal".parse::<NoteColor>().is_err());
    }
}
