//! Theme, settings and quick-note commands.

use crate::error::CommandError;
use crate::state::AppState;
use odin_settings::{NoteColor, Notifier, QuickNote, Settings, Theme};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Active theme and the choices available.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInfo {
    /// Resolved theme
    pub current: Theme,
    /// Whether the current theme is dark
    pub dark: bool,
    /// Every theme, in picker order
    pub available: Vec<Theme>,
}

/// Theme for the current session.
pub fn get_theme(state: &AppState) -> ThemeInfo {
    let current = state.themes().current();
    ThemeInfo {
        current,
        dark: current.is_dark(),
        available: Theme::ALL.to_vec(),
    }
}

/// Pick a theme for the current session.
pub fn set_theme(state: &AppState, theme: &str) -> Result<Theme, CommandError> {
    let theme: Theme = theme.parse()?;
    let user = state.current_user();
    state.themes().set(user.as_deref(), theme)?;
    info!(theme = %theme, "theme changed");
    Ok(theme)
}

/// Settings of the current session.
pub fn get_settings(state: &AppState) -> Settings {
    state.settings().load(state.current_user().as_deref())
}

/// Export settings as pretty JSON.
pub fn export_settings(state: &AppState) -> Result<String, CommandError> {
    Ok(state.settings().export(state.current_user().as_deref())?)
}

/// Import an exported settings document and report the result as a toast.
///
/// A rejected document changes nothing.
pub fn import_settings(
    state: &AppState,
    json: &str,
    notifier: &dyn Notifier,
) -> Result<Settings, CommandError> {
    match state.settings().import(state.current_user().as_deref(), json) {
        Ok(settings) => {
            notifier.success("Settings imported");
            Ok(settings)
        }
        Err(e) => {
            notifier.error(&format!("Settings import failed: {e}"));
            Err(e.into())
        }
    }
}

/// Restore default settings.
pub fn reset_settings(state: &AppState) -> Result<(), CommandError> {
    state.settings().reset(state.current_user().as_deref())?;
    Ok(())
}

/// Quick notes, newest first.
pub fn list_notes(state: &AppState) -> Vec<QuickNote> {
    state.notes().list()
}

fn note_id(id: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(id.trim())
        .map_err(|_| CommandError::new("NOTE_NOT_FOUND", format!("Note not found: {id}")))
}

fn note_color(color: Option<&str>) -> Result<Option<NoteColor>, CommandError> {
    color
        .map(|c| c.parse().map_err(|e: String| CommandError::new("INVALID_COLOR", e)))
        .transpose()
}

/// Add a quick note.
pub fn add_note(
    state: &AppState,
    content: &str,
    color: Option<&str>,
) -> Result<QuickNote, CommandError> {
    let color = note_color(color)?.unwrap_or_default();
    Ok(state.notes().add(content, color)?)
}

/// Edit a quick note.
pub fn update_note(
    state: &AppState,
    id: &str,
    content: &str,
    color: Option<&str>,
) -> Result<QuickNote, CommandError> {
    let color = note_color(color)?;
    Ok(state.notes().update(note_id(id)?, content, color)?)
}

/// Delete a quick note.
pub fn delete_note(state: &AppState, id: &str) -> Result<(), CommandError> {
    if state.notes().delete(note_id(id)?)? {
        Ok(())
    } else {
        Err(CommandError::new("NOTE_NOT_FOUND", format!("Note not found: {id}")))
    }
}
