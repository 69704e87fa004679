//! Mark store - the registry holding every mark by its unique label.

mod shared;

pub use shared::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::marks::{Mark, TriggerEdit};

/// Errors reported by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a mark labelled '{label}' already exists")]
    LabelTaken { label: String },

    #[error("no mark labelled '{label}'")]
    NotFound { label: String },

    #[error("mark labels must not be empty")]
    EmptyLabel,

    #[error("invalid mark snapshot: {0}")]
    Snapshot(String),
}

/// All marks known to the editor, keyed by label.
///
/// Iteration follows label order, so evaluation over the whole store is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkStore {
    marks: BTreeMap<String, Mark>,
}

impl MarkStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mark, overwriting any existing mark with the same label.
    pub fn save(&mut self, mut mark: Mark) -> Result<(), StoreError> {
        if mark.label.trim().is_empty() {
            return Err(StoreError::EmptyLabel);
        }
        if mark.margin < 0.0 || !mark.margin.is_finite() {
            mark.set_margin(mark.margin);
        }
        debug!(label = %mark.label, "saving mark");
        self.marks.insert(mark.label.clone(), mark);
        Ok(())
    }

    /// Get a mark by label.
    pub fn get(&self, label: &str) -> Option<&Mark> {
        self.marks.get(label)
    }

    /// Edit a stored mark in place.
    ///
    /// The mark keeps its key: a label changed inside `edit` is put back (use
    /// [`MarkStore::rename`] to move a mark), and the margin is re-clamped afterwards.
    pub fn update<R>(&mut self, label: &str, edit: impl FnOnce(&mut Mark) -> R) -> Result<R, StoreError> {
        let mark = self.marks.get_mut(label).ok_or_else(|| StoreError::NotFound {
            label: label.to_string(),
        })?;

        let result = edit(mark);

        if mark.label != label {
            warn!(label, attempted = %mark.label, "label edits go through rename, keeping key");
            mark.label = label.to_string();
        }
        if mark.margin < 0.0 || !mark.margin.is_finite() {
            mark.set_margin(mark.margin);
        }
        Ok(result)
    }

    /// Check whether a mark with this label exists.
    pub fn contains(&self, label: &str) -> bool {
        self.marks.contains_key(label)
    }

    /// Remove a mark, returning it if it existed.
    pub fn remove(&mut self, label: &str) -> Option<Mark> {
        self.marks.remove(label)
    }

    /// Move a mark to a new label.
    ///
    /// Fails without touching the store if `to` is already taken or `from` is missing.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        if to.trim().is_empty() {
            return Err(StoreError::EmptyLabel);
        }
        if !self.marks.contains_key(from) {
            return Err(StoreError::NotFound {
                label: from.to_string(),
            });
        }
        if from == to {
            return Ok(());
        }
        if self.marks.contains_key(to) {
            warn!(from, to, "rename rejected, label already in use");
            return Err(StoreError::LabelTaken {
                label: to.to_string(),
            });
        }

        if let Some(mut mark) = self.marks.remove(from) {
            mark.label = to.to_string();
            self.marks.insert(to.to_string(), mark);
        }
        Ok(())
    }

    /// Apply margin and angle values from the editing form.
    pub fn apply_trigger_edit(&mut self, label: &str, edit: TriggerEdit) -> Result<(), StoreError> {
        self.update(label, |mark| edit.apply_to(mark))
    }

    /// Replace the narration metadata of a mark.
    pub fn set_description(
        &mut self,
        label: &str,
        keyword: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<(), StoreError> {
        let (keyword, details) = (keyword.into(), details.into());
        self.update(label, |mark| {
            mark.keyword = keyword;
            mark.details = details;
        })
    }

    /// Remove every mark.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Get the number of stored marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Check whether the store holds no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// All labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.marks.keys().map(String::as_str)
    }

    /// All marks in label order.
    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.values()
    }

    /// Marks present in the scene, in scene order.
    ///
    /// Scene labels without a stored mark are skipped.
    pub fn candidates<'a, I, S>(&'a self, scene_labels: I) -> Vec<&'a Mark>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        scene_labels
            .into_iter()
            .filter_map(|label| self.marks.get(label.as_ref()))
            .collect()
    }

    /// Serialize the store to a JSON string.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    /// Rebuild a store from a JSON snapshot.
    ///
    /// Keys are authoritative: each mark's label is reset to its key, and negative
    /// margins are clamped.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let raw: Self = serde_json::from_str(json).map_err(|e| StoreError::Snapshot(e.to_string()))?;

        let mut store = Self::new();
        for (label, mut mark) in raw.marks {
            mark.label = label;
            store.save(mark)?;
        }
        Ok(store)
    }
}
