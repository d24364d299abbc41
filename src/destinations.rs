//! Destination list editing and the preset address catalogue.
//!
//! The list holds the stops the user wants visited, excluding the fixed
//! start. Slots may be blank while the user is editing; only filled slots
//! are dispatched to a solver.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// Slots a fresh list starts with, and the floor `remove_slot` keeps.
pub const MIN_EDITABLE_SLOTS: usize = 2;

/// Identifier of an entry in the preset catalogue.
pub type PresetId = usize;

/// A named address the user can pick instead of typing it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("invalid preset catalogue: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("preset id {0} appears more than once")]
    DuplicateId(PresetId),
}

/// Static, read-only mapping from preset id to address.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalogue {
    presets: Vec<Preset>,
}

impl PresetCatalogue {
    pub fn new(presets: Vec<Preset>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::new();
        for preset in &presets {
            if !seen.insert(preset.id) {
                return Err(CatalogueError::DuplicateId(preset.id));
            }
        }
        Ok(Self { presets })
    }

    /// Loads a catalogue from a JSON array of `{id, name, address}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        let presets: Vec<Preset> = serde_json::from_str(json)?;
        Self::new(presets)
    }

    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }
}

/// Ordered, editable address slots plus the presets picked so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationList {
    slots: Vec<String>,
    /// Presets in the order they were picked. The length doubles as the
    /// index of the next slot a preset fills.
    selected: Vec<PresetId>,
}

impl Default for DestinationList {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationList {
    pub fn new() -> Self {
        Self {
            slots: vec![String::new(); MIN_EDITABLE_SLOTS],
            selected: Vec::new(),
        }
    }

    /// Builds a list from existing addresses, padded to the editable minimum.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: Vec<String> = addresses.into_iter().map(Into::into).collect();
        if slots.len() < MIN_EDITABLE_SLOTS {
            slots.resize(MIN_EDITABLE_SLOTS, String::new());
        }
        Self {
            slots,
            selected: Vec::new(),
        }
    }

    /// Replaces the address at `index`. Returns false for a stale index.
    pub fn set_address(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn append_slot(&mut self) {
        self.slots.push(String::new());
    }

    /// Removes the slot at `index` while more than two slots remain.
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.slots.len() <= MIN_EDITABLE_SLOTS || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        true
    }

    /// Writes a preset's address into the next preset slot.
    ///
    /// Presets fill slots 0, 1, 2, ... in the order they are picked. Picking
    /// a preset a second time changes nothing. Returns true when a slot was
    /// written.
    pub fn select_preset(&mut self, preset: &Preset) -> bool {
        if self.is_selected(preset.id) {
            return false;
        }

        let index = self.selected.len();
        while self.slots.len() <= index {
            self.slots.push(String::new());
        }
        self.slots[index] = preset.address.clone();
        self.selected.push(preset.id);
        true
    }

    pub fn is_selected(&self, id: PresetId) -> bool {
        self.selected.contains(&id)
    }

    /// Preset ids in pick order.
    pub fn selected(&self) -> &[PresetId] {
        &self.selected
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Non-blank addresses in authoring order, trimmed.
    pub fn filled(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.trim())
            .filter(|slot| !slot.is_empty())
            .map(str::to_string)
            .collect()
    }
}
