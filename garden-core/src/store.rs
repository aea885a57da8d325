//! Plant store keyed by owner and plant name.

use crate::plant::Plant;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Errors from store writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No gardener named {0} has a namespace")]
    UnknownOwner(String),

    #[error("Plant {found} cannot be stored under the name {expected}")]
    KeyMismatch { expected: String, found: String },
}

/// Where a plant lives: its owner's name, then its own name.
///
/// This is the only lookup key; plant IDs are payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlantKey {
    pub owner: String,
    pub plant: String,
}

impl PlantKey {
    pub fn new(owner: impl Into<String>, plant: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            plant: plant.into(),
        }
    }
}

impl fmt::Display for PlantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.plant)
    }
}

/// All plants, grouped by owner.
///
/// Ordered by key, so listings come out sorted by owner and then by name.
#[derive(Debug, Clone, Default)]
pub struct PlantStore {
    /// Owners allowed to hold plants.
    namespaces: BTreeSet<String>,
    plants: BTreeMap<PlantKey, Plant>,
}

impl PlantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for an owner's plants. Returns false if it already existed.
    pub fn open_namespace(&mut self, owner: impl Into<String>) -> bool {
        self.namespaces.insert(owner.into())
    }

    pub fn has_namespace(&self, owner: &str) -> bool {
        self.namespaces.contains(owner)
    }

    /// Look up a plant.
    pub fn get(&self, owner: &str, plant: &str) -> Option<&Plant> {
        self.plants.get(&PlantKey::new(owner, plant))
    }

    pub fn contains(&self, owner: &str, plant: &str) -> bool {
        self.get(owner, plant).is_some()
    }

    /// Store a plant, replacing whatever was there.
    ///
    /// The owner's namespace must already be open, and the record's name must
    /// match `plant`. Returns the record it replaced, if any.
    pub fn put(&mut self, owner: &str, plant: &str, record: Plant) -> Result<Option<Plant>, StoreError> {
        if !self.namespaces.contains(owner) {
            return Err(StoreError::UnknownOwner(owner.to_string()));
        }
        if record.name != plant {
            return Err(StoreError::KeyMismatch {
                expected: plant.to_string(),
                found: record.name,
            });
        }
        Ok(self.plants.insert(PlantKey::new(owner, plant), record))
    }

    /// Every plant of every owner.
    pub fn list_all(&self) -> Vec<Plant> {
        self.plants.values().cloned().collect()
    }

    /// One owner's plants. Unknown owners simply have none.
    pub fn list_by_owner(&self, owner: &str) -> Vec<Plant> {
        self.plants
            .range(PlantKey::new(owner, "")..)
            .take_while(|(key, _)| key.owner == owner)
            .map(|(_, plant)| plant.clone())
            .collect()
    }

    /// Number of stored plants.
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}
