//! GardenService - the ingestion entry point.
//!
//! Resolves `(owner, plant name)` to a stored record, runs the vital-sign
//! rules on it, and writes the result back. Each get/apply/put runs under a
//! lock for that plant's key, so a reading always sees its predecessor's
//! result; readings for different plants do not wait on each other.

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::plant::{Mood, NewPlant, Plant, SensorPayload, SensorSample, Stream};
use crate::store::{PlantKey, PlantStore, StoreError};
use crate::vitals::VitalsEngine;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from GardenService operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The plant has not been created yet. Expected, not a fault.
    #[error("No plant with the name {plant} owned by {owner} exists")]
    NotFound { owner: String, plant: String },

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}

/// Confirmation that a reading was applied.
#[derive(Debug, Clone)]
pub struct ReadingAck {
    pub owner: String,
    pub stream: Stream,
    pub reading: SensorSample,
    /// The record as stored after the reading.
    pub plant: Plant,
}

impl ReadingAck {
    pub fn mood(&self) -> Mood {
        self.plant.mood
    }
}

impl fmt::Display for ReadingAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}'s lovely plant {} updated {} value: {} at {}",
            self.owner, self.plant.name, self.stream, self.reading.value, self.reading.timestamp
        )
    }
}

/// Confirmation that a plant was created.
#[derive(Debug, Clone)]
pub struct PlantCreated {
    pub owner: String,
    pub plant: Plant,
    /// An earlier plant with the same name was overwritten.
    pub replaced: bool,
}

impl fmt::Display for PlantCreated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "New plant named {} created for {}", self.plant.name, self.owner)
    }
}

/// The plant service.
///
/// Construct one at startup and share it (it is `Send + Sync`); dropping it
/// drops every plant.
pub struct GardenService {
    store: RwLock<PlantStore>,
    key_locks: Mutex<HashMap<PlantKey, Arc<Mutex<()>>>>,
    engine: VitalsEngine,
    clock: Box<dyn Clock>,
}

impl GardenService {
    /// Create a service on the wall clock.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a service with a custom time source.
    pub fn with_clock(config: ServiceConfig, clock: impl Clock + 'static) -> Self {
        Self {
            store: RwLock::new(PlantStore::new()),
            key_locks: Mutex::new(HashMap::new()),
            engine: VitalsEngine::new(config.mood_policy),
            clock: Box::new(clock),
        }
    }

    pub fn engine(&self) -> &VitalsEngine {
        &self.engine
    }

    /// Say hello to a gardener.
    pub fn greet(&self, name: &str) -> String {
        format!("Hello, {name}!")
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a plant for `owner`, opening the owner's namespace if needed.
    ///
    /// A plant with the same name is replaced.
    pub fn add_plant(&self, owner: &str, request: NewPlant) -> Result<PlantCreated, ServiceError> {
        let plant = request.into_plant();
        let key = PlantKey::new(owner, plant.name.clone());

        let lock = self.key_lock(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let replaced = {
            let mut store = self.write_store();
            if store.open_namespace(owner) {
                info!(owner, "Opened gardener namespace");
            }
            store.put(owner, &key.plant, plant.clone())?.is_some()
        };

        if replaced {
            warn!(%key, "Replaced existing plant");
        }
        info!(%key, id = %plant.id, mood = plant.mood.name(), "Plant created");

        Ok(PlantCreated {
            owner: owner.to_string(),
            plant,
            replaced,
        })
    }

    /// Create a plant from a JSON creation request.
    pub fn add_plant_json(&self, owner: &str, body: &str) -> Result<PlantCreated, ServiceError> {
        let request = NewPlant::from_json(body)?;
        self.add_plant(owner, request)
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Apply a light reading, stamped with the current time.
    pub fn record_light(&self, owner: &str, plant: &str, value: i64) -> Result<ReadingAck, ServiceError> {
        self.record(Stream::Light, owner, plant, value)
    }

    /// Apply a soil moisture reading, stamped with the current time.
    pub fn record_water(&self, owner: &str, plant: &str, value: i64) -> Result<ReadingAck, ServiceError> {
        self.record(Stream::Water, owner, plant, value)
    }

    /// Decode a sensor payload and apply it as a light reading.
    pub fn record_light_json(&self, owner: &str, plant: &str, body: &str) -> Result<ReadingAck, ServiceError> {
        let payload = SensorPayload::from_json(body)?;
        self.record_light(owner, plant, payload.value)
    }

    /// Decode a sensor payload and apply it as a soil moisture reading.
    pub fn record_water_json(&self, owner: &str, plant: &str, body: &str) -> Result<ReadingAck, ServiceError> {
        let payload = SensorPayload::from_json(body)?;
        self.record_water(owner, plant, payload.value)
    }

    fn record(&self, stream: Stream, owner: &str, plant: &str, value: i64) -> Result<ReadingAck, ServiceError> {
        // Plants are never removed, so a miss here is final. Checking first
        // keeps unknown names out of the lock table.
        if !self.read_store().contains(owner, plant) {
            return Err(self.not_found(owner, plant));
        }

        let key = PlantKey::new(owner, plant);
        let lock = self.key_lock(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Stamped under the key lock so arrival order matches apply order.
        let reading = SensorSample::new(value, self.clock.now());

        let current = self
            .read_store()
            .get(owner, plant)
            .cloned()
            .ok_or_else(|| self.not_found(owner, plant))?;

        let now = self.clock.now();
        let updated = match stream {
            Stream::Light => self.engine.apply_light(&current, reading, now),
            Stream::Water => self.engine.apply_water(&current, reading, now),
        };

        if updated.mood != current.mood {
            debug!(%key, from = current.mood.name(), to = updated.mood.name(), "Mood changed");
        }
        debug!(%key, %stream, value, plant = ?updated, "Reading applied");

        self.write_store().put(owner, plant, updated.clone())?;

        Ok(ReadingAck {
            owner: owner.to_string(),
            stream,
            reading,
            plant: updated,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up one plant.
    pub fn plant(&self, owner: &str, name: &str) -> Option<Plant> {
        self.read_store().get(owner, name).cloned()
    }

    /// All plants of all owners.
    pub fn plants(&self) -> Vec<Plant> {
        self.read_store().list_all()
    }

    /// One owner's plants; empty if the owner is unknown.
    pub fn plants_of(&self, owner: &str) -> Vec<Plant> {
        self.read_store().list_by_owner(owner)
    }

    /// Current time according to the service's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn not_found(&self, owner: &str, plant: &str) -> ServiceError {
        warn!(owner, plant, "Reading for unknown plant");
        ServiceError::NotFound {
            owner: owner.to_string(),
            plant: plant.to_string(),
        }
    }

    fn key_lock(&self, key: &PlantKey) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    fn read_store(&self) -> RwLockReadGuard<'_, PlantStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, PlantStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GardenService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl fmt::Debug for GardenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GardenService")
            .field("plants", &self.read_store().len())
            .field("policy", &self.engine.policy())
            .finish()
    }
}
