//! Plant vital-sign engine.
//!
//! This crate provides:
//! - Plant records with light and soil moisture samples
//! - Rules that turn sensor readings into moods, interactions and waterings
//! - An in-memory plant store keyed by owner and plant name
//! - A thread-safe ingestion service tying them together
//!
//! # Quick Start
//!
//! ```
//! use garden_core::{GardenService, Gardener, Mood, NewPlant, ServiceConfig};
//!
//! let service = GardenService::new(ServiceConfig::new());
//! let fern = NewPlant::new("Fern", Gardener::new("ada", "windowsill"), Mood::Chill);
//! service.add_plant("ada", fern).unwrap();
//!
//! let ack = service.record_water_json("ada", "Fern", r#"{"value": 350}"#).unwrap();
//! assert_eq!(ack.mood(), Mood::Thirsty);
//! println!("{ack}");
//! ```

pub mod clock;
pub mod config;
pub mod plant;
pub mod service;
pub mod store;
pub mod testing;
pub mod vitals;

// Primary public API
pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use plant::{Gardener, Mood, NewPlant, Plant, PlantId, SensorPayload, SensorSample, Stream};
pub use service::{GardenService, PlantCreated, ReadingAck, ServiceError};
pub use store::{PlantKey, PlantStore, StoreError};
pub use testing::{ManualClock, TestHarness};
pub use vitals::{apply_light_reading, apply_water_reading, MoodPolicy, VitalsEngine};
