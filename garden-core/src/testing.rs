//! Testing utilities for the plant service.
//!
//! This module provides tools for integration testing:
//! - `ManualClock` for deterministic time
//! - `TestHarness` for scripted reading sequences
//! - Assertion helpers for verifying plant state

use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::plant::{Gardener, Mood, NewPlant, Plant, SensorSample};
use crate::service::{GardenService, PlantCreated, ReadingAck, ServiceError};
use crate::vitals::MoodPolicy;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the service.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(harness_epoch())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The instant every harness starts at.
pub fn harness_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_714_564_800, 0)
        .single()
        .unwrap_or_default()
}

/// Test harness for running reading scenarios against one gardener.
pub struct TestHarness {
    /// The service under test.
    pub service: GardenService,
    /// Shared handle to the service's clock.
    pub clock: ManualClock,
    /// Owner used by the convenience methods.
    pub owner: Gardener,
}

impl TestHarness {
    /// Create a harness with the default (last-write-wins) policy.
    pub fn new() -> Self {
        Self::with_policy(MoodPolicy::LastWriteWins)
    }

    /// Create a harness with a specific mood policy.
    pub fn with_policy(policy: MoodPolicy) -> Self {
        let clock = ManualClock::default();
        let config = ServiceConfig::new().with_mood_policy(policy);
        Self {
            service: GardenService::with_clock(config, clock.clone()),
            clock,
            owner: Gardener::new("ada", "grows things on the windowsill"),
        }
    }

    /// Create a plant whose streams last reported `light` and `water` right
    /// now, with no interaction for `idle` beforehand.
    pub fn plant_with(
        &mut self,
        name: &str,
        light: i64,
        water: i64,
        idle: Duration,
    ) -> Result<PlantCreated, ServiceError> {
        let now = self.clock.now();
        let request = NewPlant::new(name, self.owner.clone(), Mood::Chill)
            .with_image(format!("{}.png", name.to_lowercase()))
            .with_light(SensorSample::new(light, now))
            .with_water(SensorSample::new(water, now))
            .with_last_interaction(now - idle)
            .with_last_watered(now - idle);
        self.service.add_plant(&self.owner.name, request)
    }

    /// Let time pass.
    pub fn wait(&mut self, by: Duration) -> &mut Self {
        self.clock.advance(by);
        self
    }

    /// Send a light reading for one of the owner's plants.
    pub fn light(&mut self, name: &str, value: i64) -> Result<ReadingAck, ServiceError> {
        self.service.record_light(&self.owner.name, name, value)
    }

    /// Send a soil moisture reading for one of the owner's plants.
    pub fn water(&mut self, name: &str, value: i64) -> Result<ReadingAck, ServiceError> {
        self.service.record_water(&self.owner.name, name, value)
    }

    /// Current record for one of the owner's plants.
    pub fn plant(&self, name: &str) -> Option<Plant> {
        self.service.plant(&self.owner.name, name)
    }

    /// Current mood for one of the owner's plants.
    pub fn mood(&self, name: &str) -> Option<Mood> {
        self.plant(name).map(|p| p.mood)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

fn expect_plant(harness: &TestHarness, name: &str) -> Plant {
    match harness.plant(name) {
        Some(plant) => plant,
        None => panic!("Expected plant '{name}' to exist"),
    }
}

/// Assert a plant's mood.
#[track_caller]
pub fn assert_mood(harness: &TestHarness, name: &str, mood: Mood) {
    let actual = expect_plant(harness, name).mood;
    assert_eq!(actual, mood, "Expected {name} to be {mood}, got {actual}");
}

/// Assert when a plant last had an interaction.
#[track_caller]
pub fn assert_last_interaction(harness: &TestHarness, name: &str, at: DateTime<Utc>) {
    let actual = expect_plant(harness, name).last_interaction;
    assert_eq!(actual, at, "Expected {name} last interaction at {at}, got {actual}");
}

/// Assert when a plant was last watered.
#[track_caller]
pub fn assert_last_watered(harness: &TestHarness, name: &str, at: DateTime<Utc>) {
    let actual = expect_plant(harness, name).last_watered;
    assert_eq!(actual, at, "Expected {name} last watered at {at}, got {actual}");
}

/// Assert a watering never postdates the last interaction.
#[track_caller]
pub fn assert_watering_counts_as_interaction(plant: &Plant) {
    assert!(
        plant.last_watered <= plant.last_interaction,
        "Expected last watered ({}) <= last interaction ({}) for {}",
        plant.last_watered,
        plant.last_interaction,
        plant.name
    );
}
