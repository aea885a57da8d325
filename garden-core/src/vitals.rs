//! Vital-sign rules: how a reading changes a plant.
//!
//! Each stream has its own entry point. Both are pure: they take the current
//! record, a reading stamped with its arrival time, and the instant the
//! rules are evaluated at, and return the updated record.
//!
//! 1. Compare the reading against the stream's previous value to detect
//!    interactions (and, for water, watering)
//! 2. Store the reading as the stream's latest sample
//! 3. Classify the mood
//!
//! Under [`MoodPolicy::LastWriteWins`] each stream overwrites the mood with
//! its own partial view. The light path re-runs the recency rule after its
//! threshold rule, so a recent or stale interaction overrides `Scared`/`Hot`.
//! The water path does not look at recency at all.

use crate::plant::{Mood, Plant, SensorSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Light calibration: very bright > 600, indoor 80-200, dark < 50.

/// A light swing larger than this (either way) means the plant was moved or
/// shaded.
pub const LIGHT_INTERACTION_DELTA: u64 = 150;

/// Below this the plant is in the dark.
pub const SCARED_BELOW_LIGHT: i64 = 50;

/// Above this the plant is in very bright light.
pub const HOT_ABOVE_LIGHT: i64 = 600;

// Soil calibration: well watered > 800, some water > 700, dry < 400,
// sensor in air < 100.

/// A moisture rise larger than this means the plant was watered.
pub const WATERING_DELTA: i64 = 200;

/// Below this the soil is dry.
pub const THIRSTY_BELOW_WATER: i64 = 400;

/// Below this (and not dry) the soil is comfortable.
pub const CHILL_BELOW_WATER: i64 = 900;

/// Above this the soil is waterlogged. Exactly 900 matches no water rule.
pub const DRUNK_ABOVE_WATER: i64 = 900;

/// Seconds without interaction after which a plant turns sad.
pub const SAD_AFTER_SECS: f64 = 100.0;

/// Seconds since interaction within which a plant is happy.
pub const HAPPY_WITHIN_SECS: f64 = 10.0;

/// How the two streams share the single mood field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoodPolicy {
    /// Whichever stream reported last sets the mood from its own value.
    #[default]
    LastWriteWins,
    /// Every reading recomputes the mood from both streams and recency.
    Combined,
}

impl MoodPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            MoodPolicy::LastWriteWins => "last-write-wins",
            MoodPolicy::Combined => "combined",
        }
    }

    /// Parse a policy name as used in configuration.
    pub fn parse(s: &str) -> Option<MoodPolicy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-write-wins" | "last_write_wins" | "lww" => Some(MoodPolicy::LastWriteWins),
            "combined" => Some(MoodPolicy::Combined),
            _ => None,
        }
    }
}

/// Seconds elapsed from `since` to `now`, with microsecond precision.
///
/// Spans too long for microseconds fall back to milliseconds.
pub fn seconds_between(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed = now - since;
    match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1000.0,
    }
}

/// Mood implied by a light value alone, if any.
pub fn light_mood(value: i64) -> Option<Mood> {
    if value < SCARED_BELOW_LIGHT {
        Some(Mood::Scared)
    } else if value > HOT_ABOVE_LIGHT {
        Some(Mood::Hot)
    } else {
        None
    }
}

/// Mood implied by a soil moisture value alone, if any.
pub fn water_mood(value: i64) -> Option<Mood> {
    if value < THIRSTY_BELOW_WATER {
        Some(Mood::Thirsty)
    } else if value < CHILL_BELOW_WATER {
        Some(Mood::Chill)
    } else if value > DRUNK_ABOVE_WATER {
        Some(Mood::Drunk)
    } else {
        None
    }
}

/// Mood implied by time since the last interaction, if any.
pub fn recency_mood(last_interaction: DateTime<Utc>, now: DateTime<Utc>) -> Option<Mood> {
    let interval = seconds_between(last_interaction, now);
    if interval > SAD_AFTER_SECS {
        Some(Mood::Sad)
    } else if interval < HAPPY_WITHIN_SECS {
        Some(Mood::Happy)
    } else {
        None
    }
}

/// Mood as a function of both streams and recency together.
///
/// Physical needs outrank recency: dry soil, darkness, glare and
/// waterlogging are reported first, then a recent or stale interaction,
/// and `Chill` when nothing stands out.
pub fn derive_mood(
    light: i64,
    water: i64,
    last_interaction: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Mood {
    if water < THIRSTY_BELOW_WATER {
        return Mood::Thirsty;
    }
    if let Some(mood) = light_mood(light) {
        return mood;
    }
    if water > DRUNK_ABOVE_WATER {
        return Mood::Drunk;
    }
    let interval = seconds_between(last_interaction, now);
    if interval < HAPPY_WITHIN_SECS {
        Mood::Happy
    } else if interval > SAD_AFTER_SECS {
        Mood::Sad
    } else {
        Mood::Chill
    }
}

/// Record a light reading's sample and interaction, leaving mood alone.
fn absorb_light(plant: &mut Plant, reading: SensorSample) {
    if reading.value.abs_diff(plant.light_data.value) > LIGHT_INTERACTION_DELTA {
        plant.last_interaction = reading.timestamp;
    }
    plant.light_data = reading;
}

/// Record a water reading's sample, watering and interaction, leaving mood
/// alone.
fn absorb_water(plant: &mut Plant, reading: SensorSample) {
    // Signed: only a rise counts as watering.
    if reading.value.saturating_sub(plant.water_data.value) > WATERING_DELTA {
        plant.last_watered = reading.timestamp;
        plant.last_interaction = reading.timestamp;
    }
    plant.water_data = reading;
}

/// Apply a light reading under last-write-wins.
///
/// The threshold rule runs first and the recency rule runs after it
/// unconditionally, so recency has the final word whenever it matches.
pub fn apply_light_reading(plant: &Plant, reading: SensorSample, now: DateTime<Utc>) -> Plant {
    let mut next = plant.clone();
    absorb_light(&mut next, reading);

    if let Some(mood) = light_mood(reading.value) {
        next.mood = mood;
    }
    if let Some(mood) = recency_mood(next.last_interaction, now) {
        next.mood = mood;
    }
    next
}

/// Apply a soil moisture reading under last-write-wins.
///
/// `now` is unused on this path; the water rules never consult recency.
pub fn apply_water_reading(plant: &Plant, reading: SensorSample, _now: DateTime<Utc>) -> Plant {
    let mut next = plant.clone();
    absorb_water(&mut next, reading);

    if let Some(mood) = water_mood(reading.value) {
        next.mood = mood;
    }
    next
}

/// The rules, bound to a mood policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct VitalsEngine {
    policy: MoodPolicy,
}

impl VitalsEngine {
    pub fn new(policy: MoodPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MoodPolicy {
        self.policy
    }

    /// Apply a light reading.
    pub fn apply_light(&self, plant: &Plant, reading: SensorSample, now: DateTime<Utc>) -> Plant {
        match self.policy {
            MoodPolicy::LastWriteWins => apply_light_reading(plant, reading, now),
            MoodPolicy::Combined => {
                let mut next = plant.clone();
                absorb_light(&mut next, reading);
                next.mood = Self::combined_mood(&next, now);
                next
            }
        }
    }

    /// Apply a soil moisture reading.
    pub fn apply_water(&self, plant: &Plant, reading: SensorSample, now: DateTime<Utc>) -> Plant {
        match self.policy {
            MoodPolicy::LastWriteWins => apply_water_reading(plant, reading, now),
            MoodPolicy::Combined => {
                let mut next = plant.clone();
                absorb_water(&mut next, reading);
                next.mood = Self::combined_mood(&next, now);
                next
            }
        }
    }

    fn combined_mood(plant: &Plant, now: DateTime<Utc>) -> Mood {
        derive_mood(
            plant.light_data.value,
            plant.water_data.value,
            plant.last_interaction,
            now,
        )
    }
}
