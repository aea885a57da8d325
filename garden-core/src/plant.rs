//! Plant records and the values they are built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a plant.
///
/// Carried as payload only; the store looks plants up by owner and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(Uuid);

impl PlantId {
    /// Create a new unique plant ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The person a plant belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gardener {
    pub name: String,
    pub bio: String,
}

impl Gardener {
    pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
        }
    }
}

/// A plant's inferred well-being.
///
/// On the wire each mood is its emoji code; decoding also accepts the
/// lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    /// Recent interaction.
    #[serde(rename = "🥳", alias = "happy")]
    Happy,
    /// No interaction for some time.
    #[serde(rename = "🙁", alias = "sad")]
    Sad,
    /// Appropriate light and water.
    #[serde(rename = "😎", alias = "chill")]
    Chill,
    /// Very low light.
    #[serde(rename = "😱", alias = "scared")]
    Scared,
    /// Low soil moisture.
    #[serde(rename = "😥", alias = "thirsty")]
    Thirsty,
    /// Very high light.
    #[serde(rename = "🥵", alias = "hot")]
    Hot,
    /// Very high soil moisture.
    #[serde(rename = "🥴", alias = "drunk")]
    Drunk,
}

impl Mood {
    /// Every mood, in declaration order.
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Chill,
        Mood::Scared,
        Mood::Thirsty,
        Mood::Hot,
        Mood::Drunk,
    ];

    /// The symbolic code used on the wire.
    pub fn symbol(&self) -> &'static str {
        match self {
            Mood::Happy => "🥳",
            Mood::Sad => "🙁",
            Mood::Chill => "😎",
            Mood::Scared => "😱",
            Mood::Thirsty => "😥",
            Mood::Hot => "🥵",
            Mood::Drunk => "🥴",
        }
    }

    /// Lowercase name of the mood.
    pub fn name(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Chill => "chill",
            Mood::Scared => "scared",
            Mood::Thirsty => "thirsty",
            Mood::Hot => "hot",
            Mood::Drunk => "drunk",
        }
    }

    /// What the mood says about the plant.
    pub fn meaning(&self) -> &'static str {
        match self {
            Mood::Happy => "recent interaction",
            Mood::Sad => "no interaction for some time",
            Mood::Chill => "appropriate light and water",
            Mood::Scared => "very low light",
            Mood::Thirsty => "low water",
            Mood::Hot => "very high light",
            Mood::Drunk => "very high water",
        }
    }

    /// Look a mood up by name or symbol.
    pub fn parse(s: &str) -> Option<Mood> {
        let s = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.symbol() == s || m.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.name())
    }
}

/// The two sensor streams a plant reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Light,
    Water,
}

impl Stream {
    pub fn name(&self) -> &'static str {
        match self {
            Stream::Light => "light",
            Stream::Water => "water",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The last value seen on one stream, with the time it arrived.
///
/// Also used for incoming readings: a reading is a value stamped with its
/// arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorSample {
    pub value: i64,
    pub timestamp: DateTime<Utc>,
}

impl SensorSample {
    pub fn new(value: i64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// What a sensor sends: a bare integer. Devices have no clock, so time is
/// assigned by whoever receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorPayload {
    pub value: i64,
}

impl SensorPayload {
    /// Decode a payload from its JSON body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// A tracked plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub owner: Gardener,
    pub mood: Mood,
    pub light_data: SensorSample,
    pub water_data: SensorSample,
    /// Set whenever either stream shows a large enough jump.
    pub last_interaction: DateTime<Utc>,
    /// Set when soil moisture jumps up sharply.
    pub last_watered: DateTime<Utc>,
    pub image_name: String,
}

/// Everything needed to create a plant except its ID.
///
/// Sensor samples and timestamps default to zero and the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    pub owner: Gardener,
    pub mood: Mood,
    pub image_name: String,
    #[serde(default)]
    pub light_data: SensorSample,
    #[serde(default)]
    pub water_data: SensorSample,
    #[serde(default)]
    pub last_interaction: DateTime<Utc>,
    #[serde(default)]
    pub last_watered: DateTime<Utc>,
}

impl NewPlant {
    pub fn new(name: impl Into<String>, owner: Gardener, mood: Mood) -> Self {
        Self {
            name: name.into(),
            owner,
            mood,
            image_name: String::new(),
            light_data: SensorSample::default(),
            water_data: SensorSample::default(),
            last_interaction: DateTime::<Utc>::default(),
            last_watered: DateTime::<Utc>::default(),
        }
    }

    pub fn with_image(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = image_name.into();
        self
    }

    pub fn with_light(mut self, sample: SensorSample) -> Self {
        self.light_data = sample;
        self
    }

    pub fn with_water(mut self, sample: SensorSample) -> Self {
        self.water_data = sample;
        self
    }

    pub fn with_last_interaction(mut self, at: DateTime<Utc>) -> Self {
        self.last_interaction = at;
        self
    }

    pub fn with_last_watered(mut self, at: DateTime<Utc>) -> Self {
        self.last_watered = at;
        self
    }

    /// Decode a creation request from its JSON body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Turn the request into a plant with a fresh ID.
    pub fn into_plant(self) -> Plant {
        Plant {
            id: PlantId::new(),
            name: self.name,
            owner: self.owner,
            mood: self.mood,
            light_data: self.light_data,
            water_data: self.water_data,
            last_interaction: self.last_interaction,
            last_watered: self.last_watered,
            image_name: self.image_name,
        }
    }
}
