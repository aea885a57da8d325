//! Reading scenarios run through the full service.
//!
//! Run with: `cargo test -p garden-core --test ingestion_flow`

use chrono::Duration;
use garden_core::testing::{
    assert_last_interaction, assert_last_watered, assert_mood, assert_watering_counts_as_interaction,
};
use garden_core::{Gardener, GardenService, Mood, MoodPolicy, NewPlant, ServiceConfig, TestHarness};

/// A harness with one plant, "Fern", idle for 50s: neither sad nor happy.
fn fern(light: i64, water: i64) -> TestHarness {
    let mut harness = TestHarness::new();
    harness
        .plant_with("Fern", light, water, Duration::seconds(50))
        .expect("create Fern");
    harness
}

// =============================================================================
// Light path
// =============================================================================

#[test]
fn test_dark_reading_is_scared_then_recency_makes_it_happy() {
    let mut harness = fern(300, 500);
    let arrival = harness.now();

    let ack = harness.light("Fern", 30).unwrap();

    // 300 -> 30 is a 270 swing, so the interaction is "now" and the recency
    // rule overrides the scared classification.
    assert_eq!(ack.plant.light_data.value, 30);
    assert_last_interaction(&harness, "Fern", arrival);
    assert_mood(&harness, "Fern", Mood::Happy);
}

#[test]
fn test_dark_reading_without_disturbance_stays_scared() {
    let mut harness = fern(40, 500);
    harness.light("Fern", 30).unwrap();
    assert_mood(&harness, "Fern", Mood::Scared);
}

#[test]
fn test_light_thresholds() {
    for (value, expected) in [
        (49, Mood::Scared),
        (50, Mood::Chill),
        (600, Mood::Chill),
        (601, Mood::Hot),
    ] {
        let mut harness = fern(value, 500);
        harness.light("Fern", value).unwrap();
        assert_mood(&harness, "Fern", expected);
    }
}

#[test]
fn test_light_delta_boundary() {
    let mut harness = fern(300, 500);
    let created = harness.plant("Fern").unwrap().last_interaction;

    harness.wait(Duration::seconds(1));
    harness.light("Fern", 450).unwrap();
    assert_last_interaction(&harness, "Fern", created);

    harness.wait(Duration::seconds(1));
    let arrival = harness.now();
    harness.light("Fern", 299).unwrap();
    assert_last_interaction(&harness, "Fern", arrival);
}

#[test]
fn test_plant_left_alone_turns_sad() {
    let mut harness = fern(300, 500);
    harness.wait(Duration::seconds(51));
    harness.light("Fern", 310).unwrap();
    assert_mood(&harness, "Fern", Mood::Sad);
}

// =============================================================================
// Water path
// =============================================================================

#[test]
fn test_watering_updates_both_timestamps() {
    let mut harness = fern(300, 500);
    harness.wait(Duration::seconds(5));
    let arrival = harness.now();

    let ack = harness.water("Fern", 750).unwrap();

    assert_eq!(ack.plant.water_data.timestamp, arrival);
    assert_last_watered(&harness, "Fern", arrival);
    assert_last_interaction(&harness, "Fern", arrival);
    assert_mood(&harness, "Fern", Mood::Chill);
}

#[test]
fn test_drying_out_is_not_watering() {
    let mut harness = fern(300, 800);
    let before = harness.plant("Fern").unwrap();

    harness.wait(Duration::seconds(5));
    harness.water("Fern", 350).unwrap();

    let after = harness.plant("Fern").unwrap();
    assert_eq!(after.last_watered, before.last_watered);
    assert_eq!(after.last_interaction, before.last_interaction);
    assert_eq!(after.mood, Mood::Thirsty);
}

#[test]
fn test_water_thresholds() {
    for (value, expected) in [
        (399, Mood::Thirsty),
        (400, Mood::Chill),
        (899, Mood::Chill),
        (901, Mood::Drunk),
    ] {
        let mut harness = fern(300, value);
        harness.water("Fern", value).unwrap();
        assert_mood(&harness, "Fern", expected);
    }
}

#[test]
fn test_water_at_900_keeps_previous_mood() {
    let mut harness = fern(40, 900);
    harness.light("Fern", 40).unwrap();
    assert_mood(&harness, "Fern", Mood::Scared);

    harness.water("Fern", 900).unwrap();
    assert_mood(&harness, "Fern", Mood::Scared);
}

#[test]
fn test_last_stream_wins_the_mood() {
    let mut harness = fern(40, 500);

    harness.light("Fern", 40).unwrap();
    assert_mood(&harness, "Fern", Mood::Scared);

    harness.water("Fern", 500).unwrap();
    assert_mood(&harness, "Fern", Mood::Chill);

    harness.light("Fern", 40).unwrap();
    assert_mood(&harness, "Fern", Mood::Scared);
}

// =============================================================================
// Idempotence and invariants
// =============================================================================

#[test]
fn test_repeated_reading_changes_no_timestamps() {
    let mut harness = fern(300, 500);
    harness.wait(Duration::seconds(2));

    harness.water("Fern", 750).unwrap();
    let first = harness.plant("Fern").unwrap();

    harness.water("Fern", 750).unwrap();
    let second = harness.plant("Fern").unwrap();

    assert_eq!(second.last_watered, first.last_watered);
    assert_eq!(second.last_interaction, first.last_interaction);
    assert_eq!(second.mood, first.mood);
    assert_eq!(second.water_data, first.water_data);
}

#[test]
fn test_watering_never_postdates_interaction() {
    let mut harness = fern(300, 100);
    let script: [(bool, i64); 8] = [
        (true, 700),
        (false, 900),
        (true, 20),
        (false, 300),
        (false, 950),
        (true, 640),
        (false, 100),
        (false, 450),
    ];
    for (is_water, value) in script {
        harness.wait(Duration::seconds(7));
        if is_water {
            harness.water("Fern", value).unwrap();
        } else {
            harness.light("Fern", value).unwrap();
        }
        assert_watering_counts_as_interaction(&harness.plant("Fern").unwrap());
    }
}

// =============================================================================
// Creation, lookup and listing
// =============================================================================

#[test]
fn test_unknown_plant_is_not_found() {
    let mut harness = fern(300, 500);
    let err = harness.light("Cactus", 100).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No plant with the name Cactus owned by ada exists");

    let err = harness.service.record_water("bob", "Fern", 600).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_listings() {
    let service = GardenService::new(ServiceConfig::new());
    let ada = Gardener::new("ada", "ferns");
    let bob = Gardener::new("bob", "cacti");

    service.add_plant("ada", NewPlant::new("Fern", ada.clone(), Mood::Chill)).unwrap();
    service.add_plant("ada", NewPlant::new("Basil", ada, Mood::Happy)).unwrap();
    service.add_plant("bob", NewPlant::new("Cactus", bob, Mood::Hot)).unwrap();

    assert_eq!(service.plants().len(), 3);
    assert_eq!(service.plants_of("ada").len(), 2);
    assert_eq!(service.plants_of("bob")[0].name, "Cactus");
    assert!(service.plants_of("carol").is_empty());
}

#[test]
fn test_create_from_json_and_list_shape() {
    let service = GardenService::new(ServiceConfig::new());
    let body = r#"{
        "name": "Fern",
        "owner": { "name": "ada", "bio": "likes ferns" },
        "mood": "happy",
        "imageName": "fern.png",
        "lightData": { "value": 300, "timestamp": "2024-05-01T12:00:00Z" },
        "waterData": { "value": 500, "timestamp": "2024-05-01T12:00:00Z" }
    }"#;

    let created = service.add_plant_json("ada", body).unwrap();
    assert_eq!(created.to_string(), "New plant named Fern created for ada");

    let listed = serde_json::to_value(service.plants_of("ada")).unwrap();
    let fern = &listed[0];
    assert_eq!(fern["name"], "Fern");
    assert_eq!(fern["owner"]["bio"], "likes ferns");
    assert_eq!(fern["mood"], "🥳");
    assert_eq!(fern["lightData"]["value"], 300);
    assert_eq!(fern["waterData"]["value"], 500);
    assert_eq!(fern["imageName"], "fern.png");
    assert_eq!(fern["id"], created.plant.id.to_string());
}

#[test]
fn test_bad_creation_payload_is_decode_error() {
    let service = GardenService::new(ServiceConfig::new());
    let err = service
        .add_plant_json("ada", r#"{"name": "Fern", "mood": "grumpy"}"#)
        .unwrap_err();
    assert!(!err.is_not_found());
    assert!(service.plants().is_empty());
}

// =============================================================================
// Combined policy
// =============================================================================

#[test]
fn test_combined_policy_remembers_dry_soil() {
    let mut harness = TestHarness::with_policy(MoodPolicy::Combined);
    harness
        .plant_with("Fern", 300, 100, Duration::seconds(50))
        .unwrap();

    harness.light("Fern", 320).unwrap();
    assert_mood(&harness, "Fern", Mood::Thirsty);

    harness.wait(Duration::seconds(1));
    harness.water("Fern", 650).unwrap();
    assert_mood(&harness, "Fern", Mood::Happy);

    harness.wait(Duration::seconds(30));
    harness.light("Fern", 320).unwrap();
    assert_mood(&harness, "Fern", Mood::Chill);

    harness.wait(Duration::seconds(120));
    harness.water("Fern", 640).unwrap();
    assert_mood(&harness, "Fern", Mood::Sad);
}
