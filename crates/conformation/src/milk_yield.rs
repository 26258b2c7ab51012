//! Daily milk yield regression over the merged record.
//!
//! Multiplicative model: breed base yield scaled by body capacity, udder
//! quality, rear udder width, body condition and lactation. Missing inputs
//! fall back to population defaults, so an estimate is always produced.

use classifier_common::{utils::round_to, AnimalInfo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{record::OfficialRecord, rubric::BODY_CONDITION_SCORE};

const DEFAULT_STATURE: f64 = 135.0;
const DEFAULT_BODY_LENGTH: f64 = 155.0;
const DEFAULT_BODY_DEPTH: f64 = 70.0;
const DEFAULT_HEART_GIRTH: f64 = 190.0;
const DEFAULT_REAR_UDDER_WIDTH: f64 = 25.0;
const DEFAULT_SCORE: f64 = 5.0;

const UDDER_TRAITS: [&str; 4] = [
    "Fore Udder Attachment",
    "Rear Udder Height",
    "Central Ligament",
    "Udder Depth",
];

pub const CONFIDENCE: u8 = 85;
const LACTATION_DAYS: f64 = 305.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MilkYieldEstimate {
    pub daily_yield: f64,
    pub min_yield: f64,
    pub max_yield: f64,
    pub unit: String,
    pub lactation_yield: f64,
    pub lactation_unit: String,
    pub confidence: u8,
}

/// Base daily yield in litres, by breed keyword
pub fn breed_base(breed: &str) -> f64 {
    let breed = breed.to_lowercase();
    let any = |keys: &[&str]| keys.iter().any(|k| breed.contains(k));

    if any(&["holstein", "hf", "friesian"]) {
        25.0
    } else if any(&["jersey"]) {
        20.0
    } else if any(&["gir", "sahiwal", "red sindhi"]) {
        12.0
    } else if any(&["murrah", "mehsana", "surti"]) {
        10.0
    } else {
        15.0
    }
}

pub fn lactation_factor(lactation_number: u32) -> f64 {
    match lactation_number {
        1 => 0.85,
        2 => 0.95,
        3 | 4 => 1.0,
        _ => 0.90,
    }
}

pub fn estimate(record: &OfficialRecord, animal: &AnimalInfo) -> MilkYieldEstimate {
    let measured = |name: &str, default: f64| record.measurement_of(name).unwrap_or(default);
    let scored = |name: &str| record.score_of(name).map_or(DEFAULT_SCORE, f64::from);

    let stature = measured("Stature", DEFAULT_STATURE);
    let body_length = measured("Body Length", DEFAULT_BODY_LENGTH);
    let body_depth = measured("Body Depth", DEFAULT_BODY_DEPTH);
    let heart_girth = measured("Heart Girth", DEFAULT_HEART_GIRTH);

    let body_capacity = (stature * body_length * body_depth * heart_girth) / 1_000_000.0;
    let body_factor = 1.0 + (body_capacity - 140.0) / 100.0;

    let udder_total: f64 = UDDER_TRAITS.iter().map(|name| scored(*name)).sum();
    let udder_factor = udder_total / (UDDER_TRAITS.len() as f64 * 9.0);

    let rear_udder_width = measured("Rear udder width", DEFAULT_REAR_UDDER_WIDTH);
    let udder_width_factor = 1.0 + (rear_udder_width - 25.0) / 50.0;

    let bcs_factor = 0.9 + (scored(BODY_CONDITION_SCORE) - 5.0) * 0.02;

    let daily = breed_base(&animal.breed)
        * body_factor
        * udder_factor
        * udder_width_factor
        * bcs_factor
        * lactation_factor(animal.lactation_number);
    let daily = round_to(daily, 1);

    MilkYieldEstimate {
        daily_yield: daily,
        min_yield: round_to(daily * 0.85, 1),
        max_yield: round_to(daily * 1.15, 1),
        unit: "liters/day".to_string(),
        lactation_yield: round_to(daily * LACTATION_DAYS, 0),
        lactation_unit: "liters/305 days".to_string(),
        confidence: CONFIDENCE,
    }
}
