//! Plausible middling record used as the merge starting point.

use classifier_common::utils::round_to;
use rand::Rng;

use crate::{
    record::OfficialRecord,
    types::{Score, Unit},
};

/// Draw a centimetre measurement by trait name keyword
fn draw_centimetres<R: Rng>(name: &str, rng: &mut R) -> f64 {
    let ranged = |rng: &mut R, low: u32, high: u32| f64::from(rng.random_range(low..=high));

    if name.contains("Stature") {
        ranged(rng, 130, 145)
    } else if name.contains("Girth") {
        ranged(rng, 180, 200)
    } else if name.contains("Length") {
        ranged(rng, 145, 165)
    } else if name.contains("Depth") {
        ranged(rng, 65, 80)
    } else if name.contains("Width") {
        ranged(rng, 20, 50)
    } else if name.contains("Height") {
        ranged(rng, 15, 25)
    } else if name.contains("Teat") {
        round_to(rng.random_range(2.0..=8.0), 1)
    } else {
        ranged(rng, 10, 40)
    }
}

/// A fully scored record: every slot gets an independent score in 5-8 and,
/// when the rubric declares a unit, a measurement from its plausible range
pub fn generate_baseline<R: Rng>(rng: &mut R) -> OfficialRecord {
    let mut record = OfficialRecord::from_rubric();

    for slot in record.slots_mut() {
        let score = Score::saturating(rng.random_range(5..=8));
        slot.set_score(score);

        match slot.unit() {
            Unit::Centimeters => {
                let value = draw_centimetres(slot.name(), rng);
                slot.set_measurement(value, Unit::Centimeters);
            }
            Unit::Degrees => {
                let value = f64::from(rng.random_range(25u32..=50));
                slot.set_measurement(value, Unit::Degrees);
            }
            Unit::Pixels | Unit::None => {}
        }
    }

    record
}
