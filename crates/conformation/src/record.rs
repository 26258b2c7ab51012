use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;
use ts_rs::TS;

use crate::{
    rubric::{self, Section, TraitDefinition, RUBRIC},
    types::{Score, Unit},
};

/// One official trait in a record. Name and section come from the rubric
/// and cannot change; score and measurement are written by the merge.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, TS)]
#[ts(export)]
pub struct TraitSlot {
    #[serde(rename = "trait")]
    #[ts(type = "string")]
    name: &'static str,
    score: Option<Score>,
    measurement: Option<f64>,
    unit: Unit,
}

impl TraitSlot {
    fn empty(definition: &'static TraitDefinition) -> Self {
        Self {
            name: definition.name,
            score: None,
            measurement: None,
            unit: definition.measurement_unit.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn measurement(&self) -> Option<f64> {
        self.measurement
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn definition(&self) -> Option<&'static TraitDefinition> {
        rubric::find(self.name)
    }

    pub(crate) fn set_score(&mut self, score: Score) {
        self.score = Some(score);
    }

    pub(crate) fn set_measurement(&mut self, value: f64, unit: Unit) {
        self.measurement = Some(value);
        self.unit = unit;
    }
}

/// The canonical 20-trait record, sections in rubric order
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct OfficialRecord {
    sections: BTreeMap<Section, Vec<TraitSlot>>,
}

impl OfficialRecord {
    pub const TRAIT_COUNT: usize = RUBRIC.len();

    /// Every rubric slot, unscored and unmeasured
    pub fn from_rubric() -> Self {
        let mut sections: BTreeMap<Section, Vec<TraitSlot>> = BTreeMap::new();
        for definition in &RUBRIC {
            sections
                .entry(definition.section)
                .or_default()
                .push(TraitSlot::empty(definition));
        }
        Self { sections }
    }

    pub fn sections(&self) -> impl Iterator<Item = (Section, &[TraitSlot])> {
        self.sections.iter().map(|(section, slots)| (*section, slots.as_slice()))
    }

    pub fn slots(&self) -> impl Iterator<Item = &TraitSlot> {
        self.sections.values().flatten()
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut TraitSlot> {
        self.sections.values_mut().flatten()
    }

    pub fn slot(&self, name: &str) -> Option<&TraitSlot> {
        self.slots().find(|slot| slot.name == name)
    }

    pub fn score_of(&self, name: &str) -> Option<Score> {
        self.slot(name).and_then(TraitSlot::score)
    }

    pub fn measurement_of(&self, name: &str) -> Option<f64> {
        self.slot(name).and_then(TraitSlot::measurement)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn section_sizes(&self) -> Vec<(Section, usize)> {
        self.sections.iter().map(|(s, slots)| (*s, slots.len())).collect()
    }

    pub fn scored_count(&self) -> usize {
        self.slots().filter(|slot| slot.score.is_some()).count()
    }
}

impl Default for OfficialRecord {
    fn default() -> Self {
        Self::from_rubric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality() {
        let record = OfficialRecord::from_rubric();
        assert_eq!(record.len(), 20);
        assert_eq!(
            record.section_sizes(),
            vec![
                (Section::Strength, 5),
                (Section::Rump, 2),
                (Section::FeetAndLeg, 3),
                (Section::Udder, 9),
                (Section::General, 1),
            ]
        );
        assert_eq!(record.scored_count(), 0);
    }

    #[test]
    fn test_slot_units_follow_rubric() {
        let record = OfficialRecord::from_rubric();
        assert_eq!(record.slot("Stature").unwrap().unit(), Unit::Centimeters);
        assert_eq!(record.slot("Foot Angle").unwrap().unit(), Unit::Degrees);
        assert_eq!(record.slot("Angularity").unwrap().unit(), Unit::None);
        assert!(record.slot("Chest Width").is_none());
    }

    #[test]
    fn test_serializes_as_section_map() {
        let mut record = OfficialRecord::from_rubric();
        if let Some(slot) = record.slots_mut().find(|s| s.name() == "Rump Width") {
            slot.set_score(Score::new(7).unwrap());
            slot.set_measurement(42.0, Unit::Centimeters);
        }

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(
            json["Rump"][1],
            serde_json::json!({"trait": "Rump Width", "score": 7, "measurement": 42.0, "unit": "centimeters"})
        );
        assert_eq!(json["Feet and Leg"].as_array().unwrap().len(), 3);
    }
}
