use std::collections::BTreeMap;

use classifier_common::utils::{mean, round_to};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use ts_rs::TS;

use crate::{record::OfficialRecord, rubric::Section};

#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema, TS,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, PartialOrd, Ord
)]
#[ts(export)]
pub enum Grade {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Thresholds that turn an overall score into a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GradingScheme {
    /// Runs with at least one merged view
    FourTier,
    /// Baseline-only runs
    TwoTier,
}

impl GradingScheme {
    pub fn grade(self, overall: f64) -> Grade {
        match self {
            GradingScheme::FourTier => match overall {
                o if o >= 7.5 => Grade::Excellent,
                o if o >= 6.0 => Grade::Good,
                o if o >= 4.0 => Grade::Fair,
                _ => Grade::Poor,
            },
            GradingScheme::TwoTier => {
                if overall >= 6.0 {
                    Grade::Good
                } else {
                    Grade::Fair
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    /// Mean score per section; sections without any score are left out
    pub category_scores: BTreeMap<Section, f64>,
    pub overall_score: f64,
    pub grade: Grade,
}

impl AggregateScore {
    /// Recompute from scratch over the whole record
    pub fn compute(record: &OfficialRecord, scheme: GradingScheme) -> Self {
        let category_scores = record
            .sections()
            .filter_map(|(section, slots)| {
                let scores = slots.iter().filter_map(|s| s.score()).map(f64::from);
                mean(scores).map(|m| (section, round_to(m, 1)))
            })
            .collect();

        let overall = mean(record.slots().filter_map(|s| s.score()).map(f64::from))
            .map(|m| round_to(m, 1))
            .unwrap_or(0.0);

        Self {
            category_scores,
            overall_score: overall,
            grade: scheme.grade(overall),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Score;
    use rstest::rstest;

    #[rstest]
    #[case(7.5, Grade::Excellent)]
    #[case(7.49, Grade::Good)]
    #[case(6.0, Grade::Good)]
    #[case(5.99, Grade::Fair)]
    #[case(4.0, Grade::Fair)]
    #[case(3.99, Grade::Poor)]
    fn test_four_tier_boundaries(#[case] overall: f64, #[case] expected: Grade) {
        assert_eq!(GradingScheme::FourTier.grade(overall), expected);
    }

    #[rstest]
    #[case(8.0, Grade::Good)]
    #[case(6.0, Grade::Good)]
    #[case(5.99, Grade::Fair)]
    #[case(1.0, Grade::Fair)]
    fn test_two_tier_never_reaches_extremes(#[case] overall: f64, #[case] expected: Grade) {
        assert_eq!(GradingScheme::TwoTier.grade(overall), expected);
    }

    #[test]
    fn test_compute_skips_unscored_slots() {
        let mut record = OfficialRecord::from_rubric();
        for slot in record.slots_mut() {
            match slot.name() {
                "Stature" => slot.set_score(Score::new(8).unwrap()),
                "Heart Girth" => slot.set_score(Score::new(7).unwrap()),
                "Rump Width" => slot.set_score(Score::new(4).unwrap()),
                _ => {}
            }
        }

        let aggregate = AggregateScore::compute(&record, GradingScheme::FourTier);
        assert_eq!(aggregate.category_scores.get(&Section::Strength), Some(&7.5));
        assert_eq!(aggregate.category_scores.get(&Section::Rump), Some(&4.0));
        assert!(!aggregate.category_scores.contains_key(&Section::Udder));
        assert_eq!(aggregate.overall_score, 6.3);
        assert_eq!(aggregate.grade, Grade::Good);
    }

    #[test]
    fn test_empty_record_is_poor() {
        let aggregate = AggregateScore::compute(&OfficialRecord::from_rubric(), GradingScheme::FourTier);
        assert!(aggregate.category_scores.is_empty());
        assert_eq!(aggregate.overall_score, 0.0);
        assert_eq!(aggregate.grade, Grade::Poor);
    }
}
