//! Reconciles per-view trait updates into the official record.
//!
//! Updates are collected in view merge order into a single map keyed by
//! trait name (last writer wins). Each record slot then takes the update
//! with its exact name, or failing that the first update whose name
//! contains, or is contained in, the slot name ignoring case. The fallback
//! is a best-effort heuristic: it is not injective, so one update can fill
//! several slots and an update can match no slot at all. Both cases show up
//! in the [`MergeReport`].

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{debug, warn};

use crate::{
    bcs::BcsEstimate,
    record::OfficialRecord,
    types::{Score, TraitMeasurement, Unit, ViewResult},
    view::View,
};

/// What happened to one view of a request
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    Extracted(ViewResult),
    /// Detection or extraction failed; the view contributes nothing
    Failed { reason: String },
    /// No frame or no detector for the view
    Missing,
}

/// At most one outcome per view, always iterated in merge order no matter
/// the order outcomes arrived in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOutcomes {
    outcomes: BTreeMap<View, ViewOutcome>,
}

impl ViewOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a view's outcome, returning the one it replaces
    pub fn insert(&mut self, view: View, outcome: ViewOutcome) -> Option<ViewOutcome> {
        self.outcomes.insert(view, outcome)
    }

    /// Record an extractor result under its own view
    pub fn insert_result(&mut self, result: ViewResult) -> Option<ViewOutcome> {
        self.insert(result.view(), ViewOutcome::Extracted(result))
    }

    pub fn get(&self, view: View) -> Option<&ViewOutcome> {
        self.outcomes.get(&view)
    }

    pub fn iter(&self) -> impl Iterator<Item = (View, &ViewOutcome)> {
        self.outcomes.iter().map(|(view, outcome)| (*view, outcome))
    }

    /// Views that produced at least one trait
    pub fn contributing(&self) -> Vec<View> {
        self.iter()
            .filter(|(_, o)| matches!(o, ViewOutcome::Extracted(r) if !r.is_empty()))
            .map(|(view, _)| view)
            .collect()
    }

    pub fn any_contributed(&self) -> bool {
        !self.contributing().is_empty()
    }
}

impl FromIterator<(View, ViewOutcome)> for ViewOutcomes {
    fn from_iter<I: IntoIterator<Item = (View, ViewOutcome)>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

#[derive(
    Debug, Clone, Copy,
    Serialize, JsonSchema,
    Display, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewState {
    /// Produced traits that were merged
    Contributed,
    /// Ran but produced no trait
    Empty,
    Failed,
    /// Slots stayed at baseline because the view never ran
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewStatus {
    pub view: View,
    pub state: ViewState,
    pub model: Option<String>,
    pub traits: usize,
    pub keypoints_detected: usize,
    pub reason: Option<String>,
}

impl ViewStatus {
    fn of(view: View, outcome: Option<&ViewOutcome>) -> Self {
        let mut status = Self {
            view,
            state: ViewState::Missing,
            model: None,
            traits: 0,
            keypoints_detected: 0,
            reason: None,
        };
        match outcome {
            Some(ViewOutcome::Extracted(result)) => {
                status.state = if result.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Contributed
                };
                status.model = Some(result.source_model().to_string());
                status.traits = result.traits().len();
                status.keypoints_detected = result.keypoints_detected();
            }
            Some(ViewOutcome::Failed { reason }) => {
                status.state = ViewState::Failed;
                status.reason = Some(reason.clone());
            }
            Some(ViewOutcome::Missing) | None => {}
        }
        status
    }
}

#[derive(Debug, Clone, Copy, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    /// Case-insensitive containment fallback
    Substring,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedUpdate {
    pub slot: String,
    pub source: String,
    pub kind: MatchKind,
    pub score: Option<Score>,
    pub measurement: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub applied: Vec<AppliedUpdate>,
    /// Update names that reached no slot
    pub unmatched: Vec<String>,
    pub views: Vec<ViewStatus>,
}

/// Trait name to latest update, in first-insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMap {
    entries: Vec<TraitMeasurement>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later update for the same name replaces the earlier one in place
    pub fn insert(&mut self, update: TraitMeasurement) {
        match self.entries.iter_mut().find(|e| e.trait_name == update.trait_name) {
            Some(existing) => *existing = update,
            None => self.entries.push(update),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TraitMeasurement> {
        self.entries.iter().find(|e| e.trait_name == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.trait_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect updates from every extracted view in merge order, then BCS
    pub fn collect(outcomes: &ViewOutcomes, bcs: Option<&BcsEstimate>) -> Self {
        let mut updates = Self::new();
        for (_, outcome) in outcomes.iter() {
            if let ViewOutcome::Extracted(result) = outcome {
                for update in result.traits() {
                    updates.insert(update.clone());
                }
            }
        }
        if let Some(bcs) = bcs {
            updates.insert(bcs.to_measurement());
        }
        updates
    }
}

/// Best-effort, non-injective fallback: the first key, in update-map
/// order, that contains or is contained in `slot_name` ignoring case.
pub fn best_effort_match<'a, I>(slot_name: &str, keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let slot = slot_name.to_lowercase();
    keys.into_iter().find(|key| {
        let key = key.to_lowercase();
        key.contains(&slot) || slot.contains(&key)
    })
}

/// Apply every update in `outcomes` (and BCS, last) onto `record`.
///
/// Slots without a matching update keep their current values. Aggregates
/// are not touched here; recompute them from the record afterwards.
pub fn merge_into(
    record: &mut OfficialRecord,
    outcomes: &ViewOutcomes,
    bcs: Option<&BcsEstimate>,
) -> MergeReport {
    let updates = UpdateMap::collect(outcomes, bcs);
    let mut used = vec![false; updates.len()];
    let mut applied = Vec::new();

    for slot in record.slots_mut() {
        let (update, kind) = match updates.get(slot.name()) {
            Some(update) => (update, MatchKind::Exact),
            None => match best_effort_match(slot.name(), updates.keys()).and_then(|k| updates.get(k)) {
                Some(update) => (update, MatchKind::Substring),
                None => continue,
            },
        };

        if let Some(index) = updates.keys().position(|k| k == update.trait_name) {
            used[index] = true;
        }
        if kind == MatchKind::Substring {
            debug!(slot = slot.name(), source = %update.trait_name, "substring trait match");
        }

        if let Some(score) = update.score {
            slot.set_score(score);
        }
        if let Some(value) = update.raw_value {
            let unit = if update.unit == Unit::None { slot.unit() } else { update.unit };
            slot.set_measurement(value, unit);
        }

        applied.push(AppliedUpdate {
            slot: slot.name().to_string(),
            source: update.trait_name.clone(),
            kind,
            score: update.score,
            measurement: update.raw_value,
        });
    }

    let unmatched: Vec<String> = updates
        .keys()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(name, _)| name.to_string())
        .collect();
    if !unmatched.is_empty() {
        warn!(?unmatched, "trait updates matched no official slot");
    }

    let views = View::MERGE_ORDER
        .iter()
        .map(|&view| ViewStatus::of(view, outcomes.get(view)))
        .collect();

    MergeReport {
        applied,
        unmatched,
        views,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(name: &str, value: Option<f64>, score: Option<u8>) -> TraitMeasurement {
        TraitMeasurement::new(name, value, Unit::Pixels, score.map(|s| Score::new(s).unwrap()))
    }

    fn result(view: View, traits: Vec<TraitMeasurement>) -> ViewResult {
        ViewResult::new(view, traits, 4, "test_model")
    }

    #[test]
    fn test_outcomes_iterate_in_merge_order() {
        let mut outcomes = ViewOutcomes::new();
        outcomes.insert(View::SideUdder, ViewOutcome::Missing);
        outcomes.insert(View::Rear, ViewOutcome::Failed { reason: "no model".into() });
        outcomes.insert(View::Top, ViewOutcome::Missing);
        let order: Vec<View> = outcomes.iter().map(|(v, _)| v).collect();
        assert_eq!(order, vec![View::Rear, View::Top, View::SideUdder]);
    }

    #[test]
    fn test_last_writer_wins_keeps_first_position() {
        let mut map = UpdateMap::new();
        map.insert(update("Stature", Some(1.0), Some(5)));
        map.insert(update("Rump Width", Some(2.0), Some(6)));
        map.insert(update("Stature", Some(3.0), Some(7)));

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Stature", "Rump Width"]);
        assert_eq!(map.get("Stature").unwrap().raw_value, Some(3.0));
    }

    #[test]
    fn test_later_view_overrides_earlier() {
        let outcomes: ViewOutcomes = [
            (View::Udder, ViewOutcome::Extracted(result(View::Udder, vec![update("Stature", Some(2.0), Some(9))]))),
            (View::Side, ViewOutcome::Extracted(result(View::Side, vec![update("Stature", Some(1.0), Some(4))]))),
        ]
        .into_iter()
        .collect();

        let mut record = OfficialRecord::from_rubric();
        merge_into(&mut record, &outcomes, None);
        assert_eq!(record.score_of("Stature").map(Score::value), Some(9));
        assert_eq!(record.measurement_of("Stature"), Some(2.0));
    }

    #[test]
    fn test_best_effort_match() {
        let keys = ["Body Length", "Rear Udder Width", "Teat Thickness"];
        assert_eq!(best_effort_match("Rear udder width", keys), Some("Rear Udder Width"));
        assert_eq!(best_effort_match("Teat thickness", keys), Some("Teat Thickness"));
        assert_eq!(best_effort_match("Stature", keys), None);
        // Containment works in both directions and is not injective
        assert_eq!(best_effort_match("Length", ["Teat Length", "Body Length"]), Some("Teat Length"));
    }

    #[test]
    fn test_chest_width_reaches_no_slot() {
        let outcomes: ViewOutcomes = [(
            View::Top,
            ViewOutcome::Extracted(result(View::Top, vec![update("Chest Width", Some(250.0), Some(6))])),
        )]
        .into_iter()
        .collect();

        let mut record = OfficialRecord::from_rubric();
        let report = merge_into(&mut record, &outcomes, None);

        assert!(record.slots().all(|slot| slot.name() != "Chest Width"));
        assert!(report.applied.is_empty());
        assert_eq!(report.unmatched, vec!["Chest Width".to_string()]);
        assert_eq!(record.scored_count(), 0);
    }

    #[test]
    fn test_score_and_measurement_apply_independently() {
        let outcomes: ViewOutcomes = [(
            View::Side,
            ViewOutcome::Extracted(result(
                View::Side,
                vec![update("Angularity", Some(98.5), None), update("Stature", None, Some(6))],
            )),
        )]
        .into_iter()
        .collect();

        let mut record = OfficialRecord::from_rubric();
        let report = merge_into(&mut record, &outcomes, None);

        let angularity = record.slot("Angularity").unwrap();
        assert_eq!(angularity.score(), None);
        assert_eq!(angularity.measurement(), Some(98.5));

        let stature = record.slot("Stature").unwrap();
        assert_eq!(stature.score().map(Score::value), Some(6));
        assert_eq!(stature.measurement(), None);
        assert_eq!(report.applied.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let outcomes: ViewOutcomes = [
            (
                View::Udder,
                ViewOutcome::Extracted(result(
                    View::Udder,
                    vec![update("Rear Udder Width", Some(95.0), Some(8)), update("Teat Length", Some(44.0), Some(9))],
                )),
            ),
            (View::Rear, ViewOutcome::Extracted(result(View::Rear, vec![update("Rump Width", Some(210.0), Some(5))]))),
        ]
        .into_iter()
        .collect();

        let mut once = OfficialRecord::from_rubric();
        merge_into(&mut once, &outcomes, None);

        let mut twice = OfficialRecord::from_rubric();
        merge_into(&mut twice, &outcomes, None);
        merge_into(&mut twice, &outcomes, None);
        assert_eq!(once, twice);

        // The same result listed twice in one pass collapses to one update
        let mut map = UpdateMap::collect(&outcomes, None);
        let len = map.len();
        map.insert(update("Rump Width", Some(210.0), Some(5)));
        assert_eq!(map.len(), len);
    }

    #[test]
    fn test_report_lists_every_view() {
        let mut outcomes = ViewOutcomes::new();
        outcomes.insert_result(result(View::Side, vec![update("Stature", Some(300.0), Some(5))]));
        outcomes.insert_result(result(View::Top, vec![]));
        outcomes.insert(View::Udder, ViewOutcome::Failed { reason: "boom".into() });

        let mut record = OfficialRecord::from_rubric();
        let report = merge_into(&mut record, &outcomes, None);
        let states: Vec<ViewState> = report.views.iter().map(|v| v.state).collect();
        assert_eq!(
            states,
            vec![
                ViewState::Missing,
                ViewState::Contributed,
                ViewState::Empty,
                ViewState::Failed,
                ViewState::Missing,
            ]
        );
        assert_eq!(outcomes.contributing(), vec![View::Side]);
    }
}
