use std::collections::BTreeMap;

use crate::{
    bcs::{BcsEstimator, PlaceholderBcsEstimator},
    breed_tables::{ScoringConfig, ScoringProfile},
    extract::{default_extractors, TraitExtractor},
    pipeline::{local_now, ClassificationPipeline, Clock},
};

/// Builder for [`ClassificationPipeline`] with a fluent API
pub struct ClassificationPipelineBuilder {
    extractors: Vec<Box<dyn TraitExtractor>>,
    bcs_estimator: Option<Box<dyn BcsEstimator>>,
    scoring: ScoringConfig,
    clock: Option<Clock>,
}

impl ClassificationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            bcs_estimator: None,
            scoring: ScoringConfig::default(),
            clock: None,
        }
    }

    /// Scoring settings; the profile also applies to the default extractors
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn profile(mut self, profile: ScoringProfile) -> Self {
        self.scoring.profile = profile;
        self
    }

    /// Add an extractor; a later one for the same view replaces the earlier
    pub fn add_extractor<E>(mut self, extractor: E) -> Self
    where
        E: TraitExtractor + 'static,
    {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Set the BCS estimator (replaces any existing one)
    pub fn set_bcs_estimator<B>(mut self, estimator: B) -> Self
    where
        B: BcsEstimator + 'static,
    {
        self.bcs_estimator = Some(Box::new(estimator));
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the pipeline, falling back to the built-in extractors for all
    /// five views and the placeholder BCS estimator
    pub fn build(self) -> ClassificationPipeline {
        let extractors = if self.extractors.is_empty() {
            default_extractors(self.scoring.profile)
        } else {
            // One per view, kept in merge order
            let by_view: BTreeMap<_, _> = self
                .extractors
                .into_iter()
                .map(|e| (e.view(), e))
                .collect();
            by_view.into_values().collect()
        };

        ClassificationPipeline::new(
            extractors,
            self.bcs_estimator
                .unwrap_or_else(|| Box::new(PlaceholderBcsEstimator) as Box<dyn BcsEstimator>),
            self.scoring,
            self.clock.unwrap_or(local_now),
        )
    }
}

impl Default for ClassificationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
