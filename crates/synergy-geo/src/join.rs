//! Spatial join engine
//!
//! Outer loop over references in input order, inner loop over target datasets
//! aligned with their grouping configs. Matches keep dataset order.

use synergy_core::models::{
    Feature, GroupCounts, JoinDiagnostics, SpatialAnalysisResult, SpatialMatch,
    TargetDatasetConfig, TargetMatch,
};
use synergy_core::{Result, SynergyError};

use crate::grouping::GroupingPass;
use crate::index::{build_strategy, CandidateStrategy};
use crate::models::{ContainmentMode, JoinStrategy};
use crate::predicate::PreparedReference;

/// Options controlling one join run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinOptions {
    pub containment: ContainmentMode,
    pub strategy: JoinStrategy,
}

impl JoinOptions {
    pub fn with_containment(mut self, containment: ContainmentMode) -> Self {
        self.containment = containment;
        self
    }

    pub fn with_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Join engine holding its options
#[derive(Debug, Clone, Default)]
pub struct SpatialJoin {
    options: JoinOptions,
}

impl SpatialJoin {
    pub fn new(options: JoinOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> JoinOptions {
        self.options
    }

    /// Match every reference against every target dataset
    ///
    /// `targets[i]` is grouped by `configs[i]`; the two must have the same
    /// length.
    pub fn join<T>(
        &self,
        references: &[Feature],
        targets: &[T],
        configs: &[TargetDatasetConfig],
    ) -> Result<SpatialAnalysisResult>
    where
        T: AsRef<[Feature]>,
    {
        if targets.len() != configs.len() {
            return Err(SynergyError::ConfigurationMismatch {
                datasets: targets.len(),
                configs: configs.len(),
            });
        }

        tracing::debug!(
            "Joining {} references against {} target datasets ({})",
            references.len(),
            targets.len(),
            self.options.containment
        );

        let strategies: Vec<Box<dyn CandidateStrategy>> = targets
            .iter()
            .enumerate()
            .map(|(dataset_idx, dataset)| {
                let strategy = build_strategy(self.options.strategy, dataset.as_ref());
                tracing::debug!("Dataset {} candidates via {}", dataset_idx, strategy.name());
                strategy
            })
            .collect();

        let mut matches = Vec::new();
        let mut summary = GroupCounts::new();
        let mut diagnostics = JoinDiagnostics::default();
        let mut total_matches = 0;

        for (ref_idx, reference) in references.iter().enumerate() {
            diagnostics.references_scanned += 1;

            let prepared = match PreparedReference::from_feature(reference) {
                Ok(prepared) => prepared,
                Err(e) => {
                    tracing::warn!("Skipping reference {}: {}", ref_idx, e);
                    diagnostics.invalid_references += 1;
                    continue;
                }
            };

            let mut target_matches = Vec::with_capacity(targets.len());
            for (dataset_idx, ((dataset, config), strategy)) in
                targets.iter().zip(configs).zip(&strategies).enumerate()
            {
                let features = dataset.as_ref();
                let mut matched = Vec::new();
                let mut pass = GroupingPass::new(config, &mut summary);

                for idx in strategy.candidates(prepared.bounds()) {
                    let Some(target) = features.get(idx) else {
                        continue;
                    };

                    diagnostics.predicate_calls += 1;
                    match prepared.contains_target(target, self.options.containment) {
                        Ok(true) => {
                            pass.record(target);
                            matched.push(target.clone());
                        }
                        Ok(false) => {}
                        Err(e) => {
                            tracing::debug!(
                                "Reference {} dataset {} feature {} not evaluated: {}",
                                ref_idx,
                                dataset_idx,
                                idx,
                                e
                            );
                            diagnostics.skipped_features += 1;
                        }
                    }
                }

                let grouped_matches = pass.finish();
                total_matches += matched.len();
                target_matches.push(TargetMatch {
                    match_count: matched.len(),
                    target_features: matched,
                    grouped_matches,
                });
            }

            let spatial_match = SpatialMatch::new(reference.clone(), target_matches);
            if spatial_match.total_match_count > 0 {
                matches.push(spatial_match);
            }
        }

        tracing::info!(
            "Spatial join complete: {} references, {} matched, {} target matches, {} skipped features",
            diagnostics.references_scanned,
            matches.len(),
            total_matches,
            diagnostics.skipped_features
        );

        Ok(SpatialAnalysisResult { matches, total_matches, summary, diagnostics })
    }
}

/// Run a join with default options
pub fn join<T>(
    references: &[Feature],
    targets: &[T],
    configs: &[TargetDatasetConfig],
) -> Result<SpatialAnalysisResult>
where
    T: AsRef<[Feature]>,
{
    SpatialJoin::default().join(references, targets, configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geometry;
    use synergy_core::models::GroupKey;

    fn square(min: f64, max: f64) -> Feature {
        Feature::new(Geometry::rectangle([min, min], [max, max])).with_property("OBJECTID", 1_i64)
    }

    fn charger(x: f64, y: f64, kind: &str) -> Feature {
        Feature::new(Geometry::point(x, y)).with_property("type", kind)
    }

    #[test]
    fn test_configuration_mismatch() {
        let targets: Vec<Vec<Feature>> = vec![vec![], vec![]];
        let configs = vec![TargetDatasetConfig::default()];

        let err = join(&[square(0.0, 1.0)], &targets, &configs).unwrap_err();
        assert!(matches!(err, SynergyError::ConfigurationMismatch { datasets: 2, configs: 1 }));
    }

    #[test]
    fn test_no_references() {
        let targets = vec![vec![charger(0.5, 0.5, "Level 2")]];
        let configs = vec![TargetDatasetConfig::new(["type"])];

        let result = join(&[], &targets, &configs).unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.total_matches, 0);
        assert_eq!(result.diagnostics.predicate_calls, 0);
    }

    #[test]
    fn test_matches_keep_input_order() {
        let targets = vec![vec![
            charger(0.9, 0.9, "c"),
            charger(0.1, 0.1, "a"),
            charger(5.0, 5.0, "z"),
            charger(0.5, 0.5, "b"),
        ]];
        let configs = vec![TargetDatasetConfig::new(["type"])];

        for strategy in [JoinStrategy::FullScan, JoinStrategy::RTree] {
            let engine = SpatialJoin::new(JoinOptions::default().with_strategy(strategy));
            let result = engine.join(&[square(0.0, 1.0)], &targets, &configs).unwrap();

            let kinds: Vec<String> = result.matches[0].target_matches[0]
                .target_features
                .iter()
                .map(|f| f.property_or("type", ""))
                .collect();
            assert_eq!(kinds, vec!["c", "a", "b"]);
        }
    }

    #[test]
    fn test_invalid_reference_is_counted() {
        let references = vec![
            Feature::without_geometry(),
            Feature::new(Geometry::point(0.0, 0.0)),
            square(0.0, 1.0),
        ];
        let targets = vec![vec![charger(0.5, 0.5, "Level 2")]];
        let configs = vec![TargetDatasetConfig::new(["type"])];

        let result = join(&references, &targets, &configs).unwrap();
        assert_eq!(result.diagnostics.references_scanned, 3);
        assert_eq!(result.diagnostics.invalid_references, 2);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.summary.get(&GroupKey::from(vec!["Level 2"])), 1);
    }

    #[test]
    fn test_predicate_failures_are_skipped() {
        let targets = vec![vec![
            charger(f64::NAN, 0.5, "broken"),
            Feature::without_geometry(),
            charger(0.5, 0.5, "Level 2"),
        ]];
        let configs = vec![TargetDatasetConfig::new(["type"])];

        let result = join(&[square(0.0, 1.0)], &targets, &configs).unwrap();
        assert_eq!(result.diagnostics.skipped_features, 2);
        assert_eq!(result.diagnostics.predicate_calls, 3);
        assert_eq!(result.total_matches, 1);
    }
}
