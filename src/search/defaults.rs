use std::ops::RangeInclusive;

use crate::rng::PrngSeed;
use crate::types::{DatasetVersion, ParamType, SearchOptions};

/// Game-side defaults for a guessing round.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDefaults {
    pub min_results: usize,
    pub max_results: usize,
    pub constraint_count: usize,
    pub constraint_count_range: RangeInclusive<usize>,
    pub type_candidates: Vec<ParamType>,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            min_results: 3,
            max_results: 50,
            constraint_count: 2,
            constraint_count_range: 2..=4,
            type_candidates: ParamType::searchable(),
        }
    }
}

impl SearchDefaults {
    /// Team and survival rounds leave out moves and the matchup types.
    pub fn team() -> Self {
        Self {
            type_candidates: vec![
                ParamType::Tier,
                ParamType::Color,
                ParamType::Type,
                ParamType::EggGroup,
                ParamType::Ability,
                ParamType::Gen,
            ],
            ..Self::default()
        }
    }

    pub fn options(&self, dataset_version: DatasetVersion, rng_seed: PrngSeed) -> SearchOptions {
        SearchOptions {
            dataset_version,
            type_candidates: self.type_candidates.clone(),
            constraint_types: None,
            constraint_count: self.constraint_count,
            min_results: self.min_results,
            max_results: self.max_results,
            rng_seed,
        }
    }
}

impl SearchOptions {
    /// Options built from [`SearchDefaults::default`].
    pub fn with_defaults(dataset_version: DatasetVersion, rng_seed: PrngSeed) -> Self {
        SearchDefaults::default().options(dataset_version, rng_seed)
    }

    /// Same window, fixed to exactly these types.
    pub fn with_constraint_types(mut self, param_types: Vec<ParamType>) -> Self {
        self.constraint_count = param_types.len();
        self.constraint_types = Some(param_types);
        self
    }

    /// Same request with a different constraint count, clamped to the
    /// supported range.
    pub fn with_constraint_count(mut self, count: usize) -> Self {
        let range = SearchDefaults::default().constraint_count_range;
        self.constraint_count = count.clamp(*range.start(), *range.end());
        self
    }
}
