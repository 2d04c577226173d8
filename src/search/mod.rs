pub mod combinations;
pub mod defaults;
pub mod selection;

use tracing::{debug, trace, warn};

use crate::dataset::ParamIndex;
use crate::rng::Prng;
use crate::types::{SearchOptions, SearchOutcome, SearchResult};
pub use combinations::{first_match, Match};
pub use defaults::SearchDefaults;
pub use selection::{candidate_keys, draw_param_types, order_by_branching, shuffled_lists};

/// Outer retry bound when the caller does not configure one.
pub const DEFAULT_MAX_OUTER_ITERATIONS: usize = 1000;

pub struct ParamSearcher<'a, I: ?Sized> {
    index: &'a I,
    max_outer_iterations: usize,
}

impl<'a, I> ParamSearcher<'a, I>
where
    I: ParamIndex + ?Sized,
{
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            max_outer_iterations: DEFAULT_MAX_OUTER_ITERATIONS,
        }
    }

    pub fn with_max_outer_iterations(mut self, limit: usize) -> Self {
        self.max_outer_iterations = limit.max(1);
        self
    }

    /// Find a combination whose intersection lands in the options' window.
    ///
    /// Every return carries `prng`'s state after the search. Fixed type
    /// lists get one pass; random selections are retried up to the outer
    /// bound.
    pub fn search(&self, options: &SearchOptions, prng: &mut Prng) -> SearchResult {
        if let Err(error) = options.validate() {
            warn!(%error, "rejecting search options");
            return SearchResult::empty(SearchOutcome::Invalid, prng.seed());
        }

        let window = options.min_results..=options.max_results;
        let fixed = options.constraint_types.as_deref();

        for iteration in 1..=self.max_outer_iterations {
            // 1. Type selection
            let mut param_types = match fixed {
                Some(types) => types.to_vec(),
                None => draw_param_types(&options.type_candidates, options.constraint_count, prng),
            };

            // 2. Pruning and ordering
            let keys = candidate_keys(self.index, &param_types, options.min_results);
            if fixed.is_none() {
                order_by_branching(&mut param_types, &keys);
            }
            let lists = shuffled_lists(&param_types, &keys, prng);

            // 3. Combination walk, bounded by the widest list for random types
            let max_attempts = match fixed {
                Some(_) => None,
                None => Some(lists.last().map_or(0, Vec::len)),
            };

            if let Some(found) = first_match(self.index, &param_types, &lists, &window, max_attempts) {
                debug!(
                    iteration,
                    types = ?param_types,
                    entities = found.entities.len(),
                    "search found combination"
                );
                return SearchResult::found(found.params, found.entities, prng.seed());
            }

            if fixed.is_some() {
                debug!(types = ?param_types, "fixed constraint types are unsatisfiable");
                return SearchResult::empty(SearchOutcome::Unsatisfiable, prng.seed());
            }

            trace!(iteration, types = ?param_types, "abandoning type selection");
        }

        warn!(
            iterations = self.max_outer_iterations,
            min = options.min_results,
            max = options.max_results,
            "search exhausted"
        );
        SearchResult::empty(SearchOutcome::Exhausted, prng.seed())
    }
}

/// Run a search seeded from the options themselves.
pub fn search<I: ParamIndex + ?Sized>(
    index: &I,
    options: &SearchOptions,
    max_outer_iterations: usize,
) -> SearchResult {
    let mut prng = Prng::new(options.rng_seed);
    ParamSearcher::new(index)
        .with_max_outer_iterations(max_outer_iterations)
        .search(options, &mut prng)
}
