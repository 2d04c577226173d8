use std::collections::BTreeMap;

use crate::dataset::ParamIndex;
use crate::rng::Prng;
use crate::types::{has_exclusive_pair, ParamType};

/// Draw `count` distinct types, redrawing any draw that pairs contradictory
/// types. Callers validate that a compatible draw exists.
pub fn draw_param_types(candidates: &[ParamType], count: usize, prng: &mut Prng) -> Vec<ParamType> {
    loop {
        let drawn = prng.sample_many(candidates, count);
        if !has_exclusive_pair(&drawn) {
            return drawn;
        }
    }
}

/// Value ids per type that can reach `minimum` on their own.
pub fn candidate_keys<I: ParamIndex + ?Sized>(
    index: &I,
    param_types: &[ParamType],
    minimum: usize,
) -> BTreeMap<ParamType, Vec<String>> {
    let mut keys = BTreeMap::new();
    for param_type in param_types {
        keys.entry(*param_type)
            .or_insert_with(|| index.candidate_values(*param_type, minimum));
    }
    keys
}

/// Fewest candidates first. Stable, so equal sizes keep draw order.
pub fn order_by_branching(param_types: &mut [ParamType], keys: &BTreeMap<ParamType, Vec<String>>) {
    param_types.sort_by_key(|param_type| keys.get(param_type).map_or(0, Vec::len));
}

/// One independently shuffled candidate list per type, in type order.
pub fn shuffled_lists(
    param_types: &[ParamType],
    keys: &BTreeMap<ParamType, Vec<String>>,
    prng: &mut Prng,
) -> Vec<Vec<String>> {
    param_types
        .iter()
        .map(|param_type| {
            let mut list = keys.get(param_type).cloned().unwrap_or_default();
            prng.shuffle(&mut list);
            list
        })
        .collect()
}
