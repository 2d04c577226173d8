use std::ops::RangeInclusive;

use crate::dataset::ParamIndex;
use crate::intersect::intersect;
use crate::types::{EntityId, Param, ParamType};

/// A complete combination whose intersection fits the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub params: Vec<Param>,
    pub entities: Vec<EntityId>,
}

/// Walk the cartesian product of `lists` and return the first fitting
/// combination.
///
/// Prefixes are extended one type at a time; only the last list is paired
/// with every prefix lazily. `max_attempts` caps the number of complete
/// combinations tried.
pub fn first_match<I: ParamIndex + ?Sized>(
    index: &I,
    param_types: &[ParamType],
    lists: &[Vec<String>],
    window: &RangeInclusive<usize>,
    max_attempts: Option<usize>,
) -> Option<Match> {
    let (last, init) = lists.split_last()?;

    let mut prefixes: Vec<Vec<&str>> = vec![Vec::new()];
    for list in init {
        let mut extended = Vec::with_capacity(list.len() * prefixes.len());
        for value in list {
            for prefix in &prefixes {
                let mut combination = Vec::with_capacity(prefix.len() + 1);
                combination.extend_from_slice(prefix);
                combination.push(value.as_str());
                extended.push(combination);
            }
        }
        prefixes = extended;
    }

    let mut attempts = 0usize;
    let mut combination = Vec::with_capacity(lists.len());
    for value in last {
        for prefix in &prefixes {
            if max_attempts.is_some_and(|limit| attempts == limit) {
                return None;
            }
            attempts += 1;

            combination.clear();
            combination.extend_from_slice(prefix);
            combination.push(value.as_str());

            if let Some(found) = evaluate(index, param_types, &combination, window) {
                return Some(found);
            }
        }
    }

    None
}

/// Resolve, reject repeated descriptors, intersect, and test the window.
fn evaluate<I: ParamIndex + ?Sized>(
    index: &I,
    param_types: &[ParamType],
    keys: &[&str],
    window: &RangeInclusive<usize>,
) -> Option<Match> {
    let mut params: Vec<Param> = Vec::with_capacity(keys.len());
    for (param_type, key) in param_types.iter().zip(keys) {
        let param = index.param(*param_type, key)?;
        if params.contains(param) {
            return None;
        }
        params.push(param.clone());
    }

    let entities = intersect(index, &params);
    if !window.contains(&entities.len()) {
        return None;
    }

    // A bare evolution line is a known group, not a puzzle
    if index.is_evolution_line(&entities) {
        return None;
    }

    Some(Match { params, entities })
}
