//! Free-text param resolution and display names.

use crate::dataset::ParamIndex;
use crate::intersect::intersect;
use crate::types::{to_id, EntityId, Param, ParamType};

/// Pools are searched in this order; the first hit wins, so `psychic`
/// resolves to the move and `psychictype` to the type.
pub const RESOLUTION_ORDER: [ParamType; 9] = ParamType::SEARCHABLE;

/// Resolve one guess fragment such as `"Resists Ice"` or `"steeltype"`.
pub fn resolve_param<I: ParamIndex + ?Sized>(index: &I, text: &str) -> Option<Param> {
    let key = to_id(text);
    if key.is_empty() {
        return None;
    }

    RESOLUTION_ORDER
        .iter()
        .find_map(|param_type| index.param(*param_type, &key))
        .cloned()
}

/// Resolve every fragment, or nothing if any fragment is unknown.
pub fn resolve_params<I, S>(index: &I, parts: &[S]) -> Option<Vec<Param>>
where
    I: ParamIndex + ?Sized,
    S: AsRef<str>,
{
    parts
        .iter()
        .map(|part| resolve_param(index, part.as_ref()))
        .collect()
}

pub fn param_name(param: &Param) -> String {
    match param.param_type {
        ParamType::Type => format!("{} type", param.value),
        ParamType::Resistance => format!("Resists {} type", param.value),
        ParamType::Weakness => format!("Weak to {} type", param.value),
        ParamType::Gen => format!("Gen {}", param.value),
        ParamType::EggGroup => format!("{} Group", param.value),
        _ => param.value.clone(),
    }
}

/// Display names, in the order the params were given.
pub fn param_names(params: &[Param]) -> Vec<String> {
    params.iter().map(param_name).collect()
}

/// Check a comma-separated guess against an answer set.
///
/// Any parameter set with the right size whose intersection equals the
/// answer is accepted, not just the one the search produced. Returns the
/// display names of the accepted guess.
pub fn check_guess<I: ParamIndex + ?Sized>(
    index: &I,
    guess: &str,
    expected_count: usize,
    answer: &[EntityId],
) -> Option<Vec<String>> {
    let parts: Vec<&str> = guess.split(',').collect();
    if parts.len() != expected_count {
        return None;
    }

    let params = resolve_params(index, &parts)?;
    if intersect(index, &params) == answer {
        Some(param_names(&params))
    } else {
        None
    }
}
