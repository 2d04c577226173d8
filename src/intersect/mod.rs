//! AND-intersection of param lookups with alternate-forme collapsing.

use std::collections::HashSet;

use tracing::warn;

use crate::dataset::ParamIndex;
use crate::types::{EntityId, Param};

/// Forme labels that make a distinct entity in their own right. Every
/// other alternate forme collapses into its base species.
pub const REGIONAL_FORMES: [&str; 1] = ["Alola"];

/// Carry a regional forme label but behave like any other alternate forme.
pub const COSTUME_FORMES: [&str; 1] = ["Pikachu-Alola"];

/// Entities matching every param, collapsed and sorted.
///
/// An empty or unresolvable param list yields an empty set.
pub fn intersect<I: ParamIndex + ?Sized>(index: &I, params: &[Param]) -> Vec<EntityId> {
    let raw = raw_intersection(index, params);
    sort_entities(collapse_alternate_formes(index, &raw))
}

fn raw_intersection<'a, I: ParamIndex + ?Sized>(index: &'a I, params: &[Param]) -> Vec<&'a str> {
    let mut lists = Vec::with_capacity(params.len());
    for param in params {
        match index.entities(param) {
            Some(list) => lists.push(list),
            None => {
                warn!(param_type = %param.param_type, value = %param.value, "unknown param in intersection");
                return Vec::new();
            }
        }
    }

    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };

    first
        .iter()
        .filter(|name| rest.iter().all(|list| list.binary_search(*name).is_ok()))
        .map(String::as_str)
        .collect()
}

/// Drop alternate formes whose base species also matched. Alola formes
/// stay, except the costume formes listed in [`COSTUME_FORMES`].
fn collapse_alternate_formes<I: ParamIndex + ?Sized>(index: &I, raw: &[&str]) -> Vec<EntityId> {
    let present: HashSet<EntityId> = raw.iter().map(|name| EntityId::from_name(name)).collect();

    let mut kept = Vec::with_capacity(raw.len());
    for name in raw {
        let id = EntityId::from_name(name);

        let regional = index
            .forme(&id)
            .is_some_and(|forme| REGIONAL_FORMES.contains(&forme))
            && !COSTUME_FORMES.contains(name);

        if !regional {
            if let Some(base) = index.base_species(&id) {
                if present.contains(&EntityId::from_name(base)) {
                    continue;
                }
            }
        }

        kept.push(id);
    }

    kept
}

/// Ascending, case-insensitive, ties broken on the raw id. Duplicates are
/// removed.
pub fn sort_entities(mut entities: Vec<EntityId>) -> Vec<EntityId> {
    entities.sort_by_cached_key(|id| (id.as_str().to_lowercase(), id.clone()));
    entities.dedup();

    debug_assert!(entities.windows(2).all(|w| w[0] != w[1]));

    entities
}
