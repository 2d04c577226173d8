use crate::types::{EntityId, Param, ParamType};

/// Read-only lookups the search and intersection engines need from a
/// dataset. Implementors are never mutated while requests run against them.
pub trait ParamIndex {
    /// Ids of the values of `param_type` matching at least `minimum`
    /// entities, in a stable order.
    fn candidate_values(&self, param_type: ParamType, minimum: usize) -> Vec<String>;

    /// Canonical descriptor for a pool key (a value id or an alias).
    fn param(&self, param_type: ParamType, key: &str) -> Option<&Param>;

    /// Sorted entity names matching `param`.
    fn entities(&self, param: &Param) -> Option<&[String]>;

    /// Forme label of an alternate forme, e.g. `Alola` or `Mega`.
    fn forme(&self, id: &EntityId) -> Option<&str>;

    /// Base species name of an alternate forme.
    fn base_species(&self, id: &EntityId) -> Option<&str>;

    /// True if `entities` is exactly a known evolution line.
    fn is_evolution_line(&self, entities: &[EntityId]) -> bool;
}
