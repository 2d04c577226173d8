pub mod identifiers;
pub mod params;

pub use identifiers::{to_id, DatasetFingerprint, DatasetVersion, EntityId};
pub use params::{
    has_exclusive_pair, IntersectOptions, IntersectResult, Param, ParamType, SearchOptions,
    SearchOptionsError, SearchOutcome, SearchResult, UnknownParamType, EXCLUSIVE_TYPE_PAIRS,
};
