use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::PrngSeed;
use crate::types::identifiers::{DatasetVersion, EntityId};

/// A category of searchable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Move,
    Tier,
    Color,
    Type,
    Resistance,
    Weakness,
    #[serde(alias = "group")]
    EggGroup,
    Ability,
    Gen,
    Letter,
}

/// Type pairs that contradict each other inside one combination.
pub const EXCLUSIVE_TYPE_PAIRS: [(ParamType, ParamType); 1] =
    [(ParamType::Resistance, ParamType::Weakness)];

impl ParamType {
    /// Every type a random search may draw from, in lookup order.
    pub const SEARCHABLE: [ParamType; 9] = [
        ParamType::Move,
        ParamType::Tier,
        ParamType::Color,
        ParamType::Type,
        ParamType::Resistance,
        ParamType::Weakness,
        ParamType::EggGroup,
        ParamType::Ability,
        ParamType::Gen,
    ];

    pub fn searchable() -> Vec<ParamType> {
        Self::SEARCHABLE.to_vec()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::Move => "move",
            ParamType::Tier => "tier",
            ParamType::Color => "color",
            ParamType::Type => "type",
            ParamType::Resistance => "resistance",
            ParamType::Weakness => "weakness",
            ParamType::EggGroup => "egggroup",
            ParamType::Ability => "ability",
            ParamType::Gen => "gen",
            ParamType::Letter => "letter",
        }
    }
}

/// True if `types` holds both members of an exclusive pair.
pub fn has_exclusive_pair(types: &[ParamType]) -> bool {
    EXCLUSIVE_TYPE_PAIRS
        .iter()
        .any(|(a, b)| types.contains(a) && types.contains(b))
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown param type: {0}")]
pub struct UnknownParamType(pub String);

impl FromStr for ParamType {
    type Err = UnknownParamType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let param_type = match s {
            "move" => ParamType::Move,
            "tier" => ParamType::Tier,
            "color" => ParamType::Color,
            "type" => ParamType::Type,
            "resistance" => ParamType::Resistance,
            "weakness" => ParamType::Weakness,
            "egggroup" | "group" => ParamType::EggGroup,
            "ability" => ParamType::Ability,
            "gen" => ParamType::Gen,
            "letter" => ParamType::Letter,
            other => return Err(UnknownParamType(other.to_string())),
        };
        Ok(param_type)
    }
}

/// One concrete constraint, e.g. `resistance = Fire`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(alias = "param")]
    pub value: String,
}

impl Param {
    pub fn new(param_type: ParamType, value: impl Into<String>) -> Self {
        Self {
            param_type,
            value: value.into(),
        }
    }
}

/// Request for a random combination whose intersection lands in
/// `[min_results, max_results]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(alias = "mod")]
    pub dataset_version: DatasetVersion,
    /// Pool that random type selections are drawn from.
    #[serde(default = "ParamType::searchable", alias = "paramTypes")]
    pub type_candidates: Vec<ParamType>,
    /// Fixed type list. When present no types are drawn and the search runs
    /// a single pass.
    #[serde(
        default,
        alias = "customParamTypes",
        skip_serializing_if = "Option::is_none"
    )]
    pub constraint_types: Option<Vec<ParamType>>,
    #[serde(default, alias = "numberOfParams")]
    pub constraint_count: usize,
    #[serde(alias = "minimumResults")]
    pub min_results: usize,
    #[serde(alias = "maximumResults")]
    pub max_results: usize,
    #[serde(alias = "prngSeed")]
    pub rng_seed: PrngSeed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchOptionsError {
    #[error("Result window is inverted: min {min} > max {max}")]
    InvertedWindow { min: usize, max: usize },

    #[error("Fixed constraint type list is empty")]
    EmptyConstraintTypes,

    #[error("Fixed constraint types combine {0} and {1}")]
    ContradictoryTypes(ParamType, ParamType),

    #[error("Constraint count must be at least 1")]
    ZeroCount,

    #[error("Cannot draw {requested} compatible types from {available} candidates")]
    NotEnoughCandidates { requested: usize, available: usize },
}

impl SearchOptions {
    /// Check the request before any random state is consumed.
    pub fn validate(&self) -> Result<(), SearchOptionsError> {
        if self.min_results > self.max_results {
            return Err(SearchOptionsError::InvertedWindow {
                min: self.min_results,
                max: self.max_results,
            });
        }

        if let Some(fixed) = &self.constraint_types {
            if fixed.is_empty() {
                return Err(SearchOptionsError::EmptyConstraintTypes);
            }
            if let Some((a, b)) = EXCLUSIVE_TYPE_PAIRS
                .iter()
                .find(|(a, b)| fixed.contains(a) && fixed.contains(b))
            {
                return Err(SearchOptionsError::ContradictoryTypes(*a, *b));
            }
            return Ok(());
        }

        if self.constraint_count == 0 {
            return Err(SearchOptionsError::ZeroCount);
        }

        // A draw must leave out one member of every exclusive pair present.
        let distinct: BTreeSet<ParamType> = self.type_candidates.iter().copied().collect();
        let blocked = EXCLUSIVE_TYPE_PAIRS
            .iter()
            .filter(|(a, b)| distinct.contains(a) && distinct.contains(b))
            .count();
        let available = distinct.len() - blocked;
        if self.constraint_count > available {
            return Err(SearchOptionsError::NotEnoughCandidates {
                requested: self.constraint_count,
                available,
            });
        }

        Ok(())
    }

    pub fn is_fixed(&self) -> bool {
        self.constraint_types.is_some()
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOutcome {
    Found,
    /// Fixed types were given and no combination fit the window.
    Unsatisfiable,
    /// The outer retry bound was reached without a fit.
    Exhausted,
    Invalid,
}

/// Search response. Always carries the advanced seed, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(alias = "params")]
    pub constraints: Vec<Param>,
    #[serde(alias = "pokemon")]
    pub entities: Vec<EntityId>,
    #[serde(alias = "prngSeed")]
    pub rng_seed: PrngSeed,
    pub outcome: SearchOutcome,
}

impl SearchResult {
    pub fn found(constraints: Vec<Param>, entities: Vec<EntityId>, rng_seed: PrngSeed) -> Self {
        Self {
            constraints,
            entities,
            rng_seed,
            outcome: SearchOutcome::Found,
        }
    }

    pub fn empty(outcome: SearchOutcome, rng_seed: PrngSeed) -> Self {
        Self {
            constraints: Vec::new(),
            entities: Vec::new(),
            rng_seed,
            outcome,
        }
    }

    pub fn is_found(&self) -> bool {
        self.outcome == SearchOutcome::Found
    }
}

/// Request to evaluate a caller-chosen constraint set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectOptions {
    #[serde(alias = "mod")]
    pub dataset_version: DatasetVersion,
    #[serde(alias = "params")]
    pub constraints: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectResult {
    #[serde(alias = "params")]
    pub constraints: Vec<Param>,
    #[serde(alias = "pokemon")]
    pub entities: Vec<EntityId>,
}
