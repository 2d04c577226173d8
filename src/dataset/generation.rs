use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::index::ParamIndex;
use crate::intersect::sort_entities;
use crate::types::{to_id, DatasetFingerprint, DatasetVersion, EntityId, Param, ParamType};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to load dataset {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<DatasetError>,
    },
    #[error("Duplicate dataset version: {0}")]
    DuplicateVersion(DatasetVersion),
    #[error("Duplicate {param_type} key: {key}")]
    DuplicateKey { param_type: ParamType, key: String },
    #[error("{param_type} value {value:?} has no usable id")]
    EmptyKey { param_type: ParamType, value: String },
    #[error("{param_type} alias {alias:?} points at unknown value {target:?}")]
    UnknownAlias {
        param_type: ParamType,
        alias: String,
        target: String,
    },
    #[error("Tier value must not be parenthesized: {0}")]
    InvalidTier(String),
}

/// On-disk authoring format of one dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSource {
    pub version: DatasetVersion,
    pub param_types: BTreeMap<ParamType, ParamTableSource>,
    /// Entity name -> forme label.
    #[serde(default)]
    pub formes: BTreeMap<String, String>,
    /// Entity name -> base species name.
    #[serde(default)]
    pub other_formes: BTreeMap<String, String>,
    #[serde(default)]
    pub evolution_lines: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamTableSource {
    /// Value -> names of matching entities.
    pub dex: BTreeMap<String, Vec<String>>,
    /// Alternate spelling -> value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct ParamTable {
    pool: BTreeMap<String, Param>,
    dex: BTreeMap<String, Vec<String>>,
}

/// Immutable snapshot of one dataset version.
#[derive(Debug)]
pub struct GenerationDataset {
    version: DatasetVersion,
    fingerprint: DatasetFingerprint,
    tables: BTreeMap<ParamType, ParamTable>,
    formes: BTreeMap<EntityId, String>,
    other_formes: BTreeMap<EntityId, String>,
    evolution_lines: BTreeSet<Vec<EntityId>>,
    entity_count: usize,
}

impl GenerationDataset {
    pub fn from_json(bytes: &[u8]) -> Result<Self, DatasetError> {
        let source: DatasetSource = serde_json::from_slice(bytes)?;
        Self::from_source(source)
    }

    /// Validate a source and build its lookup tables.
    pub fn from_source(source: DatasetSource) -> Result<Self, DatasetError> {
        // BTreeMaps serialize in key order, so this is canonical
        let canonical = serde_json::to_vec(&source)?;
        let fingerprint = DatasetFingerprint::from_content(&canonical);

        let mut entities = BTreeSet::new();
        let mut tables = BTreeMap::new();

        for (param_type, table_source) in source.param_types {
            let table = build_table(param_type, table_source)?;
            for names in table.dex.values() {
                entities.extend(names.iter().map(|name| EntityId::from_name(name)));
            }
            tables.insert(param_type, table);
        }

        let formes = source
            .formes
            .into_iter()
            .map(|(name, forme)| (EntityId::from_name(&name), forme))
            .collect();

        let other_formes = source
            .other_formes
            .into_iter()
            .map(|(name, base)| (EntityId::from_name(&name), base))
            .collect();

        let evolution_lines = source
            .evolution_lines
            .into_iter()
            .map(|line| sort_entities(line.iter().map(|name| EntityId::from_name(name)).collect()))
            .collect();

        Ok(GenerationDataset {
            version: source.version,
            fingerprint,
            tables,
            formes,
            other_formes,
            evolution_lines,
            entity_count: entities.len(),
        })
    }

    pub fn version(&self) -> &DatasetVersion {
        &self.version
    }

    pub fn fingerprint(&self) -> &DatasetFingerprint {
        &self.fingerprint
    }

    pub fn param_types(&self) -> impl Iterator<Item = ParamType> + '_ {
        self.tables.keys().copied()
    }

    /// Display values of one param type, in key order.
    pub fn values(&self, param_type: ParamType) -> impl Iterator<Item = &str> {
        self.tables
            .get(&param_type)
            .into_iter()
            .flat_map(|table| table.dex.keys().map(String::as_str))
    }

    pub fn value_count(&self, param_type: ParamType) -> usize {
        self.tables.get(&param_type).map_or(0, |table| table.dex.len())
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn evolution_line_count(&self) -> usize {
        self.evolution_lines.len()
    }
}

fn build_table(param_type: ParamType, source: ParamTableSource) -> Result<ParamTable, DatasetError> {
    let mut table = ParamTable::default();

    for (value, mut names) in source.dex {
        if param_type == ParamType::Tier && value.starts_with('(') {
            return Err(DatasetError::InvalidTier(value));
        }

        let key = to_id(&value);
        if key.is_empty() {
            return Err(DatasetError::EmptyKey { param_type, value });
        }
        if table.pool.contains_key(&key) {
            return Err(DatasetError::DuplicateKey { param_type, key });
        }

        // Intersection relies on sorted, duplicate-free lists
        names.sort();
        names.dedup();

        table.pool.insert(key, Param::new(param_type, value.clone()));
        table.dex.insert(value, names);
    }

    for (alias, target) in source.aliases {
        if !table.dex.contains_key(&target) {
            return Err(DatasetError::UnknownAlias {
                param_type,
                alias,
                target,
            });
        }

        let key = to_id(&alias);
        if key.is_empty() {
            return Err(DatasetError::EmptyKey {
                param_type,
                value: alias,
            });
        }
        if table.pool.contains_key(&key) {
            return Err(DatasetError::DuplicateKey { param_type, key });
        }
        table.pool.insert(key, Param::new(param_type, target));
    }

    Ok(table)
}

impl ParamIndex for GenerationDataset {
    fn candidate_values(&self, param_type: ParamType, minimum: usize) -> Vec<String> {
        let Some(table) = self.tables.get(&param_type) else {
            return Vec::new();
        };

        table
            .dex
            .iter()
            .filter(|(_, names)| names.len() >= minimum)
            .map(|(value, _)| to_id(value))
            .collect()
    }

    fn param(&self, param_type: ParamType, key: &str) -> Option<&Param> {
        self.tables.get(&param_type)?.pool.get(key)
    }

    fn entities(&self, param: &Param) -> Option<&[String]> {
        self.tables
            .get(&param.param_type)?
            .dex
            .get(&param.value)
            .map(Vec::as_slice)
    }

    fn forme(&self, id: &EntityId) -> Option<&str> {
        self.formes.get(id).map(String::as_str)
    }

    fn base_species(&self, id: &EntityId) -> Option<&str> {
        self.other_formes.get(id).map(String::as_str)
    }

    fn is_evolution_line(&self, entities: &[EntityId]) -> bool {
        self.evolution_lines.contains(entities)
    }
}
