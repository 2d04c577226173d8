// Read-only after load:
// no mutation once shared
// one dataset per version
// shared across workers behind an Arc

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::generation::{DatasetError, GenerationDataset};
use crate::types::{DatasetFingerprint, DatasetVersion, ParamType};

#[derive(Debug, Default)]
pub struct DatasetCatalog {
    datasets: BTreeMap<DatasetVersion, Arc<GenerationDataset>>,
}

impl DatasetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset: GenerationDataset) -> Result<(), DatasetError> {
        let version = dataset.version().clone();
        if self.datasets.contains_key(&version) {
            return Err(DatasetError::DuplicateVersion(version));
        }
        self.datasets.insert(version, Arc::new(dataset));
        Ok(())
    }

    /// Load a single dataset source file.
    pub fn load_file(path: &Path) -> Result<GenerationDataset, DatasetError> {
        let wrap = |source: DatasetError| DatasetError::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        };

        let bytes = fs::read(path).map_err(|e| wrap(e.into()))?;
        GenerationDataset::from_json(&bytes).map_err(wrap)
    }

    /// Load every `*.json` file in `dir`, in path order.
    pub fn load_dir(dir: &Path) -> Result<Self, DatasetError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            let dataset = Self::load_file(&path)?;
            info!(
                version = %dataset.version(),
                fingerprint = dataset.fingerprint().as_str(),
                entities = dataset.entity_count(),
                path = %path.display(),
                "loaded dataset"
            );
            catalog.insert(dataset)?;
        }

        Ok(catalog)
    }

    pub fn get(&self, version: &DatasetVersion) -> Option<&Arc<GenerationDataset>> {
        self.datasets.get(version)
    }

    pub fn versions(&self) -> impl Iterator<Item = &DatasetVersion> {
        self.datasets.keys()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn manifest(&self) -> CatalogManifest {
        let datasets = self
            .datasets
            .values()
            .map(|dataset| ManifestDatasetEntry {
                version: dataset.version().clone(),
                fingerprint: dataset.fingerprint().clone(),
                entity_count: dataset.entity_count(),
                evolution_line_count: dataset.evolution_line_count(),
                value_counts: dataset
                    .param_types()
                    .map(|param_type| (param_type, dataset.value_count(param_type)))
                    .collect(),
            })
            .collect::<Vec<_>>();

        CatalogManifest {
            created_at: Utc::now(),
            dataset_count: datasets.len(),
            datasets,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDatasetEntry {
    pub version: DatasetVersion,
    pub fingerprint: DatasetFingerprint,
    pub entity_count: usize,
    pub evolution_line_count: usize,
    pub value_counts: BTreeMap<ParamType, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub created_at: DateTime<Utc>, // informational only
    pub dataset_count: usize,
    pub datasets: Vec<ManifestDatasetEntry>,
}
