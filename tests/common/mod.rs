#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use param_search::dataset::{DatasetCatalog, DatasetSource, GenerationDataset, ParamTableSource};
use param_search::rng::PrngSeed;
use param_search::types::{DatasetVersion, EntityId, Param, ParamType, SearchOptions};

pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/gen7.json")
}

pub fn gen7() -> GenerationDataset {
    DatasetCatalog::load_file(&fixture_path()).unwrap()
}

pub fn gen7_catalog() -> DatasetCatalog {
    let mut catalog = DatasetCatalog::new();
    catalog.insert(gen7()).unwrap();
    catalog
}

pub fn ids(names: &[&str]) -> Vec<EntityId> {
    names.iter().map(|name| EntityId::from_name(name)).collect()
}

pub fn param(param_type: ParamType, value: &str) -> Param {
    Param::new(param_type, value)
}

pub fn options(count: usize, min: usize, max: usize, seed: [u16; 4]) -> SearchOptions {
    SearchOptions {
        dataset_version: DatasetVersion::new("gen7"),
        type_candidates: ParamType::searchable(),
        constraint_types: None,
        constraint_count: count,
        min_results: min,
        max_results: max,
        rng_seed: PrngSeed::new(seed),
    }
}

/// Small hand-built dataset.
pub struct TinyDataset {
    source: DatasetSource,
}

impl TinyDataset {
    pub fn new(version: &str) -> Self {
        Self {
            source: DatasetSource {
                version: DatasetVersion::new(version),
                param_types: BTreeMap::new(),
                formes: BTreeMap::new(),
                other_formes: BTreeMap::new(),
                evolution_lines: Vec::new(),
            },
        }
    }

    pub fn value(mut self, param_type: ParamType, value: &str, names: &[&str]) -> Self {
        self.source
            .param_types
            .entry(param_type)
            .or_insert_with(ParamTableSource::default)
            .dex
            .insert(value.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn forme(mut self, name: &str, base: &str, label: &str) -> Self {
        self.source.formes.insert(name.to_string(), label.to_string());
        self.source.other_formes.insert(name.to_string(), base.to_string());
        self
    }

    pub fn evolution_line(mut self, names: &[&str]) -> Self {
        self.source
            .evolution_lines
            .push(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn build(self) -> GenerationDataset {
        GenerationDataset::from_source(self.source).unwrap()
    }
}
