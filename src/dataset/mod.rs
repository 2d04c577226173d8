pub mod catalog;
pub mod generation;
pub mod index;
pub mod resolve;

pub use catalog::{CatalogManifest, DatasetCatalog, ManifestDatasetEntry};
pub use generation::{DatasetError, DatasetSource, GenerationDataset, ParamTableSource};
pub use index::ParamIndex;
pub use resolve::{check_guess, param_name, param_names, resolve_param, resolve_params};
