//! Model registry: the explicitly owned, load-once set of prediction artifacts.
//!
//! Built once at startup and shared read-only through `AppState`. Missing or
//! corrupt artifacts never abort startup: they are recorded per target and the
//! affected family is simply unavailable (or partially available) for the session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::prediction::artifact::{load_artifact, Predictor};
use crate::schema::{artifact_file_name, ModelFamily};

/// Load report for one family.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FamilyStatus {
    pub loaded: bool,
    pub loaded_targets: Vec<String>,
    pub missing_targets: Vec<String>,
    /// target → reason
    pub failed_targets: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelFamily, BTreeMap<String, Box<dyn Predictor>>>,
    missing: BTreeMap<ModelFamily, Vec<String>>,
    failed: BTreeMap<ModelFamily, BTreeMap<String, String>>,
    source_dir: Option<PathBuf>,
}

impl ModelRegistry {
    /// Registry with nothing loaded. Populate with `insert` (tests, fakes).
    #[allow(dead_code)]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every `<family>_<target>_model.json` found in `dir`.
    pub fn load(dir: &Path) -> Self {
        let mut registry = Self {
            source_dir: Some(dir.to_path_buf()),
            ..Self::default()
        };

        if !dir.is_dir() {
            warn!("Models directory {} does not exist", dir.display());
        }

        for family in ModelFamily::ALL {
            let n_features = family.features().len();
            for target in family.targets() {
                let path = dir.join(artifact_file_name(family, target.name));
                if !path.exists() {
                    debug!("No artifact for {family}.{} at {}", target.name, path.display());
                    registry
                        .missing
                        .entry(family)
                        .or_default()
                        .push(target.name.to_string());
                    continue;
                }

                match load_artifact(&path, n_features) {
                    Ok(predictor) => {
                        debug!("Loaded {family}.{} ({})", target.name, predictor.kind());
                        registry.insert(family, target.name, predictor);
                    }
                    Err(e) => {
                        warn!("Failed to load {}: {e}", path.display());
                        registry
                            .failed
                            .entry(family)
                            .or_default()
                            .insert(target.name.to_string(), e.to_string());
                    }
                }
            }
        }

        for (family, status) in registry.status() {
            info!(
                "Model family {family}: {} loaded, {} missing, {} failed",
                status.loaded_targets.len(),
                status.missing_targets.len(),
                status.failed_targets.len()
            );
        }

        registry
    }

    pub fn insert(&mut self, family: ModelFamily, target: &str, predictor: Box<dyn Predictor>) {
        self.models
            .entry(family)
            .or_default()
            .insert(target.to_string(), predictor);
    }

    pub fn predictor(&self, family: ModelFamily, target: &str) -> Option<&dyn Predictor> {
        self.models
            .get(&family)
            .and_then(|targets| targets.get(target))
            .map(|p| p.as_ref())
    }

    pub fn is_loaded(&self, family: ModelFamily) -> bool {
        self.models
            .get(&family)
            .map(|targets| !targets.is_empty())
            .unwrap_or(false)
    }

    pub fn loaded_families(&self) -> Vec<ModelFamily> {
        ModelFamily::ALL
            .into_iter()
            .filter(|f| self.is_loaded(*f))
            .collect()
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    pub fn status(&self) -> BTreeMap<ModelFamily, FamilyStatus> {
        ModelFamily::ALL
            .into_iter()
            .map(|family| {
                let loaded_targets: Vec<String> = self
                    .models
                    .get(&family)
                    .map(|targets| targets.keys().cloned().collect())
                    .unwrap_or_default();
                let status = FamilyStatus {
                    loaded: !loaded_targets.is_empty(),
                    loaded_targets,
                    missing_targets: self.missing.get(&family).cloned().unwrap_or_default(),
                    failed_targets: self.failed.get(&family).cloned().unwrap_or_default(),
                };
                (family, status)
            })
            .collect()
    }
}
