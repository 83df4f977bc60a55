use std::path::Path;

use opensilicon_core::LayoutDatabase;
use opensilicon_parasitics::{AnalysisContext, BuilderConfig, Corner, MinMax, OperatingConditions};
use serde::{Deserialize, Serialize};

use crate::error::{parse_json, read_file, write_file, IoError, Result};

/// Metadata for an OpenSilicon extraction project (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    pub version: String,
    pub pdk: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: ProjectSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Active timing corner.
    pub corner: Corner,
    pub extreme: MinMax,
    pub operating_conditions: Option<OperatingConditions>,
    pub extraction: BuilderConfig,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            corner: Corner::new("default", 0),
            extreme: MinMax::Max,
            operating_conditions: None,
            extraction: BuilderConfig::default(),
        }
    }
}

impl ProjectSettings {
    /// The analysis context every build of this run is performed under.
    pub fn analysis_context(&self) -> AnalysisContext {
        let context = AnalysisContext::new(self.corner.clone(), self.extreme);
        match &self.operating_conditions {
            Some(conditions) => context.with_operating_conditions(conditions.clone()),
            None => context,
        }
    }
}

impl ProjectMeta {
    pub fn new(name: &str, pdk: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            pdk: pdk.to_string(),
            description: String::new(),
            settings: ProjectSettings::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read_file(path)?;
        let meta: Self = parse_json(path, &text)?;
        log::debug!("loaded project '{}' from {}", meta.name, path.display());
        Ok(meta)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_file(path, &json)
    }
}

/// Read a layout database JSON document.
pub fn load_database(path: &Path) -> Result<LayoutDatabase> {
    let text = read_file(path)?;
    let db = LayoutDatabase::from_json(&text).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded database '{}' ({} nets, {} layers) from {}",
        db.name,
        db.net_count(),
        db.layer_stack.layer_count(),
        path.display()
    );
    Ok(db)
}
