use crate::error::ConfigError;
use crate::terrain::constants::{
    default_block_capacities, MAX_LOD_LEVELS, MAX_PATCH_COUNT, MAX_SUPPORTED_LOD_LEVELS,
};
use crate::terrain::{LodLayout, VertexPool};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizing of a terrain patch set. Every field is optional in the file; missing fields take the
/// defaults below, and a missing neighbour delta allows the full range of the layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerrainConfig {
    pub max_lod_levels: usize,

    /// Vertex blocks per lod level, finest first. Empty means the default budget.
    pub block_capacities: Vec<usize>,

    pub max_patches: usize,

    pub max_neighbour_delta: Option<usize>,

    pub patches_per_face: usize,

    pub radius: f64,

    /// Direction from the planet centre that gets the finest patches.
    pub focus: [f64; 3],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            max_lod_levels: MAX_LOD_LEVELS,
            block_capacities: Vec::new(),
            max_patches: MAX_PATCH_COUNT,
            max_neighbour_delta: None,
            patches_per_face: 3,
            radius: 1000.0,
            focus: [0.0, 0.0, 1.0],
        }
    }
}

impl TerrainConfig {
    /// Loads a config file, picking the format from its extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TerrainConfig, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => TerrainConfig::from_yaml_str(&content)?,
            Some("json") => TerrainConfig::from_json_str(&content)?,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };
        info!("Loaded terrain config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<TerrainConfig, ConfigError> {
        let config: TerrainConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<TerrainConfig, ConfigError> {
        let config: TerrainConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn layout(&self) -> Result<LodLayout, ConfigError> {
        LodLayout::new(self.max_lod_levels).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Block capacities with the default budget filled in.
    pub fn capacities(&self) -> Vec<usize> {
        if self.block_capacities.is_empty() {
            default_block_capacities(self.max_lod_levels)
        } else {
            self.block_capacities.clone()
        }
    }

    pub fn neighbour_delta(&self) -> usize {
        self.max_neighbour_delta
            .unwrap_or_else(|| self.max_lod_levels.saturating_sub(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lod_levels == 0 || self.max_lod_levels > MAX_SUPPORTED_LOD_LEVELS {
            return Err(ConfigError::Invalid(format!(
                "maxLodLevels must be within 1..={}, got {}",
                MAX_SUPPORTED_LOD_LEVELS, self.max_lod_levels
            )));
        }
        let capacities = self.capacities();
        if capacities.len() != self.max_lod_levels {
            return Err(ConfigError::Invalid(format!(
                "blockCapacities lists {} levels, expected {}",
                capacities.len(),
                self.max_lod_levels
            )));
        }
        if self.neighbour_delta() >= self.max_lod_levels {
            return Err(ConfigError::Invalid(format!(
                "maxNeighbourDelta must be below maxLodLevels ({})",
                self.max_lod_levels
            )));
        }
        let cube_patches = 6 * self.patches_per_face * self.patches_per_face;
        if self.patches_per_face == 0 || cube_patches > self.max_patches {
            return Err(ConfigError::Invalid(format!(
                "{} patches per face do not fit in {} patches",
                self.patches_per_face, self.max_patches
            )));
        }
        // The cube sphere starts out at the coarsest level.
        let coarsest = capacities[self.max_lod_levels - 1];
        if cube_patches > coarsest {
            return Err(ConfigError::Invalid(format!(
                "a cube sphere of {} patches needs as many coarsest blocks, got {}",
                cube_patches, coarsest
            )));
        }
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    /// Creates the vertex pool described by this config.
    pub fn pool(&self) -> Result<VertexPool, ConfigError> {
        VertexPool::new(self.layout()?, &self.capacities())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
