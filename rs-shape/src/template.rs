use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};
use crate::stairs::{DEFAULT_GROUP_PREFIX, STANDARD_TEMPLATE};
use crate::unit_box::UnitBox;

/// Stair template as stored on disk.
///
/// ```toml
/// group_prefix = "stairs"
///
/// [[boxes]]
/// from = [0, 0, 0]
/// to = [16, 8, 16]
/// ```
///
/// Coordinates are in sixteenths of a block, like block-model elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StairTemplate {
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,
    pub boxes: Vec<UnitBox>,
}

impl Default for StairTemplate {
    fn default() -> Self {
        Self {
            group_prefix: default_group_prefix(),
            boxes: STANDARD_TEMPLATE.to_vec(),
        }
    }
}

impl StairTemplate {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| ShapeError::Template(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ShapeError::Template(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ShapeError::Template(e.to_string()))
    }
}

fn default_group_prefix() -> String {
    DEFAULT_GROUP_PREFIX.to_string()
}
