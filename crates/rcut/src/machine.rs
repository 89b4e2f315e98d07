use crate::types::Measurement;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tool and material parameters for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Clearance height for travel moves.
    pub safe_z: Measurement,
    /// Z of the material surface.
    pub top_z: Measurement,
    pub rapid_rate: Measurement,
    pub plunge_rate: Measurement,
    pub cut_rate: Measurement,
    /// Maximum depth removed per pass.
    pub pass_depth: Measurement,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            safe_z: Measurement::inch(0.1),
            top_z: Measurement::inch(0.0),
            rapid_rate: Measurement::inch(100.0),
            plunge_rate: Measurement::inch(5.0),
            cut_rate: Measurement::inch(40.0),
            pass_depth: Measurement::inch(0.125),
        }
    }
}

impl MachineConfig {
    /// Load a config from the provided path. Missing files yield the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data =
            fs::read(path).with_context(|| format!("read machine config {}", path.display()))?;
        let config: MachineConfig =
            serde_json::from_slice(&data).context("deserialize machine config")?;
        Ok(config)
    }

    /// Persist the config to the provided path, ensuring the directory exists.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create machine config directory {}", parent.display()))?;
        }

        let data =
            serde_json::to_vec_pretty(self).context("serialize machine config to JSON bytes")?;
        fs::write(path, data).with_context(|| format!("write machine config {}", path.display()))
    }

    /// Resolve the default config path (`~/.rcut/machine.json`).
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home.join(".rcut").join("machine.json"))
    }
}
