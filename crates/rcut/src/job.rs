use crate::machine::MachineConfig;
use crate::types::{Operation, UnitSystem};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A generation request stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub units: UnitSystem,
    /// Falls back to the machine config file when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineConfig>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Job {
    pub fn new(units: UnitSystem, operations: Vec<Operation>) -> Self {
        Self {
            units,
            machine: None,
            operations,
        }
    }

    /// Load a job from disk.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("read job file {}", path.display()))?;
        let job: Job = serde_json::from_slice(&bytes).context("deserialize job file")?;
        Ok(job)
    }

    /// Persist the job to disk as prettified JSON.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(self).context("serialize job")?;
        fs::write(path, data).with_context(|| format!("write job file {}", path.display()))
    }

    /// The embedded machine config, or the one stored at `fallback`.
    pub fn machine_config(&self, fallback: &Path) -> Result<MachineConfig> {
        match self.machine {
            Some(machine) => Ok(machine),
            None => MachineConfig::load_from_path(fallback),
        }
    }
}
