use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compression::{AnimationConfig, Compressor};
use crate::error::CodecError;

/// Settings for one conversion job, read from a JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobConfig {
    pub compressor: Compressor,
    pub animation: AnimationConfig,
    /// Drop duplicate tiles before compressing (image input only).
    pub optimise_tiles: bool,
}

pub fn load_config(path: &Path) -> Result<JobConfig, CodecError> {
    let file = File::open(path)?;
    let config = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!("Loaded job config from {:?}: {:?}", path, config);
    Ok(config)
}
