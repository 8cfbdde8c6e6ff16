use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PRETTY: bool = false;

#[derive(Debug, Deserialize, PartialEq, Clone, Serialize)]
pub struct OutputConfig {
    pub pretty: bool,
    /// Also stage the dataset as CSV tables in this directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: DEFAULT_PRETTY,
            tables_dir: None,
        }
    }
}
