use crate::scenario::Scenario;
use serde::Deserialize;

fn default_schema_version() -> String {
    "1".to_string()
}

/// On-disk layout of the optional YAML configuration file.
///
/// Every field may be omitted; the application fills in its defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub data_path: Option<String>,
    pub output_dir: Option<String>,
    pub deadline_horizon_months: Option<u32>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}
