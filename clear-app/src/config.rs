use anyhow::{bail, Context, Result};
use clear_core::{regulatory::DEFAULT_HORIZON_MONTHS, scenario};
use clear_schemas::{file_formats::ConfigFile, scenario::Scenario};
use log::info;
use std::{fs, path::Path};

pub const DEFAULT_DATA_PATH: &str = "tnuva_scope_data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "./data/runs";

/// Settings for a run, from the optional YAML file with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: String,
    pub output_dir: String,
    pub deadline_horizon_months: u32,
    pub scenarios: [Scenario; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            deadline_horizon_months: DEFAULT_HORIZON_MONTHS,
            scenarios: scenario::default_scenarios(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration at `path`. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).is_file() {
            info!("No configuration at '{}', using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration: {}", path))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        let config = Self::from_file(file)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;

        info!("Configuration loaded from '{}'", path);
        Ok(config)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();
        if let Some(data_path) = file.data_path {
            config.data_path = data_path;
        }
        if let Some(output_dir) = file.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(months) = file.deadline_horizon_months {
            config.deadline_horizon_months = months;
        }

        if file.scenarios.len() > 2 {
            bail!("At most two scenarios can be configured, found {}", file.scenarios.len());
        }
        for (slot, scenario) in file.scenarios.into_iter().enumerate() {
            scenario::validate_parameters(&scenario.parameters)
                .with_context(|| format!("Scenario '{}'", scenario.name))?;
            config.scenarios[slot] = scenario;
        }
        Ok(config)
    }

    /// A fresh, timestamped directory name under the output directory.
    pub fn run_dir(&self) -> String {
        format!(
            "{}/clear_{}",
            self.output_dir,
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<AppConfig> {
        AppConfig::from_file(serde_yaml::from_str(yaml)?)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let config = parse(
            "data_path: other.csv\nscenarios:\n  - name: Aggressive\n    carbon_tax_rate: 150\n    renewable_fraction: 100\n    efficiency_fraction: 30\n",
        )
        .unwrap();
        assert_eq!(config.data_path, "other.csv");
        assert_eq!(config.output_dir, DEFAULT_OUTPUT_DIR);
        assert_eq!(config.scenarios[0].name, "Aggressive");
        assert_eq!(config.scenarios[0].parameters.carbon_tax_rate, 150.0);
        assert_eq!(config.scenarios[1].name, "Scenario 2");
    }

    #[test]
    fn out_of_range_scenario_is_rejected() {
        let err = parse(
            "scenarios:\n  - name: Bad\n    carbon_tax_rate: 500\n    renewable_fraction: 10\n    efficiency_fraction: 1\n",
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("carbon_tax_rate"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clear.yaml");
        fs::write(&path, "scenarios: [this is: not valid").unwrap();
        assert!(AppConfig::load(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn run_dir_is_under_output_dir() {
        let config = AppConfig::default();
        assert!(config.run_dir().starts_with("./data/runs/clear_"));
    }
}
