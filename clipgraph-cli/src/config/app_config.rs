use crate::config::{
    log_config::LoggingConfig, output_config::OutputConfig, pipeline_config::PipelineConfig,
};
use clipgraph_api::MergeKey;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, PartialEq, Clone, Serialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

pub struct AppConfigBuilder {
    logging: LoggingConfig,
    pipeline: PipelineConfig,
    output: OutputConfig,
}

impl From<AppConfig> for AppConfigBuilder {
    fn from(config: AppConfig) -> Self {
        Self {
            logging: config.logging,
            pipeline: config.pipeline,
            output: config.output,
        }
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfig::default().into()
    }

    pub fn with_log_level(mut self, log_level: String) -> Self {
        self.logging.log_level = log_level;
        self
    }

    pub fn with_merge_by(mut self, merge_by: MergeKey) -> Self {
        self.pipeline.merge_by = merge_by;
        self
    }

    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.pipeline.skip_invalid = skip_invalid;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.output.pretty = pretty;
        self
    }

    pub fn with_tables_dir(mut self, tables_dir: Option<PathBuf>) -> Self {
        self.output.tables_dir = tables_dir;
        self
    }

    pub fn build(self) -> AppConfig {
        AppConfig {
            logging: self.logging,
            pipeline: self.pipeline,
            output: self.output,
        }
    }
}

// Order of precedence: values in the config file >> `app_config` >> built-in defaults.
// Command line flags are applied on top of the result by the caller.
pub fn load_config(
    app_config: Option<AppConfig>,
    config_path: Option<PathBuf>,
) -> Result<AppConfig, ConfigError> {
    let app_config = app_config.unwrap_or_default();
    let json = serde_json::to_string(&app_config).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let mut builder = Config::builder().add_source(File::from_str(&json, FileFormat::Json));
    if let Some(config_path) = config_path {
        builder = builder.add_source(File::from(config_path));
    }
    builder.build()?.try_deserialize::<AppConfig>()
}
