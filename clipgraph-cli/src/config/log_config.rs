use serde::Deserialize;

pub const DEFAULT_LOG_LEVEL: &str = "INFO";

#[derive(Debug, Deserialize, PartialEq, Clone, serde::Serialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl LoggingConfig {
    pub fn init(&self) {
        clipgraph_api::core::utils::logging::init_global_logger(self.log_level.clone())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
