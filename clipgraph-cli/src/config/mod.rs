pub mod app_config;
pub mod log_config;
pub mod output_config;
pub mod pipeline_config;
