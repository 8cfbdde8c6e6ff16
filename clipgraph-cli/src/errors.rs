use clipgraph::errors::PipelineError;
use ::config::ConfigError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Input path {0:?} does not exist")]
    MissingInput(PathBuf),
}
