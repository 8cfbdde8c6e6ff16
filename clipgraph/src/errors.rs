use crate::parse::ParseError;
use clipgraph_api::core::entities::properties::PropError;
use clipgraph_core::utils::errors::GraphError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Record {index} could not be parsed: {source}")]
    Record {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Prop(#[from] PropError),

    #[error("Malformed table {table}: {reason}")]
    MalformedTable { table: String, reason: String },

    #[error("No input files found under {0}")]
    NoInput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "io")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
