//! The work behind each subcommand, kept apart from argument parsing so it can be tested.

use crate::{config::app_config::AppConfig, errors::CliError};
use clipgraph::{
    dataset::{PipelineReport, ScrapeDataset, HASHTAG_TITLE},
    io::{
        json_loader::{load_dataset, JsonLinesLoader},
        node_link::{load_graph, save_graph},
    },
};
use clipgraph_api::{EdgeType, NodeType, Prop};
use clipgraph_core::entities::graph::Graph;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct BuildRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Title of the queried hashtag, for inputs that do not carry one.
    pub hashtag: Option<String>,
    pub collected_at: Option<i64>,
}

/// A dump file is one `ScrapeDataset` document; a directory holds JSON-lines video records.
fn read_input(input: &Path, skip_invalid: bool) -> Result<ScrapeDataset, CliError> {
    if !input.exists() {
        return Err(CliError::MissingInput(input.to_path_buf()));
    }
    if input.is_dir() {
        let records: Vec<Value> = JsonLinesLoader::new(input, None)
            .set_skip_invalid(skip_invalid)
            .load()?;
        Ok(ScrapeDataset::new(Value::Null, records))
    } else {
        Ok(load_dataset(input)?)
    }
}

pub fn build(config: &AppConfig, request: &BuildRequest) -> Result<(Graph, PipelineReport), CliError> {
    let dataset = read_input(&request.input, config.pipeline.skip_invalid)?;
    let options = config.pipeline.options(request.collected_at);

    let (mut graph, report) = dataset.to_graph(&options)?;
    if let Some(title) = &request.hashtag {
        if !graph.metadata().contains_key(HASHTAG_TITLE) {
            graph.set_metadata(HASHTAG_TITLE, title.as_str());
        }
    }
    save_graph(&graph, &request.output, config.output.pretty)?;

    if let Some(dir) = &config.output.tables_dir {
        let (tables, _) = dataset.to_tables(&options)?;
        tables.write_csv(dir)?;
    }
    info!(
        output = ?request.output,
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        merged = report.assembly.nodes_removed(),
        skipped = report.skipped.len(),
        "Graph written"
    );
    Ok((graph, report))
}

/// Per-type counts of a finished graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub self_loops: usize,
    pub node_types: BTreeMap<NodeType, usize>,
    pub edge_types: BTreeMap<EdgeType, usize>,
    pub metadata: Vec<(String, Prop)>,
}

impl GraphStats {
    pub fn of(graph: &Graph) -> Self {
        Self {
            nodes: graph.num_nodes(),
            edges: graph.num_edges(),
            self_loops: graph.count_self_loops(),
            node_types: NodeType::ALL
                .into_iter()
                .map(|t| (t, graph.count_nodes_of_type(t)))
                .collect(),
            edge_types: EdgeType::ALL
                .into_iter()
                .map(|t| (t, graph.count_edges_of_type(t)))
                .collect(),
            metadata: graph
                .metadata()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }
}

impl Display for GraphStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.metadata {
            writeln!(f, "{key}: {value}")?;
        }
        writeln!(f, "nodes: {}", self.nodes)?;
        for (ntype, count) in &self.node_types {
            writeln!(f, "  {ntype}: {count}")?;
        }
        writeln!(f, "edges: {}", self.edges)?;
        for (etype, count) in &self.edge_types {
            writeln!(f, "  {etype}: {count}")?;
        }
        write!(f, "self-loops: {}", self.self_loops)
    }
}

pub fn stats(path: &Path) -> Result<GraphStats, CliError> {
    if !path.exists() {
        return Err(CliError::MissingInput(path.to_path_buf()));
    }
    Ok(GraphStats::of(&load_graph(path)?))
}
