use crate::{errors::PipelineError, io::open_reader};
use clipgraph_core::entities::graph::{node_link::NodeLinkGraph, Graph};
use std::path::Path;
use tracing::info;

/// Write `graph` as a node-link JSON document.
pub fn save_graph(graph: &Graph, path: impl AsRef<Path>, pretty: bool) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let view = graph.to_node_link();
    crate::io::write_with(path, |w| {
        if pretty {
            serde_json::to_writer_pretty(w, &view)?;
        } else {
            serde_json::to_writer(w, &view)?;
        }
        Ok(())
    })?;
    info!(
        ?path,
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "Saved graph"
    );
    Ok(())
}

/// Read a node-link JSON document back into a typed graph.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, PipelineError> {
    let path = path.as_ref();
    let view: NodeLinkGraph = serde_json::from_reader(open_reader(path)?)?;
    let graph = Graph::try_from(view)?;
    info!(
        ?path,
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "Loaded graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{PipelineOptions, ScrapeDataset},
        test_utils::{hashtag_response, video_record, COLLECTED_AT},
    };
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn graph() -> Graph {
        let dataset = ScrapeDataset::new(
            hashtag_response("18478", "zouk", COLLECTED_AT),
            vec![
                video_record("1", "7", "10", &[("18478", "zouk")]),
                video_record("2", "7", "10", &[("18478", "zouk"), ("5", "salsa")]),
            ],
        );
        dataset.to_graph(&PipelineOptions::default()).unwrap().0
    }

    #[test]
    fn saved_graph_loads_back_identically() {
        let dir = tempdir().unwrap();
        let g = graph();
        for name in ["g.json", "g.json.gz", "g.json.bz2"] {
            let path = dir.path().join(name);
            save_graph(&g, &path, false).unwrap();
            let loaded = load_graph(&path).unwrap();
            assert_eq!(loaded.to_node_link().nodes, g.to_node_link().nodes);
            assert_eq!(loaded.to_node_link().links, g.to_node_link().links);
            // graph metadata is untyped, integers come back as their narrowest kind
            assert_eq!(
                loaded.metadata().get("collected_at").and_then(|p| p.as_i64()),
                Some(COLLECTED_AT)
            );
        }
    }

    #[test]
    fn pretty_output_is_readable_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.json");
        save_graph(&graph(), &path, true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"multigraph\": true"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["graph"]["hashtag_id"], "18478");
    }

    #[test]
    fn unknown_attribute_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.json");
        fs::write(
            &path,
            r#"{"nodes":[{"nid":0,"attrs":{"ntype":"Video","mood":"happy"}}],"links":[]}"#,
        )
        .unwrap();
        assert!(matches!(load_graph(&path), Err(PipelineError::Json(_))));
    }
}
