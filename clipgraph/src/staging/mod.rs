//! Tabular staging: records become per-entity-type tables before they become a graph.
//!
//! Each table row is a double-keyed map `(ntype | etype, field) -> value`. Edge rows refer to their
//! endpoints by platform identifier (`src_original_id`, `dst_original_id`) because node ids are
//! only assigned when the tables are turned into a graph.

use crate::{errors::PipelineError, parse::ParseError, subgraph::ParsedVideo};
use clipgraph_api::{
    core::entities::properties::attrs::DoubleKeyedAttrs,
    EdgeAttrKey, EdgeAttrs, EdgeType, MergeKey, NodeAttrs, NodeType, Prop,
};
use clipgraph_core::entities::graph::{
    contraction::Contraction, logical_to_physical::Mapping, Graph,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub type Row = DoubleKeyedAttrs;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StagedTables {
    nodes: BTreeMap<NodeType, Vec<Row>>,
    edges: BTreeMap<EdgeType, Vec<Row>>,
}

impl StagedTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage every entity and relation of one video record.
    pub fn push_video(&mut self, record: &Value, collected_at: i64) -> Result<(), PipelineError> {
        let parsed = ParsedVideo::parse(record, collected_at)?;
        self.push_parsed(&parsed)
    }

    pub fn push_parsed(&mut self, parsed: &ParsedVideo) -> Result<(), PipelineError> {
        let video_id = original_id(&parsed.video)?;
        let author_id = original_id(&parsed.author)?;
        let music_id = original_id(&parsed.music)?;

        let mut rows = Vec::with_capacity(3 + parsed.hashtags.len());
        rows.push((NodeType::Video, parsed.video.to_double_keyed()?));
        rows.push((NodeType::Author, parsed.author.to_double_keyed()?));
        rows.push((NodeType::Music, parsed.music.to_double_keyed()?));
        let mut links = vec![
            (EdgeType::AuthorToVideo, author_id, video_id.clone()),
            (EdgeType::VideoToMusic, video_id.clone(), music_id),
        ];
        for hashtag in parsed.hashtags.iter() {
            rows.push((NodeType::Hashtag, hashtag.to_double_keyed()?));
            links.push((EdgeType::VideoToHashtag, video_id.clone(), original_id(hashtag)?));
        }

        for (ntype, row) in rows {
            self.push_node_row(ntype, row);
        }
        for (etype, src, dst) in links {
            let row = EdgeAttrs::of_type(etype)
                .with(EdgeAttrKey::SrcOriginalId, src)
                .with(EdgeAttrKey::DstOriginalId, dst)
                .to_double_keyed()?;
            self.push_edge_row(etype, row);
        }
        Ok(())
    }

    pub fn push_node_row(&mut self, ntype: NodeType, row: Row) {
        self.nodes.entry(ntype).or_default().push(row);
    }

    pub fn push_edge_row(&mut self, etype: EdgeType, row: Row) {
        self.edges.entry(etype).or_default().push(row);
    }

    pub fn node_table(&self, ntype: NodeType) -> &[Row] {
        self.nodes.get(&ntype).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edge_table(&self, etype: EdgeType) -> &[Row] {
        self.edges.get(&etype).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn num_node_rows(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn num_edge_rows(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Assign node ids table by table, resolve edge endpoints by platform id, then merge
    /// duplicate authors, music and hashtags by `id`. Video rows are never merged; edges naming a
    /// repeated video id attach to its first row.
    pub fn into_graph(self) -> Result<Graph, PipelineError> {
        let mut graph = Graph::new();
        let mut mapping = Mapping::new();
        for ntype in NodeType::ALL {
            for row in self.node_table(ntype) {
                let attrs = NodeAttrs::try_from_double_keyed(ntype.as_str(), fields(row))?;
                let id = original_id(&attrs)?;
                let nid = graph.add_node(attrs);
                mapping.get_or_set(ntype, id, nid);
            }
        }
        debug!(nodes = graph.num_nodes(), ids = mapping.len(), "Staged nodes resolved");

        for etype in EdgeType::ALL {
            let (src_type, dst_type) = etype.endpoints();
            for row in self.edge_table(etype) {
                let attrs = EdgeAttrs::try_from_double_keyed(etype.as_str(), fields(row))?;
                let src = mapping.resolve(src_type, endpoint(&attrs, EdgeAttrKey::SrcOriginalId))?;
                let dst = mapping.resolve(dst_type, endpoint(&attrs, EdgeAttrKey::DstOriginalId))?;
                graph.add_typed_edge(src, dst, etype)?;
            }
        }
        info!(
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            "Built graph from staged tables"
        );
        for ntype in NodeType::ALL.into_iter().filter(NodeType::is_mergeable) {
            graph.contract(&Contraction::by(MergeKey::Id).of_type(ntype))?;
        }
        Ok(graph)
    }
}

fn fields(row: &Row) -> impl Iterator<Item = (&str, Prop)> + '_ {
    row.iter().map(|((_, field), value)| (field.as_str(), value.clone()))
}

fn endpoint(attrs: &EdgeAttrs, key: EdgeAttrKey) -> &str {
    attrs.get(key).and_then(Prop::as_str).unwrap_or_default()
}

fn original_id(attrs: &NodeAttrs) -> Result<String, ParseError> {
    attrs
        .id()
        .map(str::to_owned)
        .ok_or_else(|| ParseError::MissingField {
            entity: attrs.ntype().unwrap_or(NodeType::Video),
            path: "id".to_owned(),
        })
}
