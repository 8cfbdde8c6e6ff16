use crate::subgraph::{check_layout, invalid_subgraph};
use clipgraph_api::{MergeKey, NodeType};
use clipgraph_core::{
    entities::graph::{
        contraction::{Contraction, ContractionReport},
        Graph,
    },
    utils::errors::GraphError,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which key each mergeable entity type is deduplicated on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyPolicy {
    pub author: MergeKey,
    pub music: MergeKey,
    pub hashtag: MergeKey,
}

impl AssemblyPolicy {
    pub fn uniform(key: MergeKey) -> Self {
        Self {
            author: key,
            music: key,
            hashtag: key,
        }
    }

    /// Merge on normalised text for every type, for data without reliable identifiers.
    pub fn by_text() -> Self {
        Self::uniform(MergeKey::Text)
    }

    /// `None` for entity types that are never merged.
    pub fn key_for(&self, ntype: NodeType) -> Option<MergeKey> {
        match ntype {
            NodeType::Video => None,
            NodeType::Author => Some(self.author),
            NodeType::Music => Some(self.music),
            NodeType::Hashtag => Some(self.hashtag),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssemblyReport {
    pub subgraphs: usize,
    pub nodes_before: usize,
    pub edges: usize,
    pub contractions: Vec<ContractionReport>,
}

impl AssemblyReport {
    pub fn nodes_removed(&self) -> usize {
        self.contractions.iter().map(|c| c.nodes_removed()).sum()
    }
}

/// Union per-video subgraphs and merge duplicate authors, music and hashtags.
///
/// Every input must follow the per-video layout; the first one that does not fails the whole
/// assembly.
pub fn assemble<'a>(
    subgraphs: impl IntoIterator<Item = &'a Graph>,
    policy: &AssemblyPolicy,
) -> Result<(Graph, AssemblyReport), GraphError> {
    let mut graph = Graph::new();
    let mut report = AssemblyReport::default();
    for (index, sub) in subgraphs.into_iter().enumerate() {
        check_layout(sub).map_err(|source| invalid_subgraph(index, source))?;
        graph.extend_disjoint(sub)?;
        report.subgraphs += 1;
    }
    report.nodes_before = graph.num_nodes();
    report.edges = graph.num_edges();
    info!(
        subgraphs = report.subgraphs,
        nodes = report.nodes_before,
        edges = report.edges,
        "Concatenated subgraphs"
    );

    for ntype in [NodeType::Hashtag, NodeType::Author, NodeType::Music] {
        if let Some(key) = policy.key_for(ntype) {
            let contraction = Contraction::by(key).of_type(ntype);
            report.contractions.push(graph.contract(&contraction)?);
        }
    }
    Ok((graph, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        subgraph::VideoSubgraph,
        test_utils::{video_record, COLLECTED_AT},
    };
    use clipgraph_api::{core::Direction, EdgeType, NodeAttrKey, NID};
    use clipgraph_core::utils::errors::InvalidSubgraphReason;
    use pretty_assertions::assert_eq;

    fn build(records: &[serde_json::Value]) -> Vec<Graph> {
        records
            .iter()
            .map(|r| VideoSubgraph::from_record(r, COLLECTED_AT).unwrap().into_graph())
            .collect()
    }

    #[test]
    fn shared_author_is_merged() {
        let author = "6813185604563567621";
        let subs = build(&[
            video_record("1", author, "10", &[]),
            video_record("2", author, "11", &[]),
        ]);
        let (g, report) = assemble(&subs, &AssemblyPolicy::default()).unwrap();
        assert_eq!(g.count_nodes_of_type(NodeType::Author), 1);
        assert_eq!(g.count_nodes_of_type(NodeType::Video), 2);
        let survivor = g.nodes_of_type(NodeType::Author).next().unwrap().nid;
        assert_eq!(survivor, NID(1));
        assert_eq!(g.degree(survivor, Direction::OUT).unwrap(), 2);
        assert!(g.has_edge(survivor, NID(3), EdgeType::AuthorToVideo));
        assert_eq!(report.nodes_removed(), 1);
    }

    #[test]
    fn text_policy_merges_on_titles() {
        let mut a = video_record("1", "7", "10", &[("100", "Zouk")]);
        let b = video_record("2", "8", "11", &[("200", "#zouk")]);
        a["author"]["uniqueId"] = "dancer".into();
        let subs = build(&[a, b]);

        let (by_id, _) = assemble(&subs, &AssemblyPolicy::default()).unwrap();
        assert_eq!(by_id.count_nodes_of_type(NodeType::Hashtag), 2);

        let (by_text, _) = assemble(&subs, &AssemblyPolicy::by_text()).unwrap();
        assert_eq!(by_text.count_nodes_of_type(NodeType::Hashtag), 1);
        // both music tracks are titled "original sound"
        assert_eq!(by_text.count_nodes_of_type(NodeType::Music), 1);
        assert_eq!(by_text.count_nodes_of_type(NodeType::Author), 2);
        let hashtag = by_text.nodes_of_type(NodeType::Hashtag).next().unwrap();
        assert_eq!(hashtag.attrs.get(NodeAttrKey::Id).and_then(|p| p.as_str()), Some("100"));
    }

    #[test]
    fn disjoint_inputs_add_up() {
        let subs = build(&[
            video_record("1", "7", "10", &[("100", "zouk")]),
            video_record("2", "8", "11", &[("200", "salsa"), ("300", "kizomba")]),
        ]);
        let (g, _) = assemble(&subs, &AssemblyPolicy::default()).unwrap();
        assert_eq!(g.num_nodes(), subs.iter().map(Graph::num_nodes).sum::<usize>());
        assert_eq!(g.num_edges(), subs.iter().map(Graph::num_edges).sum::<usize>());
    }

    #[test]
    fn malformed_subgraph_is_rejected() {
        let mut subs = build(&[video_record("1", "7", "10", &[])]);
        subs.push(Graph::new());
        assert_eq!(
            assemble(&subs, &AssemblyPolicy::default()).unwrap_err(),
            GraphError::InvalidSubgraph {
                index: 1,
                source: InvalidSubgraphReason::TooFewNodes(0)
            }
        );
    }

    #[test]
    fn empty_input_is_an_empty_graph() {
        let (g, report) = assemble(Vec::<&Graph>::new(), &AssemblyPolicy::default()).unwrap();
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(report.contractions.len(), 3);
    }

    #[test]
    fn policy_round_trips_through_serde() {
        let policy: AssemblyPolicy = serde_json::from_str(r#"{"hashtag": "text"}"#).unwrap();
        assert_eq!(policy.hashtag, MergeKey::Text);
        assert_eq!(policy.author, MergeKey::Id);
        assert_eq!(policy.key_for(NodeType::Video), None);
    }
}
