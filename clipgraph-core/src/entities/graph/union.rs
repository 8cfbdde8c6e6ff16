use crate::{entities::graph::Graph, utils::errors::GraphError};
use tracing::debug;

impl Graph {
    /// Append a copy of `other`, shifting its node ids past every id already in use.
    ///
    /// For graphs whose ids run `0..n` the shift is the running total of nodes added so far.
    /// Edge ids are re-issued. Metadata keys already present are kept.
    pub fn extend_disjoint(&mut self, other: &Graph) -> Result<usize, GraphError> {
        let offset = self.next_nid;
        for node in other.nodes() {
            self.add_node_with_id(node.nid.offset(offset), node.attrs.clone())?;
        }
        for edge in other.edges() {
            self.add_edge(
                edge.src.offset(offset),
                edge.dst.offset(offset),
                edge.attrs.clone(),
            )?;
        }
        for (key, value) in other.metadata() {
            if !self.metadata().contains_key(key) {
                self.set_metadata(key.clone(), value.clone());
            }
        }
        Ok(offset)
    }
}

/// Disjoint union of `graphs` in order. No two input nodes share an id in the result.
pub fn disjoint_union_all<'a>(
    graphs: impl IntoIterator<Item = &'a Graph>,
) -> Result<Graph, GraphError> {
    let mut union = Graph::new();
    let mut parts = 0;
    for g in graphs {
        union.extend_disjoint(g)?;
        parts += 1;
    }
    debug!(
        parts,
        nodes = union.num_nodes(),
        edges = union.num_edges(),
        "Built disjoint union"
    );
    Ok(union)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::graph::test::typed;
    use clipgraph_api::{EdgeType, NodeType, NID};
    use pretty_assertions::assert_eq;

    fn pair(video: &str) -> Graph {
        let mut g = Graph::new();
        let v = g.add_node(typed(NodeType::Video, video));
        let a = g.add_node(typed(NodeType::Author, "a"));
        g.add_typed_edge(a, v, EdgeType::AuthorToVideo).unwrap();
        g
    }

    #[test]
    fn offsets_are_running_node_totals() {
        let graphs = [pair("1"), pair("2"), pair("3")];
        let union = disjoint_union_all(&graphs).unwrap();
        assert_eq!(union.num_nodes(), 6);
        assert_eq!(union.num_edges(), 3);
        assert_eq!(union.node(NID(4)).unwrap().attrs.id(), Some("3"));
        assert!(union.has_edge(NID(3), NID(2), EdgeType::AuthorToVideo));
    }

    #[test]
    fn union_of_nothing_is_empty() {
        let union = disjoint_union_all(Vec::<&Graph>::new()).unwrap();
        assert_eq!(union, Graph::new());
    }

    #[test]
    fn gaps_do_not_collide() {
        let other = pair("1");
        let mut g = Graph::new();
        g.add_node_with_id(NID(4), typed(NodeType::Music, "m")).unwrap();
        let union = disjoint_union_all([&g, &other]).unwrap();
        assert_eq!(union.node_ids().collect::<Vec<_>>(), vec![NID(4), NID(5), NID(6)]);
    }
}
