//! The arena graph shared by every stage of the pipeline.

pub mod contraction;
pub mod logical_to_physical;
pub mod node_link;
pub mod union;

use crate::{
    entities::{edges::edge_store::EdgeStore, nodes::node_store::NodeStore},
    utils::errors::GraphError,
};
use clipgraph_api::{
    core::{
        entities::properties::attrs::NativeAttrs, storage::arc_str::ArcStr, Direction,
    },
    EdgeAttrs, EdgeType, NodeAttrs, NodeType, Prop, EID, NID,
};
use std::collections::BTreeMap;

/// Directed multigraph with typed attributes on nodes and edges.
///
/// Node and edge ids are handed out sequentially and never reused, so iteration order
/// (ascending id) is also insertion order. Parallel edges and self-loops are allowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<NID, NodeStore>,
    edges: BTreeMap<EID, EdgeStore>,
    next_nid: usize,
    next_eid: usize,
    metadata: NativeAttrs,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the next free id.
    pub fn add_node(&mut self, attrs: NodeAttrs) -> NID {
        let nid = NID(self.next_nid);
        self.next_nid += 1;
        self.nodes.insert(nid, NodeStore::new(nid, attrs));
        nid
    }

    /// Add a node under a caller-chosen id. Later [`Graph::add_node`] calls continue after the
    /// largest id seen so far.
    pub fn add_node_with_id(&mut self, nid: NID, attrs: NodeAttrs) -> Result<(), GraphError> {
        if self.nodes.contains_key(&nid) {
            return Err(GraphError::NodeExistsError(nid));
        }
        self.next_nid = self.next_nid.max(nid.index() + 1);
        self.nodes.insert(nid, NodeStore::new(nid, attrs));
        Ok(())
    }

    pub fn add_edge(&mut self, src: NID, dst: NID, attrs: EdgeAttrs) -> Result<EID, GraphError> {
        for nid in [src, dst] {
            if !self.nodes.contains_key(&nid) {
                return Err(GraphError::NodeIdError(nid));
            }
        }
        let eid = EID(self.next_eid);
        self.next_eid += 1;
        self.edges.insert(eid, EdgeStore::new(eid, src, dst, attrs));
        self.link(eid, src, dst);
        Ok(eid)
    }

    /// Add an edge tagged with `etype` and nothing else.
    pub fn add_typed_edge(&mut self, src: NID, dst: NID, etype: EdgeType) -> Result<EID, GraphError> {
        self.add_edge(src, dst, EdgeAttrs::of_type(etype))
    }

    fn link(&mut self, eid: EID, src: NID, dst: NID) {
        if let Some(node) = self.nodes.get_mut(&src) {
            node.add_edge(eid, Direction::OUT);
        }
        if let Some(node) = self.nodes.get_mut(&dst) {
            node.add_edge(eid, Direction::IN);
        }
    }

    #[inline]
    pub fn node(&self, nid: NID) -> Option<&NodeStore> {
        self.nodes.get(&nid)
    }

    #[inline]
    pub fn node_mut(&mut self, nid: NID) -> Option<&mut NodeStore> {
        self.nodes.get_mut(&nid)
    }

    #[inline]
    pub fn edge(&self, eid: EID) -> Option<&EdgeStore> {
        self.edges.get(&eid)
    }

    #[inline]
    pub fn has_node(&self, nid: NID) -> bool {
        self.nodes.contains_key(&nid)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeStore> + '_ {
        self.nodes.values()
    }

    /// Edges in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeStore> + '_ {
        self.edges.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NID> + '_ {
        self.nodes.keys().copied()
    }

    pub fn nodes_of_type(&self, ntype: NodeType) -> impl Iterator<Item = &NodeStore> + '_ {
        self.nodes().filter(move |n| n.ntype() == Some(ntype))
    }

    pub fn count_nodes_of_type(&self, ntype: NodeType) -> usize {
        self.nodes_of_type(ntype).count()
    }

    pub fn count_edges_of_type(&self, etype: EdgeType) -> usize {
        self.edges().filter(|e| e.etype() == Some(etype)).count()
    }

    pub fn node_edges(
        &self,
        nid: NID,
        dir: Direction,
    ) -> Result<impl Iterator<Item = &EdgeStore> + '_, GraphError> {
        let node = self.node(nid).ok_or(GraphError::NodeIdError(nid))?;
        Ok(node.edges(dir).filter_map(move |eid| self.edges.get(&eid)))
    }

    pub fn degree(&self, nid: NID, dir: Direction) -> Result<usize, GraphError> {
        self.node(nid)
            .map(|n| n.degree(dir))
            .ok_or(GraphError::NodeIdError(nid))
    }

    pub fn has_edge(&self, src: NID, dst: NID, etype: EdgeType) -> bool {
        self.node_edges(src, Direction::OUT)
            .map(|mut edges| edges.any(|e| e.dst == dst && e.etype() == Some(etype)))
            .unwrap_or(false)
    }

    pub fn count_self_loops(&self) -> usize {
        self.edges().filter(|e| e.is_self_loop()).count()
    }

    /// Graph-level attributes, e.g. which hashtag a dataset was collected for.
    pub fn metadata(&self) -> &NativeAttrs {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<ArcStr>, value: impl Into<Prop>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Move every edge incident to `merged` onto `survivor` and drop `merged` together with its
    /// attributes. Returns the number of self-loops this created.
    pub fn merge_nodes(&mut self, survivor: NID, merged: NID) -> Result<usize, GraphError> {
        if survivor == merged {
            return Err(GraphError::SelfMerge(survivor));
        }
        if !self.nodes.contains_key(&survivor) {
            return Err(GraphError::NodeIdError(survivor));
        }
        let mut store = self
            .nodes
            .remove(&merged)
            .ok_or(GraphError::NodeIdError(merged))?;
        let (out, into) = store.take_edges();
        let mut new_loops = 0;
        for &eid in out.iter() {
            if let Some(edge) = self.edges.get_mut(&eid) {
                edge.src = survivor;
                if edge.dst == survivor {
                    new_loops += 1;
                }
            }
        }
        for &eid in into.iter() {
            if let Some(edge) = self.edges.get_mut(&eid) {
                edge.dst = survivor;
                // an edge in both lists was already a self-loop on `merged`
                if edge.src == survivor && out.binary_search(&eid).is_err() {
                    new_loops += 1;
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(&survivor) {
            for eid in out {
                node.add_edge(eid, Direction::OUT);
            }
            for eid in into {
                node.add_edge(eid, Direction::IN);
            }
        }
        Ok(new_loops)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clipgraph_api::NodeAttrKey;
    use pretty_assertions::assert_eq;

    pub(crate) fn typed(ntype: NodeType, id: &str) -> NodeAttrs {
        NodeAttrs::new()
            .with(NodeAttrKey::Ntype, ntype.as_str())
            .with(NodeAttrKey::Id, id)
    }

    #[test]
    fn existing_self_loop_is_not_counted_as_created() {
        let mut g = Graph::new();
        let a = g.add_node(typed(NodeType::Author, "x"));
        let b = g.add_node(typed(NodeType::Author, "x"));
        g.add_typed_edge(b, b, EdgeType::AuthorToVideo).unwrap();
        assert_eq!(g.merge_nodes(a, b), Ok(0));
        assert_eq!(g.count_self_loops(), 1);
        assert_eq!(g.degree(a, Direction::OUT), Ok(1));
        assert_eq!(g.degree(a, Direction::IN), Ok(1));

        let c = g.add_node(typed(NodeType::Author, "x"));
        g.add_typed_edge(a, c, EdgeType::AuthorToVideo).unwrap();
        g.add_typed_edge(c, c, EdgeType::AuthorToVideo).unwrap();
        g.add_typed_edge(c, a, EdgeType::AuthorToVideo).unwrap();
        assert_eq!(g.merge_nodes(a, c), Ok(2));
        assert_eq!(g.count_self_loops(), 4);
        assert_eq!(g.num_nodes(), 1);
    }

    #[test]
    fn ids_are_sequential() {
        let mut g = Graph::new();
        let a = g.add_node(typed(NodeType::Video, "1"));
        let b = g.add_node(typed(NodeType::Author, "2"));
        assert_eq!((a, b), (NID(0), NID(1)));
        let e = g.add_typed_edge(b, a, EdgeType::AuthorToVideo).unwrap();
        assert_eq!(e, EID(0));
        assert!(g.has_edge(b, a, EdgeType::AuthorToVideo));
        assert!(!g.has_edge(a, b, EdgeType::AuthorToVideo));
    }

    #[test]
    fn edges_need_existing_endpoints() {
        let mut g = Graph::new();
        let a = g.add_node(typed(NodeType::Video, "1"));
        assert_eq!(
            g.add_typed_edge(a, NID(7), EdgeType::VideoToMusic),
            Err(GraphError::NodeIdError(NID(7)))
        );
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn explicit_ids_advance_the_counter() {
        let mut g = Graph::new();
        g.add_node_with_id(NID(5), typed(NodeType::Music, "m")).unwrap();
        assert_eq!(
            g.add_node_with_id(NID(5), typed(NodeType::Music, "m")),
            Err(GraphError::NodeExistsError(NID(5)))
        );
        assert_eq!(g.add_node(typed(NodeType::Music, "n")), NID(6));
    }

    #[test]
    fn merge_moves_edges_and_counts_loops() {
        let mut g = Graph::new();
        let v = g.add_node(typed(NodeType::Video, "v"));
        let h1 = g.add_node(typed(NodeType::Hashtag, "h"));
        let h2 = g.add_node(typed(NodeType::Hashtag, "h"));
        g.add_typed_edge(v, h1, EdgeType::VideoToHashtag).unwrap();
        g.add_typed_edge(v, h2, EdgeType::VideoToHashtag).unwrap();
        g.add_typed_edge(h1, h2, EdgeType::VideoToHashtag).unwrap();
        g.add_typed_edge(h2, h2, EdgeType::VideoToHashtag).unwrap();

        let loops = g.merge_nodes(h1, h2).unwrap();
        assert_eq!(loops, 2);
        assert!(!g.has_node(h2));
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.count_self_loops(), 2);
        assert_eq!(g.degree(h1, Direction::IN).unwrap(), 4);
        assert_eq!(g.degree(h1, Direction::OUT).unwrap(), 2);
        assert_eq!(g.node_edges(h1, Direction::BOTH).unwrap().count(), 4);
        assert_eq!(g.degree(v, Direction::OUT).unwrap(), 2);
    }

    #[test]
    fn merge_rejects_bad_ids() {
        let mut g = Graph::new();
        let a = g.add_node(typed(NodeType::Author, "a"));
        assert_eq!(g.merge_nodes(a, a), Err(GraphError::SelfMerge(a)));
        assert_eq!(g.merge_nodes(a, NID(3)), Err(GraphError::NodeIdError(NID(3))));
        assert_eq!(g.merge_nodes(NID(3), a), Err(GraphError::NodeIdError(NID(3))));
        assert!(g.has_node(a));
    }
}
