//! Node-link view of a [`Graph`]: a flat list of nodes and a flat list of links, each carrying
//! its attributes. This is the persisted form.
//!
//! ```json
//! {"directed": true, "multigraph": true, "graph": {},
//!  "nodes": [{"nid": 0, "attrs": {"ntype": "Video", "id": "1"}}],
//!  "links": [{"source": 1, "target": 0, "attrs": {"etype": "AuthorToVideo"}}]}
//! ```

use crate::{entities::graph::Graph, utils::errors::GraphError};
use clipgraph_api::{core::entities::properties::attrs::NativeAttrs, EdgeAttrs, NodeAttrs, NID};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkNode {
    pub nid: NID,
    pub attrs: NodeAttrs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkEdge {
    pub source: NID,
    pub target: NID,
    pub attrs: EdgeAttrs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    #[serde(default = "yes")]
    pub directed: bool,
    #[serde(default = "yes")]
    pub multigraph: bool,
    #[serde(default)]
    pub graph: NativeAttrs,
    pub nodes: Vec<NodeLinkNode>,
    pub links: Vec<NodeLinkEdge>,
}

fn yes() -> bool {
    true
}

impl Graph {
    pub fn to_node_link(&self) -> NodeLinkGraph {
        NodeLinkGraph {
            directed: true,
            multigraph: true,
            graph: self.metadata().clone(),
            nodes: self
                .nodes()
                .map(|n| NodeLinkNode {
                    nid: n.nid,
                    attrs: n.attrs.clone(),
                })
                .collect(),
            links: self
                .edges()
                .map(|e| NodeLinkEdge {
                    source: e.src,
                    target: e.dst,
                    attrs: e.attrs.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild a graph, keeping node ids and link order.
    pub fn try_from_node_link(view: NodeLinkGraph) -> Result<Graph, GraphError> {
        let mut g = Graph::new();
        for node in view.nodes {
            g.add_node_with_id(node.nid, node.attrs)?;
        }
        for link in view.links {
            g.add_edge(link.source, link.target, link.attrs)?;
        }
        for (key, value) in view.graph {
            g.set_metadata(key, value);
        }
        Ok(g)
    }

    /// `(nid, attributes)` pairs with plain string keys.
    pub fn node_tuples(&self) -> Vec<(NID, NativeAttrs)> {
        self.nodes().map(|n| (n.nid, n.attrs.to_native())).collect()
    }

    /// `(source, target, attributes)` triples with plain string keys.
    pub fn edge_tuples(&self) -> Vec<(NID, NID, NativeAttrs)> {
        self.edges()
            .map(|e| (e.src, e.dst, e.attrs.to_native()))
            .collect()
    }
}

impl TryFrom<NodeLinkGraph> for Graph {
    type Error = GraphError;

    fn try_from(value: NodeLinkGraph) -> Result<Self, Self::Error> {
        Graph::try_from_node_link(value)
    }
}

impl From<&Graph> for NodeLinkGraph {
    fn from(value: &Graph) -> Self {
        value.to_node_link()
    }
}
