//! # clipgraph-core
//!
//! Storage and whole-graph transformations for clipgraph.
//!
//! The [`Graph`](entities::graph::Graph) here is a plain in-memory arena: nodes and edges live in
//! ordered maps keyed by their process-local ids and every node keeps its incident edge ids.
//! Removing nodes is cheap, which is what node contraction needs.
//!
//! **Note** this crate knows nothing about raw platform payloads; see the `clipgraph` crate for
//! parsing and assembly.

pub mod entities;
pub mod utils;

pub mod prelude {
    pub use crate::{
        entities::graph::{
            contraction::{contract, normalize_text, Contraction, ContractionReport},
            logical_to_physical::Mapping,
            node_link::{NodeLinkEdge, NodeLinkGraph, NodeLinkNode},
            union::disjoint_union_all,
            Graph,
        },
        utils::errors::{GraphError, InvalidSubgraphReason},
    };
    pub use clipgraph_api::{
        core::{
            entities::properties::attrs::{AttrKey, NativeAttrs},
            Direction,
        },
        EdgeAttrKey, EdgeAttrs, EdgeType, MergeKey, NodeAttrKey, NodeAttrs, NodeType, Prop, EID,
        NID,
    };
}
