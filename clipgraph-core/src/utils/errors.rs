use clipgraph_api::{
    core::{entities::properties::PropError, storage::arc_str::ArcStr},
    EdgeType, NodeType, EID, NID,
};

/// Ways a per-video subgraph can depart from the fixed layout produced by the builder.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidSubgraphReason {
    #[error("Subgraph has {0} nodes but needs at least video, author and music")]
    TooFewNodes(usize),
    #[error("Node identifiers are not contiguous from 0: expected {expected}, found {found}")]
    NonContiguousIds { expected: NID, found: NID },
    #[error("Node {nid} should be of type {expected} but is {found:?}")]
    UnexpectedNodeType {
        nid: NID,
        expected: NodeType,
        found: Option<NodeType>,
    },
    #[error("Unexpected edge {src} -> {dst} with type {etype:?}")]
    UnexpectedEdge {
        src: NID,
        dst: NID,
        etype: Option<EdgeType>,
    },
    #[error("Expected {expected} edges but found {found}")]
    EdgeCount { expected: usize, found: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("No Node with ID {0}")]
    NodeIdError(NID),

    #[error("Node already exists with ID {0}")]
    NodeExistsError(NID),

    #[error("No Edge with ID {0:?}")]
    EdgeIdError(EID),

    #[error("Cannot merge node {0} into itself")]
    SelfMerge(NID),

    #[error("Subgraph {index} is invalid: {source}")]
    InvalidSubgraph {
        index: usize,
        #[source]
        source: InvalidSubgraphReason,
    },

    #[error("Edge endpoint {ntype} with original id '{id}' was never added")]
    UnresolvedEdgeEndpoint { ntype: NodeType, id: ArcStr },

    #[error(transparent)]
    Prop(#[from] PropError),
}
