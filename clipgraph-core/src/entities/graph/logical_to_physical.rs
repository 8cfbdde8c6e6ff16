use crate::utils::errors::GraphError;
use clipgraph_api::{core::storage::arc_str::ArcStr, NodeType, NID};
use rustc_hash::FxHashMap;

/// Maps platform identifiers, scoped by entity type, to the node they were first added as.
#[derive(Debug, Default, Clone)]
pub struct Mapping {
    map: FxHashMap<(NodeType, ArcStr), NID>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `nid` for `(ntype, id)` unless an earlier node already claimed it. Returns the node
    /// that owns the id afterwards.
    pub fn get_or_set(&mut self, ntype: NodeType, id: impl Into<ArcStr>, nid: NID) -> NID {
        *self.map.entry((ntype, id.into())).or_insert(nid)
    }

    pub fn get(&self, ntype: NodeType, id: &str) -> Option<NID> {
        self.map.get(&(ntype, ArcStr::from(id))).copied()
    }

    pub fn resolve(&self, ntype: NodeType, id: &str) -> Result<NID, GraphError> {
        self.get(ntype, id)
            .ok_or_else(|| GraphError::UnresolvedEdgeEndpoint {
                ntype,
                id: id.into(),
            })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
