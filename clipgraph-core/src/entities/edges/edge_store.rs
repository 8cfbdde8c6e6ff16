use clipgraph_api::{EdgeAttrs, EdgeType, EID, NID};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeStore {
    pub eid: EID,
    pub src: NID,
    pub dst: NID,
    pub attrs: EdgeAttrs,
}

impl EdgeStore {
    pub fn new(eid: EID, src: NID, dst: NID, attrs: EdgeAttrs) -> Self {
        Self {
            eid,
            src,
            dst,
            attrs,
        }
    }

    #[inline]
    pub fn etype(&self) -> Option<EdgeType> {
        self.attrs.etype()
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}
