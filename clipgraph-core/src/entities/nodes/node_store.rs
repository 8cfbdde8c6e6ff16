use clipgraph_api::{core::Direction, NodeAttrs, NodeType, EID, NID};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A node plus the ids of its incident edges. A self-loop appears once in each list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStore {
    pub nid: NID,
    pub attrs: NodeAttrs,
    out: Vec<EID>,
    into: Vec<EID>,
}

impl NodeStore {
    pub fn new(nid: NID, attrs: NodeAttrs) -> Self {
        Self {
            nid,
            attrs,
            out: vec![],
            into: vec![],
        }
    }

    #[inline]
    pub fn ntype(&self) -> Option<NodeType> {
        self.attrs.ntype()
    }

    pub fn edges(&self, dir: Direction) -> Box<dyn Iterator<Item = EID> + '_> {
        match dir {
            Direction::OUT => Box::new(self.out.iter().copied()),
            Direction::IN => Box::new(self.into.iter().copied()),
            Direction::BOTH => Box::new(
                self.out
                    .iter()
                    .copied()
                    .merge(self.into.iter().copied())
                    .dedup(),
            ),
        }
    }

    /// Number of edge endpoints at this node. Self-loops count once in each direction.
    pub fn degree(&self, dir: Direction) -> usize {
        match dir {
            Direction::OUT => self.out.len(),
            Direction::IN => self.into.len(),
            Direction::BOTH => self.out.len() + self.into.len(),
        }
    }

    pub(crate) fn add_edge(&mut self, eid: EID, dir: Direction) {
        match dir {
            Direction::OUT => insert_sorted(&mut self.out, eid),
            Direction::IN => insert_sorted(&mut self.into, eid),
            Direction::BOTH => {
                insert_sorted(&mut self.out, eid);
                insert_sorted(&mut self.into, eid);
            }
        }
    }

    pub(crate) fn take_edges(&mut self) -> (Vec<EID>, Vec<EID>) {
        (std::mem::take(&mut self.out), std::mem::take(&mut self.into))
    }
}

fn insert_sorted(edges: &mut Vec<EID>, eid: EID) {
    match edges.binary_search(&eid) {
        Ok(_) => {}
        Err(pos) => edges.insert(pos, eid),
    }
}
