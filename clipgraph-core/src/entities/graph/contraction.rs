//! Node contraction: collapse nodes that describe the same real-world entity.
//!
//! Nodes are grouped by `(ntype, key value)`. Within each group the node with the smallest id
//! survives and every other member is merged into it, lowest id first. Merging re-points the
//! merged node's incident edges at the survivor and drops the merged node's attributes, so the
//! survivor keeps exactly the attributes it had before.
//!
//! Grouping always includes the entity type: a `Music` and a `Hashtag` that share an `id` are
//! never merged.

use crate::{entities::graph::Graph, utils::errors::GraphError};
use clipgraph_api::{
    core::storage::FxIndexMap,
    MergeKey, NodeAttrKey, NodeAttrs, NodeType, Prop, NID,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What to contract on, and optionally which entity type to restrict to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contraction {
    key: NodeAttrKey,
    normalize: bool,
    ntype: Option<NodeType>,
}

impl Contraction {
    /// Contract on the raw value of `key`.
    pub fn on(key: NodeAttrKey) -> Self {
        Self {
            key,
            normalize: false,
            ntype: None,
        }
    }

    /// Contract on a [`MergeKey`]. Text keys are compared after [`normalize_text`].
    pub fn by(merge_key: MergeKey) -> Self {
        Self {
            key: merge_key.attr_key(),
            normalize: matches!(merge_key, MergeKey::Text),
            ntype: None,
        }
    }

    /// Only group nodes of `ntype`; every other node is left untouched.
    pub fn of_type(mut self, ntype: NodeType) -> Self {
        self.ntype = Some(ntype);
        self
    }

    pub fn key(&self) -> NodeAttrKey {
        self.key
    }

    pub fn ntype(&self) -> Option<NodeType> {
        self.ntype
    }

    /// The value a node is grouped by, or `None` when it does not take part.
    fn group_value(&self, attrs: &NodeAttrs) -> Option<Prop> {
        match attrs.get(self.key)? {
            Prop::Null => None,
            Prop::Str(s) if self.normalize => {
                let normalized = normalize_text(s);
                (!normalized.is_empty()).then(|| Prop::str(normalized))
            }
            value => Some(value.clone()),
        }
    }
}

/// Trim, drop one leading `#` or `@`, and lowercase.
pub fn normalize_text(text: &str) -> String {
    let text = text.trim();
    let text = text
        .strip_prefix('#')
        .or_else(|| text.strip_prefix('@'))
        .unwrap_or(text);
    text.trim().to_lowercase()
}

/// Summary of one contraction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractionReport {
    pub key: Option<NodeAttrKey>,
    pub ntype: Option<NodeType>,
    pub nodes_before: usize,
    pub nodes_after: usize,
    /// Groups with more than one member.
    pub groups_merged: usize,
    pub self_loops_created: usize,
    /// group size -> number of groups of that size
    pub group_sizes: BTreeMap<usize, usize>,
}

impl ContractionReport {
    pub fn nodes_removed(&self) -> usize {
        self.nodes_before - self.nodes_after
    }
}

impl Graph {
    /// Contract the graph in place.
    pub fn contract(&mut self, contraction: &Contraction) -> Result<ContractionReport, GraphError> {
        let mut groups: FxIndexMap<(Option<NodeType>, Prop), Vec<NID>> = FxIndexMap::default();
        for node in self.nodes() {
            let ntype = node.ntype();
            if contraction.ntype.is_some() && ntype != contraction.ntype {
                continue;
            }
            if let Some(value) = contraction.group_value(&node.attrs) {
                groups.entry((ntype, value)).or_default().push(node.nid);
            }
        }

        let mut report = ContractionReport {
            key: Some(contraction.key),
            ntype: contraction.ntype,
            nodes_before: self.num_nodes(),
            ..Default::default()
        };
        for members in groups.values() {
            *report.group_sizes.entry(members.len()).or_default() += 1;
        }
        debug!(
            key = %contraction.key,
            ntype = ?contraction.ntype,
            groups = groups.len(),
            sizes = ?report.group_sizes,
            "Grouped nodes for contraction"
        );

        for (_, mut members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
            members.sort();
            let survivor = members[0];
            for &merged in &members[1..] {
                report.self_loops_created += self.merge_nodes(survivor, merged)?;
            }
            report.groups_merged += 1;
        }
        report.nodes_after = self.num_nodes();

        info!(
            key = %contraction.key,
            ntype = ?contraction.ntype,
            before = report.nodes_before,
            after = report.nodes_after,
            self_loops = report.self_loops_created,
            "Contracted graph"
        );
        Ok(report)
    }

    /// Ids of the nodes whose normalised text equals `text`. Handy for checking text merges.
    pub fn find_by_text(&self, ntype: NodeType, text: &str) -> Vec<NID> {
        let wanted = normalize_text(text);
        self.nodes_of_type(ntype)
            .filter(|n| n.attrs.text().map(normalize_text).as_deref() == Some(wanted.as_str()))
            .map(|n| n.nid)
            .collect()
    }
}

/// Consuming form of [`Graph::contract`].
pub fn contract(mut graph: Graph, contraction: &Contraction) -> Result<Graph, GraphError> {
    graph.contract(contraction)?;
    Ok(graph)
}
