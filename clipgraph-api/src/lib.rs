pub mod core;

pub use crate::core::entities::{
    properties::{
        attrs::{EdgeAttrKey, EdgeAttrs, NodeAttrKey, NodeAttrs},
        prop::Prop,
    },
    EdgeType, MergeKey, NodeType, EID, NID,
};
