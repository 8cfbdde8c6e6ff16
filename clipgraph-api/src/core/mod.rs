use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod entities;
pub mod storage;
pub mod utils;

/// Denotes the direction of an edge. Can be incoming, outgoing or both.
#[derive(Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub enum Direction {
    OUT,
    IN,
    #[default]
    BOTH,
}

/// Scalar types an attribute value may take.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum PropType {
    #[default]
    Empty,
    Str,
    I64,
    U64,
    F64,
    Bool,
}

impl Display for PropType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let type_str = match self {
            PropType::Empty => "Empty",
            PropType::Str => "Str",
            PropType::I64 => "I64",
            PropType::U64 => "U64",
            PropType::F64 => "F64",
            PropType::Bool => "Bool",
        };

        write!(f, "{}", type_str)
    }
}
