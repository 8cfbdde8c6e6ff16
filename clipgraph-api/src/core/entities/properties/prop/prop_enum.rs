use crate::core::{entities::properties::PropError, storage::arc_str::ArcStr, PropType};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

/// Scalar attribute value. `Null` is the marker used for optional fields the platform omitted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Prop {
    Null,
    Bool(bool),
    U64(u64),
    I64(i64),
    F64(f64),
    Str(ArcStr),
}

impl Hash for Prop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Prop::Null => {}
            Prop::Bool(b) => b.hash(state),
            Prop::U64(u) => u.hash(state),
            Prop::I64(i) => i.hash(state),
            Prop::F64(f) => {
                let bits = f.to_bits();
                bits.hash(state);
            }
            Prop::Str(s) => s.hash(state),
        }
    }
}

impl Eq for Prop {}

impl PartialOrd for Prop {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Prop::Null, Prop::Null) => Some(Ordering::Equal),
            (Prop::Bool(a), Prop::Bool(b)) => a.partial_cmp(b),
            (Prop::U64(a), Prop::U64(b)) => a.partial_cmp(b),
            (Prop::I64(a), Prop::I64(b)) => a.partial_cmp(b),
            (Prop::F64(a), Prop::F64(b)) => a.partial_cmp(b),
            (Prop::Str(a), Prop::Str(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Display for Prop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Null => Ok(()),
            Prop::Bool(v) => write!(f, "{}", v),
            Prop::U64(v) => write!(f, "{}", v),
            Prop::I64(v) => write!(f, "{}", v),
            Prop::F64(v) => write!(f, "{}", v),
            Prop::Str(v) => write!(f, "{}", v),
        }
    }
}

impl Prop {
    pub fn str<S: Into<ArcStr>>(s: S) -> Prop {
        Prop::Str(s.into())
    }

    pub fn dtype(&self) -> PropType {
        match self {
            Prop::Null => PropType::Empty,
            Prop::Bool(_) => PropType::Bool,
            Prop::U64(_) => PropType::U64,
            Prop::I64(_) => PropType::I64,
            Prop::F64(_) => PropType::F64,
            Prop::Str(_) => PropType::Str,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Prop::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Prop::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Prop::U64(v) => Some(*v),
            Prop::I64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Prop::I64(v) => Some(*v),
            Prop::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Prop::F64(v) => Some(*v),
            Prop::U64(v) => Some(*v as f64),
            Prop::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Prop::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Parse a textual cell (e.g. from a CSV table) as `expected`. An empty cell is `Null`.
    pub fn parse(value: &str, expected: PropType) -> Result<Prop, PropError> {
        if value.is_empty() {
            return Ok(Prop::Null);
        }
        let err = || PropError::ParseError {
            value: value.to_owned(),
            expected,
        };
        match expected {
            PropType::Empty => Err(err()),
            PropType::Str => Ok(Prop::str(value)),
            PropType::U64 => value.trim().parse().map(Prop::U64).map_err(|_| err()),
            PropType::I64 => value.trim().parse().map(Prop::I64).map_err(|_| err()),
            PropType::F64 => value.trim().parse().map(Prop::F64).map_err(|_| err()),
            PropType::Bool => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Prop::Bool(true)),
                "false" | "0" => Ok(Prop::Bool(false)),
                _ => Err(err()),
            },
        }
    }

    /// Convert the value into `expected` where this loses no information. `Null` passes through
    /// unchanged.
    pub fn coerce(self, expected: PropType, name: &str) -> Result<Prop, PropError> {
        let actual = self.dtype();
        let type_err = || PropError::PropertyTypeError {
            name: name.to_owned(),
            expected,
            actual,
        };
        match (self, expected) {
            (Prop::Null, _) => Ok(Prop::Null),
            (p, t) if p.dtype() == t => Ok(p),
            (Prop::U64(v), PropType::I64) => i64::try_from(v).map(Prop::I64).map_err(|_| type_err()),
            (Prop::I64(v), PropType::U64) => u64::try_from(v).map(Prop::U64).map_err(|_| type_err()),
            (Prop::U64(v), PropType::F64) => Ok(Prop::F64(v as f64)),
            (Prop::I64(v), PropType::F64) => Ok(Prop::F64(v as f64)),
            (Prop::U64(v), PropType::Str) => Ok(Prop::str(v.to_string())),
            (Prop::I64(v), PropType::Str) => Ok(Prop::str(v.to_string())),
            (Prop::Str(s), t) if t != PropType::Empty => Prop::parse(&s, t),
            _ => Err(type_err()),
        }
    }
}

impl From<ArcStr> for Prop {
    fn from(value: ArcStr) -> Self {
        Prop::Str(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Str(value.into())
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Str(value.into())
    }
}

impl From<u64> for Prop {
    fn from(value: u64) -> Self {
        Prop::U64(value)
    }
}

impl From<i64> for Prop {
    fn from(value: i64) -> Self {
        Prop::I64(value)
    }
}

impl From<f64> for Prop {
    fn from(value: f64) -> Self {
        Prop::F64(value)
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Bool(value)
    }
}

impl<T: Into<Prop>> From<Option<T>> for Prop {
    fn from(value: Option<T>) -> Self {
        value.map_or(Prop::Null, Into::into)
    }
}
