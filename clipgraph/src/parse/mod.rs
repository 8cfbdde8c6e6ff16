//! Entity parsers: one raw API record in, one typed attribute set out.
//!
//! Every parser is a pure function over a [`serde_json::Value`]. Required fields are read by a
//! fixed key path; the first missing or ill-typed field aborts the record. Platform identifiers are
//! always stored as text so the same entity matches whichever response shape it came from.

mod author;
mod hashtag;
mod music;
mod video;

pub use author::parse_author;
pub use hashtag::{parse_hashtag, HashtagSource};
pub use music::parse_music;
pub use video::parse_video;

use clipgraph_api::{NodeType, Prop};
use serde_json::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("{entity} record is missing required field '{path}'")]
    MissingField { entity: NodeType, path: String },

    #[error("{entity} field '{path}' should be {expected} but found {found}")]
    InvalidField {
        entity: NodeType,
        path: String,
        expected: &'static str,
        found: String,
    },
}

impl ParseError {
    pub fn entity(&self) -> NodeType {
        match self {
            ParseError::MissingField { entity, .. } | ParseError::InvalidField { entity, .. } => {
                *entity
            }
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ParseError::MissingField { path, .. } | ParseError::InvalidField { path, .. } => path,
        }
    }
}

/// Typed accessors over one raw record. Paths are dot separated, e.g. `stats.playCount`.
/// JSON `null` counts as absent.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Fields<'a> {
    entity: NodeType,
    root: &'a Value,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(entity: NodeType, root: &'a Value) -> Self {
        Self { entity, root }
    }

    pub(crate) fn opt(&self, path: &str) -> Option<&'a Value> {
        path.split('.')
            .try_fold(self.root, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    pub(crate) fn value(&self, path: &str) -> Result<&'a Value, ParseError> {
        self.opt(path).ok_or_else(|| self.missing(path))
    }

    /// The first of `paths` that is present. Errors name the first path.
    pub(crate) fn value_of<'p>(
        &self,
        paths: &[&'p str],
    ) -> Result<(&'a Value, &'p str), ParseError> {
        paths
            .iter()
            .find_map(|p| self.opt(p).map(|v| (v, *p)))
            .ok_or_else(|| self.missing(paths.first().copied().unwrap_or_default()))
    }

    pub(crate) fn missing(&self, path: &str) -> ParseError {
        ParseError::MissingField {
            entity: self.entity,
            path: path.to_owned(),
        }
    }

    pub(crate) fn invalid(&self, path: &str, expected: &'static str, found: &Value) -> ParseError {
        ParseError::InvalidField {
            entity: self.entity,
            path: path.to_owned(),
            expected,
            found: found.to_string(),
        }
    }

    /// Platform identifier, normalised to its decimal text.
    pub(crate) fn id(&self, path: &str) -> Result<Prop, ParseError> {
        let value = self.value(path)?;
        match value {
            Value::String(s) if !s.trim().is_empty() => Ok(Prop::str(s.trim())),
            Value::Number(n) if n.is_u64() || n.is_i64() => Ok(Prop::str(n.to_string())),
            _ => Err(self.invalid(path, "an identifier", value)),
        }
    }

    pub(crate) fn text(&self, path: &str) -> Result<Prop, ParseError> {
        let value = self.value(path)?;
        self.to_text(path, value)
    }

    /// Text that may be absent; absence is the null marker.
    pub(crate) fn opt_text(&self, path: &str) -> Result<Prop, ParseError> {
        match self.opt(path) {
            Some(value) => self.to_text(path, value),
            None => Ok(Prop::Null),
        }
    }

    fn to_text(&self, path: &str, value: &Value) -> Result<Prop, ParseError> {
        match value {
            Value::String(s) => Ok(Prop::str(s.as_str())),
            Value::Number(n) => Ok(Prop::str(n.to_string())),
            Value::Bool(b) => Ok(Prop::str(b.to_string())),
            _ => Err(self.invalid(path, "text", value)),
        }
    }

    /// Non-negative integer count. Numeric strings are accepted.
    pub(crate) fn count(&self, path: &str) -> Result<Prop, ParseError> {
        let value = self.value(path)?;
        self.to_count(path, value)
    }

    pub(crate) fn count_of(&self, paths: &[&str]) -> Result<Prop, ParseError> {
        let (value, path) = self.value_of(paths)?;
        self.to_count(path, value)
    }

    fn to_count(&self, path: &str, value: &Value) -> Result<Prop, ParseError> {
        let count = match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        count
            .map(Prop::U64)
            .ok_or_else(|| self.invalid(path, "a non-negative integer", value))
    }

    /// Signed integer such as a unix timestamp.
    pub(crate) fn int(&self, path: &str) -> Result<Prop, ParseError> {
        let value = self.value(path)?;
        self.to_int(path, value).map(Prop::I64)
    }

    pub(crate) fn opt_int(&self, path: &str) -> Result<Option<i64>, ParseError> {
        self.opt(path)
            .map(|value| self.to_int(path, value))
            .transpose()
    }

    fn to_int(&self, path: &str, value: &Value) -> Result<i64, ParseError> {
        let int = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        int.ok_or_else(|| self.invalid(path, "an integer", value))
    }

    pub(crate) fn flag_of(&self, paths: &[&str]) -> Result<Prop, ParseError> {
        let (value, path) = self.value_of(paths)?;
        let flag = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        flag.map(Prop::Bool)
            .ok_or_else(|| self.invalid(path, "a boolean", value))
    }
}
