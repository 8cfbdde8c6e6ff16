use crate::core::PropType;

pub mod attrs;
pub mod prop;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PropError {
    #[error("Wrong type for property {name}: expected {expected:?} but actual type is {actual:?}")]
    PropertyTypeError {
        name: String,
        expected: PropType,
        actual: PropType,
    },
    #[error("Cannot parse '{value}' as {expected}")]
    ParseError { value: String, expected: PropType },
    #[error("Unknown attribute key '{0}'")]
    UnknownKey(String),
    #[error("Unknown entity type '{0}'")]
    UnknownEntityType(String),
    #[error("Attribute set has no '{0}' entry")]
    MissingTypeKey(&'static str),
}
