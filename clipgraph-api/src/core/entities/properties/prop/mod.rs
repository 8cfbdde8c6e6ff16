pub mod prop_enum;

pub use prop_enum::*;
