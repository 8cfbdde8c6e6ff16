use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

pub mod arc_str;

pub type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Insertion-ordered map with the fast non-cryptographic hasher used throughout the workspace.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
