//! Ordered attribute containers for nodes and edges.
//!
//! Keys come from closed vocabularies ([`NodeAttrKey`], [`EdgeAttrKey`]); values are scalar
//! [`Prop`]s. A container keeps insertion order, which is also the column order used when rows
//! are staged into tables. String-keyed maps only appear at the persistence boundary
//! ([`Attrs::to_native`], [`Attrs::try_from_native`]).

use crate::core::{
    entities::{properties::PropError, EdgeType, NodeType},
    storage::{arc_str::ArcStr, FxIndexMap},
    PropType,
};
use super::prop::Prop;
use serde::{de::Error as _, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::Hash,
    str::FromStr,
};

/// A closed attribute-key vocabulary.
pub trait AttrKey: Copy + Eq + Hash + Debug + Display + FromStr<Err = PropError> + 'static {
    /// The key holding the entity-type tag (`ntype` / `etype`).
    const TYPE_KEY: Self;

    fn as_str(&self) -> &'static str;

    /// The type values stored under this key must have. `Null` is always accepted.
    fn prop_type(&self) -> PropType;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeAttrKey {
    Id,
    Ntype,
    Text,
    CreationTime,
    Duration,
    Width,
    Height,
    Definition,
    Format,
    CommentCount,
    PlayCount,
    ShareCount,
    DiggCount,
    Nickname,
    Signature,
    Verified,
    IsPrivateAccount,
    FollowerCount,
    FollowingCount,
    Heart,
    VideoCount,
    ViewCount,
    AuthorName,
    Album,
    PlayUrl,
    Timestamp,
}

impl NodeAttrKey {
    pub const ALL: [NodeAttrKey; 26] = [
        NodeAttrKey::Id,
        NodeAttrKey::Ntype,
        NodeAttrKey::Text,
        NodeAttrKey::CreationTime,
        NodeAttrKey::Duration,
        NodeAttrKey::Width,
        NodeAttrKey::Height,
        NodeAttrKey::Definition,
        NodeAttrKey::Format,
        NodeAttrKey::CommentCount,
        NodeAttrKey::PlayCount,
        NodeAttrKey::ShareCount,
        NodeAttrKey::DiggCount,
        NodeAttrKey::Nickname,
        NodeAttrKey::Signature,
        NodeAttrKey::Verified,
        NodeAttrKey::IsPrivateAccount,
        NodeAttrKey::FollowerCount,
        NodeAttrKey::FollowingCount,
        NodeAttrKey::Heart,
        NodeAttrKey::VideoCount,
        NodeAttrKey::ViewCount,
        NodeAttrKey::AuthorName,
        NodeAttrKey::Album,
        NodeAttrKey::PlayUrl,
        NodeAttrKey::Timestamp,
    ];
}

impl AttrKey for NodeAttrKey {
    const TYPE_KEY: Self = NodeAttrKey::Ntype;

    fn as_str(&self) -> &'static str {
        match self {
            NodeAttrKey::Id => "id",
            NodeAttrKey::Ntype => "ntype",
            NodeAttrKey::Text => "text",
            NodeAttrKey::CreationTime => "creation_time",
            NodeAttrKey::Duration => "duration",
            NodeAttrKey::Width => "width",
            NodeAttrKey::Height => "height",
            NodeAttrKey::Definition => "definition",
            NodeAttrKey::Format => "format",
            NodeAttrKey::CommentCount => "comment_count",
            NodeAttrKey::PlayCount => "play_count",
            NodeAttrKey::ShareCount => "share_count",
            NodeAttrKey::DiggCount => "digg_count",
            NodeAttrKey::Nickname => "nickname",
            NodeAttrKey::Signature => "signature",
            NodeAttrKey::Verified => "verified",
            NodeAttrKey::IsPrivateAccount => "is_private_account",
            NodeAttrKey::FollowerCount => "follower_count",
            NodeAttrKey::FollowingCount => "following_count",
            NodeAttrKey::Heart => "heart",
            NodeAttrKey::VideoCount => "video_count",
            NodeAttrKey::ViewCount => "view_count",
            NodeAttrKey::AuthorName => "author_name",
            NodeAttrKey::Album => "album",
            NodeAttrKey::PlayUrl => "play_url",
            NodeAttrKey::Timestamp => "timestamp",
        }
    }

    fn prop_type(&self) -> PropType {
        match self {
            NodeAttrKey::Id
            | NodeAttrKey::Ntype
            | NodeAttrKey::Text
            | NodeAttrKey::Definition
            | NodeAttrKey::Format
            | NodeAttrKey::Nickname
            | NodeAttrKey::Signature
            | NodeAttrKey::AuthorName
            | NodeAttrKey::Album
            | NodeAttrKey::PlayUrl => PropType::Str,
            NodeAttrKey::CreationTime | NodeAttrKey::Timestamp => PropType::I64,
            NodeAttrKey::Verified | NodeAttrKey::IsPrivateAccount => PropType::Bool,
            NodeAttrKey::Duration
            | NodeAttrKey::Width
            | NodeAttrKey::Height
            | NodeAttrKey::CommentCount
            | NodeAttrKey::PlayCount
            | NodeAttrKey::ShareCount
            | NodeAttrKey::DiggCount
            | NodeAttrKey::FollowerCount
            | NodeAttrKey::FollowingCount
            | NodeAttrKey::Heart
            | NodeAttrKey::VideoCount
            | NodeAttrKey::ViewCount => PropType::U64,
        }
    }
}

impl Display for NodeAttrKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeAttrKey {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeAttrKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PropError::UnknownKey(s.to_owned()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeAttrKey {
    Etype,
    SrcOriginalId,
    DstOriginalId,
}

impl EdgeAttrKey {
    pub const ALL: [EdgeAttrKey; 3] = [
        EdgeAttrKey::Etype,
        EdgeAttrKey::SrcOriginalId,
        EdgeAttrKey::DstOriginalId,
    ];
}

impl AttrKey for EdgeAttrKey {
    const TYPE_KEY: Self = EdgeAttrKey::Etype;

    fn as_str(&self) -> &'static str {
        match self {
            EdgeAttrKey::Etype => "etype",
            EdgeAttrKey::SrcOriginalId => "src_original_id",
            EdgeAttrKey::DstOriginalId => "dst_original_id",
        }
    }

    fn prop_type(&self) -> PropType {
        PropType::Str
    }
}

impl Display for EdgeAttrKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeAttrKey {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeAttrKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PropError::UnknownKey(s.to_owned()))
    }
}

/// Flat string-keyed view of an attribute set.
pub type NativeAttrs = FxIndexMap<ArcStr, Prop>;

/// `(entity type, field) -> value`, the shape of one staged table row.
pub type DoubleKeyedAttrs = FxIndexMap<(ArcStr, ArcStr), Prop>;

/// Ordered key/value bag. Setting an existing key overwrites its value in place.
#[derive(Clone, PartialEq)]
pub struct Attrs<K> {
    entries: Vec<(K, Prop)>,
}

pub type NodeAttrs = Attrs<NodeAttrKey>;
pub type EdgeAttrs = Attrs<EdgeAttrKey>;

impl<K> Default for Attrs<K> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<K: AttrKey> Debug for Attrs<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k.as_str(), v)))
            .finish()
    }
}

impl<K: AttrKey> Attrs<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn set(&mut self, key: K, value: impl Into<Prop>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: K, value: impl Into<Prop>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: K) -> Option<&Prop> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: K) -> Option<Prop> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &Prop)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of the type tag, as stored.
    pub fn type_tag(&self) -> Option<&str> {
        self.get(K::TYPE_KEY).and_then(|p| p.as_str())
    }

    pub fn to_native(&self) -> NativeAttrs {
        self.entries
            .iter()
            .map(|(k, v)| (ArcStr::from(k.as_str()), v.clone()))
            .collect()
    }

    /// Re-key every attribute as `(type tag, field)`, dropping the type tag itself.
    pub fn to_double_keyed(&self) -> Result<DoubleKeyedAttrs, PropError> {
        let tag: ArcStr = self
            .type_tag()
            .ok_or(PropError::MissingTypeKey(K::TYPE_KEY.as_str()))?
            .into();
        Ok(self
            .entries
            .iter()
            .filter(|(k, _)| *k != K::TYPE_KEY)
            .map(|(k, v)| ((tag.clone(), ArcStr::from(k.as_str())), v.clone()))
            .collect())
    }

    /// Rebuild a typed container from string keys, coercing each value to its key's type.
    pub fn try_from_native<S: AsRef<str>>(
        native: impl IntoIterator<Item = (S, Prop)>,
    ) -> Result<Self, PropError> {
        let mut attrs = Self::new();
        for (name, value) in native {
            let key: K = name.as_ref().parse()?;
            let value = value.coerce(key.prop_type(), key.as_str())?;
            attrs.set(key, value);
        }
        Ok(attrs)
    }

    /// Inverse of [`Attrs::to_double_keyed`]: `tag` is restored under the type key.
    pub fn try_from_double_keyed<'a>(
        tag: &str,
        fields: impl IntoIterator<Item = (&'a str, Prop)>,
    ) -> Result<Self, PropError> {
        let mut attrs = Self::new();
        attrs.set(K::TYPE_KEY, tag);
        for (name, value) in fields {
            let key: K = name.parse()?;
            let value = value.coerce(key.prop_type(), key.as_str())?;
            attrs.set(key, value);
        }
        Ok(attrs)
    }
}

impl NodeAttrs {
    pub fn ntype(&self) -> Option<NodeType> {
        self.type_tag().and_then(|t| t.parse().ok())
    }

    /// Domain identifier assigned by the platform.
    pub fn id(&self) -> Option<&str> {
        self.get(NodeAttrKey::Id).and_then(|p| p.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.get(NodeAttrKey::Text).and_then(|p| p.as_str())
    }
}

impl EdgeAttrs {
    pub fn etype(&self) -> Option<EdgeType> {
        self.type_tag().and_then(|t| t.parse().ok())
    }

    pub fn of_type(etype: EdgeType) -> Self {
        Self::new().with(EdgeAttrKey::Etype, etype.as_str())
    }
}

impl<K: AttrKey> Serialize for Attrs<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in self.entries.iter() {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}

impl<'de, K: AttrKey> Deserialize<'de> for Attrs<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let native = indexmap::IndexMap::<String, Prop>::deserialize(deserializer)?;
        Attrs::try_from_native(native).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hashtag() -> NodeAttrs {
        NodeAttrs::new()
            .with(NodeAttrKey::Ntype, NodeType::Hashtag.as_str())
            .with(NodeAttrKey::Id, "74915315")
            .with(NodeAttrKey::Text, "zouk")
            .with(NodeAttrKey::Timestamp, 1630508846i64)
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut attrs = hashtag();
        attrs.set(NodeAttrKey::Id, "1");
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.keys().collect::<Vec<_>>()[1], NodeAttrKey::Id);
        assert_eq!(attrs.id(), Some("1"));
    }

    #[test]
    fn native_map_keeps_order() {
        let native = hashtag().to_native();
        let keys: Vec<&str> = native.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["ntype", "id", "text", "timestamp"]);
    }

    #[test]
    fn double_keyed_drops_type_tag() {
        let double = hashtag().to_double_keyed().unwrap();
        assert_eq!(double.len(), 3);
        assert_eq!(
            double.get(&(ArcStr::from("Hashtag"), ArcStr::from("text"))),
            Some(&Prop::str("zouk"))
        );
        assert!(!double
            .keys()
            .any(|(_, field)| field.as_str() == "ntype"));
    }

    #[test]
    fn double_keyed_requires_type_tag() {
        let attrs = NodeAttrs::new().with(NodeAttrKey::Id, "1");
        assert_eq!(
            attrs.to_double_keyed(),
            Err(PropError::MissingTypeKey("ntype"))
        );
    }

    #[test]
    fn double_keyed_round_trip() {
        let attrs = hashtag();
        let double = attrs.to_double_keyed().unwrap();
        let back = NodeAttrs::try_from_double_keyed(
            "Hashtag",
            double.iter().map(|((_, f), v)| (f.as_str(), v.clone())),
        )
        .unwrap();
        assert_eq!(back, attrs);
    }

    #[test]
    fn serde_coerces_loaded_values() {
        let json = serde_json::to_string(&hashtag()).unwrap();
        assert_eq!(
            json,
            r#"{"ntype":"Hashtag","id":"74915315","text":"zouk","timestamp":1630508846}"#
        );
        let back: NodeAttrs = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(NodeAttrKey::Timestamp), Some(&Prop::I64(1630508846)));
        assert_eq!(back.ntype(), Some(NodeType::Hashtag));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<NodeAttrs>(r#"{"ntype":"Video","mood":"happy"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn edge_attrs_of_type() {
        let attrs = EdgeAttrs::of_type(EdgeType::VideoToMusic);
        assert_eq!(attrs.etype(), Some(EdgeType::VideoToMusic));
        assert_eq!(
            attrs.to_native().get("etype"),
            Some(&Prop::str("VideoToMusic"))
        );
    }

    #[test]
    fn key_names_are_unique_and_parse_back() {
        for key in NodeAttrKey::ALL {
            assert_eq!(key.as_str().parse::<NodeAttrKey>().unwrap(), key);
        }
        for key in EdgeAttrKey::ALL {
            assert_eq!(key.as_str().parse::<EdgeAttrKey>().unwrap(), key);
        }
    }
}
