use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use self::properties::{
    attrs::{AttrKey, NodeAttrKey},
    PropError,
};

pub mod properties;

/// Process-local node identifier. Assigned sequentially while a graph is built and never reused.
#[repr(transparent)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Default,
)]
#[serde(transparent)]
pub struct NID(pub usize);

impl NID {
    pub fn index(&self) -> usize {
        self.0
    }

    /// Shift the identifier by `offset`, used when graphs are unioned.
    pub fn offset(&self, offset: usize) -> Self {
        NID(self.0 + offset)
    }
}

impl From<usize> for NID {
    fn from(id: usize) -> Self {
        NID(id)
    }
}

impl From<NID> for usize {
    fn from(id: NID) -> Self {
        id.0
    }
}

impl Display for NID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[repr(transparent)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Default,
)]
#[serde(transparent)]
pub struct EID(pub usize);

impl From<EID> for usize {
    fn from(id: EID) -> Self {
        id.0
    }
}

impl From<usize> for EID {
    fn from(id: usize) -> Self {
        EID(id)
    }
}

/// The four kinds of entity found in scraped video data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    Video,
    Author,
    Music,
    Hashtag,
}

impl NodeType {
    pub const ALL: [NodeType; 4] = [
        NodeType::Video,
        NodeType::Author,
        NodeType::Music,
        NodeType::Hashtag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Video => "Video",
            NodeType::Author => "Author",
            NodeType::Music => "Music",
            NodeType::Hashtag => "Hashtag",
        }
    }

    /// The closed attribute vocabulary of this entity type, in canonical column order.
    pub fn attr_keys(&self) -> &'static [NodeAttrKey] {
        use NodeAttrKey::*;
        match self {
            NodeType::Video => &[
                Ntype,
                Id,
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
                Timestamp,
            ],
            NodeType::Author => &[
                Ntype,
                Id,
                Text,
                Nickname,
                Signature,
                Verified,
                IsPrivateAccount,
                FollowerCount,
                FollowingCount,
                Heart,
                DiggCount,
                VideoCount,
            ],
            NodeType::Music => &[Ntype, Id, Text, AuthorName, Album, Duration, PlayUrl],
            NodeType::Hashtag => &[Ntype, Id, Text, ViewCount, VideoCount, Timestamp],
        }
    }

    /// Whether nodes of this type take part in deduplication. Every video record is unique by
    /// construction so video nodes never merge.
    pub fn is_mergeable(&self) -> bool {
        !matches!(self, NodeType::Video)
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PropError::UnknownEntityType(s.to_owned()))
    }
}

/// Relation kinds. Direction is encoded in the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeType {
    AuthorToVideo,
    VideoToMusic,
    VideoToHashtag,
}

impl EdgeType {
    pub const ALL: [EdgeType; 3] = [
        EdgeType::AuthorToVideo,
        EdgeType::VideoToMusic,
        EdgeType::VideoToHashtag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::AuthorToVideo => "AuthorToVideo",
            EdgeType::VideoToMusic => "VideoToMusic",
            EdgeType::VideoToHashtag => "VideoToHashtag",
        }
    }

    /// `(source type, destination type)` of this relation.
    pub fn endpoints(&self) -> (NodeType, NodeType) {
        match self {
            EdgeType::AuthorToVideo => (NodeType::Author, NodeType::Video),
            EdgeType::VideoToMusic => (NodeType::Video, NodeType::Music),
            EdgeType::VideoToHashtag => (NodeType::Video, NodeType::Hashtag),
        }
    }
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PropError::UnknownEntityType(s.to_owned()))
    }
}

/// How duplicate entities are recognised when graphs are merged.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeKey {
    /// Platform-assigned identifier (`id` attribute).
    #[default]
    Id,
    /// Normalised `text` attribute, for shapes without a reliable identifier.
    Text,
}

impl MergeKey {
    pub fn attr_key(&self) -> NodeAttrKey {
        match self {
            MergeKey::Id => NodeAttrKey::Id,
            MergeKey::Text => NodeAttrKey::Text,
        }
    }
}

impl Display for MergeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.attr_key().as_str())
    }
}

impl FromStr for MergeKey {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(MergeKey::Id),
            "text" => Ok(MergeKey::Text),
            _ => Err(PropError::UnknownKey(s.to_owned())),
        }
    }
}
