use super::{Fields, ParseError};
use clipgraph_api::{NodeAttrKey, NodeAttrs, NodeType};
use serde_json::Value;

/// Parse an author from the record's `author` object and its separate `authorStats` object.
pub fn parse_author(author: &Value, stats: &Value) -> Result<NodeAttrs, ParseError> {
    let f = Fields::new(NodeType::Author, author);
    let s = Fields::new(NodeType::Author, stats);
    Ok(
        NodeAttrs::with_capacity(NodeType::Author.attr_keys().len())
            .with(NodeAttrKey::Ntype, NodeType::Author.as_str())
            .with(NodeAttrKey::Id, f.id("id")?)
            .with(NodeAttrKey::Text, f.text("uniqueId")?)
            .with(NodeAttrKey::Nickname, f.text("nickname")?)
            .with(NodeAttrKey::Signature, f.text("signature")?)
            .with(NodeAttrKey::Verified, f.flag_of(&["verified"])?)
            .with(
                NodeAttrKey::IsPrivateAccount,
                f.flag_of(&["privateAccount", "isPrivateAccount"])?,
            )
            .with(NodeAttrKey::FollowerCount, s.count("followerCount")?)
            .with(NodeAttrKey::FollowingCount, s.count("followingCount")?)
            .with(NodeAttrKey::Heart, s.count_of(&["heart", "heartCount"])?)
            .with(NodeAttrKey::DiggCount, s.count("diggCount")?)
            .with(NodeAttrKey::VideoCount, s.count("videoCount")?),
    )
}
