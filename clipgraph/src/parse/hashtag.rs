use super::{Fields, ParseError};
use clipgraph_api::{NodeAttrKey, NodeAttrs, NodeType, Prop};
use serde_json::Value;

/// Canonical hashtag input: a challenge object plus the time it was collected.
///
/// Query responses and per-video mentions have different envelopes; the adapters below strip
/// them so [`parse_hashtag`] only ever sees one shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HashtagSource<'a> {
    pub challenge: &'a Value,
    pub collected_at: i64,
}

impl<'a> HashtagSource<'a> {
    pub fn new(challenge: &'a Value, collected_at: i64) -> Self {
        Self {
            challenge,
            collected_at,
        }
    }

    /// From a hashtag query response: `challengeInfo.challenge`, collected at `extra.now`.
    pub fn from_challenge_info(response: &'a Value) -> Result<Self, ParseError> {
        let f = Fields::new(NodeType::Hashtag, response);
        let challenge = f.value("challengeInfo.challenge")?;
        let collected_at = f.opt_int("extra.now")?.ok_or_else(|| f.missing("extra.now"))?;
        Ok(Self::new(challenge, collected_at))
    }

    /// From one element of a video record's `challenges` list.
    pub fn from_mention(mention: &'a Value, collected_at: i64) -> Self {
        Self::new(mention, collected_at)
    }
}

/// `id` and `title` are required. `stats` is optional, but when present both of its counts are.
pub fn parse_hashtag(source: HashtagSource<'_>) -> Result<NodeAttrs, ParseError> {
    let f = Fields::new(NodeType::Hashtag, source.challenge);
    let mut attrs = NodeAttrs::with_capacity(NodeType::Hashtag.attr_keys().len())
        .with(NodeAttrKey::Ntype, NodeType::Hashtag.as_str())
        .with(NodeAttrKey::Id, f.id("id")?)
        .with(NodeAttrKey::Text, f.text("title")?);
    if f.opt("stats").is_some() {
        attrs.set(NodeAttrKey::ViewCount, f.count("stats.viewCount")?);
        attrs.set(NodeAttrKey::VideoCount, f.count("stats.videoCount")?);
    }
    attrs.set(NodeAttrKey::Timestamp, Prop::I64(source.collected_at));
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{hashtag_response, video_record, COLLECTED_AT};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn both_shapes_agree_on_identity() {
        let response = hashtag_response("74915315", "zouk", COLLECTED_AT);
        let queried = parse_hashtag(HashtagSource::from_challenge_info(&response).unwrap()).unwrap();

        let record = video_record("1", "2", "3", &[("74915315", "zouk")]);
        let mention = &record["challenges"][0];
        let mentioned = parse_hashtag(HashtagSource::from_mention(mention, COLLECTED_AT)).unwrap();

        assert_eq!(queried.id(), mentioned.id());
        assert_eq!(queried.text(), Some("zouk"));
        assert_eq!(queried.get(NodeAttrKey::ViewCount), Some(&Prop::U64(0)));
        assert!(!mentioned.contains(NodeAttrKey::ViewCount));
        assert_eq!(
            mentioned.get(NodeAttrKey::Timestamp),
            Some(&Prop::I64(COLLECTED_AT))
        );
    }

    #[test]
    fn numeric_challenge_ids_are_text() {
        let challenge = json!({"id": 74915315, "title": "zouk"});
        let attrs = parse_hashtag(HashtagSource::new(&challenge, 0)).unwrap();
        assert_eq!(attrs.id(), Some("74915315"));
    }

    #[test]
    fn query_response_needs_collection_time() {
        let mut response = hashtag_response("74915315", "zouk", COLLECTED_AT);
        response.as_object_mut().unwrap().remove("extra");
        assert_eq!(
            HashtagSource::from_challenge_info(&response),
            Err(ParseError::MissingField {
                entity: NodeType::Hashtag,
                path: "extra.now".to_owned()
            })
        );
    }

    #[test]
    fn partial_stats_fail() {
        let challenge = json!({"id": "1", "title": "zouk", "stats": {"viewCount": 3}});
        let err = parse_hashtag(HashtagSource::new(&challenge, 0)).unwrap_err();
        assert_eq!(err.path(), "stats.videoCount");
    }

    #[test]
    fn missing_title_fails() {
        let challenge = json!({"id": "1"});
        let err = parse_hashtag(HashtagSource::new(&challenge, 0)).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                entity: NodeType::Hashtag,
                path: "title".to_owned()
            }
        );
    }
}
