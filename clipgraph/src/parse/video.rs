use super::{Fields, ParseError};
use clipgraph_api::{NodeAttrKey, NodeAttrs, NodeType, Prop};
use serde_json::Value;

/// Parse the video itself out of a full video record.
///
/// `video.definition` and `video.format` may be absent and become the null marker. `now`, when
/// present, is kept as the video's `timestamp`.
pub fn parse_video(record: &Value) -> Result<NodeAttrs, ParseError> {
    let f = Fields::new(NodeType::Video, record);
    let mut attrs = NodeAttrs::with_capacity(NodeType::Video.attr_keys().len())
        .with(NodeAttrKey::Ntype, NodeType::Video.as_str())
        .with(NodeAttrKey::Id, f.id("id")?)
        .with(NodeAttrKey::Text, f.text("desc")?)
        .with(NodeAttrKey::CreationTime, f.int("createTime")?)
        .with(NodeAttrKey::Duration, f.count("video.duration")?)
        .with(NodeAttrKey::Width, f.count("video.width")?)
        .with(NodeAttrKey::Height, f.count("video.height")?)
        .with(NodeAttrKey::Definition, f.opt_text("video.definition")?)
        .with(NodeAttrKey::Format, f.opt_text("video.format")?)
        .with(NodeAttrKey::CommentCount, f.count("stats.commentCount")?)
        .with(NodeAttrKey::PlayCount, f.count("stats.playCount")?)
        .with(NodeAttrKey::ShareCount, f.count("stats.shareCount")?)
        .with(NodeAttrKey::DiggCount, f.count("stats.diggCount")?);
    if let Some(now) = f.opt_int("now")? {
        attrs.set(NodeAttrKey::Timestamp, Prop::I64(now));
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::video_record;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_video_field() {
        let record = video_record("7002982165919157509", "1", "2", &[]);
        let attrs = parse_video(&record).unwrap();
        assert_eq!(attrs.ntype(), Some(NodeType::Video));
        assert_eq!(attrs.id(), Some("7002982165919157509"));
        assert_eq!(attrs.text(), Some("Bora girar #zouk"));
        assert_eq!(attrs.get(NodeAttrKey::CreationTime), Some(&Prop::I64(1630508846)));
        assert_eq!(attrs.get(NodeAttrKey::PlayCount), Some(&Prop::U64(615200)));
        assert_eq!(attrs.get(NodeAttrKey::Definition), Some(&Prop::str("720p")));
        assert!(!attrs.contains(NodeAttrKey::Timestamp));
        let keys: Vec<_> = attrs.keys().collect();
        assert_eq!(keys, NodeType::Video.attr_keys()[..13].to_vec());
    }

    #[test]
    fn definition_and_format_are_optional() {
        let mut record = video_record("1", "1", "2", &[]);
        record["video"].as_object_mut().unwrap().remove("definition");
        record["video"]["format"] = Value::Null;
        record["now"] = 1630600000.into();
        let attrs = parse_video(&record).unwrap();
        assert_eq!(attrs.get(NodeAttrKey::Definition), Some(&Prop::Null));
        assert_eq!(attrs.get(NodeAttrKey::Format), Some(&Prop::Null));
        assert_eq!(attrs.get(NodeAttrKey::Timestamp), Some(&Prop::I64(1630600000)));
    }

    #[test]
    fn missing_digg_count_fails() {
        let mut record = video_record("1", "1", "2", &[]);
        record["stats"].as_object_mut().unwrap().remove("diggCount");
        assert_eq!(
            parse_video(&record),
            Err(ParseError::MissingField {
                entity: NodeType::Video,
                path: "stats.diggCount".to_owned()
            })
        );
    }

    #[test]
    fn negative_count_is_invalid() {
        let mut record = video_record("1", "1", "2", &[]);
        record["stats"]["playCount"] = (-5).into();
        let err = parse_video(&record).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { .. }));
        assert_eq!(err.path(), "stats.playCount");
    }
}
