use super::{Fields, ParseError};
use clipgraph_api::{NodeAttrKey, NodeAttrs, NodeType};
use serde_json::Value;

pub fn parse_music(music: &Value) -> Result<NodeAttrs, ParseError> {
    let f = Fields::new(NodeType::Music, music);
    Ok(NodeAttrs::with_capacity(NodeType::Music.attr_keys().len())
        .with(NodeAttrKey::Ntype, NodeType::Music.as_str())
        .with(NodeAttrKey::Id, f.id("id")?)
        .with(NodeAttrKey::Text, f.text("title")?)
        .with(NodeAttrKey::AuthorName, f.text("authorName")?)
        .with(NodeAttrKey::Album, f.text("album")?)
        .with(NodeAttrKey::Duration, f.count("duration")?)
        .with(NodeAttrKey::PlayUrl, f.text("playUrl")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::video_record;
    use clipgraph_api::Prop;

    #[test]
    fn reads_music() {
        let record = video_record("1", "7", "6999", &[]);
        let attrs = parse_music(&record["music"]).unwrap();
        assert_eq!(attrs.id(), Some("6999"));
        assert_eq!(attrs.text(), Some("original sound"));
        assert_eq!(attrs.get(NodeAttrKey::Album), Some(&Prop::str("")));
        assert_eq!(attrs.get(NodeAttrKey::Duration), Some(&Prop::U64(24)));
    }

    #[test]
    fn missing_play_url_fails() {
        let mut record = video_record("1", "7", "6999", &[]);
        record["music"].as_object_mut().unwrap().remove("playUrl");
        assert_eq!(parse_music(&record["music"]).unwrap_err().path(), "playUrl");
    }
}
