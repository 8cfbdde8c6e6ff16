//! Builders for realistic raw records, shared by unit and integration tests.

use serde_json::{json, Value};

pub const COLLECTED_AT: i64 = 1630508846;

/// A full video record in the shape returned by the platform's item endpoint.
pub fn video_record(video_id: &str, author_id: &str, music_id: &str, hashtags: &[(&str, &str)]) -> Value {
    let challenges: Vec<Value> = hashtags
        .iter()
        .map(|(id, title)| json!({"id": id, "title": title, "desc": "", "isCommerce": false}))
        .collect();
    json!({
        "id": video_id,
        "desc": "Bora girar #zouk",
        "createTime": 1630508846,
        "video": {
            "duration": 24,
            "width": 576,
            "height": 1024,
            "definition": "720p",
            "format": "mp4",
            "ratio": "720p"
        },
        "stats": {
            "commentCount": 1821,
            "diggCount": 90100,
            "playCount": 615200,
            "shareCount": 1082
        },
        "author": {
            "id": author_id,
            "uniqueId": format!("dancer{author_id}"),
            "nickname": "Dancer",
            "signature": "zouk all day",
            "verified": false,
            "privateAccount": false
        },
        "authorStats": {
            "diggCount": 126,
            "followerCount": 13800,
            "followingCount": 90,
            "heart": 128200,
            "heartCount": 128200,
            "videoCount": 197
        },
        "music": {
            "id": music_id,
            "title": "original sound",
            "authorName": "Dancer",
            "album": "",
            "duration": 24,
            "playUrl": "https://example.invalid/music.mp3"
        },
        "challenges": challenges
    })
}

/// A hashtag query response with the collection timestamp under `extra.now`.
pub fn hashtag_response(id: &str, title: &str, now: i64) -> Value {
    json!({
        "challengeInfo": {
            "challenge": {
                "id": id,
                "title": title,
                "desc": "",
                "stats": {"videoCount": 0, "viewCount": 0}
            }
        },
        "extra": {"now": now}
    })
}
