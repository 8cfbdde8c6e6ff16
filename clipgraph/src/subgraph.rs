//! One video record becomes one small graph with a fixed local layout:
//!
//! | nid    | entity   |
//! |--------|----------|
//! | 0      | video    |
//! | 1      | author   |
//! | 2      | music    |
//! | 3..3+k | hashtags |
//!
//! with edges `author -> video`, `video -> music` and one `video -> hashtag` per mention.

use crate::{
    errors::PipelineError,
    parse::{parse_author, parse_hashtag, parse_music, parse_video, HashtagSource, ParseError},
};
use clipgraph_api::{EdgeType, NodeAttrKey, NodeAttrs, NodeType, Prop, NID};
use clipgraph_core::{
    entities::graph::Graph,
    utils::errors::{GraphError, InvalidSubgraphReason},
};
use serde_json::Value;

pub const VIDEO: NID = NID(0);
pub const AUTHOR: NID = NID(1);
pub const MUSIC: NID = NID(2);
pub const FIRST_HASHTAG: NID = NID(3);

/// Every entity of one video record, parsed but not yet linked.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedVideo {
    pub video: NodeAttrs,
    pub author: NodeAttrs,
    pub music: NodeAttrs,
    pub hashtags: Vec<NodeAttrs>,
}

impl ParsedVideo {
    /// Parse all entities of `record`. Nested hashtags are stamped with the record's own `now`
    /// when it has one, otherwise with `collected_at`.
    pub fn parse(record: &Value, collected_at: i64) -> Result<Self, ParseError> {
        let video = parse_video(record)?;
        let author_missing = |path: &str| ParseError::MissingField {
            entity: NodeType::Author,
            path: path.to_owned(),
        };
        let author = parse_author(
            non_null(record, "author").ok_or_else(|| author_missing("author"))?,
            non_null(record, "authorStats").ok_or_else(|| author_missing("authorStats"))?,
        )?;
        let music = parse_music(non_null(record, "music").ok_or_else(|| {
            ParseError::MissingField {
                entity: NodeType::Music,
                path: "music".to_owned(),
            }
        })?)?;

        let collected_at = video
            .get(NodeAttrKey::Timestamp)
            .and_then(Prop::as_i64)
            .unwrap_or(collected_at);
        let hashtags = match non_null(record, "challenges") {
            None => vec![],
            Some(Value::Array(mentions)) => mentions
                .iter()
                .map(|m| parse_hashtag(HashtagSource::from_mention(m, collected_at)))
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(ParseError::InvalidField {
                    entity: NodeType::Hashtag,
                    path: "challenges".to_owned(),
                    expected: "a list of hashtags",
                    found: other.to_string(),
                })
            }
        };

        Ok(Self {
            video,
            author,
            music,
            hashtags,
        })
    }

    /// Domain id of the video, for log messages.
    pub fn video_id(&self) -> &str {
        self.video.id().unwrap_or_default()
    }
}

fn non_null<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

/// The per-video graph.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSubgraph {
    graph: Graph,
}

impl VideoSubgraph {
    /// Build the subgraph of one raw record. Any parse failure yields no subgraph at all.
    pub fn from_record(record: &Value, collected_at: i64) -> Result<Self, PipelineError> {
        Ok(Self::from_parsed(ParsedVideo::parse(record, collected_at)?)?)
    }

    pub fn from_parsed(parsed: ParsedVideo) -> Result<Self, GraphError> {
        let mut graph = Graph::new();
        let video = graph.add_node(parsed.video);
        let author = graph.add_node(parsed.author);
        let music = graph.add_node(parsed.music);
        let hashtags: Vec<NID> = parsed
            .hashtags
            .into_iter()
            .map(|h| graph.add_node(h))
            .collect();

        graph.add_typed_edge(author, video, EdgeType::AuthorToVideo)?;
        graph.add_typed_edge(video, music, EdgeType::VideoToMusic)?;
        for hashtag in hashtags {
            graph.add_typed_edge(video, hashtag, EdgeType::VideoToHashtag)?;
        }
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn num_hashtags(&self) -> usize {
        self.graph.num_nodes().saturating_sub(FIRST_HASHTAG.index())
    }
}

impl AsRef<Graph> for VideoSubgraph {
    fn as_ref(&self) -> &Graph {
        &self.graph
    }
}

impl TryFrom<Graph> for VideoSubgraph {
    type Error = InvalidSubgraphReason;

    fn try_from(graph: Graph) -> Result<Self, Self::Error> {
        check_layout(&graph)?;
        Ok(Self { graph })
    }
}

/// Check that `graph` follows the per-video layout described in the module docs.
pub fn check_layout(graph: &Graph) -> Result<(), InvalidSubgraphReason> {
    let n = graph.num_nodes();
    if n < FIRST_HASHTAG.index() {
        return Err(InvalidSubgraphReason::TooFewNodes(n));
    }
    for (expected, found) in graph.node_ids().enumerate() {
        if found.index() != expected {
            return Err(InvalidSubgraphReason::NonContiguousIds {
                expected: NID(expected),
                found,
            });
        }
    }
    for node in graph.nodes() {
        let expected = match node.nid {
            VIDEO => NodeType::Video,
            AUTHOR => NodeType::Author,
            MUSIC => NodeType::Music,
            _ => NodeType::Hashtag,
        };
        if node.ntype() != Some(expected) {
            return Err(InvalidSubgraphReason::UnexpectedNodeType {
                nid: node.nid,
                expected,
                found: node.ntype(),
            });
        }
    }
    for edge in graph.edges() {
        let etype = edge.etype();
        let ok = match etype {
            Some(EdgeType::AuthorToVideo) => edge.src == AUTHOR && edge.dst == VIDEO,
            Some(EdgeType::VideoToMusic) => edge.src == VIDEO && edge.dst == MUSIC,
            Some(EdgeType::VideoToHashtag) => edge.src == VIDEO && edge.dst >= FIRST_HASHTAG,
            None => false,
        };
        if !ok {
            return Err(InvalidSubgraphReason::UnexpectedEdge {
                src: edge.src,
                dst: edge.dst,
                etype,
            });
        }
    }
    let expected = n - 1;
    let covered = graph.has_edge(AUTHOR, VIDEO, EdgeType::AuthorToVideo)
        && graph.has_edge(VIDEO, MUSIC, EdgeType::VideoToMusic)
        && (FIRST_HASHTAG.index()..n).all(|h| graph.has_edge(VIDEO, NID(h), EdgeType::VideoToHashtag));
    if graph.num_edges() != expected || !covered {
        return Err(InvalidSubgraphReason::EdgeCount {
            expected,
            found: graph.num_edges(),
        });
    }
    Ok(())
}

/// Wrap a layout violation of the `index`-th input.
pub(crate) fn invalid_subgraph(index: usize, source: InvalidSubgraphReason) -> GraphError {
    GraphError::InvalidSubgraph { index, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{video_record, COLLECTED_AT};
    use clipgraph_api::core::Direction;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_mention_gives_four_nodes_and_three_edges() {
        let record = video_record("7002982165919157509", "1", "2", &[("74915315", "zouk")]);
        let sub = VideoSubgraph::from_record(&record, COLLECTED_AT).unwrap();
        let g = sub.graph();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 3);
        assert!(g.has_edge(AUTHOR, VIDEO, EdgeType::AuthorToVideo));
        assert!(g.has_edge(VIDEO, MUSIC, EdgeType::VideoToMusic));
        assert!(g.has_edge(VIDEO, FIRST_HASHTAG, EdgeType::VideoToHashtag));
        assert_eq!(g.node(FIRST_HASHTAG).unwrap().attrs.id(), Some("74915315"));
        assert_eq!(sub.num_hashtags(), 1);
        assert_eq!(check_layout(g), Ok(()));
    }

    #[test]
    fn parsed_video_links_every_entity() {
        let record = video_record("1", "1", "2", &[("5", "salsa"), ("6", "forro")]);
        let parsed = ParsedVideo::parse(&record, COLLECTED_AT).unwrap();
        let g = VideoSubgraph::from_parsed(parsed).unwrap().into_graph();
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.count_edges_of_type(EdgeType::VideoToHashtag), 2);
        assert_eq!(check_layout(&g), Ok(()));
    }

    #[test]
    fn no_challenges_means_no_hashtags() {
        let mut record = video_record("1", "1", "2", &[]);
        record.as_object_mut().unwrap().remove("challenges");
        let sub = VideoSubgraph::from_record(&record, COLLECTED_AT).unwrap();
        assert_eq!(sub.graph().num_nodes(), 3);
        assert_eq!(sub.graph().degree(VIDEO, Direction::BOTH).unwrap(), 2);
    }

    #[test]
    fn record_time_wins_over_batch_time() {
        let mut record = video_record("1", "1", "2", &[("5", "salsa")]);
        record["now"] = 42.into();
        let sub = VideoSubgraph::from_record(&record, COLLECTED_AT).unwrap();
        let hashtag = sub.graph().node(FIRST_HASHTAG).unwrap();
        assert_eq!(hashtag.attrs.get(NodeAttrKey::Timestamp), Some(&Prop::I64(42)));
    }

    #[test]
    fn bad_mention_aborts_the_record() {
        let mut record = video_record("1", "1", "2", &[("5", "salsa")]);
        record["challenges"][0].as_object_mut().unwrap().remove("title");
        match VideoSubgraph::from_record(&record, COLLECTED_AT) {
            Err(PipelineError::Parse(err)) => assert_eq!(err.entity(), NodeType::Hashtag),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn missing_author_is_reported() {
        let mut record = video_record("1", "1", "2", &[]);
        record["author"] = Value::Null;
        match VideoSubgraph::from_record(&record, COLLECTED_AT) {
            Err(PipelineError::Parse(err)) => assert_eq!(
                err,
                ParseError::MissingField {
                    entity: NodeType::Author,
                    path: "author".to_owned()
                }
            ),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn layout_violations() {
        let record = video_record("1", "1", "2", &[("5", "salsa")]);
        let good = VideoSubgraph::from_record(&record, COLLECTED_AT).unwrap().into_graph();

        let mut extra_edge = good.clone();
        extra_edge
            .add_typed_edge(VIDEO, MUSIC, EdgeType::VideoToMusic)
            .unwrap();
        assert_eq!(
            check_layout(&extra_edge),
            Err(InvalidSubgraphReason::EdgeCount {
                expected: 3,
                found: 4
            })
        );

        let mut swapped = good.clone();
        swapped.add_typed_edge(VIDEO, AUTHOR, EdgeType::AuthorToVideo).unwrap();
        assert!(matches!(
            check_layout(&swapped),
            Err(InvalidSubgraphReason::UnexpectedEdge { .. })
        ));

        let mut gap = Graph::new();
        for nid in [0, 1, 3] {
            let node = good.node(NID(nid.min(2))).unwrap();
            gap.add_node_with_id(NID(nid), node.attrs.clone()).unwrap();
        }
        assert_eq!(
            check_layout(&gap),
            Err(InvalidSubgraphReason::NonContiguousIds {
                expected: NID(2),
                found: NID(3)
            })
        );

        assert_eq!(
            check_layout(&Graph::new()),
            Err(InvalidSubgraphReason::TooFewNodes(0))
        );
        assert!(VideoSubgraph::try_from(good).is_ok());
    }
}
