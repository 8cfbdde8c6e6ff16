//! The hand-off format between data acquisition and graph construction.

use crate::{
    assembler::{assemble, AssemblyPolicy, AssemblyReport},
    errors::PipelineError,
    parse::{parse_hashtag, HashtagSource, ParseError},
    staging::StagedTables,
    subgraph::{ParsedVideo, VideoSubgraph},
};
use clipgraph_api::{NodeAttrKey, NodeAttrs, NodeType, Prop};
use clipgraph_core::entities::graph::Graph;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Everything collected for one hashtag query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeDataset {
    /// The queried hashtag, either a full query response (`challengeInfo` + `extra`) or a bare
    /// challenge object. `null` when unknown.
    #[serde(default)]
    pub hashtag_data: Value,
    pub list_video_data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// The first bad record fails the whole dataset.
    #[default]
    Abort,
    /// Bad records are logged, counted and left out.
    Skip,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub policy: AssemblyPolicy,
    pub on_error: ParseErrorPolicy,
    /// Collection time used when neither the dataset nor a record carries one.
    pub collected_at: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineReport {
    pub records: usize,
    pub subgraphs: usize,
    /// `(record index, error)` of every skipped record.
    pub skipped: Vec<(usize, ParseError)>,
    pub assembly: AssemblyReport,
}

pub const HASHTAG_ID: &str = "hashtag_id";
pub const HASHTAG_TITLE: &str = "hashtag_title";
pub const COLLECTED_AT: &str = "collected_at";

impl ScrapeDataset {
    pub fn new(hashtag_data: Value, list_video_data: Vec<Value>) -> Self {
        Self {
            hashtag_data,
            list_video_data,
            collected_at: None,
        }
    }

    /// The queried hashtag, or `None` when the dataset does not name one.
    pub fn hashtag(&self, fallback: Option<i64>) -> Result<Option<NodeAttrs>, ParseError> {
        if self.hashtag_data.is_null() {
            return Ok(None);
        }
        let source = if self.hashtag_data.get("challengeInfo").is_some() {
            HashtagSource::from_challenge_info(&self.hashtag_data)?
        } else {
            let collected_at =
                self.collected_at
                    .or(fallback)
                    .ok_or_else(|| ParseError::MissingField {
                        entity: NodeType::Hashtag,
                        path: "extra.now".to_owned(),
                    })?;
            HashtagSource::new(&self.hashtag_data, collected_at)
        };
        parse_hashtag(source).map(Some)
    }

    /// Collection time for nested hashtags of records that carry no `now`.
    fn batch_time(&self, hashtag: Option<&NodeAttrs>, options: &PipelineOptions) -> i64 {
        self.collected_at
            .or_else(|| {
                hashtag
                    .and_then(|h| h.get(NodeAttrKey::Timestamp))
                    .and_then(Prop::as_i64)
            })
            .or(options.collected_at)
            .unwrap_or_default()
    }

    fn parse_records(
        &self,
        collected_at: i64,
        options: &PipelineOptions,
        report: &mut PipelineReport,
    ) -> Result<Vec<ParsedVideo>, PipelineError> {
        let mut parsed = Vec::with_capacity(self.list_video_data.len());
        for (index, record) in self.list_video_data.iter().enumerate() {
            report.records += 1;
            match ParsedVideo::parse(record, collected_at) {
                Ok(video) => parsed.push(video),
                Err(source) => match options.on_error {
                    ParseErrorPolicy::Abort => {
                        return Err(PipelineError::Record { index, source })
                    }
                    ParseErrorPolicy::Skip => {
                        warn!(index, error = %source, "Skipping unparseable video record");
                        report.skipped.push((index, source));
                    }
                },
            }
        }
        Ok(parsed)
    }

    /// Parse, build one subgraph per video and assemble them.
    pub fn to_graph(&self, options: &PipelineOptions) -> Result<(Graph, PipelineReport), PipelineError> {
        let hashtag = self.hashtag(options.collected_at)?;
        let collected_at = self.batch_time(hashtag.as_ref(), options);
        let mut report = PipelineReport::default();

        let subgraphs = self
            .parse_records(collected_at, options, &mut report)?
            .into_iter()
            .map(|video| VideoSubgraph::from_parsed(video).map(VideoSubgraph::into_graph))
            .collect::<Result<Vec<Graph>, _>>()?;
        report.subgraphs = subgraphs.len();
        info!(
            hashtag = hashtag.as_ref().and_then(|h| h.text()).unwrap_or_default(),
            records = report.records,
            subgraphs = report.subgraphs,
            skipped = report.skipped.len(),
            "Parsed video records"
        );

        let (mut graph, assembly) = assemble(&subgraphs, &options.policy)?;
        report.assembly = assembly;
        if let Some(hashtag) = hashtag.as_ref() {
            if let Some(id) = hashtag.id() {
                graph.set_metadata(HASHTAG_ID, id);
            }
            if let Some(title) = hashtag.text() {
                graph.set_metadata(HASHTAG_TITLE, title);
            }
        }
        if hashtag.is_some() || self.collected_at.is_some() || options.collected_at.is_some() {
            graph.set_metadata(COLLECTED_AT, collected_at);
        }
        Ok((graph, report))
    }

    /// Stage the dataset as per-entity tables instead of building subgraphs.
    pub fn to_tables(&self, options: &PipelineOptions) -> Result<(StagedTables, PipelineReport), PipelineError> {
        let hashtag = self.hashtag(options.collected_at)?;
        let collected_at = self.batch_time(hashtag.as_ref(), options);
        let mut report = PipelineReport::default();
        let mut tables = StagedTables::new();
        for video in self.parse_records(collected_at, options, &mut report)? {
            tables.push_parsed(&video)?;
            report.subgraphs += 1;
        }
        Ok((tables, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{hashtag_response, video_record, COLLECTED_AT as NOW};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dataset() -> ScrapeDataset {
        ScrapeDataset::new(
            hashtag_response("18478", "zouk", NOW),
            vec![
                video_record("1", "6813185604563567621", "10", &[("18478", "zouk")]),
                video_record("2", "6813185604563567621", "11", &[("18478", "zouk")]),
            ],
        )
    }

    #[test]
    fn builds_graph_with_metadata() {
        let (g, report) = dataset().to_graph(&PipelineOptions::default()).unwrap();
        assert_eq!(report.subgraphs, 2);
        assert_eq!(g.count_nodes_of_type(NodeType::Video), 2);
        assert_eq!(g.count_nodes_of_type(NodeType::Author), 1);
        assert_eq!(g.count_nodes_of_type(NodeType::Music), 2);
        assert_eq!(g.count_nodes_of_type(NodeType::Hashtag), 1);
        assert_eq!(g.num_edges(), 6);
        assert_eq!(g.metadata().get(HASHTAG_TITLE), Some(&Prop::str("zouk")));
        assert_eq!(g.metadata().get(COLLECTED_AT), Some(&Prop::I64(NOW)));
    }

    #[test]
    fn abort_names_the_failing_record() {
        let mut data = dataset();
        data.list_video_data[1]["stats"]
            .as_object_mut()
            .unwrap()
            .remove("diggCount");
        match data.to_graph(&PipelineOptions::default()) {
            Err(PipelineError::Record { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source.path(), "stats.diggCount");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn skip_leaves_bad_records_out() {
        let mut data = dataset();
        data.list_video_data.push(json!({"id": "3"}));
        let options = PipelineOptions {
            on_error: ParseErrorPolicy::Skip,
            ..Default::default()
        };
        let (g, report) = data.to_graph(&options).unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, 2);
        assert_eq!(g.count_nodes_of_type(NodeType::Video), 2);
    }

    #[test]
    fn bare_challenge_needs_a_collection_time() {
        let data = ScrapeDataset::new(json!({"id": "18478", "title": "zouk"}), vec![]);
        assert!(data.to_graph(&PipelineOptions::default()).is_err());
        let options = PipelineOptions {
            collected_at: Some(5),
            ..Default::default()
        };
        let (g, _) = data.to_graph(&options).unwrap();
        assert_eq!(g.metadata().get(HASHTAG_ID), Some(&Prop::str("18478")));
        assert_eq!(g.metadata().get(COLLECTED_AT), Some(&Prop::I64(5)));
    }

    #[test]
    fn unnamed_dataset_has_no_metadata() {
        let data = ScrapeDataset::new(Value::Null, vec![video_record("1", "2", "3", &[])]);
        let (g, _) = data.to_graph(&PipelineOptions::default()).unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert!(g.metadata().is_empty());
    }

    #[test]
    fn tables_stage_every_record() {
        let (tables, report) = dataset().to_tables(&PipelineOptions::default()).unwrap();
        assert_eq!(report.subgraphs, 2);
        assert_eq!(tables.node_table(NodeType::Hashtag).len(), 2);
        let g = tables.into_graph().unwrap();
        assert_eq!(g.count_nodes_of_type(NodeType::Hashtag), 1);
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(dataset()).unwrap();
        assert!(json.get("collected_at").is_none());
        assert_eq!(json["list_video_data"].as_array().unwrap().len(), 2);
        let back: ScrapeDataset = serde_json::from_value(json).unwrap();
        assert_eq!(back, dataset());
    }
}
