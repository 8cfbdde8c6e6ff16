use clipgraph::{
    assembler::AssemblyPolicy,
    dataset::{ParseErrorPolicy, PipelineOptions},
};
use clipgraph_api::MergeKey;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MERGE_BY: MergeKey = MergeKey::Id;
pub const DEFAULT_SKIP_INVALID: bool = false;

#[derive(Debug, Deserialize, PartialEq, Clone, Serialize)]
pub struct PipelineConfig {
    /// Key used to recognise duplicate authors, music and hashtags.
    pub merge_by: MergeKey,
    /// Leave out records that fail to parse instead of aborting.
    pub skip_invalid: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            merge_by: DEFAULT_MERGE_BY,
            skip_invalid: DEFAULT_SKIP_INVALID,
        }
    }
}

impl PipelineConfig {
    pub fn options(&self, collected_at: Option<i64>) -> PipelineOptions {
        PipelineOptions {
            policy: AssemblyPolicy::uniform(self.merge_by),
            on_error: if self.skip_invalid {
                ParseErrorPolicy::Skip
            } else {
                ParseErrorPolicy::Abort
            },
            collected_at,
        }
    }
}
