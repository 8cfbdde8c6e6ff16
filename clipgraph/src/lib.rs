//! # clipgraph
//!
//! Turns scraped short-video platform data into a directed property graph of videos, authors,
//! music tracks and hashtags, with duplicate entities merged into single nodes.
//!
//! The pipeline runs leaf first:
//!
//! 1. [`parse`] maps raw JSON records to typed attribute sets.
//! 2. [`subgraph`] builds one small graph per video record.
//! 3. [`assembler`] unions the per-video graphs and contracts duplicate entities.
//!
//! [`dataset`] drives the whole pipeline for one scrape, and [`staging`] offers the alternative
//! table-first path. File formats live behind the `io` feature.
//!
//! ```
//! use clipgraph::prelude::*;
//! use serde_json::json;
//!
//! let record = json!({
//!     "id": "7002982165919157509", "desc": "Bora girar", "createTime": 1630508846,
//!     "video": {"duration": 24, "width": 576, "height": 1024},
//!     "stats": {"commentCount": 1, "playCount": 2, "shareCount": 3, "diggCount": 4},
//!     "author": {"id": "6813185604563567621", "uniqueId": "dancer", "nickname": "Dancer",
//!                "signature": "", "verified": false, "privateAccount": false},
//!     "authorStats": {"followerCount": 1, "followingCount": 2, "heart": 3,
//!                     "diggCount": 4, "videoCount": 5},
//!     "music": {"id": "1", "title": "original sound", "authorName": "Dancer",
//!               "album": "", "duration": 24, "playUrl": ""},
//!     "challenges": [{"id": "74915315", "title": "zouk"}]
//! });
//! let sub = VideoSubgraph::from_record(&record, 1630508846).unwrap();
//! let (graph, _) = assemble([sub.graph()], &AssemblyPolicy::default()).unwrap();
//! assert_eq!(graph.num_nodes(), 4);
//! assert_eq!(graph.num_edges(), 3);
//! ```

pub mod assembler;
pub mod dataset;
pub mod errors;
#[cfg(feature = "io")]
pub mod io;
pub mod parse;
pub mod staging;
pub mod subgraph;
#[doc(hidden)]
pub mod test_utils;

pub mod prelude {
    pub use crate::{
        assembler::{assemble, AssemblyPolicy, AssemblyReport},
        dataset::{ParseErrorPolicy, PipelineOptions, PipelineReport, ScrapeDataset},
        errors::PipelineError,
        parse::{parse_author, parse_hashtag, parse_music, parse_video, HashtagSource, ParseError},
        staging::StagedTables,
        subgraph::{ParsedVideo, VideoSubgraph},
    };
    pub use clipgraph_core::prelude::*;
}
