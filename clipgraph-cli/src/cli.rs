use crate::{
    commands::{build, stats, BuildRequest},
    config::app_config::{load_config, AppConfigBuilder},
    errors::CliError,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use clipgraph_api::MergeKey;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clipgraph",
    about = "Build property graphs of videos, authors, music and hashtags from scraped data"
)]
pub struct Args {
    /// TOML or JSON configuration file
    #[arg(long, env = "CLIPGRAPH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CLIPGRAPH_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Assemble a node-link graph from a scrape dump")]
    Build(BuildArgs),
    #[command(about = "Print node and edge counts of a node-link graph")]
    Stats {
        #[arg(long)]
        graph: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
pub struct BuildArgs {
    /// A dataset JSON document (optionally .gz/.bz2) or a directory of JSON-lines video records
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Attribute used to merge duplicate entities: `id` or `text`
    #[arg(long)]
    pub merge_by: Option<MergeKey>,

    #[arg(long)]
    pub skip_invalid: bool,

    /// Directory to write the staged CSV tables to
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// Title of the queried hashtag when the input does not name it
    #[arg(long)]
    pub hashtag: Option<String>,

    /// Collection time (unix seconds) for records without one
    #[arg(long)]
    pub collected_at: Option<i64>,

    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: Args) -> Result<(), CliError> {
    let mut builder: AppConfigBuilder = load_config(None, args.config)?.into();
    if let Some(log_level) = args.log_level {
        builder = builder.with_log_level(log_level);
    }

    match args.command {
        Commands::Build(build_args) => {
            if let Some(merge_by) = build_args.merge_by {
                builder = builder.with_merge_by(merge_by);
            }
            if build_args.skip_invalid {
                builder = builder.with_skip_invalid(true);
            }
            if build_args.pretty {
                builder = builder.with_pretty(true);
            }
            if build_args.tables.is_some() {
                builder = builder.with_tables_dir(build_args.tables);
            }
            let config = builder.build();
            config.logging.init();

            let request = BuildRequest {
                input: build_args.input,
                output: build_args.output,
                hashtag: build_args.hashtag,
                collected_at: build_args.collected_at,
            };
            let (_, report) = build(&config, &request)?;
            println!(
                "{} of {} records assembled, {} skipped, {} duplicate nodes merged",
                report.subgraphs,
                report.records,
                report.skipped.len(),
                report.assembly.nodes_removed()
            );
        }
        Commands::Stats { graph } => {
            builder.build().logging.init();
            println!("{}", stats(&graph)?);
        }
    }
    Ok(())
}

pub fn cli() -> Result<(), CliError> {
    run(Args::parse())
}
