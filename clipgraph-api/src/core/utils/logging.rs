use std::sync::OnceLock;
use tracing_subscriber::{fmt, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 4] = ["clipgraph", "clipgraph_api", "clipgraph_core", "clipgraph_cli"];

static INIT: OnceLock<()> = OnceLock::new();

/// Build the filter for the workspace crates at `log_level`. `RUST_LOG` takes precedence when set.
pub fn get_log_env(log_level: String) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = CRATES
            .iter()
            .map(|krate| format!("{krate}={log_level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    })
}

/// Install the process-wide subscriber. Later calls are no-ops.
pub fn init_global_logger(log_level: String) {
    INIT.get_or_init(|| {
        let filter = get_log_env(log_level);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_span_events(FmtSpan::NONE))
            .try_init()
            .ok();
    });
}
