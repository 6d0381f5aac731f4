use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

const DEFAULT_DIRECTIVE: &str = "whichspace=info";
const VERBOSE_DIRECTIVE: &str = "whichspace=debug";

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag.
pub fn init_logging(verbose: bool) {
    let default = if verbose { VERBOSE_DIRECTIVE } else { DEFAULT_DIRECTIVE };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let tree = HierarchicalLayer::default()
        .with_writer(io::stderr)
        .with_indent_lines(true)
        .with_targets(true)
        .with_bracketed_fields(true);

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
}
