//! Tracing setup and the sink that text dumps are written to.

use tracing_subscriber::EnvFilter;

pub const DUMP_TARGET: &str = "vm_dump::dump";

/// Installs a fmt subscriber filtered by `RUST_LOG`. Safe to call more than
/// once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Emits a text dump one line per event so log viewers keep the indentation.
pub fn log_text_dump(label: &str, text: &str) {
    tracing::info!(target: DUMP_TARGET, label, lines = text.lines().count(), "dump.begin");
    for line in text.lines() {
        tracing::info!(target: DUMP_TARGET, label, "{}", line);
    }
    tracing::info!(target: DUMP_TARGET, label, "dump.end");
}
