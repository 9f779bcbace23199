//! Shared test helpers

pub mod fixtures;

/// Install a tracing subscriber honouring `RUST_LOG`
#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
