use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for test runs.
///
/// Honors `RUST_LOG` when set; otherwise keeps framework crates at `info`
/// and the rest of the stack at `warn`. Idempotent so that every test can
/// call it without coordinating.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,gx_core=info,gx_suite=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}
