/// Installs the process-wide subscriber.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`; failures of every
/// console operation are reported here at `error` level.
///
/// ```bash
/// RUST_LOG=debug order_console all
/// RUST_LOG=order_console::console=debug order_console watch
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
