use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `--verbose` beats the configured level; `RUST_LOG` beats both.
fn filter_directive(verbose: bool, level: Option<&str>) -> String {
    if verbose {
        return "luxe_valuation=debug,info".to_string();
    }
    match level.map(str::trim).filter(|l| !l.is_empty()) {
        Some(level) => format!("luxe_valuation={}", level),
        None => "luxe_valuation=info".to_string(),
    }
}

pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    let directive = filter_directive(verbose, level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines on stderr, for batch runs whose logs are shipped elsewhere.
pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    let directive = filter_directive(verbose, level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
