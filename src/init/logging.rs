use std::env;

use tower::BoxError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, filter::LevelFilter};

pub type LoggerGuard = tracing_appender::non_blocking::WorkerGuard;

/// Install the process-wide subscriber. Call once, before the first invocation.
///
/// The returned guard flushes buffered lines when dropped and must live until
/// shutdown.
pub fn setup() -> Result<LoggerGuard, BoxError> {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = build_filter(&env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default())?;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_writer)
        // disable printing of the module
        .with_target(false)
        // cloudwatch will add time
        .without_time()
        // cloudwatch doesn't play nice with escape codes
        .with_ansi(false);

    if json_format_requested() {
        let subscriber = Registry::default().with(filter).with(layer.json());
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(filter).with(layer.compact());
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(guard)
}

/// INFO unless `directives` (the `RUST_LOG` value) says otherwise. The Lambda
/// runtime crates are capped at WARN.
fn build_filter(directives: &str) -> Result<EnvFilter, BoxError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse(directives)?
        .add_directive("lambda_runtime=warn".parse()?)
        .add_directive("lambda_runtime_api_client=warn".parse()?);

    Ok(filter)
}

fn json_format_requested() -> bool {
    is_json_format(&env::var("AWS_LAMBDA_LOG_FORMAT").unwrap_or_default())
}

fn is_json_format(value: &str) -> bool {
    value.eq_ignore_ascii_case("JSON")
}
