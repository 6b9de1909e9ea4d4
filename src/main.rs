use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use lambda_runtime::service_fn;
use s3_upload_notifier::{
    handler,
    init::{self, logging::LoggerGuard},
    processor::Processor,
};
use tower::BoxError;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "s3-upload-notifier")]
#[command(bin_name = "s3-upload-notifier")]
struct Arguments {
    // Read separately by EnvFileArguments, kept so the option is not rejected
    #[arg(long)]
    env_file: Option<String>,

    #[arg(long)]
    /// Process a single JSON event file and print the response instead of
    /// serving Lambda invocations
    event_file: Option<PathBuf>,
}

// Minimal option to allow us to parse out the env from a file
#[derive(Debug, Parser)]
#[clap(ignore_errors = true)]
struct EnvFileArguments {
    #[arg(long, env = "NOTIFIER_ENV_FILE")]
    env_file: Option<String>,
}

fn main() -> ExitCode {
    let start_time = Instant::now();

    let env_opt = EnvFileArguments::parse();
    if let Some(env_file) = env_opt.env_file
        && let Err(e) = init::env::load_file(&env_file)
    {
        eprintln!("Can not load envfile: {}", e);
        return ExitCode::FAILURE;
    }

    let opt = Arguments::parse();

    let guard = match init::logging::setup() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ERROR: failed to setup logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let processor = Processor::with_default_emitters();

    if let Some(event_file) = opt.event_file {
        return match handler::process_file(&processor, &event_file) {
            Ok(response) => match serde_json::to_string(&response) {
                Ok(out) => {
                    println!("{}", out);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to serialize response: {}", e);
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                eprintln!("Failed to process event: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match run_function(start_time, guard, processor) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to run function: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run_function(
    start_time: Instant,
    log_guard: LoggerGuard,
    processor: Processor,
) -> Result<(), BoxError> {
    let shutdown_hook = || async move {
        std::mem::drop(log_guard);
    };

    // This allows us to catch shutdown signals. It is implemented by registering
    // a fake, no event, Lambda extension that will receive shutdown events.
    lambda_runtime::spawn_graceful_shutdown_handler(shutdown_hook).await;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "S3 upload notifier started in {}ms",
        start_time.elapsed().as_millis()
    );

    let processor = &processor;
    lambda_runtime::run(service_fn(move |event| async move {
        handler::function_handler(processor, event).await
    }))
    .await
}
