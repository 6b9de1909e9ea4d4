use std::fs;
use std::path::Path;

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tower::BoxError;
use tracing::error;

use crate::events::S3Event;
use crate::processor::{ProcessError, Processor};
use crate::response::Response;

/// Lambda entry point. The invocation context is passed through untouched.
pub async fn function_handler(
    processor: &Processor,
    event: LambdaEvent<Value>,
) -> Result<Response, Error> {
    let (payload, _context) = event.into_parts();

    process_value(processor, payload).map_err(|e| {
        error!(error = %e, "Failed to process S3 event");
        Error::from(e)
    })
}

/// Decode a raw payload and run it through the processor.
pub fn process_value(processor: &Processor, payload: Value) -> Result<Response, ProcessError> {
    let event = S3Event::from_value(payload)?;
    processor.process(&event)
}

/// Process a single event stored as JSON on disk, outside the Lambda runtime.
pub fn process_file(processor: &Processor, path: &Path) -> Result<Response, BoxError> {
    let data = fs::read(path)
        .map_err(|e| format!("failed to read event file {}: {}", path.display(), e))?;
    let payload: Value = serde_json::from_slice(&data)
        .map_err(|e| format!("failed to parse event file {}: {}", path.display(), e))?;

    Ok(process_value(processor, payload)?)
}
