use std::sync::Arc;

use tracing::debug;
use tracing_subscriber::fmt::MakeWriter;

use crate::emit::{ConsoleEmitter, Emitter, TracingEmitter};
use crate::events::{S3Event, S3EventRecord, UploadNotice};
use crate::response::Response;

/// Errors that can occur while processing an S3 event
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Invalid event: {0}")]
    InvalidEvent(#[source] serde_json::Error),

    #[error("Record {index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {index} is missing {path}")]
    MissingField { index: usize, path: &'static str },
}

/// Turns S3 upload notifications into one message per record.
///
/// The processor owns its output channels and keeps no other state, so a
/// single instance is shared by every invocation in the process.
#[derive(Clone)]
pub struct Processor {
    log: Arc<dyn Emitter>,
    console: Arc<dyn Emitter>,
}

impl Processor {
    pub fn new(log: Arc<dyn Emitter>, console: Arc<dyn Emitter>) -> Self {
        Self { log, console }
    }

    /// Log through tracing and echo the same line to stdout.
    pub fn with_default_emitters() -> Self {
        Self::new(Arc::new(TracingEmitter), Arc::new(ConsoleEmitter::stdout()))
    }

    /// Log through tracing and echo the same line to `make_writer`.
    pub fn with_console_writer<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::new(
            Arc::new(TracingEmitter),
            Arc::new(ConsoleEmitter::with_writer(make_writer)),
        )
    }

    /// Handle every record of `event` in order.
    ///
    /// Stops at the first malformed record or the first one missing its
    /// bucket name or object key. Records before it have already been
    /// emitted; no response is produced.
    pub fn process(&self, event: &S3Event) -> Result<Response, ProcessError> {
        debug!(records_count = event.records.len(), "Processing S3 event");

        for (idx, raw) in event.records.iter().enumerate() {
            let record = S3EventRecord::from_raw(idx, raw)?;
            let notice = UploadNotice::from_record(idx, &record)?;

            debug!(
                record_index = idx,
                event_name = %record.event_name.as_deref().unwrap_or("unknown"),
                aws_region = %record.aws_region.as_deref().unwrap_or("unknown"),
                event_time = %record.event_time.as_deref().unwrap_or("unknown"),
                size = ?record.s3.as_ref().and_then(|s3| s3.object.as_ref()).and_then(|o| o.size),
                "S3 object details"
            );

            let message = notice.message();
            self.log.emit(&message);
            self.console.emit(&message);
        }

        Ok(Response::processed())
    }
}
