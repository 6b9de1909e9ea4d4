//! Output channels for upload messages.
//!
//! Every processed record produces one message, which is handed to each
//! configured [`Emitter`] in turn.

use std::io::{self, Write};

use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;

/// A destination for formatted upload messages.
pub trait Emitter: Send + Sync {
    fn emit(&self, message: &str);
}

/// Emits at INFO level through the process-wide tracing subscriber.
#[derive(Debug, Clone, Default)]
pub struct TracingEmitter;

impl Emitter for TracingEmitter {
    fn emit(&self, message: &str) {
        info!("{}", message);
    }
}

/// Writes each message as a plain line, bypassing the log formatter.
///
/// Defaults to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleEmitter<M = fn() -> io::Stdout> {
    make_writer: M,
}

impl ConsoleEmitter {
    pub fn stdout() -> Self {
        Self {
            make_writer: io::stdout,
        }
    }
}

impl Default for ConsoleEmitter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<M> ConsoleEmitter<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    pub fn with_writer(make_writer: M) -> Self {
        Self { make_writer }
    }
}

impl<M> Emitter for ConsoleEmitter<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    fn emit(&self, message: &str) {
        let mut writer = self.make_writer.make_writer();
        if let Err(e) = writeln!(writer, "{}", message).and_then(|_| writer.flush()) {
            warn!(error = %e, "Failed to write message to console");
        }
    }
}
