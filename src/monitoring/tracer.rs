/*!
 * Tracing
 * Structured logging for the simulator using the tracing crate
 *
 * Logs are written to stderr so the interactive transcript on stdout stays
 * readable and can be piped or diffed.
 */

use std::time::Instant;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIM_TRACE_JSON: Enable JSON output (see `SimConfig`)
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Span covering one shell command, from dispatch to completion
pub struct CommandSpan {
    span: Span,
    start: Instant,
}

impl CommandSpan {
    pub fn new(command: &str, sequence: u64) -> Self {
        let span = span!(
            Level::DEBUG,
            "command",
            command = command,
            sequence = sequence,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!(command = command, sequence = sequence, "command started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Run `f` inside this span
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.span.in_scope(f)
    }

    /// Record the outcome and close the span
    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed();
        self.span
            .record("duration_us", duration.as_micros() as u64)
            .record("result", if success { "success" } else { "error" });

        let _entered = self.span.enter();
        debug!(
            duration_us = duration.as_micros() as u64,
            success = success,
            "command completed"
        );
    }
}

/// Helper to create a command span
#[inline]
pub fn span_command(command: &str, sequence: u64) -> CommandSpan {
    CommandSpan::new(command, sequence)
}
