/*!
 * Monitoring
 * Structured tracing setup and command spans
 */

mod tracer;

pub use tracer::{init_tracing, span_command, CommandSpan};
