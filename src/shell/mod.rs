/*!
 * Interactive Shell
 * Menu-driven front end: reads and validates input, calls into the model,
 * and prints its output verbatim
 */

mod command;
mod session;

pub use command::{parse_size, Command, CommandError};
pub use session::{read_capacity, Flow, Session};
