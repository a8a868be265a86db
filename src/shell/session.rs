/*!
 * Shell Session
 * Interactive menu loop driving a memory model
 */

use super::command::{parse_size, Command};
use crate::config::SimConfig;
use crate::core::limits::MAX_TOTAL_MEMORY;
use crate::core::types::Size;
use crate::memory::{Allocator, MemoryError, MemoryInfo, Visualize};
use crate::monitoring::span_command;
use anyhow::{Context, Result};
use miette::Diagnostic;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const MENU: &str = "
--- MEMORY MANAGEMENT SIMULATOR ---
1. Load process (first-fit)            allocate <name> <size>
2. Free process                        free <name>
3. Compact memory                      compact
4. Show memory state                   show
5. Internal fragmentation (simulated)  frag-internal
6. External fragmentation              frag-external
7. Statistics                          stats
0. Exit                                quit
";

/// Whether the loop should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read a line, returning `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read from input")?;
    Ok((read > 0).then(|| line.trim().to_string()))
}

/// Ask for the total memory size until a positive integer no larger than
/// `MAX_TOTAL_MEMORY` is given
///
/// An empty line or end of input selects the configured default capacity.
pub fn read_capacity<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &SimConfig,
) -> Result<Size> {
    write!(
        output,
        "Enter the total memory size (units, e.g. {}): ",
        config.default_capacity
    )?;
    output.flush()?;

    loop {
        let Some(line) = read_line(input)? else {
            writeln!(output)?;
            return Ok(config.default_capacity);
        };
        if line.is_empty() {
            return Ok(config.default_capacity);
        }
        match parse_size(&line) {
            Ok(capacity) if capacity <= MAX_TOTAL_MEMORY => return Ok(capacity),
            Ok(capacity) => debug!("Rejected capacity input: {} exceeds the maximum", capacity),
            Err(e) => debug!("Rejected capacity input: {}", e),
        }
        write!(
            output,
            "Invalid input. Please enter a positive integer size (at most {}): ",
            MAX_TOTAL_MEMORY
        )?;
        output.flush()?;
    }
}

/// Interactive session over a model, an input source and an output sink
pub struct Session<M, R, W> {
    model: M,
    input: R,
    output: W,
    commands_run: u64,
}

impl<M, R, W> Session<M, R, W>
where
    M: Allocator + MemoryInfo + Visualize,
    R: BufRead,
    W: Write,
{
    pub fn new(model: M, input: R, output: W) -> Self {
        Self {
            model,
            input,
            output,
            commands_run: 0,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Tear down the session, handing back the model and the output sink
    pub fn into_parts(self) -> (M, W) {
        (self.model, self.output)
    }

    /// Present the menu and execute commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}Select an option: ", MENU)?;
            self.output.flush()?;

            let Some(line) = read_line(&mut self.input)? else {
                writeln!(self.output)?;
                self.execute(Command::Quit)?;
                return Ok(());
            };

            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(e) => {
                    debug!("Rejected command input: {}", e);
                    writeln!(self.output, "Invalid option: {}. Try again.", e)?;
                }
            }
        }
    }

    /// Run one command against the model
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        self.commands_run += 1;
        let span = span_command(command.name(), self.commands_run);

        let outcome = span.in_scope(|| self.dispatch(command));
        span.finish(matches!(outcome, Ok((_, true))));
        outcome.map(|(flow, _)| flow)
    }

    /// Returns the flow and whether the command succeeded
    fn dispatch(&mut self, command: Command) -> Result<(Flow, bool)> {
        let succeeded = match command {
            Command::Allocate { name, size } => self.allocate(name, size)?,
            Command::Free { name } => self.free(name)?,
            Command::Compact => {
                let report = self.model.compact();
                writeln!(
                    self.output,
                    "Memory compacted ({} block(s) relocated).",
                    report.relocated
                )?;
                self.show()?;
                true
            }
            Command::Show => {
                self.show()?;
                true
            }
            Command::FragInternal => {
                let simulated = self.model.internal_fragmentation_simulated();
                writeln!(
                    self.output,
                    "Internal fragmentation (simulated allocation waste): {} units",
                    simulated
                )?;
                writeln!(
                    self.output,
                    "(Note: with exact-size allocation, real internal fragmentation is 0 units)"
                )?;
                true
            }
            Command::FragExternal => {
                let fragmentation = self.model.external_fragmentation();
                write!(
                    self.output,
                    "Total external fragmentation: {} units",
                    fragmentation.total_free
                )?;
                if fragmentation.total_free > 0 {
                    write!(
                        self.output,
                        " (in {} free block(s))",
                        fragmentation.free_blocks
                    )?;
                }
                writeln!(self.output)?;
                true
            }
            Command::Stats => {
                let snapshot = self.model.snapshot();
                let json = serde_json::to_string_pretty(&snapshot)
                    .context("Failed to serialize stats")?;
                writeln!(self.output, "{}", json)?;
                writeln!(
                    self.output,
                    "Memory pressure: {}",
                    snapshot.stats.memory_pressure()
                )?;
                true
            }
            Command::Help => {
                write!(self.output, "{}", MENU)?;
                true
            }
            Command::Quit => {
                writeln!(self.output, "Exiting simulator...")?;
                return Ok((Flow::Quit, true));
            }
        };

        Ok((Flow::Continue, succeeded))
    }

    fn allocate(&mut self, name: Option<String>, size: Option<Size>) -> Result<bool> {
        let Some(name) = self.argument(name, "Process name: ")? else {
            return Ok(false);
        };
        let size = match size {
            Some(size) => size,
            None => {
                let Some(raw) = self.prompt("Process size (units): ")? else {
                    return Ok(false);
                };
                match parse_size(&raw) {
                    Ok(size) => size,
                    Err(e) => {
                        debug!("Rejected size input: {}", e);
                        writeln!(self.output, "Invalid process size.")?;
                        return Ok(false);
                    }
                }
            }
        };

        match self.model.allocate(&name, size) {
            Ok(address) => {
                writeln!(
                    self.output,
                    "Process '{}' ({} units) loaded at {}.",
                    name, size, address
                )?;
                self.show()?;
                Ok(true)
            }
            Err(e) => {
                let searched = matches!(e, MemoryError::InsufficientSpace { .. });
                self.report(&e)?;
                if searched {
                    self.show()?;
                }
                Ok(false)
            }
        }
    }

    fn free(&mut self, name: Option<String>) -> Result<bool> {
        let Some(name) = self.argument(name, "Name of the process to free: ")? else {
            return Ok(false);
        };

        match self.model.free(&name) {
            Ok(size) => {
                writeln!(self.output, "Process '{}' freed ({} units).", name, size)?;
                self.show()?;
                Ok(true)
            }
            Err(e) => {
                let searched = matches!(e, MemoryError::NotFound(_));
                self.report(&e)?;
                if searched {
                    self.show()?;
                }
                Ok(false)
            }
        }
    }

    fn show(&mut self) -> Result<()> {
        write!(self.output, "{}", self.model.render())?;
        Ok(())
    }

    /// Print a model error with its diagnostic help
    fn report(&mut self, error: &MemoryError) -> Result<()> {
        warn!("Command failed: {}", error);
        writeln!(self.output, "Error: {}", error)?;
        if let Some(help) = error.help() {
            writeln!(self.output, "  help: {}", help)?;
        }
        if let MemoryError::InsufficientSpace { total_free, .. } = error {
            if error.compaction_would_help() {
                writeln!(
                    self.output,
                    "  help: {} units are free in total; try compacting memory.",
                    total_free
                )?;
            }
        }
        Ok(())
    }

    /// Use the inline argument, or prompt for a process name
    ///
    /// Only the first word of a prompted line is used.
    fn argument(&mut self, inline: Option<String>, prompt: &str) -> Result<Option<String>> {
        if inline.is_some() {
            return Ok(inline);
        }
        let Some(line) = self.prompt(prompt)? else {
            return Ok(None);
        };
        match line.split_whitespace().next() {
            Some(name) => Ok(Some(name.to_string())),
            None => {
                writeln!(self.output, "Process name cannot be empty.")?;
                Ok(None)
            }
        }
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        read_line(&mut self.input)
    }
}
