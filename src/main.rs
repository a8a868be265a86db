/*!
 * Partition Simulator - Main Entry Point
 *
 * Interactive simulator for contiguous memory management:
 * - First-fit process loading
 * - Freeing with neighbour coalescing
 * - Physical compaction
 * - Fragmentation reporting
 */

use anyhow::{Context, Result};
use partition_sim::{init_tracing, shell, Session, SimConfig};
use std::io;
use tracing::info;

fn main() -> Result<()> {
    let config = SimConfig::from_env();
    init_tracing(config.trace_json);

    info!(?config, "Partition simulator starting");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let requested = match config.capacity {
        Some(capacity) => capacity,
        None => shell::read_capacity(&mut input, &mut output, &config)?,
    };
    let requested = i64::try_from(requested).unwrap_or(i64::MAX);
    let model = config
        .build_model(requested)
        .context("Failed to initialize memory model")?;

    let mut session = Session::new(model, input, output);
    session.run()?;

    info!(stats = ?session.model().stats(), "Partition simulator exiting");
    Ok(())
}
