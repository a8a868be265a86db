/*!
 * Session Tests
 * Scripted menu sessions against a real memory model
 */

use partition_sim::memory::{Block, MemoryModel};
use partition_sim::shell::{Command, Flow, Session};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn run_script(capacity: usize, script: &str) -> (MemoryModel, String) {
    let mut session = Session::new(
        MemoryModel::new(capacity).unwrap(),
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    );
    session.run().unwrap();
    let (model, output) = session.into_parts();
    (model, String::from_utf8(output).unwrap())
}

#[test]
fn test_menu_numbers_drive_end_to_end_scenario() {
    let script = "1\nP1\n20\n1\nP2\n30\n2\nP1\n3\n0\n";
    let (model, out) = run_script(64, script);

    assert_eq!(
        model.blocks(),
        &[Block::owned("P2".into(), 0, 30), Block::free(30, 34)]
    );
    assert!(out.contains("Process 'P1' (20 units) loaded at 0."));
    assert!(out.contains("Process 'P2' (30 units) loaded at 20."));
    assert!(out.contains("Process 'P1' freed (20 units)."));
    assert!(out.contains("Memory compacted (1 block(s) relocated)."));
    assert!(out.ends_with("Exiting simulator...\n"));
}

#[test]
fn test_word_commands_with_inline_arguments() {
    let script = "allocate A 4\nalloc B 4\nfree A\nfrag-external\nfrag-internal\nquit\n";
    let (model, out) = run_script(16, script);

    assert!(model.verify().is_ok());
    assert!(out.contains("Total external fragmentation: 12 units (in 2 free block(s))"));
    assert!(out.contains("Internal fragmentation (simulated allocation waste): 0 units"));
    assert!(out.contains("real internal fragmentation is 0 units"));
}

#[test]
fn test_show_renders_memory_map() {
    let (_, out) = run_script(20, "allocate Alpha 4\nshow\nquit\n");

    assert!(out.contains(
        "Memory state (20 units):\n|A|A|A|A|.|.|.|.|.|.|.|.|.|.|.|.|\n|.|.|.|.|\n"
    ));
}

#[test]
fn test_errors_are_reported_and_session_continues() {
    let script = "allocate A 8\nallocate A 2\nallocate Free 2\nfree ghost\nfree Free\nbogus\nallocate B 9\nquit\n";
    let (model, out) = run_script(16, script);

    assert!(out.contains("Error: Process 'A' is already loaded"));
    assert!(out.contains("Error: Process name 'Free' is reserved"));
    assert!(out.contains("  help: Process names must be non-empty and must not be 'Free'."));
    assert!(out.contains("Error: Process 'ghost' not found"));
    assert!(out.contains("Error: Invalid operation: cannot free a 'Free' block"));
    assert!(out.contains("Invalid option: unknown option 'bogus'. Try again."));
    assert!(out.contains("Error: Not enough contiguous free memory for process 'B' (9 units)"));
    assert!(model.contains("A"));
    assert!(!model.contains("B"));
}

#[test]
fn test_compaction_hint_when_space_is_fragmented() {
    let script = "allocate A 4\nallocate B 4\nallocate C 4\nfree A\nallocate D 6\nquit\n";
    let (_, out) = run_script(14, script);

    assert!(out.contains(
        "  help: Free a process to make room, or compact memory to merge free blocks.\n  help: 6 units are free in total; try compacting memory."
    ));
}

#[test]
fn test_insufficient_space_without_fragmentation_still_has_help() {
    let (_, out) = run_script(8, "allocate A 6\nallocate B 4\nquit\n");

    assert!(out.contains("  help: Free a process to make room, or compact memory to merge free blocks."));
    assert!(!out.contains("try compacting memory."));
}

#[test]
fn test_stats_prints_json() {
    let (_, out) = run_script(10, "allocate A 9\nstats\nquit\n");

    assert!(out.contains("\"used_memory\": 9"));
    assert!(out.contains("\"largest_free_block\": 1"));
    assert!(out.contains("\"kind\": \"process\""));
    assert!(out.contains("\"name\": \"A\""));
    assert!(out.contains("\"kind\": \"free\""));
    assert!(out.contains("Memory pressure: HIGH"));
}

#[test]
fn test_end_of_input_quits() {
    let (model, out) = run_script(8, "allocate A 3\n");

    assert!(model.contains("A"));
    assert!(out.ends_with("Exiting simulator...\n"));
}

#[test]
fn test_execute_returns_quit_flow() {
    let mut session = Session::new(
        MemoryModel::new(8).unwrap(),
        Cursor::new(Vec::new()),
        Vec::new(),
    );

    assert_eq!(session.execute(Command::Show).unwrap(), Flow::Continue);
    assert_eq!(session.execute(Command::Quit).unwrap(), Flow::Quit);
}
