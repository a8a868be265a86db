/*!
 * Allocation Tests
 * First-fit placement, splitting, freeing, and error handling
 */

use partition_sim::memory::{Block, MemoryError, MemoryModel};
use pretty_assertions::assert_eq;

fn spans(model: &MemoryModel) -> Vec<(String, usize, usize)> {
    model
        .blocks()
        .iter()
        .map(|block| (block.owner.to_string(), block.start, block.end()))
        .collect()
}

#[test]
fn test_end_to_end_scenario() {
    let mut model = MemoryModel::new(64).unwrap();

    assert_eq!(model.allocate("P1", 20).unwrap(), 0);
    assert_eq!(model.allocate("P2", 30).unwrap(), 20);
    assert_eq!(
        spans(&model),
        vec![
            ("P1".to_string(), 0, 20),
            ("P2".to_string(), 20, 50),
            ("Free".to_string(), 50, 64),
        ]
    );

    model.free("P1").unwrap();
    assert_eq!(
        spans(&model),
        vec![
            ("Free".to_string(), 0, 20),
            ("P2".to_string(), 20, 50),
            ("Free".to_string(), 50, 64),
        ]
    );

    model.compact();
    assert_eq!(
        spans(&model),
        vec![("P2".to_string(), 0, 30), ("Free".to_string(), 30, 64)]
    );
}

#[test]
fn test_boundary_exact_fit_fills_memory() {
    let mut model = MemoryModel::new(20).unwrap();

    model.allocate("A", 20).unwrap();
    assert_eq!(model.external_fragmentation().free_blocks, 0);

    let err = model.allocate("B", 1).unwrap_err();
    assert_eq!(
        err,
        MemoryError::InsufficientSpace {
            name: "B".into(),
            requested: 1,
            largest_free: 0,
            total_free: 0,
        }
    );
    assert_eq!(model.blocks(), &[Block::owned("A".into(), 0, 20)]);
}

#[test]
fn test_first_fit_prefers_lowest_address() {
    // Free 10 @0, X 10 @10, free 5 @20, Y 5 @25
    let mut model = MemoryModel::new(30).unwrap();
    model.allocate("hole1", 10).unwrap();
    model.allocate("X", 10).unwrap();
    model.allocate("hole2", 5).unwrap();
    model.allocate("Y", 5).unwrap();
    model.free("hole1").unwrap();
    model.free("hole2").unwrap();

    assert_eq!(model.allocate("A", 5).unwrap(), 0);
    assert_eq!(model.find("A").unwrap().start, 0);
    assert_eq!(model.blocks()[1], Block::free(5, 5));
    assert_eq!(model.blocks()[3], Block::free(20, 5));
}

#[test]
fn test_first_fit_skips_blocks_too_small() {
    let mut model = MemoryModel::new(30).unwrap();
    model.allocate("small", 4).unwrap();
    model.allocate("X", 6).unwrap();
    model.free("small").unwrap();

    // The 4-unit hole at 0 cannot hold 8 units
    assert_eq!(model.allocate("B", 8).unwrap(), 10);
}

#[test]
fn test_free_merges_both_neighbours() {
    let mut model = MemoryModel::new(30).unwrap();
    model.allocate("A", 10).unwrap();
    model.allocate("B", 10).unwrap();
    model.allocate("C", 10).unwrap();

    model.free("A").unwrap();
    model.free("C").unwrap();
    assert_eq!(model.blocks().len(), 3);

    model.free("B").unwrap();
    assert_eq!(model.blocks(), &[Block::free(0, 30)]);
}

#[test]
fn test_allocate_then_free_conserves_free_space() {
    let mut model = MemoryModel::new(50).unwrap();
    model.allocate("A", 12).unwrap();
    model.allocate("B", 7).unwrap();
    model.free("A").unwrap();
    let before = model.external_fragmentation().total_free;

    model.allocate("P", 9).unwrap();
    model.free("P").unwrap();

    assert_eq!(model.external_fragmentation().total_free, before);
    assert!(model.verify().is_ok());
}

#[test]
fn test_validation_errors() {
    let mut model = MemoryModel::new(16).unwrap();
    model.allocate("A", 4).unwrap();

    assert_eq!(
        model.allocate("B", 0),
        Err(MemoryError::InvalidSize { requested: 0 })
    );
    assert_eq!(
        model.allocate("Free", 2),
        Err(MemoryError::ReservedName("Free".into()))
    );
    assert_eq!(
        model.allocate("", 3),
        Err(MemoryError::ReservedName("".into()))
    );
    assert_eq!(
        model.allocate("A", 2),
        Err(MemoryError::DuplicateName("A".into()))
    );
    assert!(matches!(
        model.free("Free"),
        Err(MemoryError::InvalidOperation(_))
    ));
    assert_eq!(model.free("ghost"), Err(MemoryError::NotFound("ghost".into())));

    assert_eq!(
        model.blocks(),
        &[Block::owned("A".into(), 0, 4), Block::free(4, 12)]
    );
}

#[test]
fn test_name_can_be_reused_after_free() {
    let mut model = MemoryModel::new(16).unwrap();
    model.allocate("A", 4).unwrap();
    model.free("A").unwrap();

    assert_eq!(model.allocate("A", 8).unwrap(), 0);
    assert_eq!(model.find("A").unwrap().size, 8);
}

#[test]
fn test_insufficient_space_reports_fragmented_totals() {
    let mut model = MemoryModel::new(20).unwrap();
    model.allocate("A", 5).unwrap();
    model.allocate("B", 5).unwrap();
    model.allocate("C", 5).unwrap();
    model.free("A").unwrap();

    let err = model.allocate("D", 8).unwrap_err();
    assert_eq!(
        err,
        MemoryError::InsufficientSpace {
            name: "D".into(),
            requested: 8,
            largest_free: 5,
            total_free: 10,
        }
    );
    assert!(err.compaction_would_help());

    model.compact();
    assert_eq!(model.allocate("D", 8).unwrap(), 10);
}
