use super::*;
use crate::foundation::core::Size;

fn mask(value: u8) -> MaskRaster {
    MaskRaster::filled(Size { width: 2, height: 2 }, value)
}

#[test]
fn fresh_history_is_empty_and_underflow_is_noop() {
    let mut h = HistoryManager::default();
    let mut m = mask(9);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert!(!h.undo(&mut m));
    assert!(!h.redo(&mut m));
    assert!(m.is_uniform(9));
}

#[test]
fn undo_then_redo_restores_before_and_after_states() {
    let mut h = HistoryManager::default();
    let mut m = mask(255);

    h.push_undo(m.snapshot());
    m.fill(10);

    assert!(h.undo(&mut m));
    assert!(m.is_uniform(255));
    assert_eq!((h.undo_len(), h.redo_len()), (0, 1));

    assert!(h.redo(&mut m));
    assert!(m.is_uniform(10));
    assert_eq!((h.undo_len(), h.redo_len()), (1, 0));
}

#[test]
fn depth_is_bounded_and_oldest_entry_is_evicted() {
    let mut h = HistoryManager::default();
    let mut m = mask(0);
    for v in 0..=DEFAULT_HISTORY_DEPTH as u8 {
        m.fill(v);
        h.push_undo(m.snapshot());
    }
    assert_eq!(h.undo_len(), DEFAULT_HISTORY_DEPTH);

    // Unwind everything: the last restored state is value 1, value 0 was evicted.
    while h.undo(&mut m) {}
    assert!(m.is_uniform(1));
    assert_eq!(h.redo_len(), DEFAULT_HISTORY_DEPTH);
}

#[test]
fn new_edit_clears_redo() {
    let mut h = HistoryManager::default();
    let mut m = mask(255);
    h.push_undo(m.snapshot());
    m.fill(1);
    assert!(h.undo(&mut m));
    assert!(h.can_redo());

    h.push_undo(m.snapshot());
    assert!(!h.can_redo());
}

#[test]
fn interleaved_undo_redo_edit_stays_in_sync() {
    let mut h = HistoryManager::default();
    let mut m = mask(0);

    // Edits: 0 -> 1 -> 2 -> 3
    for v in 1..=3u8 {
        h.push_undo(m.snapshot());
        m.fill(v);
    }
    assert!(h.undo(&mut m)); // 2
    assert!(h.undo(&mut m)); // 1
    assert!(h.redo(&mut m)); // 2
    assert!(m.is_uniform(2));

    h.push_undo(m.snapshot());
    m.fill(7); // 2 -> 7, forward history gone
    assert!(!h.redo(&mut m));

    assert!(h.undo(&mut m));
    assert!(m.is_uniform(2));
    assert!(h.undo(&mut m));
    assert!(m.is_uniform(1));
    assert!(h.undo(&mut m));
    assert!(m.is_uniform(0));
    assert!(!h.undo(&mut m));

    for expected in [1u8, 2, 7] {
        assert!(h.redo(&mut m));
        assert!(m.is_uniform(expected));
    }
}

#[test]
fn incompatible_snapshot_is_discarded_without_touching_mask() {
    let mut h = HistoryManager::default();
    h.push_undo(MaskRaster::opaque(Size { width: 5, height: 5 }).snapshot());
    let mut m = mask(3);
    assert!(!h.undo(&mut m));
    assert!(m.is_uniform(3));
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn retained_bytes_counts_both_stacks() {
    let mut h = HistoryManager::new(4);
    let mut m = mask(0);
    h.push_undo(m.snapshot());
    h.push_undo(m.snapshot());
    assert!(h.undo(&mut m));
    assert_eq!(h.retained_bytes(), 8);
    h.clear();
    assert_eq!(h.retained_bytes(), 0);
}
