//! Tests that go through the `seqlist` facade rather than `seqlist-core`.

use pretty_assertions::assert_eq;

use seqlist::{ArrayList, Change, Characteristics, Error, FaultKind, GrowthPolicy, Sequence, Watch};

#[test]
fn test_reexports_cover_a_round_trip() {
    let list: ArrayList<u32> = ArrayList::with_policy(GrowthPolicy::default());
    list.add_all(1..=6).unwrap();

    let window = list.sub_list(1, 4).unwrap();
    window.sort_by(|a, b| b.cmp(a)).unwrap();
    assert_eq!(list.to_vec().unwrap(), vec![1, 4, 3, 2, 5, 6]);

    let mut spliter = window.spliter().unwrap();
    assert!(spliter.characteristics().contains(Characteristics::SIZED));
    let mut seen = Vec::new();
    spliter.for_each_remaining(|x| seen.push(*x)).unwrap();
    assert_eq!(seen, vec![4, 3, 2]);
}

#[test]
fn test_tracker_is_reachable() {
    let list: ArrayList<u32> = ArrayList::new();
    list.push(1).unwrap();
    list.insert(0, 0).unwrap();
    let tracker = list.tracker();
    assert_eq!(tracker.current(Watch::Structure), 2);
    assert_eq!(tracker.current(Watch::Layout), 1);

    let detached = seqlist::ModTracker::new();
    detached.record(Change::Reorder);
    assert_eq!(detached.layout(), 0);
}

#[test]
fn test_errors_are_reexported() {
    let list: ArrayList<u32> = ArrayList::new();
    let error: Error = list.remove(0).unwrap_err();
    assert_eq!(error.kind(), FaultKind::Range);
}
