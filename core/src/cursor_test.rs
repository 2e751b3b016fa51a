//! Tests for fail-fast cursors over lists and windows.

use pretty_assertions::assert_eq;

use super::*;
use crate::Sequence;

fn letters() -> ArrayList<char> {
    "abcde".chars().collect()
}

#[test]
fn test_forward_and_backward() {
    let list = letters();
    let mut cursor = list.cursor();
    assert!(!cursor.has_previous());
    assert_eq!(cursor.previous_index(), None);

    assert_eq!(cursor.try_next(), Ok('a'));
    assert_eq!(cursor.try_next(), Ok('b'));
    assert_eq!(cursor.next_index(), 2);
    assert_eq!(cursor.previous_index(), Some(1));

    assert_eq!(cursor.try_previous(), Ok('b'));
    assert_eq!(cursor.try_previous(), Ok('a'));
    assert_eq!(cursor.try_previous(), Err(Error::NoSuchElement));
}

#[test]
fn test_exhaustion() {
    let list = letters();
    let mut cursor = list.cursor_at(5).unwrap();
    assert!(!cursor.has_next());
    assert_eq!(cursor.try_next(), Err(Error::NoSuchElement));
    assert!(matches!(
        list.cursor_at(6),
        Err(Error::IndexOutOfBounds { index: 6, len: 5 })
    ));
}

#[test]
fn test_iterator_collects() {
    let list = letters();
    let collected: Result<String> = list.cursor().collect();
    assert_eq!(collected.unwrap(), "abcde");
}

#[test]
fn test_direct_mutation_fails_next() {
    let list = letters();
    let mut cursor = list.cursor();
    cursor.try_next().unwrap();
    list.push('f').unwrap();
    assert_eq!(cursor.try_next(), Err(Error::ConcurrentModification));
}

#[test]
fn test_direct_mutation_fails_remove() {
    let list = letters();
    let mut cursor = list.cursor();
    cursor.try_next().unwrap();
    list.remove(4).unwrap();
    assert_eq!(cursor.remove(), Err(Error::ConcurrentModification));
}

#[test]
fn test_set_is_not_structural() {
    let list = letters();
    let mut cursor = list.cursor();
    cursor.try_next().unwrap();
    list.set(3, 'x').unwrap();
    assert_eq!(cursor.try_next(), Ok('b'));
}

#[test]
fn test_iterator_fuses_after_fault() {
    let list = letters();
    let mut cursor = list.cursor();
    assert_eq!(cursor.next(), Some(Ok('a')));
    list.insert(0, 'z').unwrap();
    assert_eq!(cursor.next(), Some(Err(Error::ConcurrentModification)));
    assert_eq!(cursor.next(), None);
}

#[test]
fn test_remove_requires_current_element() {
    let list = letters();
    let mut cursor = list.cursor();
    assert_eq!(cursor.remove(), Err(Error::NoCurrentElement));

    cursor.try_next().unwrap();
    assert_eq!(cursor.remove(), Ok('a'));
    assert_eq!(cursor.remove(), Err(Error::NoCurrentElement));
    assert_eq!(cursor.set('q'), Err(Error::NoCurrentElement));
}

#[test]
fn test_remove_rewinds() {
    let list = letters();
    let mut cursor = list.cursor();
    cursor.try_next().unwrap();
    cursor.try_next().unwrap();
    assert_eq!(cursor.remove(), Ok('b'));
    assert_eq!(cursor.next_index(), 1);
    assert_eq!(cursor.try_next(), Ok('c'));

    // Removing after moving backward removes the element just passed
    assert_eq!(cursor.try_previous(), Ok('c'));
    assert_eq!(cursor.remove(), Ok('c'));
    assert_eq!(cursor.try_next(), Ok('d'));
    assert_eq!(list.to_vec().unwrap(), vec!['a', 'd', 'e']);
}

#[test]
fn test_set_and_add() {
    let list = letters();
    let mut cursor = list.cursor();
    cursor.try_next().unwrap();
    assert_eq!(cursor.set('A'), Ok('a'));

    cursor.add('+').unwrap();
    assert_eq!(cursor.set('?'), Err(Error::NoCurrentElement));
    assert_eq!(cursor.try_next(), Ok('b'));
    assert_eq!(cursor.try_previous(), Ok('b'));
    assert_eq!(cursor.try_previous(), Ok('+'));
    assert_eq!(list.to_vec().unwrap(), vec!['A', '+', 'b', 'c', 'd', 'e']);
}

#[test]
fn test_add_at_end_appends() {
    let list = letters();
    let mut cursor = list.cursor_at(5).unwrap();
    cursor.add('f').unwrap();
    cursor.add('g').unwrap();
    assert!(!cursor.has_next());
    assert_eq!(list.to_vec().unwrap(), vec!['a', 'b', 'c', 'd', 'e', 'f', 'g']);
}

#[test]
fn test_for_each_remaining() {
    let list = letters();
    let mut cursor = list.cursor();
    cursor.try_next().unwrap();

    let mut rest = String::new();
    cursor.for_each_remaining(|c| rest.push(*c)).unwrap();
    assert_eq!(rest, "bcde");
    assert!(!cursor.has_next());
    // The last visited element is current
    assert_eq!(cursor.remove(), Ok('e'));
}

#[test]
fn test_for_each_remaining_detects_interference() {
    let list = letters();
    let mut cursor = list.cursor();
    let mut seen = 0;
    let result = cursor.for_each_remaining(|_| {
        seen += 1;
        // Fails: the traversal holds the buffer
        let _ = list.push('!');
    });
    assert_eq!(result, Err(Error::ConcurrentModification));
    assert_eq!(seen, 1);
    assert_eq!(list.len(), 5);
}

// ============================================================================
// Cursors over windows
// ============================================================================

#[test]
fn test_window_cursor_removes_through_window() {
    let list: ArrayList<i32> = (0..10).collect();
    let window = list.sub_list(2, 7).unwrap();
    let mut cursor = window.cursor();
    while cursor.has_next() {
        if cursor.try_next().unwrap() % 2 == 1 {
            cursor.remove().unwrap();
        }
    }
    assert_eq!(window.to_vec().unwrap(), vec![2, 4, 6]);
    assert_eq!(list.to_vec().unwrap(), vec![0, 1, 2, 4, 6, 7, 8, 9]);
}

#[test]
fn test_window_cursor_tolerates_root_append() {
    let list: ArrayList<i32> = (0..10).collect();
    let window = list.sub_list(2, 5).unwrap();
    let mut cursor = window.cursor();
    cursor.try_next().unwrap();
    list.push(10).unwrap();
    assert_eq!(cursor.try_next(), Ok(3));
}

#[test]
fn test_window_cursor_fails_after_root_shift() {
    let list: ArrayList<i32> = (0..10).collect();
    let window = list.sub_list(2, 5).unwrap();
    let mut cursor = window.cursor();
    list.remove(0).unwrap();
    assert_eq!(cursor.try_next(), Err(Error::ConcurrentModification));
}

#[test]
fn test_window_cursor_add_grows_window() {
    let list: ArrayList<i32> = (0..5).collect();
    let window = list.sub_list(1, 3).unwrap();
    let mut cursor = window.cursor_at(2).unwrap();
    cursor.add(99).unwrap();
    assert_eq!(window.to_vec().unwrap(), vec![1, 2, 99]);
    assert_eq!(list.to_vec().unwrap(), vec![0, 1, 2, 99, 3, 4]);
}
