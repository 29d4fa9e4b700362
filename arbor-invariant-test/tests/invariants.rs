//! Red-black invariant tests over scripted operation sequences
//!
//! Each scenario drives the tree through a known-awkward shape (sorted
//! runs, mirror runs, duplicate bursts, interleaved erases) and runs the
//! full structural checker after every mutation.

use arbor_invariant_test::{assert_red_black, collect};
use arbor_rbtree::RbTree;

#[test]
fn test_ascending_inserts() {
    let mut tree = RbTree::new();
    for key in 0..100 {
        tree.insert(key);
        assert_red_black(&tree);
    }
    assert_eq!(collect(&tree), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_descending_inserts() {
    let mut tree = RbTree::new();
    for key in (0..100).rev() {
        tree.insert(key);
        assert_red_black(&tree);
    }
    assert_eq!(collect(&tree), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_inside_out_inserts() {
    // Alternates low and high ends so both triangle cases of the insert
    // fixup fire on both sides.
    let mut tree = RbTree::new();
    let mut expected = Vec::new();
    for i in 0..50 {
        tree.insert(i);
        tree.insert(99 - i);
        expected.push(i);
        expected.push(99 - i);
        assert_red_black(&tree);
    }
    expected.sort_unstable();
    assert_eq!(collect(&tree), expected);
}

#[test]
fn test_duplicate_bursts() {
    let mut tree = RbTree::new();
    for _ in 0..5 {
        for key in [3, 1, 3, 2, 3] {
            tree.insert(key);
            assert_red_black(&tree);
        }
    }
    let keys = collect(&tree);
    assert_eq!(keys.len(), 25);
    assert_eq!(keys.iter().filter(|&&k| k == 3).count(), 15);
    // Duplicates must sit adjacent in the in-order sequence.
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_erase_every_other_key() {
    let mut tree = RbTree::new();
    for key in 0..64 {
        tree.insert(key);
    }
    for key in (0..64).step_by(2) {
        let node = tree.find(key).expect("inserted key must be present");
        tree.erase(node);
        assert_red_black(&tree);
    }
    assert_eq!(collect(&tree), (1..64).step_by(2).collect::<Vec<_>>());
}

#[test]
fn test_erase_nodes_with_two_children() {
    // Erasing interior keys of a balanced run exercises the successor
    // splice, including the successor-is-direct-child shortcut.
    let mut tree = RbTree::new();
    for key in [50, 25, 75, 12, 37, 62, 87, 6, 18, 31, 43, 56, 68, 81, 93] {
        tree.insert(key);
    }
    for key in [50, 25, 75, 37, 62] {
        let node = tree.find(key).expect("inserted key must be present");
        tree.erase(node);
        assert_red_black(&tree);
        assert_eq!(tree.find(key), None);
    }
    assert_eq!(tree.len(), 10);
}

#[test]
fn test_erase_max_repeatedly() {
    let mut tree = RbTree::new();
    for key in 0..40 {
        tree.insert(key);
    }
    for expected in (0..40).rev() {
        let max = tree.max().expect("tree is not empty");
        assert_eq!(tree.key(max), expected);
        tree.erase(max);
        assert_red_black(&tree);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.max(), None);
}

#[test]
fn test_reinsert_after_drain() {
    let mut tree = RbTree::new();
    for round in 0..3 {
        for key in 0..20 {
            tree.insert(key * (round + 1));
        }
        assert_red_black(&tree);
        while let Some(min) = tree.min() {
            tree.erase(min);
            assert_red_black(&tree);
        }
        assert!(tree.is_empty());
    }
}

/// Tiny xorshift generator so the long interleaved run is reproducible
/// without pulling a random number crate into the scripted tests.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

#[test]
fn test_ten_thousand_interleaved_ops() {
    let mut tree = RbTree::new();
    let mut reference: Vec<i32> = Vec::new();
    let mut rng = XorShift(0x9e37_79b9);

    for step in 0..10_000 {
        let key = (rng.next() % 512) as i32 - 256;
        let erase = rng.next() % 3 == 0;

        if erase {
            if let Some(node) = tree.find(key) {
                tree.erase(node);
                let idx = reference
                    .binary_search(&key)
                    .expect("reference lost a key the tree still had");
                reference.remove(idx);
            }
        } else {
            tree.insert(key);
            let idx = reference.partition_point(|&v| v < key);
            reference.insert(idx, key);
        }

        // The full checker is O(n); sample it rather than run it every step.
        if step % 256 == 0 {
            assert_red_black(&tree);
            assert_eq!(collect(&tree), reference);
        }
    }

    assert_red_black(&tree);
    assert_eq!(collect(&tree), reference);
}
