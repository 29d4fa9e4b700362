//! Structural verification for `arbor-rbtree`
//!
//! This crate holds the reference checker the integration tests use to
//! validate a tree after arbitrary operation sequences. It walks the whole
//! structure through the public read surface and panics on the first
//! violated invariant, naming it.

use arbor_rbtree::{NodeId, RbTree, NIL};

/// Assert every structural invariant of `tree`:
///
/// 1. the sentinel and the root are black
/// 2. no red node has a red child
/// 3. every path from a node to a descendant sentinel crosses the same
///    number of black nodes
/// 4. BST order with right-leaning ties: left subtree strictly below the
///    key, right subtree at or above it
/// 5. parent back-references agree with child links, and the node count
///    matches `tree.len()`
pub fn assert_red_black(tree: &RbTree) {
    assert!(tree.color(NIL).is_black(), "sentinel must be black");

    let root = tree.root();
    if root == NIL {
        assert_eq!(tree.len(), 0, "empty root with nonzero len");
        return;
    }

    assert!(tree.color(root).is_black(), "root must be black");
    let (_, count) = check_subtree(tree, root, i64::MIN, i64::MAX);
    assert_eq!(count, tree.len(), "node count disagrees with len()");
}

/// Recursive walk returning (black-height, node count) of the subtree at
/// `n`, asserting its keys lie in the half-open window `[lower, upper)`.
fn check_subtree(tree: &RbTree, n: NodeId, lower: i64, upper: i64) -> (usize, usize) {
    if n == NIL {
        return (0, 0);
    }

    let key = i64::from(tree.key(n));
    assert!(
        lower <= key && key < upper,
        "BST order violated: key {} outside [{}, {})",
        key,
        lower,
        upper
    );

    let left = tree.left(n);
    let right = tree.right(n);

    if tree.color(n).is_red() {
        assert!(
            tree.color(left).is_black() && tree.color(right).is_black(),
            "red node {:?} has a red child",
            n
        );
    }

    if left != NIL {
        assert_eq!(tree.parent(left), n, "left child lost its back-reference");
    }
    if right != NIL {
        assert_eq!(tree.parent(right), n, "right child lost its back-reference");
    }

    // Duplicates go right, so the left window is strict and the right
    // window is inclusive at the key.
    let (left_height, left_count) = check_subtree(tree, left, lower, key);
    let (right_height, right_count) = check_subtree(tree, right, key, upper);

    assert_eq!(
        left_height, right_height,
        "black-height mismatch below {:?}",
        n
    );

    let own = usize::from(tree.color(n).is_black());
    (left_height + own, left_count + right_count + 1)
}

/// Extract every key of `tree` in order, asserting the written count
/// matches `tree.len()`.
pub fn collect(tree: &RbTree) -> Vec<i32> {
    let mut out = vec![0; tree.len()];
    let written = tree.to_array(&mut out);
    assert_eq!(written, tree.len(), "to_array wrote a partial sequence");
    out
}
