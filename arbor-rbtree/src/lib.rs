//! Sentinel-based red-black tree over an index arena
//!
//! This crate provides an ordered multiset of `i32` keys backed by a
//! red-black tree. Nodes live in a growable arena and link to each other
//! through `NodeId` handles, so the parent/child back-reference cycles of
//! the classic sentinel design need no raw pointers and no unsafe code.
//!
//! Slot 0 of the arena is the shared "nil" sentinel: a single BLACK node
//! that terminates every leaf edge and stands in for the parent of the
//! root. Because every missing child is the sentinel rather than a null,
//! the fixup state machines can read `parent`/`color` unconditionally.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

use static_assertions::assert_eq_size;

/// Node color
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    Red = 0,
    Black = 1,
}

impl Color {
    /// Check if the color is red
    pub fn is_red(self) -> bool {
        self == Color::Red
    }

    /// Check if the color is black
    pub fn is_black(self) -> bool {
        self == Color::Black
    }
}

/// Which child slot of a parent a node occupies
///
/// Every rotation and both fixup state machines are mirror images of
/// themselves; parameterizing on `Side` keeps each of them a single
/// routine instead of two hand-duplicated branches.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    /// The mirror side
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Handle addressing a node slot in the tree's arena
///
/// Handles returned by [`RbTree::insert`], [`RbTree::find`], [`RbTree::min`]
/// and [`RbTree::max`] are borrowed views: they stay valid only until the
/// next mutating call, since [`RbTree::erase`] recycles slots.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Handle of the sentinel slot
pub const NIL: NodeId = NodeId(0);

/// Red-black tree node record
///
/// Stored by value in the arena. Children are indexed by [`Side`] so the
/// side-parameterized routines can address either child uniformly.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct Node {
    pub color: Color,
    pub key: i32,
    pub parent: NodeId,
    pub children: [NodeId; 2],
}

assert_eq_size!(NodeId, u32);
assert_eq_size!(Node, [u32; 5]);

/// Ordered multiset of `i32` keys
///
/// Duplicates are permitted and attach as right descendants, so equal keys
/// accumulate in right-leaning order. All structural invariants of a
/// red-black tree hold after every public operation returns:
///
/// 1. every node is red or black; the sentinel is black
/// 2. the root is black
/// 3. a red node has no red child
/// 4. every root-to-sentinel path crosses the same number of black nodes
/// 5. BST order: left subtree `<` key, right subtree `>=` key
#[derive(Debug, Clone)]
pub struct RbTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    len: usize,
}

impl RbTree {
    /// Create an empty tree; allocates the sentinel slot
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(1);
        nodes.push(Node {
            color: Color::Black,
            key: 0,
            parent: NIL,
            children: [NIL, NIL],
        });
        Self {
            nodes,
            free: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    /// Number of keys currently stored, duplicates counted with multiplicity
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the root node, `NIL` when the tree is empty
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Key stored at `n`
    ///
    /// `n` must be a real node; the sentinel holds no meaningful key.
    pub fn key(&self, n: NodeId) -> i32 {
        debug_assert!(n != NIL, "sentinel holds no key");
        self.node(n).key
    }

    /// Color of `n`; the sentinel always reads black
    pub fn color(&self, n: NodeId) -> Color {
        self.node(n).color
    }

    /// Parent handle of `n`, `NIL` for the root
    pub fn parent(&self, n: NodeId) -> NodeId {
        self.node(n).parent
    }

    /// Child of `n` on the given side, `NIL` when missing
    pub fn child(&self, n: NodeId, side: Side) -> NodeId {
        self.node(n).children[side.index()]
    }

    /// Left child of `n`
    pub fn left(&self, n: NodeId) -> NodeId {
        self.child(n, Side::Left)
    }

    /// Right child of `n`
    pub fn right(&self, n: NodeId) -> NodeId {
        self.child(n, Side::Right)
    }

    /// Insert `key`, returning the handle of the new node
    ///
    /// Always succeeds: equal keys are kept, routed to the right subtree.
    pub fn insert(&mut self, key: i32) -> NodeId {
        // Acquire the slot before touching any link so that an aborted
        // arena growth leaves the tree unmodified.
        let z = self.acquire(key);

        let mut y = NIL;
        let mut x = self.root;
        while x != NIL {
            y = x;
            x = match key.cmp(&self.key(x)) {
                Ordering::Less => self.left(x),
                _ => self.right(x),
            };
        }

        self.node_mut(z).parent = y;
        if y == NIL {
            self.root = z;
        } else if key < self.key(y) {
            self.set_child(y, Side::Left, z);
        } else {
            self.set_child(y, Side::Right, z);
        }

        self.len += 1;
        self.insert_fixup(z);
        z
    }

    /// Look up `key`, returning the first match in top-down descent order
    ///
    /// With duplicates present this is the topmost copy, not necessarily
    /// the one inserted first. Returns `None` when the key is absent.
    pub fn find(&self, key: i32) -> Option<NodeId> {
        let mut x = self.root;
        while x != NIL {
            match key.cmp(&self.key(x)) {
                Ordering::Less => x = self.left(x),
                Ordering::Greater => x = self.right(x),
                Ordering::Equal => return Some(x),
            }
        }
        None
    }

    /// Node holding the smallest key, `None` on an empty tree
    pub fn min(&self) -> Option<NodeId> {
        self.extreme(Side::Left)
    }

    /// Node holding the largest key, `None` on an empty tree
    pub fn max(&self) -> Option<NodeId> {
        self.extreme(Side::Right)
    }

    /// Remove the node `z` and recycle its slot
    ///
    /// `z` must be a node currently in this tree. Passing a handle that was
    /// already erased, or one from another tree, is a logic error that can
    /// corrupt the structure; debug builds assert against the common cases.
    ///
    /// When `z` has two real children its in-order successor is spliced
    /// into `z`'s position and inherits `z`'s color; the successor's own
    /// original color is what the fixup then reconciles.
    pub fn erase(&mut self, z: NodeId) {
        debug_assert!(z != NIL, "cannot erase the sentinel");
        debug_assert!((z.0 as usize) < self.nodes.len(), "handle out of range");
        debug_assert!(!self.free.contains(&z), "handle already erased");

        let mut y = z;
        let mut removed_color = self.color(y);
        let x;

        if self.left(z) == NIL {
            x = self.right(z);
            self.transplant(z, x);
        } else if self.right(z) == NIL {
            x = self.left(z);
            self.transplant(z, x);
        } else {
            y = self.subtree_extreme(self.right(z), Side::Left);
            removed_color = self.color(y);
            x = self.right(y);
            if self.parent(y) == z {
                // x may be the sentinel; give it a parent here since no
                // transplant will do it for us.
                self.node_mut(x).parent = y;
            } else {
                self.transplant(y, x);
                let zr = self.right(z);
                self.set_child(y, Side::Right, zr);
                self.node_mut(zr).parent = y;
            }
            self.transplant(z, y);
            let zl = self.left(z);
            self.set_child(y, Side::Left, zl);
            self.node_mut(zl).parent = y;
            let color = self.color(z);
            self.set_color(y, color);
        }

        self.release(z);
        self.len -= 1;

        if removed_color.is_black() {
            self.erase_fixup(x);
        }
    }

    /// Fill `out` with the keys in ascending order, duplicates adjacent
    ///
    /// Stops once `out` is full; returns the number of keys written, which
    /// is `min(self.len(), out.len())`.
    pub fn to_array(&self, out: &mut [i32]) -> usize {
        if self.root == NIL {
            return 0;
        }
        let mut written = 0;
        let mut x = self.subtree_extreme(self.root, Side::Left);
        while x != NIL && written < out.len() {
            out[written] = self.key(x);
            written += 1;
            x = self.successor(x);
        }
        written
    }

    fn node(&self, n: NodeId) -> &Node {
        &self.nodes[n.0 as usize]
    }

    fn node_mut(&mut self, n: NodeId) -> &mut Node {
        &mut self.nodes[n.0 as usize]
    }

    fn set_child(&mut self, n: NodeId, side: Side, child: NodeId) {
        self.node_mut(n).children[side.index()] = child;
    }

    fn set_color(&mut self, n: NodeId, color: Color) {
        self.node_mut(n).color = color;
    }

    /// Which child slot of its parent `n` occupies
    ///
    /// `n`'s parent must be real. Works even when `n` is the sentinel
    /// standing in for a vacated slot, because the parent's child link
    /// then holds `NIL` itself.
    fn side_of(&self, n: NodeId) -> Side {
        if self.left(self.parent(n)) == n {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Pop a recycled slot or grow the arena; the new node is born red
    fn acquire(&mut self, key: i32) -> NodeId {
        let node = Node {
            color: Color::Red,
            key,
            parent: NIL,
            children: [NIL, NIL],
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0 as usize] = node;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    /// Scrub a slot and hand it to the free list
    fn release(&mut self, z: NodeId) {
        let node = self.node_mut(z);
        node.color = Color::Black;
        node.key = 0;
        node.parent = NIL;
        node.children = [NIL, NIL];
        self.free.push(z);
    }

    /// Rotate `x` down toward `side`, promoting its opposite child
    ///
    /// Touches exactly six links, never changes a color, never changes the
    /// in-order key sequence. The promoted child must be real.
    fn rotate(&mut self, x: NodeId, side: Side) {
        let up = side.opposite();
        let y = self.child(x, up);
        debug_assert!(y != NIL, "rotation needs a real child to promote");

        let middle = self.child(y, side);
        self.set_child(x, up, middle);
        if middle != NIL {
            self.node_mut(middle).parent = x;
        }

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        if parent == NIL {
            self.root = y;
        } else {
            let x_side = self.side_of(x);
            self.set_child(parent, x_side, y);
        }

        self.set_child(y, side, x);
        self.node_mut(x).parent = y;
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`
    ///
    /// `v.parent` is updated even when `v` is the sentinel: the erase
    /// fixup navigates from `x.parent` while `x` stands in for a removed
    /// leaf's vacated slot.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.parent(u);
        if parent == NIL {
            self.root = v;
        } else {
            let side = self.side_of(u);
            self.set_child(parent, side, v);
        }
        self.node_mut(v).parent = parent;
    }

    /// Restore the red-black invariants after inserting the red node `z`
    ///
    /// Iterative state machine over the current problem node. The loop
    /// runs only while `z`'s parent is red; when `z` is the root its
    /// parent is the black sentinel, so no separate root check is needed.
    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color(self.parent(z)).is_red() {
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle).is_red() {
                // Case 1: red uncle. Recolor and push the violation two
                // levels up; the only case that iterates.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                z = grandparent;
            } else {
                if z == self.child(parent, side.opposite()) {
                    // Case 2: inner child. Straighten the triangle into a
                    // line and fall through with z at the former parent.
                    z = parent;
                    self.rotate(z, side);
                }
                // Case 3: outer line, terminal.
                let parent = self.parent(z);
                let grandparent = self.parent(parent);
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                self.rotate(grandparent, side.opposite());
            }
        }

        // Case 1 can leave the root red; force invariant 2 back.
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Restore the red-black invariants after unlinking a black node
    ///
    /// `x` is the node, possibly the sentinel, that moved into the vacated
    /// slot and carries the implicit double-black deficiency.
    fn erase_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.color(x).is_black() {
            let parent = self.parent(x);
            let side = if self.left(parent) == x {
                Side::Left
            } else {
                Side::Right
            };
            let mut w = self.child(parent, side.opposite());

            if self.color(w).is_red() {
                // Case 1: red sibling. Rotate it above the parent so the
                // remaining cases see a black sibling.
                self.set_color(w, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                w = self.child(self.parent(x), side.opposite());
            }

            if self.color(self.left(w)).is_black() && self.color(self.right(w)).is_black() {
                // Case 2: both of the sibling's children black. Push the
                // deficiency one level up.
                self.set_color(w, Color::Red);
                x = self.parent(x);
            } else {
                if self.color(self.child(w, side.opposite())).is_black() {
                    // Case 3: red near child, black far child. Fold the
                    // near child over w to reach case 4.
                    let near = self.child(w, side);
                    self.set_color(near, Color::Black);
                    self.set_color(w, Color::Red);
                    self.rotate(w, side.opposite());
                    w = self.child(self.parent(x), side.opposite());
                }
                // Case 4: red far child, terminal.
                let parent = self.parent(x);
                let parent_color = self.color(parent);
                self.set_color(w, parent_color);
                self.set_color(parent, Color::Black);
                let far = self.child(w, side.opposite());
                self.set_color(far, Color::Black);
                self.rotate(parent, side);
                x = self.root;
            }
        }

        self.set_color(x, Color::Black);
    }

    fn extreme(&self, side: Side) -> Option<NodeId> {
        if self.root == NIL {
            None
        } else {
            Some(self.subtree_extreme(self.root, side))
        }
    }

    /// Deepest node in the given direction below `x`; `x` must be real
    fn subtree_extreme(&self, mut x: NodeId, side: Side) -> NodeId {
        loop {
            let next = self.child(x, side);
            if next == NIL {
                return x;
            }
            x = next;
        }
    }

    /// In-order successor of the real node `x`, `NIL` after the maximum
    fn successor(&self, mut x: NodeId) -> NodeId {
        let right = self.right(x);
        if right != NIL {
            return self.subtree_extreme(right, Side::Left);
        }
        let mut parent = self.parent(x);
        while parent != NIL && x == self.right(parent) {
            x = parent;
            parent = self.parent(parent);
        }
        parent
    }
}

impl Default for RbTree {
    fn default() -> Self {
        Self::new()
    }
}
