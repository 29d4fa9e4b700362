//! Arena record layout tests
//!
//! The node record is `#[repr(C)]` and handle-addressed; these tests pin
//! its layout so a slot stays five words wide and accidental field
//! reordering or padding growth is caught immediately.

use arbor_rbtree::{Color, Node, NodeId};
use memoffset::offset_of;
use static_assertions::*;

// Expected layout:
//
// struct Node {
//     color: Color,          // offset 0, 1 byte + 3 padding
//     key: i32,              // offset 4
//     parent: NodeId,        // offset 8
//     children: [NodeId; 2], // offset 12
// };
//
// - Size: 20 bytes
// - Alignment: 4 bytes

#[test]
fn test_node_size() {
    assert_eq!(
        core::mem::size_of::<Node>(),
        20,
        "Node must stay five 32-bit words"
    );
}

#[test]
fn test_node_alignment() {
    assert_eq!(core::mem::align_of::<Node>(), 4);
}

#[test]
fn test_node_field_offsets() {
    assert_eq!(offset_of!(Node, color), 0, "color must be at offset 0");
    assert_eq!(offset_of!(Node, key), 4, "key must be at offset 4");
    assert_eq!(offset_of!(Node, parent), 8, "parent must be at offset 8");
    assert_eq!(
        offset_of!(Node, children),
        12,
        "children must be at offset 12"
    );
}

#[test]
fn test_node_id_is_one_word() {
    assert_eq!(core::mem::size_of::<NodeId>(), 4);
    assert_eq!(core::mem::align_of::<NodeId>(), 4);
}

#[test]
fn test_color_values() {
    assert_eq!(Color::Red as u8, 0);
    assert_eq!(Color::Black as u8, 1);
    assert_eq!(core::mem::size_of::<Color>(), 1);
}

// Compile-time assertions
assert_eq_size!(Node, [u32; 5]);
assert_eq_align!(Node, u32);
assert_eq_size!(NodeId, u32);
assert_eq_align!(NodeId, u32);
