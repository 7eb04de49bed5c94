//! Tree serialization - prefix S-expression dump.
//!
//! Every node prints as `( head left right )` across multiple lines with
//! four-space indentation; absent children print as `nil`. Literal heads
//! carry both the symbol index and the quoted text so the loader can rebuild
//! the symbol table; the index itself is informational.

use std::fmt::Write;

use plabc_util::{format_general, VarList};

use crate::kind::NodeKind;
use crate::node::{Arena, NodeId};

const INDENT: &str = "    ";

/// Serializes the tree under `root` into the on-disk text form.
///
/// The result is newline-terminated and round-trips through
/// [`crate::deserialize`] up to symbol renumbering.
///
/// # Example
///
/// ```
/// use plabc_ast::{serialize, Arena, NodeKind};
/// use plabc_util::VarList;
///
/// let mut arena = Arena::new();
/// let root = arena.alloc(NodeKind::Number(2.0));
/// let text = serialize(&arena, &VarList::new(), root);
/// assert_eq!(text, "(\n    2\n    nil\n    nil\n)\n");
/// ```
pub fn serialize(arena: &Arena, symbols: &VarList, root: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, arena, symbols, Some(root), 0);
    out
}

fn write_node(
    out: &mut String,
    arena: &Arena,
    symbols: &VarList,
    node: Option<NodeId>,
    depth: usize,
) {
    let pad = INDENT.repeat(depth);
    let Some(id) = node else {
        let _ = writeln!(out, "{pad}nil");
        return;
    };

    let n = arena.node(id);
    let _ = writeln!(out, "{pad}(");

    let inner = INDENT.repeat(depth + 1);
    match &n.kind {
        NodeKind::Number(value) => {
            let _ = writeln!(out, "{inner}{}", format_general(*value, 6));
        }
        NodeKind::Identifier(sym) => {
            let _ = writeln!(out, "{inner}IDENTIFIER {}", sym.0);
        }
        NodeKind::Literal(sym) => {
            let text = symbols.get(*sym).unwrap_or("");
            let _ = writeln!(out, "{inner}LITERAL {} \"{}\"", sym.0, text);
        }
        NodeKind::Keyword(kw) => {
            let _ = writeln!(out, "{inner}{}", kw.name());
        }
        NodeKind::Operator(op) => {
            let _ = writeln!(out, "{inner}{}", op.name());
        }
        NodeKind::Delimiter(delim) => {
            let _ = writeln!(out, "{inner}{}", delim.name());
        }
    }

    write_node(out, arena, symbols, n.left, depth + 1);
    write_node(out, arena, symbols, n.right, depth + 1);
    let _ = writeln!(out, "{pad})");
}
