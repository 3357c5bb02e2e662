//! Debug printer for syntax trees.

use crate::ast::Program;
use crate::visitor::NodeRef;
use std::fmt::Write;

/// Renders `program` as an indented tree, one node per line (`label`, then children
/// indented by two spaces).
pub fn dump(program: &Program) -> String {
    let mut out = String::new();
    dump_node(&mut out, NodeRef::Program(program), 0);
    out.truncate(out.trim_end().len());
    out
}

fn dump_node(out: &mut String, node: NodeRef, depth: usize) {
    // writing into a String cannot fail
    let _ = writeln!(out, "{:indent$}{}", "", node.label(), indent = depth * 2);
    for child in node.children() {
        dump_node(out, child, depth + 1);
    }
}
