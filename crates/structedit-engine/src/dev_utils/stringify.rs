//! Printing a tree in data notation.

use crate::tree::{NodeId, NodeKind, Position, Selection, Tree};

/// Print the children of `node`, marking the ranges of `selection` with `[`
/// and `]`.
///
/// Attributes come out sorted by key and every element gets a closing tag,
/// so equal trees always print equally.
pub fn stringify(tree: &Tree, node: NodeId, selection: Option<&Selection>) -> String {
    let mut out = String::new();
    write_children(tree, node, selection, &mut out);
    out
}

fn write_children(tree: &Tree, element: NodeId, selection: Option<&Selection>, out: &mut String) {
    let mut offset = 0;
    for &child in tree.children(element) {
        write_markers(Position::new(element, offset), selection, out);
        match tree.kind(child) {
            NodeKind::Text(data) => {
                for (i, ch) in data.chars().enumerate() {
                    if i > 0 {
                        write_markers(Position::new(element, offset + i), selection, out);
                    }
                    out.push(ch);
                }
            }
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push_str(&format!(" {key}=\"{value}\""));
                }
                out.push('>');
                write_children(tree, child, selection, out);
                out.push_str(&format!("</{name}>"));
            }
        }
        offset += tree.offset_size(child);
    }
    write_markers(Position::new(element, offset), selection, out);
}

fn write_markers(position: Position, selection: Option<&Selection>, out: &mut String) {
    let Some(selection) = selection else {
        return;
    };
    for range in selection.ranges() {
        if range.end == position && range.start != position {
            out.push(']');
        }
    }
    for range in selection.ranges() {
        if range.start == position {
            out.push('[');
            if range.is_collapsed() {
                out.push(']');
            }
        }
    }
}
