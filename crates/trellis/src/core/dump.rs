use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use super::tree::Tree;
use crate::{
    NodeId,
    error::{Error, Result},
    node::Node,
};

/// Traverses a subtree and returns an indented, colored outline of each node's
/// id, phase, state and children. This is a debug function.
pub fn dump(tree: &Tree, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, tree, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without color.
pub fn dump_plain(tree: &Tree, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, tree, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Map a buffer write failure.
fn write_failed(e: io::Error) -> Error {
    Error::Render(e.to_string())
}

/// Helper to write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> io::Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")
}

/// Write one node's own lines.
fn write_node(buffer: &mut Buffer, node: &Node, is_root: bool, indent: &str) -> io::Result<()> {
    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.id())?;
    buffer.reset()?;
    if is_root {
        write!(buffer, " (root)")?;
    }
    writeln!(buffer)?;

    write_field(buffer, indent, "phase:", &node.phase().to_string())?;
    let state = serde_json::to_string(node.state()).unwrap_or_default();
    write_field(buffer, indent, "state:", &state)?;
    if !node.bindings().is_empty() {
        write_field(buffer, indent, "bindings:", &node.bindings().events().join(", "))?;
    }
    Ok(())
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, tree: &Tree, node_id: NodeId, level: usize) -> Result<()> {
    let node = tree.node(node_id).ok_or(Error::NodeNotFound(node_id))?;
    let indent = "    ".repeat(level);
    write_node(buffer, node, Some(node_id) == tree.root_id(), &indent).map_err(write_failed)?;
    for child in node.children() {
        dump_node(buffer, tree, *child, level + 1)?;
    }
    Ok(())
}
