//! Markup output.
//!
//! Walks the tree with an explicit stack so deep documents cannot exhaust the
//! call stack. Attributes are written in key order so output is stable.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::{Document, DomTree, NodeId, NodeKind};

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Write `id` and everything under it as markup.
///
/// Every element gets an end tag, void ones included.
///
/// # Errors
///
/// Propagates any error from `out`.
pub fn write_node<W: Write + ?Sized>(tree: &DomTree, id: NodeId, out: &mut W) -> io::Result<()> {
    let mut stack = vec![Step::Open(id)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => {
                let Some(node) = tree.get(id) else {
                    continue;
                };
                write!(out, "<{}", node.tag_name)?;
                let mut keys: Vec<_> = node.attrs.keys().collect();
                keys.sort();
                for key in keys {
                    let value = node.attrs.get(key).map_or("", String::as_str);
                    write!(out, " {key}=\"{}\"", escape_attribute(value))?;
                }
                out.write_all(b">")?;

                if node.kind == NodeKind::RawText {
                    out.write_all(node.content.as_bytes())?;
                } else {
                    out.write_all(escape_text(&node.content).as_bytes())?;
                }

                stack.push(Step::Close(id));
                stack.extend(node.children().iter().rev().map(|&child| Step::Open(child)));
            }
            Step::Close(id) => {
                write!(out, "</{}>", tree.tag_name(id))?;
            }
        }
    }

    Ok(())
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Document {
    /// Serialize the whole document. Writes nothing if there is no root.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match self.root() {
            Some(root) => write_node(self.tree(), root, out),
            None => Ok(()),
        }
    }

    /// The document as a markup string.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serialize the document into a file, replacing it if it exists.
    ///
    /// # Errors
    ///
    /// Returns any error from creating or writing the file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }
}
