//! The parse tree returned to callers: a read-only view over a
//! `CaptureArena` plus the input it was matched against.

use std::fmt::Write as _;

use langpeg_core::{Interner, LineIndex, LocatedSpan, Span, Symbol};

use crate::capture::{CaptureArena, NodeId, NodeType};

/// Owns the capture arena and input for a successful (or partially
/// recovered) match; outlives the `Vm` that produced it.
pub struct Tree {
    arena: CaptureArena,
    input: Vec<u8>,
    root: Option<NodeId>,
}

impl Tree {
    pub(crate) fn from_parts(arena: CaptureArena, input: Vec<u8>, root: Option<NodeId>) -> Self {
        Self { arena, input, root }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.arena.get(id).expect("valid NodeId").node_type
    }

    pub fn name(&self, id: NodeId) -> Option<Symbol> {
        self.arena.get(id).expect("valid NodeId").name
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.arena.get(id).expect("valid NodeId").span
    }

    /// The located span (line/column/UTF-16), computed from a fresh
    /// forward scan. Callers walking the tree in source order should
    /// reuse one `LineIndex` across calls rather than calling this
    /// repeatedly; it is provided as a convenience for one-off lookups.
    pub fn located_span(&self, id: NodeId, source: &str) -> LocatedSpan {
        LineIndex::new(source).locate_span(self.span(id))
    }

    /// Raw-text view into the input for a `String`-typed node.
    pub fn text(&self, id: NodeId) -> &[u8] {
        let span = self.span(id);
        &self.input[span.start as usize..span.end as usize]
    }

    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).expect("valid NodeId").child_head
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.arena.children(id)
    }

    /// Debug-printable tree dump, resolving names through `strings`.
    pub fn pretty(&self, strings: &Interner) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.pretty_node(root, strings, 0, &mut out);
        }
        out
    }

    fn pretty_node(&self, id: NodeId, strings: &Interner, depth: usize, out: &mut String) {
        let node = self.arena.get(id).expect("valid NodeId");
        let indent = "  ".repeat(depth);
        let name = node
            .name
            .map(|s| strings.resolve(s))
            .unwrap_or("<anon>");
        let _ = writeln!(
            out,
            "{indent}{:?}({name}) [{}..{}]",
            node.node_type, node.span.start, node.span.end
        );
        for child in self.arena.children(id) {
            self.pretty_node(child, strings, depth + 1, out);
        }
    }
}
