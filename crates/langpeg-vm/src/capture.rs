//! The capture arena: an append-only tree of matched nodes, truncated to a
//! saved watermark on backtrack. A log with O(1) `len()`/`truncate()`
//! gives backtracking a cheap undo; nodes are linked parent/sibling so the
//! tree is navigable (`child_head`, `next_sibling`), not just replayable.

use langpeg_core::{Span, Symbol};

/// Node id into a `CaptureArena`.
pub type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// Raw-text capture: a byte-range view into the input, no children.
    String,
    /// An ordered list of children with no name of its own.
    Sequence,
    /// A named wrapper around one child.
    Node,
    /// A named failure marker from `Throw`, optionally wrapping a
    /// recovered subtree.
    Error,
}

#[derive(Clone, Debug)]
pub struct CapturedNode {
    pub node_type: NodeType,
    pub name: Option<Symbol>,
    pub span: Span,
    pub child_head: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

/// Arena of captured nodes, grown monotonically during a match and
/// truncated to a saved depth on backtrack.
#[derive(Debug, Default)]
pub struct CaptureArena {
    nodes: Vec<CapturedNode>,
}

impl CaptureArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a finished node (children already appended, linked via
    /// `child_head`/`next_sibling` by the caller), returning its id.
    pub fn push(&mut self, node: CapturedNode) -> NodeId {
        let id = self.nodes.len() as u32;
        self.nodes.push(node);
        id
    }

    /// Discard every node past `depth`. Backtracking to a checkpoint
    /// whose `cap_depth` was recorded before those nodes existed erases
    /// them from the tree entirely.
    pub fn truncate(&mut self, depth: u32) {
        self.nodes.truncate(depth as usize);
    }

    pub fn get(&self, id: NodeId) -> Option<&CapturedNode> {
        self.nodes.get(id as usize)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let head = self.nodes.get(id as usize).and_then(|n| n.child_head);
        std::iter::successors(head, move |&id| self.nodes[id as usize].next_sibling)
    }
}

/// An in-progress capture, pushed by `CaptureBegin` and popped by the
/// matching `CaptureEnd`.
#[derive(Clone, Copy, Debug)]
pub struct OpenCapture {
    pub node_type: NodeType,
    pub name: Option<Symbol>,
    pub start_cursor: u32,
    /// Arena length when this capture opened, so `CaptureEnd` knows which
    /// already-finished nodes are this capture's direct children.
    pub arena_mark: u32,
}

/// Stack of in-progress captures. Truncated to a checkpoint's `cap_depth`
/// on backtrack, discarding captures opened (but not yet closed) inside
/// the abandoned alternative.
#[derive(Debug, Default)]
pub struct OpenCaptureStack(Vec<OpenCapture>);

impl OpenCaptureStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, open: OpenCapture) {
        self.0.push(open);
    }

    pub fn pop(&mut self) -> Option<OpenCapture> {
        self.0.pop()
    }

    pub fn len(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn truncate(&mut self, depth: u32) {
        self.0.truncate(depth as usize);
    }
}

/// Links a contiguous run of sibling node ids (the order they were pushed
/// in, which is always their source order since the arena only grows) so
/// a later `Sequence`/`Node`/`Error` node can reference them as children.
pub fn link_siblings(ids: &[NodeId], arena: &mut CaptureArena) -> Option<NodeId> {
    for window in ids.windows(2) {
        let (a, b) = (window[0], window[1]);
        arena.nodes[a as usize].next_sibling = Some(b);
    }
    ids.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(arena: &mut CaptureArena, span: Span) -> NodeId {
        arena.push(CapturedNode {
            node_type: NodeType::String,
            name: None,
            span,
            child_head: None,
            next_sibling: None,
        })
    }

    #[test]
    fn truncate_discards_nodes_past_watermark() {
        let mut arena = CaptureArena::new();
        leaf(&mut arena, Span::new(0, 1));
        let mark = arena.len();
        leaf(&mut arena, Span::new(1, 2));
        assert_eq!(arena.len(), 2);
        arena.truncate(mark);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn link_siblings_chains_in_push_order() {
        let mut arena = CaptureArena::new();
        let a = leaf(&mut arena, Span::new(0, 1));
        let b = leaf(&mut arena, Span::new(1, 2));
        let c = leaf(&mut arena, Span::new(2, 3));
        let head = link_siblings(&[a, b, c], &mut arena);
        assert_eq!(head, Some(a));

        let wrapper = arena.push(CapturedNode {
            node_type: NodeType::Sequence,
            name: None,
            span: Span::new(0, 3),
            child_head: head,
            next_sibling: None,
        });

        let children: Vec<_> = arena.children(wrapper).collect();
        assert_eq!(children, vec![a, b, c]);
    }

    #[test]
    fn children_of_leaf_is_empty() {
        let mut arena = CaptureArena::new();
        let a = leaf(&mut arena, Span::new(0, 1));
        assert_eq!(arena.children(a).count(), 0);
    }
}
