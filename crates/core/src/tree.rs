//! The call tree: nodes and the arena that owns them.
//!
//! Nodes live in a flat `Vec` and reference each other through stable
//! [`NodeId`] indices; the root sits at index 0 and is never removed.
//! A node's identity is (name token, parent): the same region name under
//! two different parents is two different nodes with independent
//! statistics.

use std::time::Duration;

use crate::intern::RegionId;

/// Stable index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One named region at one position in the call tree.
///
/// `recursion` counts nested re-entrant calls to this node that have not
/// yet returned. Only the transition 0→1 records a start timestamp and
/// only the transition 1→0 commits statistics, so recursive calls never
/// double-count time or calls.
#[derive(Debug)]
pub(crate) struct ProfileNode {
    pub(crate) name: RegionId,
    pub(crate) parent: Option<NodeId>,
    /// Children in first-discovery order.
    pub(crate) children: Vec<NodeId>,
    pub(crate) total_calls: u64,
    pub(crate) total_time: Duration,
    open_start: Option<Duration>,
    recursion: u32,
}

impl ProfileNode {
    fn new(name: RegionId, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            total_calls: 0,
            total_time: Duration::ZERO,
            open_start: None,
            recursion: 0,
        }
    }

    /// Opens a call on this node. Only the outermost call records a start
    /// timestamp; re-entrant calls just deepen the recursion count.
    pub(crate) fn begin_call(&mut self, now: Duration) {
        if self.recursion == 0 {
            self.open_start = Some(now);
        }
        self.recursion += 1;
    }

    /// Closes a call. Returns true when this closed the outermost
    /// invocation, at which point the elapsed span and the call count
    /// commit. Calling with no call open is an instrumentation bug:
    /// debug builds assert, release builds warn and ignore it.
    pub(crate) fn end_call(&mut self, now: Duration) -> bool {
        debug_assert!(self.recursion > 0, "end_call without a matching begin_call");
        if self.recursion == 0 {
            log::warn!("profiler: end_call without a matching begin_call; ignoring");
            return false;
        }
        self.recursion -= 1;
        if self.recursion > 0 {
            return false;
        }
        if let Some(start) = self.open_start.take() {
            self.total_time += now.saturating_sub(start);
            self.total_calls += 1;
        }
        true
    }

    pub(crate) fn is_open(&self) -> bool {
        self.recursion > 0
    }
}

/// Arena-backed call tree.
#[derive(Debug)]
pub(crate) struct ProfileTree {
    nodes: Vec<ProfileNode>,
}

impl ProfileTree {
    pub(crate) fn new(root_name: RegionId) -> Self {
        Self {
            nodes: vec![ProfileNode::new(root_name, None)],
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &ProfileNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ProfileNode {
        &mut self.nodes[id.index()]
    }

    /// First child of `parent` named `name`, scanning in discovery order.
    /// Linear in the number of distinct children; fan-out is small in
    /// practice.
    pub(crate) fn find_child(&self, parent: NodeId, name: RegionId) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    /// Existing child of `parent` named `name`, or a freshly appended one.
    /// Node construction happens here and nowhere else.
    pub(crate) fn ensure_child(&mut self, parent: NodeId, name: RegionId) -> NodeId {
        if let Some(found) = self.find_child(parent, name) {
            return found;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ProfileNode::new(name, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Zeroes accumulated statistics for every node without touching
    /// structure or identities. Nodes with an open call keep their
    /// recursion depth (the begin/end protocol stays balanced) and have
    /// the open span re-based to `now`, so nothing committed after a
    /// reset can predate it.
    pub(crate) fn reset_statistics(&mut self, now: Duration) {
        for node in &mut self.nodes {
            node.total_calls = 0;
            node.total_time = Duration::ZERO;
            node.open_start = node.is_open().then_some(now);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameTable;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn ensure_child_reuses_existing() {
        let mut names = NameTable::new();
        let root = names.intern("root");
        let physics = names.intern("physics");
        let mut tree = ProfileTree::new(root);

        let a = tree.ensure_child(NodeId::ROOT, physics);
        let b = tree.ensure_child(NodeId::ROOT, physics);
        assert_eq!(a, b);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn children_keep_discovery_order() {
        let mut names = NameTable::new();
        let root = names.intern("root");
        let mut tree = ProfileTree::new(root);

        let b = tree.ensure_child(NodeId::ROOT, names.intern("b"));
        let a = tree.ensure_child(NodeId::ROOT, names.intern("a"));
        let c = tree.ensure_child(NodeId::ROOT, names.intern("c"));
        assert_eq!(tree.node(NodeId::ROOT).children, vec![b, a, c]);
    }

    #[test]
    fn outermost_return_commits_elapsed() {
        let mut names = NameTable::new();
        let mut tree = ProfileTree::new(names.intern("root"));
        let node = tree.ensure_child(NodeId::ROOT, names.intern("work"));

        tree.node_mut(node).begin_call(ms(10));
        let closed = tree.node_mut(node).end_call(ms(14));
        assert!(closed);
        assert_eq!(tree.node(node).total_calls, 1);
        assert_eq!(tree.node(node).total_time, ms(4));
    }

    #[test]
    fn recursion_commits_once_with_full_span() {
        let mut names = NameTable::new();
        let mut tree = ProfileTree::new(names.intern("root"));
        let node = tree.ensure_child(NodeId::ROOT, names.intern("recurse"));

        tree.node_mut(node).begin_call(ms(0));
        tree.node_mut(node).begin_call(ms(1));
        assert!(!tree.node_mut(node).end_call(ms(3)));
        assert_eq!(tree.node(node).total_calls, 0);
        assert!(tree.node_mut(node).end_call(ms(6)));
        assert_eq!(tree.node(node).total_calls, 1);
        assert_eq!(tree.node(node).total_time, ms(6));
    }

    #[test]
    fn reset_rebases_open_calls() {
        let mut names = NameTable::new();
        let mut tree = ProfileTree::new(names.intern("root"));
        let node = tree.ensure_child(NodeId::ROOT, names.intern("long"));

        tree.node_mut(node).begin_call(ms(0));
        tree.reset_statistics(ms(10));
        assert!(tree.node(node).is_open());
        assert!(tree.node_mut(node).end_call(ms(12)));
        // Only the post-reset portion of the span is committed.
        assert_eq!(tree.node(node).total_time, ms(2));
        assert_eq!(tree.node(node).total_calls, 1);
    }

    #[test]
    fn reset_preserves_structure() {
        let mut names = NameTable::new();
        let mut tree = ProfileTree::new(names.intern("root"));
        let work = names.intern("work");
        let node = tree.ensure_child(NodeId::ROOT, work);
        tree.node_mut(node).begin_call(ms(0));
        tree.node_mut(node).end_call(ms(5));

        tree.reset_statistics(ms(5));
        assert_eq!(tree.node(node).total_calls, 0);
        assert_eq!(tree.node(node).total_time, Duration::ZERO);
        // Same node is found again, no duplicate is created.
        assert_eq!(tree.ensure_child(NodeId::ROOT, work), node);
        assert_eq!(tree.len(), 2);
    }
}
