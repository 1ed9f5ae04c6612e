//! Point-in-time copies of the statistics tree.
//!
//! A snapshot is a plain serializable value, detached from the session: it
//! can be asserted on in tests, shipped to an overlay, or dumped as JSON.
//! Capturing preserves first-discovery order, so snapshots of the same
//! workload are structurally comparable across runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::intern::SharedStr;
use crate::session::ProfileSession;
use crate::tree::NodeId;

/// Statistics of one region and its subtree at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    /// Display name of the region.
    pub name: SharedStr,
    /// Completed outermost calls since the last reset.
    pub calls: u64,
    /// Wall time accumulated across those calls.
    pub time: Duration,
    /// Child regions in first-discovery order.
    pub children: Vec<RegionSnapshot>,
}

impl RegionSnapshot {
    /// Direct child by name.
    pub fn child(&self, name: &str) -> Option<&RegionSnapshot> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Descendant reached by following a path of names.
    pub fn descendant(&self, path: &[&str]) -> Option<&RegionSnapshot> {
        let mut node = self;
        for name in path {
            node = node.child(name)?;
        }
        Some(node)
    }
}

/// Point-in-time copy of a session's statistics tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Frames counted since the last reset.
    pub frames: u64,
    /// Wall time since the last reset.
    pub elapsed: Duration,
    /// Top-level regions (children of the synthetic root) in
    /// first-discovery order.
    pub roots: Vec<RegionSnapshot>,
}

impl SessionSnapshot {
    pub(crate) fn capture(session: &ProfileSession) -> Self {
        Self {
            frames: session.frames_since_reset(),
            elapsed: session.time_since_reset(),
            roots: capture_children(session, NodeId::ROOT),
        }
    }

    /// Top-level region by name.
    pub fn root(&self, name: &str) -> Option<&RegionSnapshot> {
        self.roots.iter().find(|r| r.name == name)
    }

    /// Region reached by following a path of names from the top level.
    pub fn region(&self, path: &[&str]) -> Option<&RegionSnapshot> {
        let (first, rest) = path.split_first()?;
        self.root(first)?.descendant(rest)
    }
}

fn capture_children(session: &ProfileSession, parent: NodeId) -> Vec<RegionSnapshot> {
    session
        .tree()
        .node(parent)
        .children
        .iter()
        .map(|&child| {
            let node = session.tree().node(child);
            RegionSnapshot {
                name: session.resolve_shared(node.name),
                calls: node.total_calls,
                time: node.total_time,
                children: capture_children(session, child),
            }
        })
        .collect()
}
