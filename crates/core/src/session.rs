//! The profiling session: the single authoritative owner of one call tree.

use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};
use crate::cursor::ProfileCursor;
use crate::guard::SampleGuard;
use crate::intern::{NameTable, RegionId, SharedStr};
use crate::snapshot::SessionSnapshot;
use crate::tree::{NodeId, ProfileTree};

/// Reserved display name of the synthetic root region.
pub(crate) const ROOT_NAME: &str = "root";

/// One profiling session: an interned name table, the call tree, the clock
/// and the begin/end bookkeeping.
///
/// A session is an ordinary value with no hidden global state; create one
/// per thread of interest (or per test) and pass it to instrumentation
/// sites. All mutation goes through `&mut self`, and a [`ProfileCursor`]
/// borrows the session immutably, so traversing and mutating at the same
/// time is rejected at compile time.
///
/// ```
/// use frameprof_core::ProfileSession;
///
/// let mut session = ProfileSession::new();
/// {
///     let mut update = session.enter("update");
///     let _physics = update.enter("physics");
/// }
/// session.advance_frame();
/// assert_eq!(session.open_depth(), 0);
/// ```
#[derive(Debug)]
pub struct ProfileSession {
    names: NameTable,
    tree: ProfileTree,
    current: NodeId,
    frame_count: u64,
    reset_time: Duration,
    clock: Box<dyn Clock>,
}

impl ProfileSession {
    /// New session on the system monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    /// New session on a caller-supplied clock (deterministic tests,
    /// replay).
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let mut names = NameTable::new();
        let root = names.intern(ROOT_NAME);
        let reset_time = clock.now();
        Self {
            names,
            tree: ProfileTree::new(root),
            current: NodeId::ROOT,
            frame_count: 0,
            reset_time,
            clock,
        }
    }

    /// Token for `name`. Hot call sites can intern once up front and use
    /// [`begin_id`](Self::begin_id) afterwards.
    pub fn intern(&mut self, name: &str) -> RegionId {
        self.names.intern(name)
    }

    /// Display name for a token interned by this session.
    pub fn resolve(&self, id: RegionId) -> Option<&str> {
        self.names.resolve(id)
    }

    /// Opens a sample for `name`, nested under the sample currently open.
    pub fn begin(&mut self, name: &str) {
        let id = self.names.intern(name);
        self.begin_id(id);
    }

    /// Opens a sample for a pre-interned token.
    ///
    /// The tree position is decided by the whole chain of open samples:
    /// the same name reached through different chains lands on different
    /// nodes with separate statistics. Re-entering the region that is
    /// already current is direct recursion; the node is re-called in
    /// place and no child is created.
    pub fn begin_id(&mut self, name: RegionId) {
        let now = self.clock.now();
        let current = self.current;
        if current != NodeId::ROOT && self.tree.node(current).name == name {
            self.tree.node_mut(current).begin_call(now);
            return;
        }
        let child = self.tree.ensure_child(current, name);
        self.current = child;
        self.tree.node_mut(child).begin_call(now);
    }

    /// Closes the innermost open sample. Statistics commit when this
    /// closes the region's outermost call; the current position then moves
    /// back to the parent.
    ///
    /// Ends must pair with begins in strict LIFO order. An unmatched end
    /// is a bug in the instrumentation: debug builds assert, release
    /// builds log a warning and stay at the root rather than corrupting
    /// the position.
    pub fn end(&mut self) {
        debug_assert!(
            self.current != NodeId::ROOT,
            "end() without a matching begin()"
        );
        if self.current == NodeId::ROOT {
            log::warn!("profiler: end() without a matching begin(); ignoring");
            return;
        }
        let now = self.clock.now();
        let current = self.current;
        if self.tree.node_mut(current).end_call(now)
            && let Some(parent) = self.tree.node(current).parent
        {
            self.current = parent;
        }
    }

    /// Opens a sample and returns a guard that closes it on drop, on every
    /// exit path. Nested scopes re-borrow through the guard:
    ///
    /// ```
    /// use frameprof_core::ProfileSession;
    ///
    /// let mut session = ProfileSession::new();
    /// let mut frame = session.enter("frame");
    /// let physics = frame.enter("physics");
    /// drop(physics);
    /// drop(frame);
    /// ```
    pub fn enter(&mut self, name: &str) -> SampleGuard<'_> {
        self.begin(name);
        SampleGuard::new(self)
    }

    /// Runs `f` inside a sample for `name`, closing it on any return path.
    pub fn scoped<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin(name);
        let result = f(self);
        self.end();
        result
    }

    /// Marks a frame boundary. Purely a reporting counter; unrelated to
    /// the begin/end nesting and not tied to any clock.
    pub fn advance_frame(&mut self) {
        self.frame_count += 1;
    }

    /// Frames counted since the last [`reset`](Self::reset).
    pub fn frames_since_reset(&self) -> u64 {
        self.frame_count
    }

    /// Wall time elapsed since the last reset (or construction).
    pub fn time_since_reset(&self) -> Duration {
        self.clock.now().saturating_sub(self.reset_time)
    }

    /// Nesting depth of the current position in the call tree; 0 whenever
    /// no sample is open.
    pub fn open_depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.current;
        while let Some(parent) = self.tree.node(node).parent {
            depth += 1;
            node = parent;
        }
        depth
    }

    /// Number of distinct call-tree positions discovered so far, the
    /// synthetic root included.
    pub fn region_count(&self) -> usize {
        self.tree.len()
    }

    /// Zeroes all accumulated statistics and restarts the measurement
    /// window: the frame counter returns to 0 and elapsed time is stamped
    /// from now. Tree structure and interned names are retained, as is
    /// the current position; samples still open keep their nesting depth
    /// and are re-based to the reset instant, so spans committed
    /// afterwards never predate the window (a region spanning the reset
    /// reports only its post-reset portion).
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.tree.reset_statistics(now);
        self.frame_count = 0;
        self.reset_time = now;
    }

    /// Read-only cursor positioned at the root. The cursor borrows the
    /// session, so begin/end/reset are statically excluded while it
    /// lives; dropping it releases the borrow.
    pub fn cursor(&self) -> ProfileCursor<'_> {
        ProfileCursor::new(self)
    }

    /// Point-in-time copy of the statistics tree, for serialization or
    /// assertions.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    pub(crate) fn tree(&self) -> &ProfileTree {
        &self.tree
    }

    pub(crate) fn resolve_shared(&self, id: RegionId) -> SharedStr {
        self.names
            .resolve_shared(id)
            .cloned()
            .unwrap_or_else(|| SharedStr::from("?"))
    }
}

impl Default for ProfileSession {
    fn default() -> Self {
        Self::new()
    }
}
