//! RAII scope guard pairing every begin with a guaranteed end.

use crate::session::ProfileSession;

/// Closes a sample when dropped, on every exit path: normal fall-through,
/// early return, `?`, or unwind.
///
/// Obtained from [`ProfileSession::enter`]. The guard holds the mutable
/// borrow of the session, so nested scopes are opened through the guard
/// itself and close in LIFO order as the borrows unwind:
///
/// ```
/// use frameprof_core::ProfileSession;
///
/// let mut session = ProfileSession::new();
/// {
///     let mut frame = session.enter("frame");
///     {
///         let _physics = frame.enter("physics");
///         // physics sample closes here
///     }
///     let _render = frame.enter("render");
///     // render closes, then frame
/// }
/// assert_eq!(session.open_depth(), 0);
/// ```
#[derive(Debug)]
pub struct SampleGuard<'a> {
    session: &'a mut ProfileSession,
}

impl<'a> SampleGuard<'a> {
    pub(crate) fn new(session: &'a mut ProfileSession) -> Self {
        Self { session }
    }

    /// Opens a sample nested inside this one. Recursion works the same
    /// way: entering the name of the region this guard opened deepens the
    /// region's recursion count instead of creating a child.
    pub fn enter(&mut self, name: &str) -> SampleGuard<'_> {
        self.session.enter(name)
    }
}

impl Drop for SampleGuard<'_> {
    fn drop(&mut self) {
        self.session.end();
    }
}
