//! Hierarchical real-time profiler.
//!
//! Deterministic instrumentation for frame loops: nested, named code
//! regions are timed against a monotonic clock and accumulated into a call
//! tree, where a region's identity is its name *plus* the chain of regions
//! it was entered through. The tree is walked read-only for reporting.
//!
//! ```text
//!   begin/end ──▶ ProfileSession ──▶ call tree ──▶ ProfileCursor ──▶ report
//!   (guards,        (current          (arena,        (read-only       (text
//!    scoped)         position,         interned       traversal)       dump)
//!                    frames)           names)
//! ```
//!
//! # Design principles
//!
//! 1. **Explicit session** — No global state. A [`ProfileSession`] is a
//!    plain value; one per thread of interest, one per test.
//! 2. **Recursion-correct** — Re-entering the region already current
//!    deepens a recursion count; time and calls commit once, on the
//!    outermost return, never double-counted.
//! 3. **Borrow-scoped reading** — [`ProfileCursor`] borrows the session,
//!    so traversal and mutation cannot interleave, by construction.
//! 4. **Swappable clock** — Sessions time against a [`Clock`];
//!    [`ManualClock`] makes every measured span exactly assertable.
//!
//! # Example
//!
//! ```
//! use frameprof_core::{ProfileSession, ReportOrder};
//!
//! let mut session = ProfileSession::new();
//! for _ in 0..3 {
//!     let mut update = session.enter("update");
//!     {
//!         let _physics = update.enter("physics");
//!     }
//!     drop(update);
//!     session.advance_frame();
//! }
//!
//! let report = frameprof_core::render_report(&session, ReportOrder::Discovery);
//! assert!(report.contains("update"));
//! ```

pub mod clock;
pub mod cursor;
pub mod error;
pub mod guard;
pub mod intern;
pub mod report;
pub mod session;
pub mod snapshot;

mod tree;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use cursor::{ProfileCursor, RegionStats};
pub use error::CursorError;
pub use guard::SampleGuard;
pub use intern::{NameTable, RegionId, SharedStr};
pub use report::{ReportOrder, render_report, write_report};
pub use session::ProfileSession;
pub use snapshot::{RegionSnapshot, SessionSnapshot};
