use thiserror::Error;

/// Usage errors raised by [`ProfileCursor`](crate::ProfileCursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// `enter_child` was asked for a position past the end of the current
    /// child list.
    #[error("child index {index} out of range ({children} children)")]
    IndexOutOfRange { index: usize, children: usize },
}
