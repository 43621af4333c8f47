//! Exit codes.

/// Process exit codes.
///
/// - 0: run completed (whether or not duplicates were found)
/// - 1: an input argument could not be read at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Run completed normally.
    Success = 0,
    /// An input path does not exist or is unreadable.
    UnreadableInput = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
