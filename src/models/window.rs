//! Poll window watermark.

use chrono::Utc;

/// Lower bound (unix seconds) of the next review API query.
///
/// Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    from_date: i64,
}

impl PollWindow {
    pub fn new(from_date: i64) -> Self {
        Self { from_date }
    }

    /// Window starting at the current time.
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp())
    }

    pub fn from_date(&self) -> i64 {
        self.from_date
    }

    /// Move the window to the server cursor if it lies ahead.
    ///
    /// Returns whether the window moved.
    pub fn advance(&mut self, cursor: Option<i64>) -> bool {
        match cursor {
            Some(next) if next > self.from_date => {
                self.from_date = next;
                true
            }
            Some(next) => {
                log::debug!(
                    "Ignoring cursor {} behind current window {}",
                    next,
                    self.from_date
                );
                false
            }
            None => false,
        }
    }
}
