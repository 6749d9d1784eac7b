//! Session window utilities.
//!
//! The strategy only quotes while the exchange tick lies strictly
//! inside `(open, close)`. Reaching either bound closes the session.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::Tick;

/// Outer-loop state. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Tick bounds of the trading window. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub open: u32,
    pub close: u32,
}

impl SessionWindow {
    pub fn new(open: u32, close: u32) -> Result<Self> {
        let window = Self { open, close };
        window.validate()?;
        Ok(window)
    }

    /// A window must leave at least one tick strictly between its bounds.
    pub fn validate(&self) -> Result<()> {
        if self.close <= self.open.saturating_add(1) {
            return Err(CoreError::InvalidWindow(format!(
                "no tick lies strictly between open={} and close={}",
                self.open, self.close
            )));
        }
        Ok(())
    }

    /// Check whether `tick` lies strictly inside the window.
    #[must_use]
    pub fn contains(&self, tick: Tick) -> bool {
        tick.value() > self.open && tick.value() < self.close
    }

    /// Session state implied by a tick read.
    #[must_use]
    pub fn state_at(&self, tick: Tick) -> SessionState {
        if self.contains(tick) {
            SessionState::Running
        } else {
            SessionState::Closed
        }
    }

    /// Whether the window has not opened yet at `tick`.
    #[must_use]
    pub fn is_before_open(&self, tick: Tick) -> bool {
        tick.value() <= self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_exclusive() {
        let window = SessionWindow::new(5, 295).unwrap();
        assert!(!window.contains(Tick::new(5)));
        assert!(window.contains(Tick::new(6)));
        assert!(window.contains(Tick::new(294)));
        assert!(!window.contains(Tick::new(295)));
        assert!(!window.contains(Tick::new(0)));
        assert!(!window.contains(Tick::new(300)));
    }

    #[test]
    fn test_state_at() {
        let window = SessionWindow::new(1, 297).unwrap();
        assert_eq!(window.state_at(Tick::new(1)), SessionState::Closed);
        assert_eq!(window.state_at(Tick::new(2)), SessionState::Running);
        assert_eq!(window.state_at(Tick::new(297)), SessionState::Closed);
    }

    #[test]
    fn test_before_open() {
        let window = SessionWindow::new(2, 298).unwrap();
        assert!(window.is_before_open(Tick::new(0)));
        assert!(window.is_before_open(Tick::new(2)));
        assert!(!window.is_before_open(Tick::new(3)));
        assert!(!window.is_before_open(Tick::new(298)));
    }

    #[test]
    fn test_empty_window_rejected() {
        assert!(SessionWindow::new(10, 11).is_err());
        assert!(SessionWindow::new(10, 5).is_err());
        assert!(SessionWindow::new(10, 12).is_ok());
    }
}
