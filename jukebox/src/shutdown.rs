//! Graceful shutdown on SIGINT/SIGTERM

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raised once a termination signal arrives; checked between polls
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag raised by SIGINT and SIGTERM
    ///
    /// Only one handler can be installed per process.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let flag = Self::new();
        let handler = flag.clone();
        ctrlc::set_handler(move || handler.raise())?;
        Ok(flag)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = ShutdownFlag::new();
        let other = flag.clone();
        assert!(!flag.is_raised());

        other.raise();
        assert!(flag.is_raised());
    }
}
