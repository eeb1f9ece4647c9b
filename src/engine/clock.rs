// src/engine/clock.rs

/// A one-shot second-granularity countdown.
///
/// The session task drives it from a single 1 Hz interval; suspension is
/// simply not calling `tick`, so the remaining value survives pauses
/// (fullscreen loss freezes the countdown, it never resets it).
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Countdown { remaining: seconds }
    }

    /// Decrements once. Returns true exactly when the countdown reaches
    /// zero on this tick; further ticks return false.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self, seconds: u32) {
        self.remaining = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once() {
        let mut c = Countdown::new(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert!(c.tick());
        // Already expired; never fires again.
        assert!(!c.tick());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn reset_rearms() {
        let mut c = Countdown::new(1);
        assert!(c.tick());
        c.reset(2);
        assert!(!c.tick());
        assert!(c.tick());
    }

    #[test]
    fn zero_budget_never_fires() {
        let mut c = Countdown::new(0);
        assert!(!c.tick());
    }
}
