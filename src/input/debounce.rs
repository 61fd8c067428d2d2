//! Per-channel debounce filter.
//!
//! A new level must be seen on `confirm_ticks` consecutive samples before it
//! becomes the stable level. The stable transition raises exactly one edge
//! flag, which stays set until the caller clears it.
//!
//! Lines are active-low: HIGH → LOW is a press, LOW → HIGH a release.

/// Debounced state of one input line.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    stable: bool,
    candidate: bool,
    count: u8,
    confirm_ticks: u8,
    pressed: bool,
    released: bool,
}

impl Debouncer {
    /// Create a filter resting HIGH (released).
    pub const fn new(confirm_ticks: u8) -> Self {
        Self {
            stable: true,
            candidate: true,
            count: 0,
            confirm_ticks: if confirm_ticks == 0 { 1 } else { confirm_ticks },
            pressed: false,
            released: false,
        }
    }

    /// Feed one raw sample. O(1), never blocks.
    #[inline]
    pub fn update(&mut self, level: bool) {
        if level == self.stable {
            self.candidate = level;
            self.count = 0;
            return;
        }

        if level != self.candidate {
            self.candidate = level;
            self.count = 0;
        }

        self.count = self.count.saturating_add(1);
        if self.count >= self.confirm_ticks {
            self.stable = level;
            self.count = 0;
            if level {
                self.released = true;
            } else {
                self.pressed = true;
            }
        }
    }

    /// Stable level (true = HIGH).
    #[inline]
    pub fn level(&self) -> bool {
        self.stable
    }

    /// Stable level is LOW.
    #[inline]
    pub fn is_low(&self) -> bool {
        !self.stable
    }

    /// One-shot HIGH → LOW edge.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// One-shot LOW → HIGH edge.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    #[inline]
    pub fn clear_pressed(&mut self) {
        self.pressed = false;
    }

    #[inline]
    pub fn clear_released(&mut self) {
        self.released = false;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(crate::config::DEBOUNCE_TICKS)
    }
}
