//! Numeric entry policy shared by the CV number, CV value and POM address
//! screens.
//!
//! | Control             | Up                          | Down                                   |
//! |---------------------|-----------------------------|----------------------------------------|
//! | Turn (fine)         | +1, above max → min         | −1, at min → max                       |
//! | Push-turn (coarse)  | +step, above max → min      | −step, else −1 if above min, else max  |
//! | Key 0..3            | +1/+10/+100/+1000, above max → min | -                               |
//! | Key 4 (reset)       | min                         | -                                      |
//!
//! The minimum of every field doubles as its default.  Overflow snaps back
//! to that default rather than saturating at the maximum; only decrementing
//! at the minimum wraps to the maximum.

/// Adjustment direction, taken from the sign of an encoder delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `None` for a zero delta (no adjustment).
    pub fn from_delta(delta: i8) -> Option<Self> {
        match delta {
            d if d > 0 => Some(Self::Up),
            d if d < 0 => Some(Self::Down),
            _ => None,
        }
    }
}

/// Inclusive bounds of one editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    /// Lowest legal value; also the default.
    pub min: u16,
    /// Highest legal value.
    pub max: u16,
}

impl FieldRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: u16) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Value the field takes after start or a reset key.
    pub fn reset(self) -> u16 {
        self.min
    }

    /// Fold a raw (possibly overflowed) value back into range.
    pub fn settle(self, raw: u32) -> u16 {
        if raw > u32::from(self.max) || raw < u32::from(self.min) {
            self.min
        } else {
            raw as u16
        }
    }

    /// One detent of the rotary encoder.
    pub fn fine(self, value: u16, dir: Direction) -> u16 {
        match dir {
            Direction::Up => self.settle(u32::from(value) + 1),
            Direction::Down if value > self.min => value - 1,
            Direction::Down => self.max,
        }
    }

    /// One detent with the encoder pushed in.
    pub fn coarse(self, value: u16, dir: Direction, step: u16) -> u16 {
        match dir {
            Direction::Up => self.step_up(value, step),
            Direction::Down => match value.checked_sub(step) {
                Some(v) if value > step && v >= self.min => v,
                _ if value > self.min => value - 1,
                _ => self.max,
            },
        }
    }

    /// Add a fixed step (keypad), snapping back to the default on overflow.
    pub fn step_up(self, value: u16, step: u16) -> u16 {
        self.settle(u32::from(value) + u32::from(step))
    }
}

/// Steps selected by keypad keys 0..3.
pub const KEY_STEPS: [u16; 4] = [1, 10, 100, 1000];
