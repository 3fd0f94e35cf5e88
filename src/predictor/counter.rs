//! Implementation of a saturating counter.

use serde::{Deserialize, Serialize};

/// Configuration for building a [`SaturatingCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaturatingCounterConfig {
    /// Width of the counter in bits
    pub bits: u8,
}
impl SaturatingCounterConfig {
    /// Counters are stored in a byte.
    pub const MAX_BITS: u8 = 8;

    pub fn is_valid(&self) -> bool {
        (1..=Self::MAX_BITS).contains(&self.bits)
    }

    pub fn storage_bits(&self) -> usize { self.bits as usize }

    /// The largest value a counter can hold (`2^W - 1`).
    pub fn max_value(&self) -> u8 {
        ((1u16 << self.bits) - 1) as u8
    }

    /// Counter values strictly above this predict 'taken' (`2^(W-1) - 1`).
    pub fn threshold(&self) -> u8 {
        ((1u16 << (self.bits - 1)) - 1) as u8
    }

    pub fn build(self) -> SaturatingCounter {
        assert!(self.is_valid(), "invalid counter width {}", self.bits);
        SaturatingCounter {
            max: self.max_value(),
            ctr: 0,
        }
    }
}

/// A `W`-bit unsigned counter which clamps at both ends instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    max: u8,
    ctr: u8,
}
impl SaturatingCounter {
    pub fn increment(&mut self) {
        if self.ctr < self.max {
            self.ctr += 1;
        }
    }

    pub fn decrement(&mut self) {
        self.ctr = self.ctr.saturating_sub(1);
    }

    pub fn value(&self) -> u8 { self.ctr }
    pub fn max_value(&self) -> u8 { self.max }

    pub fn reset(&mut self) {
        self.ctr = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derived_constants() {
        let one = SaturatingCounterConfig { bits: 1 };
        assert_eq!(one.max_value(), 1);
        assert_eq!(one.threshold(), 0);

        let two = SaturatingCounterConfig { bits: 2 };
        assert_eq!(two.max_value(), 3);
        assert_eq!(two.threshold(), 1);

        let eight = SaturatingCounterConfig { bits: 8 };
        assert_eq!(eight.max_value(), 255);
        assert_eq!(eight.threshold(), 127);

        assert!(!SaturatingCounterConfig { bits: 0 }.is_valid());
        assert!(!SaturatingCounterConfig { bits: 9 }.is_valid());
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut c = SaturatingCounterConfig { bits: 2 }.build();
        c.decrement();
        assert_eq!(c.value(), 0);
        for _ in 0..10 {
            c.increment();
        }
        assert_eq!(c.value(), 3);
        c.decrement();
        assert_eq!(c.value(), 2);
        c.reset();
        assert_eq!(c.value(), 0);
    }

    #[test]
    fn full_width_counter_does_not_overflow() {
        let mut c = SaturatingCounterConfig { bits: 8 }.build();
        for _ in 0..300 {
            c.increment();
        }
        assert_eq!(c.value(), u8::MAX);
    }
}
