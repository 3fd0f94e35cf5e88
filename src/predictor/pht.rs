//! Implementation of a pattern history table (PHT).

use crate::predictor::counter::*;
use crate::predictor::PredictorTable;

/// A flat table of [`SaturatingCounter`]s, logically a 2D array where each
/// row belongs to a history table bucket and each column to a history
/// pattern.
#[derive(Clone, Debug)]
pub struct PatternTable {
    /// Saturating counter configuration
    cfg: SaturatingCounterConfig,

    /// Table of counters
    data: Vec<SaturatingCounter>,

    /// Number of history bits selecting a column
    history_bits: usize,
}
impl PatternTable {
    pub fn new(rows: usize, history_bits: usize, cfg: SaturatingCounterConfig)
        -> Self
    {
        let size = rows << history_bits;
        assert!(size.is_power_of_two());
        Self {
            cfg,
            data: vec![cfg.build(); size],
            history_bits,
        }
    }

    pub fn counter_config(&self) -> SaturatingCounterConfig { self.cfg }
    pub fn threshold(&self) -> u8 { self.cfg.threshold() }

    /// Form an index from a bucket (row) and a history pattern (column).
    pub fn pattern_index(&self, bucket: usize, history: usize) -> usize {
        let mask = (1 << self.history_bits) - 1;
        (bucket << self.history_bits) | (history & mask)
    }

    pub fn counter(&self, idx: usize) -> &SaturatingCounter {
        self.get_entry(idx)
    }

    /// Returns 'true' if the counter at some index predicts 'taken'.
    pub fn predict(&self, idx: usize) -> bool {
        self.get_entry(idx).value() > self.threshold()
    }

    /// Train the counter at some index with a resolved outcome.
    pub fn confirm(&mut self, idx: usize, taken: bool) {
        let ctr = self.get_entry_mut(idx);
        if taken {
            ctr.increment();
        } else {
            ctr.decrement();
        }
    }

    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|c| c.reset());
    }

    pub fn as_slice(&self) -> &[SaturatingCounter] { &self.data }
}

impl PredictorTable for PatternTable {
    /// A (bucket, history pattern) pair.
    type Input = (usize, usize);
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, (bucket, history): (usize, usize)) -> usize {
        self.pattern_index(bucket, history)
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        assert!(idx < self.data.len(), "predictor index {} out of range", idx);
        &self.data[idx]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        assert!(idx < self.data.len(), "predictor index {} out of range", idx);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_bit() -> PatternTable {
        PatternTable::new(4, 2, SaturatingCounterConfig { bits: 2 })
    }

    #[test]
    fn index_concatenates_bucket_and_history() {
        let pht = two_bit();
        assert_eq!(pht.size(), 16);
        assert_eq!(pht.pattern_index(0, 0b00), 0);
        assert_eq!(pht.pattern_index(1, 0b10), 0b0110);
        assert_eq!(pht.pattern_index(3, 0b11), 15);
        // Stray history bits are masked off
        assert_eq!(pht.pattern_index(2, 0b111), 0b1011);
        assert_eq!(pht.get_index((2, 0b01)), 0b1001);
    }

    #[test]
    fn predicts_taken_above_threshold() {
        let mut pht = two_bit();
        assert!(!pht.predict(5));
        pht.confirm(5, true);
        assert!(!pht.predict(5));
        pht.confirm(5, true);
        assert!(pht.predict(5));
        pht.confirm(5, false);
        assert!(!pht.predict(5));
    }

    #[test]
    fn confirm_touches_one_counter() {
        let mut pht = two_bit();
        pht.confirm(7, true);
        for (i, c) in pht.as_slice().iter().enumerate() {
            assert_eq!(c.value(), if i == 7 { 1 } else { 0 });
        }
        pht.reset();
        assert!(pht.as_slice().iter().all(|c| c.value() == 0));
    }

    #[test]
    #[should_panic]
    fn out_of_range_index() {
        let pht = two_bit();
        pht.predict(16);
    }
}
