//! Per-address branch history.

use bitvec::prelude::*;
use crate::predictor::PredictorTable;

/// A direct-mapped table of local history registers.
///
/// Each bucket is a shift register holding the most recent `history_bits`
/// outcomes observed for branches hashing to it, with the newest outcome in
/// bit 0. Stored values never carry bits above the history length.
///
/// There are no tags: branches which hash to the same bucket share (and
/// pollute) each other's history.
#[derive(Clone, Debug)]
pub struct HistoryTable {
    data: Vec<usize>,
    history_bits: usize,
    inst_shift: u32,
}

impl HistoryTable {
    /// Create a table of `entries` zeroed history registers.
    pub fn new(entries: usize, history_bits: usize, inst_shift: u32) -> Self {
        assert!(entries.is_power_of_two());
        assert!(history_bits < usize::BITS as usize);
        assert!(inst_shift < usize::BITS);
        Self {
            data: vec![0; entries],
            history_bits,
            inst_shift,
        }
    }

    pub fn history_bits(&self) -> usize { self.history_bits }
    pub fn inst_shift(&self) -> u32 { self.inst_shift }

    /// Returns a mask over the meaningful bits of a history register.
    pub fn history_mask(&self) -> usize {
        (1 << self.history_bits) - 1
    }

    /// Select the bucket for a branch address.
    ///
    /// The low `inst_shift` bits are always zero for aligned instructions,
    /// so they're discarded before taking the bottom bits.
    pub fn bucket_index(&self, addr: usize) -> usize {
        (addr >> self.inst_shift) & self.index_mask()
    }

    /// Read the history pattern in some bucket.
    pub fn read(&self, idx: usize) -> usize {
        *self.get_entry(idx) & self.history_mask()
    }

    /// Shift an outcome into some bucket.
    ///
    /// At prediction time this is the *predicted* outcome; it's either
    /// repaired or undone once the branch resolves.
    pub fn append_speculative(&mut self, idx: usize, taken: bool) {
        let mask = self.history_mask();
        let entry = self.get_entry_mut(idx);
        *entry = ((*entry << 1) | taken as usize) & mask;
    }

    /// Overwrite some bucket with an explicit history pattern.
    pub fn restore(&mut self, idx: usize, value: usize) {
        let mask = self.history_mask();
        *self.get_entry_mut(idx) = value & mask;
    }

    /// Force the newest outcome in some bucket to 'not-taken', leaving the
    /// older history bits alone.
    pub fn clear_low_bit(&mut self, idx: usize) {
        let mask = self.history_mask();
        let entry = self.get_entry_mut(idx);
        *entry &= mask;
        if mask != 0 {
            entry.view_bits_mut::<Lsb0>().set(0, false);
        }
    }

    /// Reset every bucket to an empty history.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn as_slice(&self) -> &[usize] { &self.data }

    /// Render some bucket as a string of `history_bits` characters, with the
    /// newest outcome on the right.
    pub fn format_entry(&self, idx: usize) -> String {
        self.get_entry(idx).view_bits::<Lsb0>()[..self.history_bits]
            .iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect()
    }
}

impl PredictorTable for HistoryTable {
    type Input = usize;
    type Entry = usize;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, addr: usize) -> usize {
        self.bucket_index(addr)
    }

    fn get_entry(&self, idx: usize) -> &usize {
        assert!(idx < self.data.len(), "history index {} out of range", idx);
        &self.data[idx]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut usize {
        assert!(idx < self.data.len(), "history index {} out of range", idx);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bucket_index_drops_alignment_bits() {
        let h = HistoryTable::new(4, 2, 2);
        assert_eq!(h.bucket_index(0x1000), 0);
        assert_eq!(h.bucket_index(0x1004), 1);
        assert_eq!(h.bucket_index(0x100c), 3);
        assert_eq!(h.bucket_index(0x1010), 0);
        assert_eq!(h.bucket_index(0x1003), 0);
    }

    #[test]
    fn append_shifts_in_at_bit_zero() {
        let mut h = HistoryTable::new(4, 3, 0);
        h.append_speculative(1, true);
        h.append_speculative(1, false);
        h.append_speculative(1, true);
        assert_eq!(h.read(1), 0b101);
        assert_eq!(h.format_entry(1), "101");

        // The oldest outcome falls off the end
        h.append_speculative(1, true);
        assert_eq!(h.read(1), 0b011);
        assert_eq!(h.as_slice()[1], 0b011);
    }

    #[test]
    fn restore_masks_to_history_length() {
        let mut h = HistoryTable::new(2, 2, 0);
        h.restore(0, 0b1110);
        assert_eq!(h.as_slice()[0], 0b10);
    }

    #[test]
    fn clear_low_bit_keeps_older_history() {
        let mut h = HistoryTable::new(2, 4, 0);
        h.restore(1, 0b1011);
        h.clear_low_bit(1);
        assert_eq!(h.read(1), 0b1010);

        h.clear_low_bit(1);
        assert_eq!(h.read(1), 0b1010);
    }

    #[test]
    fn zero_length_history() {
        let mut h = HistoryTable::new(2, 0, 2);
        h.append_speculative(0, true);
        h.clear_low_bit(0);
        assert_eq!(h.read(0), 0);
        assert_eq!(h.format_entry(0), "");
    }

    #[test]
    #[should_panic]
    fn out_of_range_bucket() {
        let h = HistoryTable::new(4, 2, 0);
        h.read(4);
    }
}
