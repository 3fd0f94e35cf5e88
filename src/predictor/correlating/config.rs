
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::predictor::*;

use std::mem::size_of;

/// Largest allocation (in bytes) or bit count a configuration may describe.
const MAX_SIZE: usize = isize::MAX as usize;

/// Configuration for a [`CorrelatingPredictor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatingConfig {
    /// Parameters for the saturating counters
    pub ctr: SaturatingCounterConfig,

    /// Number of history bits kept per bucket
    pub history_bits: usize,

    /// Number of history table entries
    pub history_entries: usize,

    /// Number of low address bits discarded before hashing
    pub inst_shift: u32,
}

impl Default for CorrelatingConfig {
    fn default() -> Self {
        Self {
            ctr: SaturatingCounterConfig { bits: 2 },
            history_bits: 11,
            history_entries: 2048,
            inst_shift: 2,
        }
    }
}

impl CorrelatingConfig {
    /// Check that this configuration describes a buildable predictor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ctr.is_valid() {
            return Err(ConfigError::CounterWidth { bits: self.ctr.bits });
        }
        if !self.history_entries.is_power_of_two() {
            return Err(ConfigError::HistoryTableSize {
                size: self.history_entries,
            });
        }
        self.checked_sizes()
            .ok_or(ConfigError::HistoryLength { bits: self.history_bits })?;
        if self.inst_shift >= usize::BITS {
            return Err(ConfigError::ShiftAmount { bits: self.inst_shift });
        }
        Ok(())
    }

    /// Total number of counters, or [None] if the counter count, a table
    /// allocation or the storage bit count is too large.
    fn checked_sizes(&self) -> Option<usize> {
        let total = u32::try_from(self.history_bits).ok()
            .and_then(|bits| 1usize.checked_shl(bits))
            .and_then(|cols| cols.checked_mul(self.history_entries))?;
        // H and 2^L are both powers of two
        debug_assert!(total.is_power_of_two());

        let pattern_bytes = total.checked_mul(size_of::<SaturatingCounter>())?;
        let history_bytes = self.history_entries.checked_mul(size_of::<usize>())?;
        let storage_bits = total
            .checked_mul(self.ctr.storage_bits())?
            .checked_add(self.history_entries.checked_mul(self.history_bits)?)?;
        if pattern_bytes > MAX_SIZE || history_bytes > MAX_SIZE
            || storage_bits > MAX_SIZE
        {
            return None;
        }
        Some(total)
    }

    /// Number of counters in each pattern table row (`2^L`).
    pub fn counters_per_row(&self) -> usize { 1 << self.history_bits }

    /// Number of counter bits in each pattern table row.
    pub fn bits_per_row(&self) -> usize {
        self.counters_per_row() * self.ctr.storage_bits()
    }

    /// Total number of counters (`H * 2^L`).
    pub fn total_counters(&self) -> usize {
        self.history_entries * self.counters_per_row()
    }

    /// Number of counter bits in the pattern table.
    pub fn pattern_bits(&self) -> usize {
        self.history_entries * self.bits_per_row()
    }

    /// Get the number of storage bits, including history registers.
    pub fn storage_bits(&self) -> usize {
        self.pattern_bits() + self.history_entries * self.history_bits
    }

    pub fn history_mask(&self) -> usize { self.counters_per_row() - 1 }
    pub fn threshold(&self) -> u8 { self.ctr.threshold() }

    /// Use this configuration to create a new [`CorrelatingPredictor`].
    pub fn build(self) -> Result<CorrelatingPredictor, ConfigError> {
        self.validate()?;
        log::debug!("# of counters: {}", self.total_counters());
        log::debug!("# of entries (hist, pred): {}, {}",
            self.history_entries, self.history_entries);
        log::debug!("size of predictor table (bits): {}", self.pattern_bits());
        log::debug!("predictor counters per entry: {}", self.counters_per_row());
        log::debug!("predictor mask: {:#x}", self.history_mask());
        Ok(CorrelatingPredictor::from_config(self))
    }

    /// Build one independent predictor per hardware thread.
    pub fn build_per_thread(self, threads: usize)
        -> Result<PerThreadPredictor<CorrelatingPredictor>, ConfigError>
    {
        let preds = (0..threads).map(|_| self.build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PerThreadPredictor::new(preds))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cfg(bits: u8, history_bits: usize, history_entries: usize)
        -> CorrelatingConfig
    {
        CorrelatingConfig {
            ctr: SaturatingCounterConfig { bits },
            history_bits,
            history_entries,
            inst_shift: 2,
        }
    }

    #[test]
    fn default_is_valid() {
        let c = CorrelatingConfig::default();
        assert_eq!(c.validate(), Ok(()));
        assert_eq!(c.counters_per_row(), 2048);
        assert_eq!(c.total_counters(), 2048 * 2048);
        assert_eq!(c.history_mask(), 0x7ff);
        assert_eq!(c.threshold(), 1);
    }

    #[test]
    fn derived_sizes() {
        let c = cfg(2, 2, 4);
        assert_eq!(c.counters_per_row(), 4);
        assert_eq!(c.bits_per_row(), 8);
        assert_eq!(c.total_counters(), 16);
        assert_eq!(c.pattern_bits(), 32);
        assert_eq!(c.storage_bits(), 32 + 8);
        assert_eq!(c.history_mask(), 0b11);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert_eq!(cfg(0, 2, 4).validate(),
            Err(ConfigError::CounterWidth { bits: 0 }));
        assert_eq!(cfg(9, 2, 4).validate(),
            Err(ConfigError::CounterWidth { bits: 9 }));
        assert_eq!(cfg(2, 2, 6).validate(),
            Err(ConfigError::HistoryTableSize { size: 6 }));
        assert_eq!(cfg(2, 2, 0).validate(),
            Err(ConfigError::HistoryTableSize { size: 0 }));
        assert_eq!(cfg(2, 64, 4).validate(),
            Err(ConfigError::HistoryLength { bits: 64 }));
        assert_eq!(cfg(2, 63, 4).validate(),
            Err(ConfigError::HistoryLength { bits: 63 }));
        assert_eq!(cfg(2, 62, 1).validate(),
            Err(ConfigError::HistoryLength { bits: 62 }));
        assert_eq!(cfg(8, 60, 8).validate(),
            Err(ConfigError::HistoryLength { bits: 60 }));

        let mut c = cfg(2, 2, 4);
        c.inst_shift = 64;
        assert_eq!(c.validate(), Err(ConfigError::ShiftAmount { bits: 64 }));
    }

    #[test]
    fn validated_sizes_do_not_overflow() {
        // Largest pattern table whose storage bits still fit
        let c = cfg(1, 58, 2);
        assert_eq!(c.validate(), Ok(()));
        assert_eq!(c.total_counters(), 1 << 59);
        assert_eq!(c.storage_bits(), (1 << 59) + 2 * 58);

        // 2^61 counters: the bytes fit, the storage bits don't
        assert_eq!(cfg(4, 60, 2).validate(),
            Err(ConfigError::HistoryLength { bits: 60 }));
        assert_eq!(cfg(8, 60, 2).validate(),
            Err(ConfigError::HistoryLength { bits: 60 }));
    }

    #[test]
    fn round_trips_through_json() {
        let c = cfg(3, 4, 16);
        let s = serde_json::to_string(&c).unwrap();
        let back: CorrelatingConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }
}
