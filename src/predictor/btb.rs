//! Branch target buffer (BTB) implementations.

use crate::branch::BranchKind;
use crate::predictor::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimpleBTBEntry {
    /// Full program counter of the cached branch
    pub pc: usize,
    /// Cached target address for this branch
    pub tgt: usize,
    /// The type of branch
    pub kind: BranchKind,
}
impl SimpleBTBEntry {
    pub fn new(pc: usize, tgt: usize, kind: BranchKind) -> Self {
        Self { pc, tgt, kind }
    }

    pub fn target(&self) -> usize { self.tgt }
    pub fn kind(&self) -> BranchKind { self.kind }
}

/// A direct-mapped BTB. Entries remember the full program counter, so a
/// lookup only hits for the branch which filled the entry.
pub struct SimpleBTB {
    data: Vec<Option<SimpleBTBEntry>>,
    inst_shift: u32,
}
impl SimpleBTB {
    pub fn new(size: usize, inst_shift: u32) -> Self {
        assert!(size.is_power_of_two());
        assert!(inst_shift < usize::BITS);
        Self {
            data: vec![None; size],
            inst_shift,
        }
    }

    /// Returns the cached entry for some branch, if there is one.
    pub fn lookup(&self, pc: usize) -> Option<&SimpleBTBEntry> {
        let idx = self.get_index(pc);
        self.get_entry(idx).as_ref().filter(|e| e.pc == pc)
    }

    /// Cache the target of some branch, evicting whatever shared its entry.
    pub fn update(&mut self, pc: usize, tgt: usize, kind: BranchKind) {
        let idx = self.get_index(pc);
        *self.get_entry_mut(idx) = Some(SimpleBTBEntry::new(pc, tgt, kind));
    }

    pub fn invalidate(&mut self, pc: usize) {
        let idx = self.get_index(pc);
        let entry = self.get_entry_mut(idx);
        if entry.is_some_and(|e| e.pc == pc) {
            *entry = None;
        }
    }
}

impl PredictorTable for SimpleBTB {
    type Input = usize;
    type Entry = Option<SimpleBTBEntry>;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, pc: usize) -> usize {
        (pc >> self.inst_shift) & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &Option<SimpleBTBEntry> {
        &self.data[idx]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut Option<SimpleBTBEntry> {
        &mut self.data[idx]
    }
}
