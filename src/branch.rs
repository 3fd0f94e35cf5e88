//! Types for representing branches and branch outcomes.

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N
        }
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> bool {
        matches!(x, Outcome::T)
    }
}

/// Representing different kinds of branch/control-flow instructions.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BranchKind {
    /// A direct conditional branch instruction.
    DirectBranch = BranchFlags::BRN_FLAG,

    /// A direct unconditional jump instruction.
    DirectJump   = BranchFlags::JMP_FLAG,

    /// An indirect unconditional jump instruction.
    IndirectJump = BranchFlags::JMP_FLAG | BranchFlags::IND_FLAG,

    /// A direct procedure call instruction.
    DirectCall   = BranchFlags::CALL_FLAG,

    /// An indirect procedure call instruction.
    IndirectCall = BranchFlags::CALL_FLAG | BranchFlags::IND_FLAG,

    /// A return instruction.
    Return       = BranchFlags::RET_FLAG | BranchFlags::IND_FLAG,
}
impl BranchKind {
    const DIRECT_BRANCH: u32 = BranchFlags::BRN_FLAG;
    const DIRECT_JUMP: u32 = BranchFlags::JMP_FLAG;
    const DIRECT_CALL: u32 = BranchFlags::CALL_FLAG;
    const INDIRECT_CALL: u32 = BranchFlags::CALL_FLAG | BranchFlags::IND_FLAG;
    const INDIRECT_JUMP: u32 = BranchFlags::JMP_FLAG | BranchFlags::IND_FLAG;
    const RETURN: u32 = BranchFlags::RET_FLAG | BranchFlags::IND_FLAG;

    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::DirectBranch)
    }
}
impl TryFrom<u32> for BranchKind {
    type Error = u32;
    fn try_from(x: u32) -> Result<Self, u32> {
        match x & BranchFlags::KIND_MASK {
            Self::DIRECT_BRANCH => Ok(Self::DirectBranch),
            Self::DIRECT_JUMP   => Ok(Self::DirectJump),
            Self::DIRECT_CALL   => Ok(Self::DirectCall),
            Self::INDIRECT_JUMP => Ok(Self::IndirectJump),
            Self::INDIRECT_CALL => Ok(Self::IndirectCall),
            Self::RETURN        => Ok(Self::Return),
            bits => Err(bits),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchFlags(pub u32);
impl BranchFlags {
    const BRN_FLAG: u32   = 1 << 0;
    const JMP_FLAG: u32   = 1 << 1;
    const CALL_FLAG: u32  = 1 << 2;
    const RET_FLAG: u32   = 1 << 3;
    const IND_FLAG: u32   = 1 << 4;
    const TAKEN_FLAG: u32 = 1 << 5;

    const KIND_MASK: u32  = 0b01_1111;

    /// 4-bit instruction length
    const ILEN_MASK: u32  = 0b1111_0000_0000_0000_0000_0000_0000_0000;

    pub fn new(kind: BranchKind, outcome: Outcome, ilen: usize) -> Self {
        let mut bits = kind as u32;
        if outcome == Outcome::T {
            bits |= Self::TAKEN_FLAG;
        }
        bits |= ((ilen as u32) << 28) & Self::ILEN_MASK;
        Self(bits)
    }

    pub fn ilen(&self) -> usize {
        ((self.0 & Self::ILEN_MASK) >> 28) as usize
    }

    pub fn is_brn(&self) -> bool { self.0 & Self::BRN_FLAG != 0 }
    pub fn is_jmp(&self) -> bool { self.0 & Self::JMP_FLAG != 0 }
    pub fn is_call(&self) -> bool { self.0 & Self::CALL_FLAG != 0 }
    pub fn is_ret(&self) -> bool { self.0 & Self::RET_FLAG != 0 }
    pub fn is_direct(&self) -> bool { self.0 & Self::IND_FLAG == 0 }
    pub fn is_indirect(&self) -> bool { self.0 & Self::IND_FLAG != 0 }
    pub fn is_taken(&self) -> bool { self.0 & Self::TAKEN_FLAG != 0 }

    /// Returns [None] when the kind bits don't name a [BranchKind].
    pub fn kind(&self) -> Option<BranchKind> {
        BranchKind::try_from(self.0).ok()
    }
}

/// A record of branch execution.
///
/// On disk, a record is the program counter and target as little-endian
/// 64-bit values, followed by the flags and four bytes of padding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: usize,

    /// The target address evaluated for this branch
    pub tgt: usize,

    pub flags: BranchFlags,
}
impl BranchRecord {
    /// Size of an encoded record in bytes.
    pub const SIZE: usize = 24;

    pub fn new(pc: usize, tgt: usize, kind: BranchKind, outcome: Outcome) -> Self {
        Self { pc, tgt, flags: BranchFlags::new(kind, outcome, 4) }
    }

    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Self {
        let word = |i: usize| {
            let mut b = [0u8; 8];
            b.copy_from_slice(&buf[i..i + 8]);
            u64::from_le_bytes(b) as usize
        };
        let mut flags = [0u8; 4];
        flags.copy_from_slice(&buf[16..20]);
        Self {
            pc: word(0),
            tgt: word(8),
            flags: BranchFlags(u32::from_le_bytes(flags)),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..8].copy_from_slice(&(self.pc as u64).to_le_bytes());
        buf[8..16].copy_from_slice(&(self.tgt as u64).to_le_bytes());
        buf[16..20].copy_from_slice(&self.flags.0.to_le_bytes());
        buf
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from(self.flags.is_taken())
    }
    pub fn kind(&self) -> Option<BranchKind> {
        self.flags.kind()
    }
    pub fn ilen(&self) -> usize {
        self.flags.ilen()
    }

    /// Returns 'true' if this is a conditional instruction.
    pub fn is_conditional(&self) -> bool {
        self.flags.is_brn()
    }

    /// Returns 'true' if this is an unconditional instruction.
    pub fn is_unconditional(&self) -> bool {
        !self.flags.is_brn()
    }

    /// Returns 'true' if this instruction indirectly specifies the target.
    pub fn is_indirect(&self) -> bool {
        self.flags.is_indirect()
    }

    /// Returns 'true' if this is a "call" or "return".
    pub fn is_procedural(&self) -> bool {
        self.flags.is_call() || self.flags.is_ret()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_encode_kind_and_outcome() {
        let f = BranchFlags::new(BranchKind::DirectBranch, Outcome::T, 4);
        assert!(f.is_brn());
        assert!(f.is_taken());
        assert_eq!(f.ilen(), 4);
        assert_eq!(f.kind(), Some(BranchKind::DirectBranch));

        let f = BranchFlags::new(BranchKind::Return, Outcome::N, 2);
        assert!(f.is_ret() && f.is_indirect());
        assert!(!f.is_taken());
        assert_eq!(f.kind(), Some(BranchKind::Return));

        assert_eq!(BranchFlags(0b11).kind(), None);
    }

    #[test]
    fn record_layout() {
        let r = BranchRecord::new(0x4000_1234, 0x4000_0000,
            BranchKind::DirectBranch, Outcome::T);
        let bytes = r.to_bytes();
        assert_eq!(&bytes[0..8], &0x4000_1234u64.to_le_bytes());
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
        assert_eq!(BranchRecord::from_bytes(&bytes), r);
        assert!(r.is_conditional());
        assert_eq!(r.outcome(), Outcome::T);
    }
}
