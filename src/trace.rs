
pub mod synthetic;

use std::path::Path;
use crate::branch::*;
use crate::error::TraceError;

/// A list of trace files, loaded lazily one at a time.
pub struct BinaryTraceSet {
    /// A list of filenames
    pub files: Vec<String>,

    pub cur: usize,
}
impl BinaryTraceSet {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            cur: 0,
        }
    }

    pub fn new_from_slice(strings: &[String]) -> Self {
        Self {
            files: strings.to_vec(),
            cur: 0,
        }
    }

    pub fn add_file(&mut self, s: impl ToString) {
        self.files.push(s.to_string());
    }
}
impl Default for BinaryTraceSet {
    fn default() -> Self { Self::new() }
}
impl Iterator for BinaryTraceSet {
    type Item = Result<BinaryTrace, TraceError>;
    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.get(self.cur)?;
        self.cur += 1;
        Some(BinaryTrace::from_file(path))
    }
}

/// A sequence of [BranchRecord]s.
pub struct BinaryTrace {
    pub data: Vec<BranchRecord>,
    pub name: String,
}
impl BinaryTrace {
    pub fn new(name: impl ToString, data: Vec<BranchRecord>) -> Self {
        Self { data, name: name.to_string() }
    }

    /// Create a [BinaryTrace] from a file.
    pub fn from_file(path: &str) -> Result<Self, TraceError> {
        let bytes = std::fs::read(path).map_err(|source| TraceError::Io {
            path: path.to_string(),
            source,
        })?;
        let name = Path::new(path).file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Self::from_bytes(name, &bytes)
    }

    /// Decode a trace from raw bytes.
    pub fn from_bytes(name: impl ToString, bytes: &[u8]) -> Result<Self, TraceError> {
        if bytes.len() % BranchRecord::SIZE != 0 {
            return Err(TraceError::Truncated {
                name: name.to_string(),
                len: bytes.len(),
                record: BranchRecord::SIZE,
            });
        }
        let data = bytes.chunks_exact(BranchRecord::SIZE)
            .map(|chunk| {
                let mut buf = [0u8; BranchRecord::SIZE];
                buf.copy_from_slice(chunk);
                BranchRecord::from_bytes(&buf)
            })
            .collect();
        Ok(Self::new(name, data))
    }

    /// Encode all records.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|r| r.to_bytes()).collect()
    }

    /// Return the number of records
    pub fn num_entries(&self) -> usize { self.data.len() }

    pub fn name(&self) -> &str { &self.name }

    /// Return a truncated slice of records
    pub fn as_slice_trunc(&self, limit: usize) -> &[BranchRecord] {
        &self.data[..limit.min(self.data.len())]
    }

    /// Return a slice of records.
    pub fn as_slice(&self) -> &[BranchRecord] { &self.data }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_partial_records() {
        let err = BinaryTrace::from_bytes("bad", &[0u8; 30]).err().unwrap();
        assert!(matches!(err, TraceError::Truncated { len: 30, record: 24, .. }));
    }

    #[test]
    fn decodes_records_in_order() {
        let recs = vec![
            BranchRecord::new(0x1000, 0x0ff0, BranchKind::DirectBranch, Outcome::T),
            BranchRecord::new(0x1004, 0x2000, BranchKind::DirectCall, Outcome::T),
            BranchRecord::new(0x2008, 0x1008, BranchKind::Return, Outcome::T),
        ];
        let bytes = BinaryTrace::new("t", recs.clone()).to_bytes();
        let trace = BinaryTrace::from_bytes("t", &bytes).unwrap();
        assert_eq!(trace.num_entries(), 3);
        assert_eq!(trace.as_slice(), &recs[..]);
        assert_eq!(trace.as_slice_trunc(2).len(), 2);
        assert_eq!(trace.as_slice_trunc(10).len(), 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut set = BinaryTraceSet::new();
        set.add_file("/nonexistent/trace.bin");
        let res = set.next().unwrap();
        assert!(matches!(res, Err(TraceError::Io { .. })));
        assert!(set.next().is_none());
    }
}
