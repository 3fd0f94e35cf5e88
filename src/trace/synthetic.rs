//! Reproducible synthetic branch traces.
//!
//! The generated "program" is an outer loop which runs a set of inner loops
//! back-to-back, each with a fixed trip count, followed by a few branches
//! whose outcomes are random with some bias. An unconditional jump closes
//! the outer loop.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::branch::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub seed: u64,

    /// Number of outer loop iterations
    pub iterations: usize,

    /// Trip count of each inner loop
    pub trip_counts: Vec<usize>,

    /// Probability of 'taken' for each random branch
    pub random_bias: Vec<f64>,

    /// Address of the first branch
    pub base: usize,
}
impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: 10_000,
            trip_counts: vec![3, 4, 7],
            random_bias: vec![0.5, 0.9],
            base: 0x1000_0000,
        }
    }
}

impl SyntheticConfig {
    /// Generate the trace.
    pub fn generate(&self) -> Vec<BranchRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut data = Vec::new();

        // Each branch gets its own 16-byte slot
        let loop_pc = |i: usize| self.base + i * 0x10;
        let rand_pc = |i: usize| loop_pc(self.trip_counts.len() + i);
        let jump_pc = rand_pc(self.random_bias.len());

        for _ in 0..self.iterations {
            for (i, &trips) in self.trip_counts.iter().enumerate() {
                // The back-edge is taken on all but the last trip
                let pc = loop_pc(i);
                for trip in 1..=trips {
                    let outcome = Outcome::from(trip != trips);
                    data.push(BranchRecord::new(
                        pc, pc - 0x8, BranchKind::DirectBranch, outcome
                    ));
                }
            }
            for (i, &p) in self.random_bias.iter().enumerate() {
                let pc = rand_pc(i);
                let outcome = Outcome::from(rng.gen_bool(p.clamp(0.0, 1.0)));
                data.push(BranchRecord::new(
                    pc, pc + 0x8, BranchKind::DirectBranch, outcome
                ));
            }
            data.push(BranchRecord::new(
                jump_pc, self.base, BranchKind::DirectJump, Outcome::T
            ));
        }
        data
    }
}
