//! Drive a [`DirectionPredictor`] with a recorded branch trace.

use crate::branch::*;
use crate::predictor::*;
use crate::stats::*;

/// Feeds [`BranchRecord`]s through a predictor the way an in-order fetch
/// unit would, with each branch resolved before the next one is fetched.
///
/// A taken prediction only counts if the [`SimpleBTB`] has a target for the
/// branch; otherwise the predictor is told about the miss and the branch is
/// fetched as not-taken.
pub struct Replay<P: DirectionPredictor> {
    pub predictor: P,
    pub btb: SimpleBTB,
    pub stat: BranchStats,
    tid: ThreadId,
}
impl<P: DirectionPredictor> Replay<P> {
    pub fn new(predictor: P, btb: SimpleBTB) -> Self {
        Self::for_thread(0, predictor, btb)
    }

    pub fn for_thread(tid: ThreadId, predictor: P, btb: SimpleBTB) -> Self {
        Self {
            predictor,
            btb,
            stat: BranchStats::new(),
            tid,
        }
    }

    /// Predict and resolve a single branch.
    pub fn step(&mut self, record: &BranchRecord) {
        let tid = self.tid;
        let pc = record.pc;
        let taken: bool = record.outcome().into();

        if record.is_unconditional() {
            let token = self.predictor.uncond_branch(tid, pc);
            self.predictor.update(tid, pc, taken, token, false);
            if taken {
                self.fill_btb(record);
            }
            return;
        }

        let (mut prediction, token) = self.predictor.lookup(tid, pc);
        if prediction && self.btb.lookup(pc).is_none() {
            self.predictor.btb_update(tid, pc);
            self.stat.btb_misses += 1;
            prediction = false;
        }

        self.stat.update_global(record, prediction.into());
        self.stat.update_per_branch(record, prediction.into());

        if prediction != taken {
            self.predictor.correct_history(tid, pc, taken, &token);
        }
        self.predictor.update(tid, pc, taken, token, false);

        if taken {
            self.fill_btb(record);
        }
    }

    pub fn run(&mut self, records: &[BranchRecord]) {
        for record in records {
            self.step(record);
        }
    }

    pub fn into_parts(self) -> (P, BranchStats) {
        (self.predictor, self.stat)
    }

    fn fill_btb(&mut self, record: &BranchRecord) {
        let kind = record.kind().unwrap_or(BranchKind::DirectJump);
        self.btb.update(record.pc, record.tgt, kind);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trace::synthetic::SyntheticConfig;

    fn correlating() -> CorrelatingPredictor {
        CorrelatingConfig {
            ctr: SaturatingCounterConfig { bits: 2 },
            history_bits: 8,
            history_entries: 64,
            inst_shift: 4,
        }.build().unwrap()
    }

    #[test]
    fn learns_fixed_trip_count_loops() {
        let trace = SyntheticConfig {
            iterations: 500,
            trip_counts: vec![3, 5],
            random_bias: vec![],
            ..Default::default()
        }.generate();

        let mut replay = Replay::new(correlating(), SimpleBTB::new(64, 4));
        replay.run(&trace);
        let (p, stat) = replay.into_parts();

        assert_eq!(p.outstanding_tokens(), 0);
        assert_eq!(stat.global_brns(), 500 * 8);
        assert!(stat.hit_rate() > 0.95, "hit rate {}", stat.hit_rate());
    }

    #[test]
    fn beats_static_baselines() {
        let trace = SyntheticConfig { iterations: 500, ..Default::default() }
            .generate();

        let mut corr = Replay::new(correlating(), SimpleBTB::new(64, 4));
        corr.run(&trace);
        let mut taken = Replay::new(TakenPredictor, SimpleBTB::new(64, 4));
        taken.run(&trace);
        let mut not_taken = Replay::new(NotTakenPredictor, SimpleBTB::new(64, 4));
        not_taken.run(&trace);

        assert!(corr.stat.hit_rate() > taken.stat.hit_rate());
        assert!(corr.stat.hit_rate() > not_taken.stat.hit_rate());
        assert_eq!(not_taken.stat.btb_misses, 0);
    }

    #[test]
    fn btb_miss_overrides_taken_prediction() {
        let mut replay = Replay::new(correlating(), SimpleBTB::new(64, 4));
        let r = BranchRecord::new(0x1000, 0x0f00, BranchKind::DirectBranch, Outcome::T);
        let bucket = replay.predictor.history_table().bucket_index(r.pc);

        // Fill the history with 'taken' and train that pattern twice
        for _ in 0..10 {
            replay.step(&r);
        }
        assert_eq!(replay.predictor.history_table().read(bucket), 0xff);
        assert_eq!(replay.stat.get(r.pc).unwrap().hits, 0);

        // Forget the target: the taken prediction can't be followed
        replay.btb.invalidate(r.pc);
        replay.step(&r);
        assert_eq!(replay.stat.btb_misses, 1);
        assert_eq!(replay.stat.get(r.pc).unwrap().hits, 0);
        assert_eq!(replay.predictor.history_table().read(bucket), 0xff);

        // The resolved branch refilled the BTB
        replay.step(&r);
        assert_eq!(replay.stat.btb_misses, 1);
        assert_eq!(replay.stat.get(r.pc).unwrap().hits, 1);
        assert_eq!(replay.predictor.outstanding_tokens(), 0);
    }
}
