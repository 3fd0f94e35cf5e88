//! Implementation of a two-level correlating predictor.
//!
//! A [`HistoryTable`] keeps a short history of outcomes for each (hashed)
//! branch address. The bucket index and its history pattern together select
//! a [`SaturatingCounter`] in a [`PatternTable`], so the same branch can be
//! predicted differently depending on what it did recently.

pub mod config;

pub use config::*;

use crate::history::*;
use crate::predictor::*;

use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of the ids stamped into each predictor's tokens.
static NEXT_PREDICTOR_ID: AtomicUsize = AtomicUsize::new(0);

/// The history read at prediction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HistorySnapshot {
    bucket: usize,
    history: usize,
}

/// State carried from a prediction to the matching update or squash.
///
/// Tokens can't be cloned: passing one to
/// [`DirectionPredictor::update`] or [`DirectionPredictor::squash`] consumes
/// it. A token may only be returned to the predictor which issued it.
#[must_use = "tokens must be returned to the predictor with `update` or `squash`"]
#[derive(Debug, PartialEq, Eq)]
pub struct BranchToken {
    /// Id of the issuing [`CorrelatingPredictor`]
    owner: usize,

    /// [None] for unconditional branches, which never touch the tables
    snapshot: Option<HistorySnapshot>,
    predicted_taken: bool,
}
impl BranchToken {
    fn conditional(owner: usize, bucket: usize, history: usize,
        predicted_taken: bool) -> Self
    {
        Self {
            owner,
            snapshot: Some(HistorySnapshot { bucket, history }),
            predicted_taken,
        }
    }

    fn unconditional(owner: usize) -> Self {
        Self { owner, snapshot: None, predicted_taken: true }
    }

    pub fn predicted_taken(&self) -> bool { self.predicted_taken }
    pub fn is_conditional(&self) -> bool { self.snapshot.is_some() }

    /// The history table bucket used for the prediction.
    pub(crate) fn bucket(&self) -> Option<usize> {
        self.snapshot.map(|s| s.bucket)
    }

    /// The history pattern read before the speculative update.
    pub(crate) fn history(&self) -> Option<usize> {
        self.snapshot.map(|s| s.history)
    }
}

/// A two-level correlating ("local history") branch predictor.
pub struct CorrelatingPredictor {
    /// The configuration used to create this object
    cfg: CorrelatingConfig,

    /// Per-bucket history registers
    history: HistoryTable,

    /// Counters indexed by (bucket, history pattern)
    pattern: PatternTable,

    /// Number of tokens handed out and not yet returned
    outstanding: usize,

    /// Stamped into every token issued by this instance
    id: usize,

    observer: Option<Box<dyn PredictorObserver>>,
}

impl CorrelatingPredictor {
    pub(crate) fn from_config(cfg: CorrelatingConfig) -> Self {
        Self {
            history: HistoryTable::new(
                cfg.history_entries, cfg.history_bits, cfg.inst_shift
            ),
            pattern: PatternTable::new(
                cfg.history_entries, cfg.history_bits, cfg.ctr
            ),
            outstanding: 0,
            id: NEXT_PREDICTOR_ID.fetch_add(1, Ordering::Relaxed),
            observer: None,
            cfg,
        }
    }

    /// Attach a hook which is called with every [`PredictorEvent`].
    pub fn with_observer(mut self, observer: impl PredictorObserver + 'static)
        -> Self
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn PredictorObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &CorrelatingConfig { &self.cfg }
    pub fn history_table(&self) -> &HistoryTable { &self.history }
    pub fn pattern_table(&self) -> &PatternTable { &self.pattern }

    /// Number of tokens which haven't been returned through `update` or
    /// `squash` yet.
    pub fn outstanding_tokens(&self) -> usize { self.outstanding }

    /// Clear all history and counters. Outstanding tokens are left dangling,
    /// so this is only meaningful between runs.
    pub fn reset(&mut self) {
        self.history.clear();
        self.pattern.reset();
    }

    fn emit(&mut self, event: PredictorEvent) {
        if let Some(obs) = self.observer.as_mut() {
            obs.on_event(&event);
        }
    }

    fn issue(&mut self, token: BranchToken) -> BranchToken {
        self.outstanding += 1;
        token
    }

    /// Panics unless `token` was issued by this predictor. Must run before
    /// the token touches any table.
    fn check_owner(&self, token: &BranchToken) {
        assert_eq!(token.owner, self.id,
            "token returned to a predictor which never issued it");
    }

    fn release(&mut self, _token: BranchToken) {
        assert!(self.outstanding > 0, "more tokens returned than were issued");
        self.outstanding -= 1;
    }

    /// Rewrite a bucket as if the speculative append had used the real outcome.
    fn repair(&mut self, snap: HistorySnapshot, taken: bool) {
        self.history.restore(snap.bucket, (snap.history << 1) | taken as usize);
    }
}

impl DirectionPredictor for CorrelatingPredictor {
    type Token = BranchToken;

    fn name(&self) -> &'static str { "CorrelatingPredictor" }

    fn lookup(&mut self, tid: ThreadId, addr: usize) -> (bool, BranchToken) {
        let bucket = self.history.bucket_index(addr);
        let history = self.history.read(bucket);

        // Row is the bucket, column is its history pattern
        let idx = self.pattern.pattern_index(bucket, history);
        let prediction = self.pattern.predict(idx);
        let counter = self.pattern.counter(idx).value();

        let token = self.issue(
            BranchToken::conditional(self.id, bucket, history, prediction)
        );

        // If this is wrong, it gets repaired or squashed later
        self.history.append_speculative(bucket, prediction);

        self.emit(PredictorEvent::Lookup {
            tid, addr, bucket, history, counter, prediction
        });
        (prediction, token)
    }

    fn uncond_branch(&mut self, tid: ThreadId, addr: usize) -> BranchToken {
        self.emit(PredictorEvent::Unconditional { tid, addr });
        self.issue(BranchToken::unconditional(self.id))
    }

    fn btb_update(&mut self, tid: ThreadId, addr: usize) {
        let bucket = self.history.bucket_index(addr);
        self.history.clear_low_bit(bucket);
        let history = self.history.read(bucket);
        self.emit(PredictorEvent::BtbMiss { tid, addr, bucket, history });
    }

    fn correct_history(&mut self, _tid: ThreadId, addr: usize, taken: bool,
        token: &BranchToken)
    {
        self.check_owner(token);
        if let Some(snap) = token.snapshot {
            debug_assert_eq!(self.history.bucket_index(addr), snap.bucket,
                "branch {:#x} resolved against another address's token", addr);
            self.repair(snap, taken);
        }
    }

    fn update(&mut self, tid: ThreadId, addr: usize, taken: bool,
        token: BranchToken, squashed: bool)
    {
        self.check_owner(&token);
        let bucket = token.bucket();
        if let Some(snap) = token.snapshot {
            debug_assert_eq!(self.history.bucket_index(addr), snap.bucket,
                "branch {:#x} resolved against another address's token", addr);
            if squashed {
                self.repair(snap, taken);
            } else {
                let idx = self.pattern.pattern_index(snap.bucket, snap.history);
                self.pattern.confirm(idx, taken);
            }
        }
        self.release(token);
        self.emit(PredictorEvent::Update { tid, addr, bucket, taken, squashed });
    }

    fn squash(&mut self, tid: ThreadId, token: BranchToken) {
        self.check_owner(&token);
        let bucket = token.bucket();
        let restored = token.snapshot.map(|snap| {
            self.history.restore(snap.bucket, snap.history);
            snap.history
        });
        self.release(token);
        self.emit(PredictorEvent::Squash { tid, bucket, restored });
    }
}
