//! Structured events emitted by a predictor, for whoever wants them.

use crate::predictor::ThreadId;

/// Something that happened inside a predictor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictorEvent {
    /// A conditional branch was predicted.
    Lookup {
        tid: ThreadId,
        addr: usize,
        bucket: usize,
        history: usize,
        counter: u8,
        prediction: bool,
    },

    /// An unconditional branch was fetched.
    Unconditional { tid: ThreadId, addr: usize },

    /// The newest outcome in a bucket was forced to 'not-taken' after a
    /// branch target buffer miss.
    BtbMiss { tid: ThreadId, addr: usize, bucket: usize, history: usize },

    /// A branch was resolved. `bucket` is [None] for unconditional branches.
    Update {
        tid: ThreadId,
        addr: usize,
        bucket: Option<usize>,
        taken: bool,
        squashed: bool,
    },

    /// Speculative state for a branch was discarded. `restored` is the
    /// history pattern written back, if any.
    Squash { tid: ThreadId, bucket: Option<usize>, restored: Option<usize> },
}

/// A hook called by a predictor with each [`PredictorEvent`].
pub trait PredictorObserver {
    fn on_event(&mut self, event: &PredictorEvent);
}

impl<F: FnMut(&PredictorEvent)> PredictorObserver for F {
    fn on_event(&mut self, event: &PredictorEvent) {
        self(event)
    }
}

/// Forwards every event to the [`log`] facade at the 'trace' level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;
impl PredictorObserver for LogObserver {
    fn on_event(&mut self, event: &PredictorEvent) {
        match *event {
            PredictorEvent::Lookup { tid, addr, bucket, history, counter, prediction } => {
                log::trace!(
                    "[t{}] lookup {:#x}: bucket={} history={:#b} ctr={} -> {}",
                    tid, addr, bucket, history, counter,
                    if prediction { "T" } else { "N" },
                );
            },
            PredictorEvent::Unconditional { tid, addr } => {
                log::trace!("[t{}] uncond {:#x}", tid, addr);
            },
            PredictorEvent::BtbMiss { tid, addr, bucket, history } => {
                log::trace!("[t{}] btb miss {:#x}: bucket={} history={:#b}",
                    tid, addr, bucket, history);
            },
            PredictorEvent::Update { tid, addr, bucket, taken, squashed } => {
                log::trace!("[t{}] update {:#x}: bucket={:?} taken={} squashed={}",
                    tid, addr, bucket, taken, squashed);
            },
            PredictorEvent::Squash { tid, bucket, restored } => {
                log::trace!("[t{}] squash: bucket={:?} restored={:?}",
                    tid, bucket, restored);
            },
        }
    }
}
