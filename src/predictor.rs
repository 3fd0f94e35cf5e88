//! Implementations of different branch direction predictors.

pub mod btb;
pub mod correlating;
pub mod counter;
pub mod observer;
pub mod pht;
pub mod simple;
pub mod table;
pub mod threaded;

pub use btb::*;
pub use correlating::*;
pub use counter::*;
pub use observer::*;
pub use pht::*;
pub use simple::*;
pub use table::*;
pub use threaded::*;

/// Identifies a hardware thread driving a predictor.
pub type ThreadId = usize;

/// Interface between a fetch/execute pipeline and a branch direction
/// predictor.
///
/// Every call to [`lookup`](Self::lookup) or
/// [`uncond_branch`](Self::uncond_branch) hands back a token which must be
/// returned exactly once, either to [`update`](Self::update) or to
/// [`squash`](Self::squash).
///
/// The predictor doesn't track which branches are in flight. When two
/// outstanding branches share predictor state, the caller must resolve or
/// squash them in the order they were looked up.
pub trait DirectionPredictor {
    /// Per-prediction state carried from lookup to resolution.
    type Token;

    fn name(&self) -> &'static str;

    /// Predict a conditional branch, speculatively updating any history.
    fn lookup(&mut self, tid: ThreadId, addr: usize) -> (bool, Self::Token);

    /// Record a branch known to be unconditional at fetch time.
    fn uncond_branch(&mut self, tid: ThreadId, addr: usize) -> Self::Token;

    /// The branch target buffer had no entry for this address, so the
    /// branch will be fetched as not-taken.
    fn btb_update(&mut self, tid: ThreadId, addr: usize);

    /// Repair speculative history with the resolved outcome of a branch,
    /// without giving up its token. Predictors without speculative history
    /// have nothing to do here.
    fn correct_history(&mut self, _tid: ThreadId, _addr: usize, _taken: bool,
        _token: &Self::Token)
    {
    }

    /// Resolve a branch. When `squashed` is set, the instructions after the
    /// branch were thrown away: history is repaired but nothing is trained.
    fn update(&mut self, tid: ThreadId, addr: usize, taken: bool,
        token: Self::Token, squashed: bool);

    /// Throw away all speculative state created when predicting a branch.
    fn squash(&mut self, tid: ThreadId, token: Self::Token);
}
