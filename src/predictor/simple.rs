//! Predictors with no state, useful as a baseline.

use crate::predictor::*;

/// A simple predictor with no state: randomly predict an outcome.
pub struct RandomPredictor;
impl DirectionPredictor for RandomPredictor {
    type Token = ();
    fn name(&self) -> &'static str { "RandomPredictor" }
    fn lookup(&mut self, _: ThreadId, _: usize) -> (bool, ()) {
        (rand::random::<bool>(), ())
    }
    fn uncond_branch(&mut self, _: ThreadId, _: usize) {}
    fn btb_update(&mut self, _: ThreadId, _: usize) {}
    fn update(&mut self, _: ThreadId, _: usize, _: bool, _: (), _: bool) {}
    fn squash(&mut self, _: ThreadId, _: ()) {}
}

/// A simple predictor with no state: always predict 'taken'.
pub struct TakenPredictor;
impl DirectionPredictor for TakenPredictor {
    type Token = ();
    fn name(&self) -> &'static str { "TakenPredictor" }
    fn lookup(&mut self, _: ThreadId, _: usize) -> (bool, ()) { (true, ()) }
    fn uncond_branch(&mut self, _: ThreadId, _: usize) {}
    fn btb_update(&mut self, _: ThreadId, _: usize) {}
    fn update(&mut self, _: ThreadId, _: usize, _: bool, _: (), _: bool) {}
    fn squash(&mut self, _: ThreadId, _: ()) {}
}

/// A simple predictor with no state: always predict 'not-taken'.
pub struct NotTakenPredictor;
impl DirectionPredictor for NotTakenPredictor {
    type Token = ();
    fn name(&self) -> &'static str { "NotTakenPredictor" }
    fn lookup(&mut self, _: ThreadId, _: usize) -> (bool, ()) { (false, ()) }
    fn uncond_branch(&mut self, _: ThreadId, _: usize) {}
    fn btb_update(&mut self, _: ThreadId, _: usize) {}
    fn update(&mut self, _: ThreadId, _: usize, _: bool, _: (), _: bool) {}
    fn squash(&mut self, _: ThreadId, _: ()) {}
}
