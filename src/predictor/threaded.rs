//! One predictor instance per hardware thread.

use crate::predictor::*;

/// Routes each call to a predictor owned exclusively by the calling thread.
pub struct PerThreadPredictor<P> {
    threads: Vec<P>,
}
impl<P> PerThreadPredictor<P> {
    pub fn new(threads: Vec<P>) -> Self {
        assert!(!threads.is_empty());
        Self { threads }
    }

    pub fn num_threads(&self) -> usize { self.threads.len() }

    pub fn thread(&self, tid: ThreadId) -> &P {
        assert!(tid < self.threads.len(), "no predictor for thread {}", tid);
        &self.threads[tid]
    }

    pub fn thread_mut(&mut self, tid: ThreadId) -> &mut P {
        assert!(tid < self.threads.len(), "no predictor for thread {}", tid);
        &mut self.threads[tid]
    }
}

impl<P: DirectionPredictor> DirectionPredictor for PerThreadPredictor<P> {
    type Token = P::Token;

    fn name(&self) -> &'static str { self.threads[0].name() }

    fn lookup(&mut self, tid: ThreadId, addr: usize) -> (bool, P::Token) {
        self.thread_mut(tid).lookup(tid, addr)
    }

    fn uncond_branch(&mut self, tid: ThreadId, addr: usize) -> P::Token {
        self.thread_mut(tid).uncond_branch(tid, addr)
    }

    fn btb_update(&mut self, tid: ThreadId, addr: usize) {
        self.thread_mut(tid).btb_update(tid, addr)
    }

    fn correct_history(&mut self, tid: ThreadId, addr: usize, taken: bool,
        token: &P::Token)
    {
        self.thread_mut(tid).correct_history(tid, addr, taken, token)
    }

    fn update(&mut self, tid: ThreadId, addr: usize, taken: bool,
        token: P::Token, squashed: bool)
    {
        self.thread_mut(tid).update(tid, addr, taken, token, squashed)
    }

    fn squash(&mut self, tid: ThreadId, token: P::Token) {
        self.thread_mut(tid).squash(tid, token)
    }
}
