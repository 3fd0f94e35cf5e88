//! A two-level correlating branch direction predictor, plus the trace and
//! statistics plumbing used to evaluate it.

pub mod branch;
pub mod error;
pub mod history;
pub mod predictor;
pub mod replay;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use error::*;
pub use history::*;
pub use predictor::*;
pub use trace::*;
