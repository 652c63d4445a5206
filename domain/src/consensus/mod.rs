//! Consensus domain
//!
//! Value objects and pure logic for cross-evaluated consensus:
//!
//! ```text
//!   prompt ─┬─> agent A ─> Response A ─┐
//!           ├─> agent B ─> Response B ─┼─> cross-evaluation ─> Aggregator ─> ConsensusResult
//!           └─> agent C ─> Response C ─┘    (every agent scores
//!                                            every other agent)
//! ```
//!
//! - [`Response`] — one agent's answer in one iteration
//! - [`Score`] / [`Evaluation`] — one agent's critique of another's answer
//! - [`parse_evaluation`] — tolerant extraction of a score from model output
//! - [`Aggregator`] — mean scores, winner selection, threshold check

pub mod aggregate;
pub mod evaluation;
pub mod parsing;
pub mod phase;
pub mod response;
pub mod result;

pub use aggregate::{Aggregator, DEFAULT_CONSENSUS_THRESHOLD, rank};
pub use evaluation::{Evaluation, FALLBACK_FEEDBACK, MAX_TOTAL_SCORE, Score};
pub use parsing::{EvaluationParseError, ParsedEvaluation, parse_evaluation};
pub use phase::Phase;
pub use response::Response;
pub use result::{ConsensusResult, Standing};
