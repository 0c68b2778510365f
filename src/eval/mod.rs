//! Модуль оценки силы покерных рук (Texas Hold'em).
//!
//! Основные функции:
//!   `evaluate(hole, board) -> Result<HandRank, EvalError>`
//!   `compare_hands(&[HandRank]) -> Vec<usize>`

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::{compare_hands, evaluate, EvalError};
pub use hand_rank::{HandCategory, HandRank};
