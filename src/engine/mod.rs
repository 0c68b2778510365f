//! Покерный движок: ставки, переход улиц, шоудаун, покерные правила для арены.
//!
//! Высокоуровневый объект: `HandEngine`
//! Основные операции:
//!   - `HandEngine::start` – запустить новую раздачу
//!   - `bet` / `call` / `raise_to` / `check` / `fold` – действия игрока
//!   - `advance_street` – открыть следующую улицу
//!   - `resolve` – выплатить банк и закрыть раздачу
//!
//! `PokerGame` подключает движок к оркестратору арены.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod hand_engine;
pub mod hand_history;
pub mod poker_game;
pub mod positions;
pub mod pot;
pub mod validation;

pub use actions::{AppliedAction, PokerAction};
pub use betting::BettingState;
pub use errors::EngineError;
pub use hand_engine::HandEngine;
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use poker_game::{new_poker_game, PokerGame, POKER_GAME_TYPE};
pub use pot::Pot;

/// RNG интерфейс для engine.
/// Реализации лежат в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
