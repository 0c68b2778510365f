//! Движок пошаговых игр для автономных агентов.
//!
//! Слои, от листьев к корню:
//!   - `domain` – карты, колода, фишки, места, стол;
//!   - `eval` – оценка 7-карточных покерных рук;
//!   - `engine` – покерная раздача как конечный автомат и `PokerGame`;
//!   - `arena` – общий цикл фаз, граница с агентами, реестр игр, турнир;
//!   - `infra` – RNG и id партий.

pub mod arena;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;

pub use arena::{
    ActionChoice, ActionResult, AgentAdapter, AgentError, ArenaError, DecisionRequest, Game,
    GameConfig, GameError, GameOutcome, GamePhase, GameRegistry, GameReport, LegalAction,
    Orchestrator, OrchestratorConfig, PhaseType, PlayerInfo, RetryPolicy, RoundRobin, Termination,
};
pub use domain::{Card, Chips, Deck, PlayerId, Rank, Suit};
pub use engine::{EngineError, HandEngine, PokerGame};
pub use eval::{compare_hands, evaluate, EvalError, HandCategory, HandRank};
