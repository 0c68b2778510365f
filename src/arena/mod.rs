//! Арена: общий для всех игр цикл фаз и граница с агентами.
//!
//! Высокоуровневый объект: `Orchestrator`
//!   - спрашивает `Game` о следующей фазе;
//!   - опрашивает агентов через `AgentAdapter`;
//!   - пишет `ActionResult` в лог и выдаёт `GameOutcome`.

pub mod agent;
pub mod config;
pub mod game;
pub mod orchestrator;
pub mod outcome;
pub mod phase;
pub mod registry;
pub mod tournament;

pub use agent::{
    decide_with_retry, ActionArgs, ActionChoice, ActionParam, AgentAdapter, AgentError, ArgKind,
    DecisionRequest, LegalAction, RetryPolicy,
};
pub use config::{GameConfig, OrchestratorConfig, PlayerInfo};
pub use game::{Game, GameError};
pub use orchestrator::{ArenaError, GameReport, Orchestrator};
pub use outcome::{ActionResult, GameOutcome, Termination};
pub use phase::{GamePhase, PhaseType};
pub use registry::{GameFactory, GameRegistry};
pub use tournament::RoundRobin;
