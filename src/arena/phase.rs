use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

/// Тип фазы. Оркестратор различает только Discussion (реплики видны следующим
/// спикерам) и всё остальное (каждый ходит один раз по порядку).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Setup,
    Discussion,
    Voting,
    Action,
    Resolution,
    GameOver,
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseType::Setup => "setup",
            PhaseType::Discussion => "discussion",
            PhaseType::Voting => "voting",
            PhaseType::Action => "action",
            PhaseType::Resolution => "resolution",
            PhaseType::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

/// Текущая фаза игры. Создаётся заново на каждой итерации цикла, не мутируется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamePhase {
    pub phase_type: PhaseType,
    pub round_number: u32,
    pub description: String,
    /// Кто должен действовать, в порядке хода.
    pub active_player_ids: Vec<PlayerId>,
}

impl GamePhase {
    pub fn new(
        phase_type: PhaseType,
        round_number: u32,
        description: impl Into<String>,
        active_player_ids: Vec<PlayerId>,
    ) -> Self {
        Self {
            phase_type,
            round_number,
            description: description.into(),
            active_player_ids,
        }
    }

    /// Фаза без действующих игроков (объявления, подведение итогов).
    pub fn announcement(
        phase_type: PhaseType,
        round_number: u32,
        description: impl Into<String>,
    ) -> Self {
        Self::new(phase_type, round_number, description, Vec::new())
    }

    pub fn game_over(round_number: u32, description: impl Into<String>) -> Self {
        Self::announcement(PhaseType::GameOver, round_number, description)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase_type == PhaseType::GameOver
    }
}
