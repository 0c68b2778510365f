use thiserror::Error;

use crate::arena::agent::{ActionChoice, LegalAction};
use crate::arena::config::PlayerInfo;
use crate::arena::outcome::{ActionResult, GameOutcome};
use crate::arena::phase::GamePhase;
use crate::domain::PlayerId;

/// Ошибки набора правил, которые нельзя выразить неуспешным ActionResult.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid game config: {0}")]
    Config(String),

    #[error("rule engine failure: {0}")]
    Rules(String),
}

/// Хуки, через которые оркестратор ведёт любую игру.
///
/// Каждый экземпляр владеет своим состоянием целиком; между экземплярами
/// ничего не разделяется, поэтому хватает `Send`.
pub trait Game: Send {
    fn game_id(&self) -> &str;

    fn game_type(&self) -> &str;

    fn players(&self) -> &[PlayerInfo];

    /// Продвинуть внутреннее состояние и вернуть следующую фазу.
    fn next_phase(&mut self) -> Result<GamePhase, GameError>;

    /// Текст состояния, который разрешено видеть игроку.
    fn player_view(&self, player: &PlayerId, phase: &GamePhase) -> String;

    /// Что игрок может сделать сейчас. Пусто: игрок пропускается.
    fn legal_actions(&self, player: &PlayerId, phase: &GamePhase) -> Vec<LegalAction>;

    /// Проверить и применить действие. Нарушение правил: неуспешный результат, не ошибка.
    fn process_action(&mut self, player: &PlayerId, choice: &ActionChoice) -> ActionResult;

    /// `Some`: партия закончена.
    fn check_game_over(&self) -> Option<GameOutcome>;

    /// Отображаемое имя игрока (для стенограммы обсуждения).
    fn player_name(&self, player: &PlayerId) -> String {
        self.players()
            .iter()
            .find(|p| &p.player_id == player)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| player.to_string())
    }
}
