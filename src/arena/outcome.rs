use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::arena::agent::ActionArgs;
use crate::domain::PlayerId;

/// Результат одной попытки действия игрока. После записи в лог не меняется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionResult {
    pub player_id: PlayerId,
    pub action_name: String,
    pub action_args: ActionArgs,
    /// Текст, который увидит игрок (и остальные, если действие публичное).
    pub result: String,
    pub success: bool,
    /// Кому видно; `None`: всем.
    pub visible_to: Option<Vec<PlayerId>>,
}

impl ActionResult {
    pub fn succeeded(
        player_id: PlayerId,
        action_name: impl Into<String>,
        action_args: ActionArgs,
        result: impl Into<String>,
    ) -> Self {
        Self {
            player_id,
            action_name: action_name.into(),
            action_args,
            result: result.into(),
            success: true,
            visible_to: None,
        }
    }

    pub fn rejected(
        player_id: PlayerId,
        action_name: impl Into<String>,
        action_args: ActionArgs,
        result: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            ..Self::succeeded(player_id, action_name, action_args, result)
        }
    }

    pub fn visible_only_to(mut self, players: Vec<PlayerId>) -> Self {
        self.visible_to = Some(players);
        self
    }

    pub fn is_public(&self) -> bool {
        self.visible_to.is_none()
    }

    pub fn is_visible_to(&self, player: &PlayerId) -> bool {
        self.visible_to
            .as_ref()
            .map_or(true, |ids| ids.contains(player))
    }
}

/// Причина завершения партии: фиксированный словарь, его читает внешний рейтинг.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Checkmate,
    Stalemate,
    AllTasksCompleted,
    LastPlayerStanding,
    MaxHandsReached,
    Aborted,
}

impl Termination {
    pub fn as_str(self) -> &'static str {
        match self {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::AllTasksCompleted => "all_tasks_completed",
            Termination::LastPlayerStanding => "last_player_standing",
            Termination::MaxHandsReached => "max_hands_reached",
            Termination::Aborted => "aborted",
        }
    }
}

pub const TERMINATION_KEY: &str = "termination";

/// Итог партии. Создаётся ровно один раз, когда оркестратор видит завершение.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameOutcome {
    pub game_id: String,
    pub game_type: String,
    pub winner_ids: Vec<PlayerId>,
    pub loser_ids: Vec<PlayerId>,
    pub ranking: Option<Vec<PlayerId>>,
    /// Всегда содержит ключ `termination`.
    pub metadata: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl GameOutcome {
    pub fn new(
        game_id: impl Into<String>,
        game_type: impl Into<String>,
        winner_ids: Vec<PlayerId>,
        loser_ids: Vec<PlayerId>,
        termination: Termination,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            TERMINATION_KEY.to_string(),
            Value::String(termination.as_str().to_string()),
        );
        Self {
            game_id: game_id.into(),
            game_type: game_type.into(),
            winner_ids,
            loser_ids,
            ranking: None,
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// Ничья без победителей: партия застряла.
    pub fn aborted(game_id: impl Into<String>, game_type: impl Into<String>) -> Self {
        Self::new(game_id, game_type, Vec::new(), Vec::new(), Termination::Aborted)
    }

    pub fn with_ranking(mut self, ranking: Vec<PlayerId>) -> Self {
        self.ranking = Some(ranking);
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != TERMINATION_KEY {
            self.metadata.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn termination(&self) -> Option<&str> {
        self.metadata.get(TERMINATION_KEY).and_then(Value::as_str)
    }

    pub fn is_draw(&self) -> bool {
        self.winner_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_is_always_present() {
        let outcome = GameOutcome::aborted("g1", "poker").with_meta(TERMINATION_KEY, "checkmate");
        assert_eq!(outcome.termination(), Some("aborted"));
        assert!(outcome.is_draw());
    }

    #[test]
    fn termination_serializes_as_snake_case() {
        let v = serde_json::to_value(Termination::MaxHandsReached).unwrap();
        assert_eq!(v, Value::String("max_hands_reached".into()));
    }

    #[test]
    fn restricted_results_are_hidden_from_others() {
        let a = PlayerId::from("a");
        let b = PlayerId::from("b");
        let r = ActionResult::succeeded(a.clone(), "peek", ActionArgs::new(), "saw a card")
            .visible_only_to(vec![a.clone()]);
        assert!(r.is_visible_to(&a));
        assert!(!r.is_visible_to(&b));
        assert!(!r.is_public());
    }
}
