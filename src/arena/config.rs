use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::arena::agent::RetryPolicy;
use crate::domain::PlayerId;

/// Публичная информация об участнике.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerInfo {
    pub player_id: PlayerId,
    /// Отображаемое имя, например `claude-opus`.
    pub name: String,
    /// Полное имя модели у провайдера.
    pub model: String,
}

impl PlayerInfo {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            player_id: PlayerId(player_id.into()),
            name: name.into(),
            model: model.into(),
        }
    }

    /// Игрок, у которого id, имя и модель совпадают (имя: хвост после `/`).
    pub fn from_model(model: &str) -> Self {
        let name = model.rsplit('/').next().unwrap_or(model);
        Self::new(model, name, model)
    }
}

fn default_max_rounds() -> u32 {
    50
}

/// Конфигурация одной партии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub game_type: String,
    pub players: Vec<PlayerInfo>,
    /// Параметры конкретной игры (`starting_chips`, `big_blind`, ...).
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl GameConfig {
    pub fn new(game_type: impl Into<String>, players: Vec<PlayerInfo>) -> Self {
        Self {
            game_type: game_type.into(),
            players,
            options: Map::new(),
            max_rounds: default_max_rounds(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Параметры цикла фаз.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Сколько фаз подряд без единого успешного действия терпим до аборта.
    pub stall_threshold: u32,
    /// Сколько фаз без действующих игроков подряд терпим до аборта.
    pub announcement_limit: u32,
    /// Сколько раз переспрашиваем игрока за ход после отклонённого действия.
    pub turn_attempts: u32,
    /// Повторы вызова агента при его отказе.
    pub retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            stall_threshold: 5,
            announcement_limit: 20,
            turn_attempts: 3,
            retry: RetryPolicy::default(),
        }
    }
}
