//! Явный реестр игр: имя → фабрика. Собирается один раз при старте
//! и передаётся по ссылке туда, где создаются партии.

use std::collections::HashMap;

use crate::arena::config::GameConfig;
use crate::arena::game::{Game, GameError};
use crate::arena::orchestrator::ArenaError;
use crate::engine::{new_poker_game, POKER_GAME_TYPE};

/// Описание игры для реестра.
#[derive(Clone, Copy)]
pub struct GameFactory {
    pub name: &'static str,
    pub default_players: usize,
    pub make: fn(GameConfig) -> Result<Box<dyn Game>, GameError>,
}

#[derive(Clone, Default)]
pub struct GameRegistry {
    factories: HashMap<String, GameFactory>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Реестр со всеми встроенными играми.
    pub fn with_builtin_games() -> Self {
        let mut registry = Self::new();
        registry.register(GameFactory {
            name: POKER_GAME_TYPE,
            default_players: 2,
            make: new_poker_game,
        });
        registry
    }

    /// Зарегистрировать фабрику. Повторная регистрация имени заменяет старую.
    pub fn register(&mut self, factory: GameFactory) {
        self.factories.insert(factory.name.to_string(), factory);
    }

    pub fn get(&self, name: &str) -> Option<&GameFactory> {
        self.factories.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Создать партию по `config.game_type`.
    pub fn create(&self, config: GameConfig) -> Result<Box<dyn Game>, ArenaError> {
        let factory = self
            .get(&config.game_type)
            .ok_or_else(|| ArenaError::UnknownGameType(config.game_type.clone()))?;
        Ok((factory.make)(config)?)
    }
}
