//! Круговой турнир: все сочетания моделей по N игроков, каждое играется несколько раз.
//! Партии независимы и крутятся параллельно, каждая со своим состоянием.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::info;

use crate::arena::agent::AgentAdapter;
use crate::arena::config::{GameConfig, OrchestratorConfig, PlayerInfo};
use crate::arena::orchestrator::{ArenaError, GameReport, Orchestrator};
use crate::arena::registry::GameRegistry;

#[derive(Clone, Debug)]
pub struct RoundRobin {
    pub game_type: String,
    pub models: Vec<String>,
    pub games_per_matchup: usize,
    /// `None`: берём значение по умолчанию из реестра.
    pub players_per_game: Option<usize>,
    pub orchestrator: OrchestratorConfig,
}

/// Все сочетания `k` элементов из `items` в лексикографическом порядке.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    fn go<T: Clone>(items: &[T], k: usize, start: usize, cur: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..items.len() {
            cur.push(items[i].clone());
            go(items, k, i + 1, cur, out);
            cur.pop();
        }
    }

    let mut out = Vec::new();
    if k <= items.len() {
        go(items, k, 0, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

impl RoundRobin {
    /// Прогнать турнир. Отчёты возвращаются в порядке (сочетание, номер партии).
    /// Фатальная ошибка любой партии прерывает весь турнир.
    pub async fn run(
        &self,
        registry: &GameRegistry,
        agent: Arc<dyn AgentAdapter>,
    ) -> Result<Vec<GameReport>, ArenaError> {
        let factory = registry
            .get(&self.game_type)
            .ok_or_else(|| ArenaError::UnknownGameType(self.game_type.clone()))?;
        let per_game = self.players_per_game.unwrap_or(factory.default_players);

        let mut tasks = JoinSet::new();
        let mut slot = 0usize;

        for matchup in combinations(&self.models, per_game) {
            for _ in 0..self.games_per_matchup {
                let players = matchup.iter().map(|m| PlayerInfo::from_model(m)).collect();
                let mut game = registry.create(GameConfig::new(self.game_type.clone(), players))?;
                let agent = Arc::clone(&agent);
                let config = self.orchestrator.clone();
                let index = slot;
                slot += 1;

                tasks.spawn(async move {
                    let mut orchestrator = Orchestrator::new(agent, config);
                    let report = orchestrator.run(game.as_mut()).await;
                    (index, report)
                });
            }
        }

        info!(game_type = %self.game_type, games = slot, "round robin scheduled");

        let mut reports: Vec<Option<GameReport>> = vec![None; slot];
        while let Some(joined) = tasks.join_next().await {
            let (index, report) = joined.map_err(|e| ArenaError::Task(e.to_string()))?;
            reports[index] = Some(report?);
        }

        Ok(reports.into_iter().flatten().collect())
    }
}
