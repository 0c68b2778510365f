//! Универсальный цикл фаз: спрашивает игру о следующей фазе, опрашивает
//! агентов по порядку, пишет результаты в лог, пока игра не закончится.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::arena::agent::{decide_with_retry, AgentAdapter, AgentError, DecisionRequest};
use crate::arena::config::OrchestratorConfig;
use crate::arena::game::{Game, GameError};
use crate::arena::outcome::{ActionResult, GameOutcome};
use crate::arena::phase::{GamePhase, PhaseType};
use crate::domain::PlayerId;

/// Ошибки уровня запуска партии. Партия при них не получает GameOutcome.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("unknown game type '{0}'")]
    UnknownGameType(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("agent for player {player} gave no decision after {attempts} attempts: {source}")]
    AgentExhausted {
        player: PlayerId,
        attempts: u32,
        #[source]
        source: AgentError,
    },

    #[error("game task failed: {0}")]
    Task(String),
}

/// Итог прогона: исход + полный лог действий.
#[derive(Clone, Debug)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub action_log: Vec<ActionResult>,
}

/// Реплика в стенограмме текущей фазы обсуждения.
struct Statement {
    speaker: String,
    text: String,
}

pub struct Orchestrator {
    agent: Arc<dyn AgentAdapter>,
    config: OrchestratorConfig,
    action_log: Vec<ActionResult>,
}

impl Orchestrator {
    pub fn new(agent: Arc<dyn AgentAdapter>, config: OrchestratorConfig) -> Self {
        Self {
            agent,
            config,
            action_log: Vec::new(),
        }
    }

    /// Все записанные результаты действий, в порядке записи.
    pub fn action_log(&self) -> &[ActionResult] {
        &self.action_log
    }

    /// Довести партию до конца.
    ///
    /// Отказ агента после всех повторов фатален и пробрасывается наверх.
    /// Застревание (N фаз подряд без успешного действия, включая фазы,
    /// где ходить было некому из-за пустых легальных действий): ничья `aborted`.
    pub async fn run(&mut self, game: &mut dyn Game) -> Result<GameReport, ArenaError> {
        let game_id = game.game_id().to_string();
        info!(
            game_id = %game_id,
            game_type = game.game_type(),
            players = game.players().len(),
            "game started"
        );

        let mut stalled_phases = 0u32;
        let mut idle_announcements = 0u32;

        let outcome = loop {
            let phase = game.next_phase()?;
            debug!(
                game_id = %game_id,
                round = phase.round_number,
                phase = %phase.phase_type,
                actors = phase.active_player_ids.len(),
                "{}",
                phase.description
            );

            if phase.is_game_over() {
                break game
                    .check_game_over()
                    .unwrap_or_else(|| GameOutcome::aborted(game_id.clone(), game.game_type()));
            }

            let log_start = self.action_log.len();
            match phase.phase_type {
                PhaseType::Discussion => self.run_discussion_phase(game, &phase).await?,
                _ => self.run_action_phase(game, &phase).await?,
            }
            let progressed = self.action_log[log_start..].iter().any(|a| a.success);

            // Объявления (фаза без игроков) застреванием не считаются,
            // но подряд их может быть не больше `announcement_limit`.
            if phase.active_player_ids.is_empty() {
                idle_announcements += 1;
            } else {
                idle_announcements = 0;
                if progressed {
                    stalled_phases = 0;
                } else {
                    stalled_phases += 1;
                }
            }

            if let Some(outcome) = game.check_game_over() {
                break outcome;
            }

            if stalled_phases >= self.config.stall_threshold
                || idle_announcements >= self.config.announcement_limit
            {
                warn!(
                    game_id = %game_id,
                    stalled_phases,
                    idle_announcements,
                    "no successful action for too long, aborting game"
                );
                break GameOutcome::aborted(game_id.clone(), game.game_type());
            }
        };

        info!(
            game_id = %game_id,
            termination = outcome.termination().unwrap_or("unknown"),
            winners = ?outcome.winner_ids,
            "game finished"
        );

        Ok(GameReport {
            outcome,
            action_log: self.action_log.clone(),
        })
    }

    /// Каждый игрок из списка ходит один раз, по порядку.
    async fn run_action_phase(
        &mut self,
        game: &mut dyn Game,
        phase: &GamePhase,
    ) -> Result<(), ArenaError> {
        for player in &phase.active_player_ids {
            self.take_turn(game, phase, player, "").await?;
        }
        Ok(())
    }

    /// Игроки говорят по очереди; каждый следующий видит предыдущие реплики.
    async fn run_discussion_phase(
        &mut self,
        game: &mut dyn Game,
        phase: &GamePhase,
    ) -> Result<(), ArenaError> {
        let mut transcript: Vec<Statement> = Vec::new();

        for player in &phase.active_player_ids {
            let context = render_transcript(&transcript);
            let Some(result) = self.take_turn(game, phase, player, &context).await? else {
                continue;
            };

            if result.success && result.is_public() {
                transcript.push(Statement {
                    speaker: game.player_name(player),
                    text: result.result.clone(),
                });
            }
        }
        Ok(())
    }

    /// Один ход игрока. Отклонённое действие пересказываем игроку и
    /// переспрашиваем, пока не кончится бюджет попыток на ход.
    ///
    /// `None`: у игрока нет легальных действий, ход пропущен.
    async fn take_turn(
        &mut self,
        game: &mut dyn Game,
        phase: &GamePhase,
        player: &PlayerId,
        context: &str,
    ) -> Result<Option<ActionResult>, ArenaError> {
        let mut feedback: Option<String> = None;
        let mut last: Option<ActionResult> = None;

        for _ in 0..self.config.turn_attempts.max(1) {
            let legal = game.legal_actions(player, phase);
            if legal.is_empty() {
                break;
            }

            let mut view = game.player_view(player, phase);
            view.push_str(context);
            if let Some(msg) = &feedback {
                view.push_str("\n\nYour previous action was rejected: ");
                view.push_str(msg);
            }

            let request = DecisionRequest {
                game_id: game.game_id(),
                player_id: player,
                phase,
                view: &view,
                legal_actions: &legal,
                max_attempts: self.config.retry.max_attempts,
            };

            let choice = decide_with_retry(self.agent.as_ref(), &request, &self.config.retry)
                .await
                .map_err(|source| ArenaError::AgentExhausted {
                    player: player.clone(),
                    attempts: self.config.retry.max_attempts.max(1),
                    source,
                })?;

            let result = game.process_action(player, &choice);
            debug!(
                game_id = game.game_id(),
                player = %player,
                action = %result.action_name,
                success = result.success,
                "{}",
                result.result
            );
            self.action_log.push(result.clone());

            let success = result.success;
            if !success {
                feedback = Some(result.result.clone());
            }
            last = Some(result);
            if success {
                break;
            }
        }

        Ok(last)
    }
}

fn render_transcript(transcript: &[Statement]) -> String {
    if transcript.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = transcript
        .iter()
        .map(|s| format!("{}: {}", s.speaker, s.text))
        .collect();
    format!("\n\n## Discussion so far:\n{}", lines.join("\n"))
}
