//! Техасский холдем как игра арены: матч из нескольких раздач до последнего
//! игрока с фишками (или до лимита раздач).

use std::collections::HashSet;
use std::fmt::Write as _;

use serde_json::{Map, Value};
use tracing::debug;

use crate::arena::{
    ActionChoice, ActionResult, ArgKind, Game, GameConfig, GameError, GameOutcome, GamePhase,
    LegalAction, PhaseType, PlayerInfo, Termination,
};
use crate::domain::card::format_cards;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandSummary, Street};
use crate::domain::player::{PlayerId, SeatStatus};
use crate::domain::table::{PokerConfig, Table, TableStakes};
use crate::engine::actions::PokerAction;
use crate::engine::errors::EngineError;
use crate::engine::hand_engine::HandEngine;
use crate::engine::hand_history::HandHistory;
use crate::engine::RandomSource;
use crate::infra::{new_game_id, DeterministicRng, SystemRng};

pub const POKER_GAME_TYPE: &str = "poker";

const MIN_PLAYERS: usize = 2;
const MAX_PLAYERS: usize = 10;
/// Сколько последних строк истории показываем в описании фаз и в виде игрока.
const HISTORY_TAIL: usize = 6;
const VIEW_HISTORY_TAIL: usize = 15;

/// Создать покерную партию по конфигу. С `seed` колода детерминирована.
pub fn new_poker_game(config: GameConfig) -> Result<Box<dyn Game>, GameError> {
    let settings = poker_config(&config)?;
    match settings.seed {
        Some(seed) => Ok(Box::new(PokerGame::new(config, DeterministicRng::from_u64(seed))?)),
        None => Ok(Box::new(PokerGame::new(config, SystemRng)?)),
    }
}

/// Разобрать и проверить покерные параметры из `GameConfig.options`.
pub fn poker_config(config: &GameConfig) -> Result<PokerConfig, GameError> {
    let defaults = PokerConfig::default();
    let options = &config.options;

    let starting_chips = opt_u64(options, "starting_chips")?.unwrap_or(defaults.starting_chips.0);
    let small_blind = opt_u64(options, "small_blind")?.unwrap_or(defaults.stakes.small_blind.0);
    let big_blind = opt_u64(options, "big_blind")?.unwrap_or(defaults.stakes.big_blind.0);
    let max_hands = match opt_u64(options, "max_hands")? {
        Some(n) => u32::try_from(n)
            .map_err(|_| GameError::Config(format!("max_hands is too large: {n}")))?,
        None => config.max_rounds.saturating_mul(5),
    };
    let seed = opt_u64(options, "seed")?;

    if small_blind == 0 || big_blind == 0 {
        return Err(GameError::Config("blinds must be positive".to_string()));
    }
    if small_blind > big_blind {
        return Err(GameError::Config(format!(
            "small blind {small_blind} is larger than big blind {big_blind}"
        )));
    }
    if starting_chips == 0 {
        return Err(GameError::Config("starting_chips must be positive".to_string()));
    }
    if max_hands == 0 {
        return Err(GameError::Config("max_hands must be positive".to_string()));
    }

    let n = config.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        return Err(GameError::Config(format!(
            "poker needs {MIN_PLAYERS}..={MAX_PLAYERS} players, got {n}"
        )));
    }
    let mut seen = HashSet::new();
    for p in &config.players {
        if !seen.insert(&p.player_id) {
            return Err(GameError::Config(format!("duplicate player id {}", p.player_id)));
        }
    }

    Ok(PokerConfig {
        starting_chips: Chips(starting_chips),
        stakes: TableStakes::new(Chips(small_blind), Chips(big_blind)),
        max_hands,
        seed,
    })
}

fn opt_u64(options: &Map<String, Value>, key: &str) -> Result<Option<u64>, GameError> {
    let bad = || GameError::Config(format!("option '{key}' must be a non-negative integer"));
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(bad),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| bad()),
        Some(_) => Err(bad()),
    }
}

pub struct PokerGame<R: RandomSource = SystemRng> {
    game_id: String,
    players: Vec<PlayerInfo>,
    settings: PokerConfig,
    table: Table,
    hand: Option<HandEngine>,
    /// Итог и история последней закрытой раздачи.
    last_hand: Option<(HandSummary, HandHistory)>,
    rng: R,
    round_number: u32,
}

impl<R: RandomSource + Send> PokerGame<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, GameError> {
        let settings = poker_config(&config)?;
        let ids: Vec<PlayerId> = config.players.iter().map(|p| p.player_id.clone()).collect();
        let table = Table::new(settings.stakes.clone(), &ids, settings.starting_chips);

        Ok(Self {
            game_id: new_game_id(),
            players: config.players,
            settings,
            table,
            hand: None,
            last_hand: None,
            rng,
            round_number: 0,
        })
    }

    pub fn settings(&self) -> &PokerConfig {
        &self.settings
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Текущая раздача, если идёт.
    pub fn hand(&self) -> Option<&HandEngine> {
        self.hand.as_ref()
    }

    pub fn last_hand(&self) -> Option<&HandSummary> {
        self.last_hand.as_ref().map(|(summary, _)| summary)
    }

    fn start_hand(&mut self, round: u32) -> Result<GamePhase, GameError> {
        if self.table.hands_played >= self.settings.max_hands {
            return Ok(GamePhase::game_over(round, "Hand limit reached."));
        }

        let hand = HandEngine::start(&mut self.table, &mut self.rng)?;
        let dealer = self.table.seats[hand.dealer].player_id.clone();
        let description = format!(
            "Hand #{} begins. Dealer: {}. Blinds: {}/{}.",
            hand.hand_number,
            self.player_name(&dealer),
            self.table.stakes.small_blind,
            self.table.stakes.big_blind,
        );
        self.hand = Some(hand);
        Ok(GamePhase::announcement(PhaseType::Resolution, round, description))
    }

    fn resolve_hand(&mut self, round: u32) -> Result<GamePhase, GameError> {
        let hand = self.hand.take().ok_or(EngineError::NoActiveHand)?;
        let (summary, history) = hand.resolve(&mut self.table)?;
        let description = format!(
            "Hand #{} resolved.\n{}",
            summary.hand_number,
            history
                .tail_lines(HISTORY_TAIL, |id| self.player_name(id))
                .join("\n")
        );
        self.last_hand = Some((summary, history));
        Ok(GamePhase::announcement(PhaseType::Resolution, round, description))
    }

    fn render_stacks(&self, out: &mut String) {
        let _ = writeln!(out, "Stacks:");
        for (idx, seat) in self.table.seats.iter().enumerate() {
            let mut tags = Vec::new();
            if self.hand.as_ref().map_or(false, |h| h.dealer == idx) {
                tags.push("dealer");
            }
            match seat.status {
                SeatStatus::Folded => tags.push("folded"),
                SeatStatus::AllIn => tags.push("all-in"),
                SeatStatus::Eliminated => tags.push("eliminated"),
                SeatStatus::Active => {}
            }
            let tags = if tags.is_empty() {
                String::new()
            } else {
                format!(" ({})", tags.join(", "))
            };
            let _ = writeln!(
                out,
                "  {}: {}{}",
                self.player_name(&seat.player_id),
                seat.stack,
                tags
            );
        }
    }
}

impl<R: RandomSource + Send> Game for PokerGame<R> {
    fn game_id(&self) -> &str {
        &self.game_id
    }

    fn game_type(&self) -> &str {
        POKER_GAME_TYPE
    }

    fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    fn next_phase(&mut self) -> Result<GamePhase, GameError> {
        self.round_number += 1;
        let round = self.round_number;

        loop {
            if self.table.seated_count() <= 1 {
                return Ok(GamePhase::game_over(round, "Tournament over."));
            }
            if self.hand.is_none() {
                return self.start_hand(round);
            }
            let Some(hand) = self.hand.as_mut() else {
                return Err(EngineError::NoActiveHand.into());
            };

            if hand.is_hand_over(&self.table) {
                return self.resolve_hand(round);
            }

            if hand.next_to_act(&self.table).is_none() || hand.is_betting_complete(&self.table) {
                let street = hand.advance_street(&self.table)?;
                if street != Street::Showdown && hand.betting.to_act.is_empty() {
                    // Ставить некому: докладываем борд до вскрытия.
                    hand.run_out_board()?;
                }
                continue;
            }

            let Some(seat) = hand.next_to_act(&self.table) else {
                continue;
            };
            let hand_number = hand.hand_number;
            let street = hand.street;
            let player = self.table.seats[seat].player_id.clone();
            let description = format!(
                "Hand #{hand_number} - {street}: {}'s turn to act.",
                self.player_name(&player)
            );
            return Ok(GamePhase::new(PhaseType::Action, round, description, vec![player]));
        }
    }

    fn player_view(&self, player: &PlayerId, phase: &GamePhase) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "You are {}.", self.player_name(player));
        let _ = writeln!(out, "{}", phase.description);

        let Some(hand) = self.hand.as_ref() else {
            self.render_stacks(&mut out);
            if let Some((_, history)) = &self.last_hand {
                let _ = writeln!(out, "Last hand:");
                for line in history.tail_lines(VIEW_HISTORY_TAIL, |id| self.player_name(id)) {
                    let _ = writeln!(out, "{line}");
                }
            }
            return out;
        };

        let seat = self.table.seat_of(player);
        let hole = seat.map(|s| hand.hole_cards(s)).unwrap_or(&[]);
        let board = if hand.board.is_empty() {
            "(none)".to_string()
        } else {
            format_cards(&hand.board)
        };
        let round_bet = seat.map(|s| hand.betting.round_bet(s)).unwrap_or(Chips::ZERO);
        let to_call = seat.map(|s| hand.betting.to_call(s)).unwrap_or(Chips::ZERO);

        let _ = writeln!(out, "Hand #{} - {}", hand.hand_number, hand.street);
        let _ = writeln!(out, "Your hole cards: {}", format_cards(hole));
        let _ = writeln!(out, "Board: {board}");
        let _ = writeln!(
            out,
            "Pot: {}. Current bet: {}. You have put in {} this round. To call: {}. Minimum raise to: {}.",
            hand.pot.total,
            hand.current_bet(),
            round_bet,
            to_call,
            hand.min_raise()
        );
        self.render_stacks(&mut out);

        let _ = writeln!(out, "Action so far:");
        for line in hand.history.tail_lines(VIEW_HISTORY_TAIL, |id| self.player_name(id)) {
            let _ = writeln!(out, "{line}");
        }
        out
    }

    fn legal_actions(&self, player: &PlayerId, phase: &GamePhase) -> Vec<LegalAction> {
        if phase.phase_type != PhaseType::Action || !phase.active_player_ids.contains(player) {
            return Vec::new();
        }
        let (Some(hand), Some(seat)) = (self.hand.as_ref(), self.table.seat_of(player)) else {
            return Vec::new();
        };
        if hand.betting.next_to_act() != Some(seat) || !self.table.seats[seat].can_act() {
            return Vec::new();
        }

        let stack = self.table.seats[seat].stack;
        let to_call = hand.betting.to_call(seat);
        let current_bet = hand.current_bet();

        let mut actions = vec![LegalAction::new(
            PokerAction::FOLD,
            "Fold your hand and forfeit any chips already in the pot.",
        )];

        if to_call.is_zero() {
            actions.push(LegalAction::new(
                PokerAction::CHECK,
                "Pass without betting (nothing to call).",
            ));
        } else {
            let call_amount = to_call.min(stack);
            actions.push(LegalAction::new(
                PokerAction::CALL,
                format!("Match the current bet: pay {call_amount} chips."),
            ));
        }

        if current_bet.is_zero() {
            actions.push(
                LegalAction::new(
                    PokerAction::BET,
                    format!("Open the betting. Amount above your stack of {stack} puts you all-in."),
                )
                .with_param("amount", ArgKind::Integer, "Chips to bet, at least 1."),
            );
        } else if stack > to_call {
            actions.push(
                LegalAction::new(
                    PokerAction::RAISE_TO,
                    format!(
                        "Raise the bet of {current_bet} to a new total for this round (at least {}, or all-in).",
                        hand.min_raise()
                    ),
                )
                .with_param("total", ArgKind::Integer, "Your total bet for this round after the raise."),
            );
        }

        actions
    }

    fn process_action(&mut self, player: &PlayerId, choice: &ActionChoice) -> ActionResult {
        let args = choice.args.clone();

        let action = match PokerAction::from_choice(choice) {
            Ok(action) => action,
            Err(msg) => return ActionResult::rejected(player.clone(), choice.name.clone(), args, msg),
        };

        let Some(hand) = self.hand.as_mut() else {
            return ActionResult::rejected(
                player.clone(),
                action.name(),
                args,
                EngineError::NoActiveHand.to_string(),
            );
        };

        match hand.apply(&mut self.table, player, action) {
            Ok(applied) => {
                ActionResult::succeeded(player.clone(), action.name(), args, applied.to_string())
            }
            Err(err) => {
                debug!(game_id = %self.game_id, player = %player, error = %err, "action rejected");
                ActionResult::rejected(player.clone(), action.name(), args, err.to_string())
            }
        }
    }

    fn check_game_over(&self) -> Option<GameOutcome> {
        let seated: Vec<PlayerId> = self
            .table
            .seats
            .iter()
            .filter(|s| s.is_seated())
            .map(|s| s.player_id.clone())
            .collect();

        let hand_limit_hit =
            self.hand.is_none() && self.table.hands_played >= self.settings.max_hands;

        let (winners, termination) = if seated.len() <= 1 {
            (seated, Termination::LastPlayerStanding)
        } else if hand_limit_hit {
            let top = self
                .table
                .seats
                .iter()
                .filter(|s| s.is_seated())
                .map(|s| s.stack)
                .max()
                .unwrap_or(Chips::ZERO);
            let leaders = self
                .table
                .seats
                .iter()
                .filter(|s| s.is_seated() && s.stack == top)
                .map(|s| s.player_id.clone())
                .collect();
            (leaders, Termination::MaxHandsReached)
        } else {
            return None;
        };

        let losers = self
            .table
            .seats
            .iter()
            .map(|s| s.player_id.clone())
            .filter(|id| !winners.contains(id))
            .collect();

        // Стабильная сортировка: при равных стеках сохраняется порядок рассадки.
        let mut by_chips: Vec<_> = self.table.seats.iter().collect();
        by_chips.sort_by(|a, b| b.stack.cmp(&a.stack));
        let ranking = by_chips.iter().map(|s| s.player_id.clone()).collect();

        let final_chips: Map<String, Value> = self
            .table
            .seats
            .iter()
            .map(|s| (s.player_id.to_string(), Value::from(s.stack.0)))
            .collect();

        Some(
            GameOutcome::new(
                self.game_id.clone(),
                POKER_GAME_TYPE,
                winners,
                losers,
                termination,
            )
            .with_ranking(ranking)
            .with_meta("hands_played", self.table.hands_played)
            .with_meta("final_chips", Value::Object(final_chips)),
        )
    }
}
