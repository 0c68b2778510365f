//! Интеграционные тесты раздачи на уровне `HandEngine`.
//!
//! Проверяем:
//! - блайнды и первый ход (в том числе хедз-ап);
//! - переход Preflop -> Flop -> Turn -> River -> Showdown;
//! - минимальный рейз и олл-ин исключения;
//! - сохранение фишек и дележ банка с остатком.

mod common;

use common::{cards, init_logging};
use game_arena::domain::{Chips, PlayerId, SeatStatus, Street, Table, TableStakes};
use game_arena::engine::{EngineError, HandEngine, PokerAction};
use game_arena::eval::{compare_hands, evaluate};
use game_arena::infra::DeterministicRng;

fn make_table(stacks: &[u64]) -> (Table, Vec<PlayerId>) {
    let ids: Vec<PlayerId> = (0..stacks.len())
        .map(|i| PlayerId::new(format!("p{i}")))
        .collect();
    let mut table = Table::new(TableStakes::new(Chips(10), Chips(20)), &ids, Chips(1000));
    for (seat, &stack) in table.seats.iter_mut().zip(stacks) {
        seat.stack = Chips(stack);
    }
    (table, ids)
}

fn chips_on_table(table: &Table, hand: &HandEngine) -> Chips {
    table.total_stacks() + hand.pot.total
}

/// Все, кто в очереди, чекают до конца улицы.
fn check_around(hand: &mut HandEngine, table: &mut Table, ids: &[PlayerId]) {
    while let Some(seat) = hand.next_to_act(table) {
        hand.check(table, &ids[seat]).unwrap();
    }
    assert!(hand.is_betting_complete(table));
}

#[test]
fn heads_up_dealer_posts_small_blind_and_acts_first() {
    init_logging();
    let (mut t, _ids) = make_table(&[1000, 1000]);
    t.dealer_button = 1;
    let mut rng = DeterministicRng::from_u64(1);

    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    assert_eq!(hand.dealer, 1);
    assert_eq!(hand.small_blind_seat, 1);
    assert_eq!(hand.big_blind_seat, 0);
    assert_eq!(t.seats[1].stack, Chips(990));
    assert_eq!(t.seats[0].stack, Chips(980));
    assert_eq!(hand.pot.total, Chips(30));
    assert_eq!(hand.current_bet(), Chips(20));
    assert_eq!(hand.min_raise(), Chips(40));
    assert_eq!(hand.next_to_act(&t), Some(1));

    assert_eq!(hand.hole_cards(0).len(), 2);
    assert_eq!(hand.hole_cards(1).len(), 2);
    assert_eq!(hand.deck.len(), 48);
    assert_eq!(t.hands_played, 1);
}

#[test]
fn three_handed_blinds_and_preflop_order() {
    let (mut t, _ids) = make_table(&[1000, 1000, 1000]);
    let mut rng = DeterministicRng::from_u64(2);

    let hand = HandEngine::start(&mut t, &mut rng).unwrap();

    assert_eq!(hand.small_blind_seat, 1);
    assert_eq!(hand.big_blind_seat, 2);
    assert_eq!(hand.betting.to_act, vec![0, 1, 2]);
}

#[test]
fn blinds_are_clamped_to_the_stack() {
    let (mut t, _ids) = make_table(&[1000, 15]);
    let mut rng = DeterministicRng::from_u64(3);

    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    assert_eq!(t.seats[1].stack, Chips::ZERO);
    assert_eq!(t.seats[1].status, SeatStatus::AllIn);
    assert_eq!(hand.pot.total, Chips(25));
    assert_eq!(hand.current_bet(), Chips(15));
    // Олл-ин с блайнда не ходит.
    assert_eq!(hand.betting.to_act, vec![0]);
    assert_eq!(hand.next_to_act(&t), Some(0));
}

#[test]
fn heads_up_check_down_to_showdown() {
    init_logging();
    let (mut t, ids) = make_table(&[1000, 1000]);
    let mut rng = DeterministicRng::from_u64(42);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    let called = hand.call(&mut t, &ids[0]).unwrap();
    assert_eq!(called.paid, Chips(10));
    assert!(!hand.is_betting_complete(&t));
    hand.check(&mut t, &ids[1]).unwrap();
    assert!(hand.is_betting_complete(&t));

    for (street, board_len) in [(Street::Flop, 3), (Street::Turn, 4), (Street::River, 5)] {
        assert_eq!(hand.advance_street(&t).unwrap(), street);
        assert_eq!(hand.board.len(), board_len);
        assert_eq!(hand.current_bet(), Chips::ZERO);
        assert_eq!(hand.min_raise(), Chips(20));
        // Постфлоп первым ходит игрок слева от дилера.
        assert_eq!(hand.next_to_act(&t), Some(1));
        assert_eq!(
            hand.check(&mut t, &ids[0]),
            Err(EngineError::NotPlayersTurn(ids[0].clone()))
        );
        check_around(&mut hand, &mut t, &ids);
    }

    assert_eq!(hand.advance_street(&t).unwrap(), Street::Showdown);
    assert!(hand.is_hand_over(&t));

    let ranks: Vec<_> = [0, 1]
        .iter()
        .map(|&s| evaluate(hand.hole_cards(s), &hand.board).unwrap())
        .collect();
    let best = compare_hands(&ranks);

    let (summary, history) = hand.resolve(&mut t).unwrap();
    assert!(summary.showdown);
    assert_eq!(summary.total_pot, Chips(40));
    assert_eq!(summary.total_paid_out(), Chips(40));
    assert!(!history.is_empty());

    if best.len() == 1 {
        let winner = best[0];
        assert_eq!(t.seats[winner].stack, Chips(1020));
        assert_eq!(t.seats[1 - winner].stack, Chips(980));
    } else {
        assert_eq!(t.seats[0].stack, Chips(1000));
        assert_eq!(t.seats[1].stack, Chips(1000));
    }
    assert_eq!(t.dealer_button, 1);
}

#[test]
fn raise_below_minimum_is_rejected_without_side_effects() {
    let (mut t, ids) = make_table(&[1000, 1000]);
    let mut rng = DeterministicRng::from_u64(5);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    assert_eq!(
        hand.raise_to(&mut t, &ids[0], Chips(30)),
        Err(EngineError::RaiseTooSmall { min_raise: Chips(40) })
    );
    assert_eq!(hand.pot.total, Chips(30));
    assert_eq!(t.seats[0].stack, Chips(990));
    assert_eq!(hand.next_to_act(&t), Some(0));

    let raised = hand.raise_to(&mut t, &ids[0], Chips(40)).unwrap();
    assert_eq!(raised.action, PokerAction::RaiseTo(Chips(40)));
    assert_eq!(raised.paid, Chips(30));
    assert_eq!(hand.current_bet(), Chips(40));
    assert_eq!(hand.min_raise(), Chips(60));

    assert_eq!(
        hand.raise_to(&mut t, &ids[1], Chips(50)),
        Err(EngineError::RaiseTooSmall { min_raise: Chips(60) })
    );
    assert_eq!(
        hand.raise_to(&mut t, &ids[1], Chips(40)),
        Err(EngineError::RaiseNotAboveCurrent { current_bet: Chips(40) })
    );
    assert!(matches!(
        hand.bet(&mut t, &ids[1], Chips(100)),
        Err(EngineError::BetAlreadyOpen { .. })
    ));

    hand.raise_to(&mut t, &ids[1], Chips(60)).unwrap();
    // Рейз снова открыл торговлю для p0.
    assert_eq!(hand.next_to_act(&t), Some(0));
}

#[test]
fn short_all_in_raise_is_allowed_and_reopens() {
    let (mut t, ids) = make_table(&[1000, 45]);
    let total = t.total_stacks();
    let mut rng = DeterministicRng::from_u64(6);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    hand.raise_to(&mut t, &ids[0], Chips(40)).unwrap();

    // До минимума (60) не хватает, но это весь стек.
    let shove = hand.raise_to(&mut t, &ids[1], Chips(50)).unwrap();
    assert_eq!(shove.action, PokerAction::RaiseTo(Chips(45)));
    assert_eq!(shove.paid, Chips(25));
    assert!(shove.all_in);
    assert_eq!(hand.current_bet(), Chips(45));
    assert_eq!(hand.min_raise(), Chips(50));
    assert_eq!(hand.next_to_act(&t), Some(0));

    let call = hand.call(&mut t, &ids[0]).unwrap();
    assert_eq!(call.paid, Chips(5));
    assert!(hand.is_betting_complete(&t));

    // Ставить больше некому: очередь пуста, борд докладывается.
    assert_eq!(hand.advance_street(&t).unwrap(), Street::Flop);
    assert!(hand.betting.to_act.is_empty());
    hand.run_out_board().unwrap();
    assert_eq!(hand.board.len(), 5);
    assert!(hand.is_hand_over(&t));

    assert_eq!(chips_on_table(&t, &hand), total);
    let (summary, _) = hand.resolve(&mut t).unwrap();
    assert_eq!(summary.total_pot, Chips(90));
    assert_eq!(t.total_stacks(), total);
}

#[test]
fn all_in_below_current_bet_is_only_a_call() {
    let (mut t, ids) = make_table(&[1000, 35]);
    let mut rng = DeterministicRng::from_u64(7);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    hand.raise_to(&mut t, &ids[0], Chips(100)).unwrap();
    let shove = hand.raise_to(&mut t, &ids[1], Chips(200)).unwrap();

    assert_eq!(shove.action, PokerAction::Call);
    assert_eq!(shove.paid, Chips(15));
    assert!(shove.all_in);
    assert_eq!(hand.current_bet(), Chips(100));
    assert_eq!(hand.next_to_act(&t), None);
    assert!(hand.is_betting_complete(&t));
    assert_eq!(hand.pot.total, Chips(135));
}

#[test]
fn fold_hands_the_pot_to_the_last_player() {
    let (mut t, ids) = make_table(&[1000, 1000]);
    let mut rng = DeterministicRng::from_u64(8);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    hand.fold(&mut t, &ids[0]).unwrap();
    assert!(hand.is_hand_over(&t));

    let (summary, history) = hand.resolve(&mut t).unwrap();
    assert!(!summary.showdown);
    assert_eq!(summary.winners().collect::<Vec<_>>(), vec![&ids[1]]);
    assert_eq!(t.seats[0].stack, Chips(990));
    assert_eq!(t.seats[1].stack, Chips(1010));
    assert_eq!(t.seats[0].status, SeatStatus::Active);
    assert!(history
        .lines()
        .iter()
        .any(|l| l.contains("wins 30 chips (all others folded)")));
}

#[test]
fn three_way_tie_gives_the_odd_chip_to_the_first_winner() {
    let (mut t, ids) = make_table(&[1000, 1000, 1000, 1000]);
    let mut rng = DeterministicRng::from_u64(9);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    // Префлоп: UTG и дилер коллируют, SB фолдит, BB чекает. Банк 70.
    hand.call(&mut t, &ids[3]).unwrap();
    hand.call(&mut t, &ids[0]).unwrap();
    hand.fold(&mut t, &ids[1]).unwrap();
    hand.check(&mut t, &ids[2]).unwrap();
    assert!(hand.is_betting_complete(&t));
    assert_eq!(hand.pot.total, Chips(70));

    // Роял-флеш на борде: у всех оставшихся одинаковая рука.
    let mut rigged = cards("2c 3c 4c Ts Js Qs Ks As");
    hand.deck.cards.clear();
    hand.deck.cards.append(&mut rigged);

    while hand.advance_street(&t).unwrap() != Street::Showdown {
        check_around(&mut hand, &mut t, &ids);
    }
    assert_eq!(hand.board, cards("As Ks Qs Js Ts"));

    let (summary, _) = hand.resolve(&mut t).unwrap();
    assert_eq!(summary.total_paid_out(), Chips(70));
    assert_eq!(t.seats[0].stack, Chips(1004));
    assert_eq!(t.seats[1].stack, Chips(990));
    assert_eq!(t.seats[2].stack, Chips(1003));
    assert_eq!(t.seats[3].stack, Chips(1003));
    assert_eq!(t.total_stacks(), Chips(4000));

    let contributed: Chips = summary.results.iter().map(|r| r.contributed).sum();
    assert_eq!(contributed, summary.total_pot);
}

#[test]
fn busted_player_is_eliminated_and_button_skips_them() {
    let (mut t, ids) = make_table(&[1000, 1000, 1000]);
    t.dealer_button = 2;
    let mut rng = DeterministicRng::from_u64(10);
    let mut hand = HandEngine::start(&mut t, &mut rng).unwrap();

    // Дилер p2, SB p0, BB p1. Все трое олл-ин; исход зависит от карт,
    // поэтому проверяем только инварианты выбывания.
    hand.raise_to(&mut t, &ids[2], Chips(1000)).unwrap();
    hand.call(&mut t, &ids[0]).unwrap();
    hand.call(&mut t, &ids[1]).unwrap();
    assert!(hand.is_betting_complete(&t));
    assert_eq!(hand.advance_street(&t).unwrap(), Street::Flop);
    hand.run_out_board().unwrap();

    let (summary, _) = hand.resolve(&mut t).unwrap();
    assert_eq!(t.total_stacks(), Chips(3000));
    for seat in &t.seats {
        assert_eq!(seat.stack.is_zero(), seat.status == SeatStatus::Eliminated);
        assert_eq!(
            seat.stack.is_zero(),
            summary.eliminated.contains(&seat.player_id)
        );
    }
    if t.seated_count() >= 2 {
        assert!(t.seats[t.dealer_button].is_seated());
    }
}
