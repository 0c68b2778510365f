//! Оценка рук: категории, tie-break, сравнение, независимость от порядка карт.

mod common;

use common::cards;
use game_arena::eval::{compare_hands, evaluate, EvalError, HandCategory, HandRank};
use proptest::prelude::*;

#[test]
fn royal_flush() {
    let r = evaluate(&cards("Ah Kh"), &cards("Qh Jh Th 2c 3d")).unwrap();
    assert_eq!(r.category, HandCategory::RoyalFlush);
    assert_eq!(r.tiebreak, vec![14]);
}

#[test]
fn quads_use_best_kicker_and_beat_full_house() {
    let quads = evaluate(&cards("2c 2d"), &cards("2h 2s 5c 9d Kd")).unwrap();
    assert_eq!(quads.category, HandCategory::FourOfAKind);
    // Лучшая пятёрка: четыре двойки с королём.
    assert_eq!(quads.tiebreak, vec![2, 13]);

    let boat = evaluate(&cards("Ac Ad"), &cards("Ah Ks Kc 9d 3s")).unwrap();
    assert_eq!(boat.category, HandCategory::FullHouse);
    assert_eq!(boat.tiebreak, vec![14, 13]);
    assert!(quads > boat);
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = evaluate(&cards("Ah 2d"), &cards("3c 4s 5h 9d Kd")).unwrap();
    assert_eq!(wheel.category, HandCategory::Straight);
    assert_eq!(wheel.tiebreak, vec![5]);

    let six_high = evaluate(&cards("6h 2d"), &cards("3c 4s 5h 9d Kd")).unwrap();
    assert_eq!(six_high.category, HandCategory::Straight);
    assert_eq!(six_high.tiebreak, vec![6]);
    assert!(six_high > wheel);
}

#[test]
fn steel_wheel_is_a_straight_flush_not_royal() {
    let r = evaluate(&cards("Ad 2d"), &cards("3d 4d 5d Kc Ks")).unwrap();
    assert_eq!(r.category, HandCategory::StraightFlush);
    assert_eq!(r.tiebreak, vec![5]);
}

#[test]
fn two_pair_puts_higher_pair_first() {
    let r = evaluate(&cards("4c 4d"), &cards("Jh Js 9c 2d 3h")).unwrap();
    assert_eq!(r.category, HandCategory::TwoPair);
    assert_eq!(r.tiebreak, vec![11, 4, 9]);
}

#[test]
fn flush_compares_all_five_ranks() {
    let a = evaluate(&cards("Ah 9h"), &cards("7h 5h 3h Kc Qd")).unwrap();
    let b = evaluate(&cards("Ah 8h"), &cards("7h 5h 3h Kc Qd")).unwrap();
    assert_eq!(a.category, HandCategory::Flush);
    assert_eq!(a.tiebreak, vec![14, 9, 7, 5, 3]);
    assert!(a > b);
}

#[test]
fn insufficient_cards() {
    assert_eq!(
        evaluate(&cards("Ah Kh"), &cards("Qh Jh")),
        Err(EvalError::InsufficientCards(4))
    );
}

#[test]
fn three_equal_hands_all_win() {
    let board = cards("As Ks Qs Js Ts");
    let hands: Vec<HandRank> = ["2c 3d", "4h 5h", "7c 8d"]
        .iter()
        .map(|h| evaluate(&cards(h), &board).unwrap())
        .collect();
    assert_eq!(compare_hands(&hands), vec![0, 1, 2]);
}

#[test]
fn compare_hands_picks_strict_winner() {
    let board = cards("Kd 8s 5c 2h 9d");
    let hands: Vec<HandRank> = ["Kc Qc", "8d 8h", "Ac Jc"]
        .iter()
        .map(|h| evaluate(&cards(h), &board).unwrap())
        .collect();
    // Сет восьмёрок.
    assert_eq!(compare_hands(&hands), vec![1]);
}

fn seven_distinct_cards() -> impl Strategy<Value = Vec<game_arena::Card>> {
    Just(game_arena::Deck::standard_52().cards)
        .prop_shuffle()
        .prop_map(|deck| deck.into_iter().take(7).collect())
}

proptest! {
    #[test]
    fn evaluate_ignores_card_order(hand in seven_distinct_cards(), order in Just((0..7usize).collect::<Vec<_>>()).prop_shuffle()) {
        let base = evaluate(&hand[..2], &hand[2..]).unwrap();

        let permuted: Vec<_> = order.iter().map(|&i| hand[i]).collect();
        let again = evaluate(&permuted[..2], &permuted[2..]).unwrap();
        prop_assert_eq!(base, again);
    }
}
