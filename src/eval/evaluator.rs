use thiserror::Error;

use crate::domain::card::{Card, Rank};

use super::hand_rank::{HandCategory, HandRank};
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Ошибки оценки руки.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("need at least 5 cards to evaluate, got {0}")]
    InsufficientCards(usize),
}

/// Главная функция: лучшая 5-карточная рука из hole + board.
///
/// Ожидается 2 карманные + 3..5 общих, но работает для любого набора от 5 карт.
/// Результат не зависит от порядка входных карт.
pub fn evaluate(hole: &[Card], board: &[Card]) -> Result<HandRank, EvalError> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);

    best_of_all_5card_combinations(&all_cards)
}

/// Индексы победителей. Равные руки попадают в список все вместе.
pub fn compare_hands(hands: &[HandRank]) -> Vec<usize> {
    let mut best: Vec<usize> = Vec::new();
    for (i, hand) in hands.iter().enumerate() {
        match best.first().map(|&b| hand.cmp(&hands[b])) {
            None | Some(std::cmp::Ordering::Greater) => best = vec![i],
            Some(std::cmp::Ordering::Equal) => best.push(i),
            Some(std::cmp::Ordering::Less) => {}
        }
    }
    best
}

/// Перебираем все комбинации 5 карт из N и выбираем лучшую.
fn best_of_all_5card_combinations(cards: &[Card]) -> Result<HandRank, EvalError> {
    let n = cards.len();
    if n < 5 {
        return Err(EvalError::InsufficientCards(n));
    }

    let mut best: Option<HandRank> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate_5card_hand(&five);
                        if best.as_ref().map_or(true, |best_r| r > *best_r) {
                            best = Some(r);
                        }
                    }
                }
            }
        }
    }

    best.ok_or(EvalError::InsufficientCards(n))
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_5card_hand(cards: &[Card; 5]) -> HandRank {
    let first_suit = cards[0].suit;
    let is_flush = cards.iter().all(|c| c.suit == first_suit);

    // Подсчёт рангов.
    let mut rank_counts = [0u8; 15]; // индексы 0..14, но используем 2..14
    let mut rank_mask: RankMask = 0;
    for card in cards.iter() {
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let straight_high = detect_straight(rank_mask);

    // Группы (rank, count): сначала по количеству (desc), затем по рангу (desc).
    let mut groups: Vec<(u8, u8)> = (2u8..=14)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (r, rank_counts[r as usize]))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    // pattern counts: например [4,1], [3,2], [3,1,1], [2,2,1], [2,1,1,1], [1,1,1,1,1]
    let pattern: Vec<u8> = groups.iter().map(|g| g.1).collect();
    let group_ranks: Vec<u8> = groups.iter().map(|g| g.0).collect();

    let mut ranks_desc: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    ranks_desc.sort_unstable_by(|a, b| b.cmp(a));

    if let (true, Some(high)) = (is_flush, straight_high) {
        let category = if high == Rank::Ace {
            HandCategory::RoyalFlush
        } else {
            HandCategory::StraightFlush
        };
        return HandRank::new(category, vec![high.value()]);
    }

    match pattern.as_slice() {
        [4, 1] => HandRank::new(HandCategory::FourOfAKind, group_ranks),
        [3, 2] => HandRank::new(HandCategory::FullHouse, group_ranks),
        _ if is_flush => HandRank::new(HandCategory::Flush, ranks_desc),
        _ if straight_high.is_some() => HandRank::new(
            HandCategory::Straight,
            straight_high.map(|h| vec![h.value()]).unwrap_or_default(),
        ),
        [3, 1, 1] => HandRank::new(HandCategory::ThreeOfAKind, group_ranks),
        // старшая пара первой, сортировка групп это уже гарантирует
        [2, 2, 1] => HandRank::new(HandCategory::TwoPair, group_ranks),
        [2, 1, 1, 1] => HandRank::new(HandCategory::OnePair, group_ranks),
        _ => HandRank::new(HandCategory::HighCard, ranks_desc),
    }
}
