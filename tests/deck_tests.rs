//! Колода: полнота, отсутствие дублей, детерминизм по seed, досдача из сброса.

mod common;

use std::collections::HashSet;

use game_arena::domain::{Card, Deck};
use game_arena::infra::DeterministicRng;
use proptest::prelude::*;

proptest! {
    #[test]
    fn shuffled_deck_is_exactly_the_standard_52(seed in any::<u64>()) {
        let mut rng = DeterministicRng::from_u64(seed);
        let deck = Deck::shuffled(&mut rng);

        prop_assert_eq!(deck.len(), 52);
        let unique: HashSet<Card> = deck.cards.iter().copied().collect();
        let standard: HashSet<Card> = Deck::standard_52().cards.into_iter().collect();
        prop_assert_eq!(unique, standard);
    }

    #[test]
    fn dealing_only_shrinks_the_deck(seed in any::<u64>(), n in 0usize..60) {
        let mut rng = DeterministicRng::from_u64(seed);
        let mut deck = Deck::shuffled(&mut rng);
        let dealt = deck.draw_n(n);

        prop_assert_eq!(dealt.len(), n.min(52));
        prop_assert_eq!(deck.len(), 52 - dealt.len());
        for c in &dealt {
            prop_assert!(!deck.cards.contains(c));
        }
    }
}

#[test]
fn same_seed_same_order() {
    let a = Deck::shuffled(&mut DeterministicRng::from_u64(7));
    let b = Deck::shuffled(&mut DeterministicRng::from_u64(7));
    assert_eq!(a, b);
}

#[test]
fn full_deck_cycles_through_the_discard_pile() {
    let mut rng = DeterministicRng::from_u64(1);
    let mut deck = Deck::shuffled(&mut rng);
    let mut discard = deck.draw_n(52);
    assert!(deck.is_empty());

    let card = deck.draw_or_reshuffle(&mut discard, &mut rng);
    assert!(card.is_some());
    assert!(discard.is_empty());
    assert_eq!(deck.len(), 51);
}
