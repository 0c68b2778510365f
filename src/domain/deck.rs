use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::engine::RandomSource;

/// Колода карт. В домене это просто упорядоченный список карт,
/// верх колоды = конец вектора.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// Свежая перемешанная колода.
    pub fn shuffled<R: RandomSource>(rng: &mut R) -> Self {
        let mut deck = Self::standard_52();
        rng.shuffle(&mut deck.cards);
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять n карт сверху. Если карт меньше, вернёт сколько есть.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        let mut taken = self.cards.split_off(self.cards.len() - take);
        taken.reverse();
        taken
    }

    /// Взять карту; если колода пуста, замешать сброс обратно и тянуть из него.
    ///
    /// Для игр со сбросом. Холдем за одну раздачу 52 карты не выбирает.
    pub fn draw_or_reshuffle<R: RandomSource>(
        &mut self,
        discard: &mut Vec<Card>,
        rng: &mut R,
    ) -> Option<Card> {
        if self.cards.is_empty() && !discard.is_empty() {
            self.cards.append(discard);
            rng.shuffle(&mut self.cards);
        }
        self.draw_one()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::infra::DeterministicRng;

    #[test]
    fn standard_deck_has_52_distinct_cards() {
        let deck = Deck::standard_52();
        let set: HashSet<Card> = deck.cards.iter().copied().collect();
        assert_eq!(deck.len(), 52);
        assert_eq!(set.len(), 52);
    }

    #[test]
    fn draw_shrinks_deck() {
        let mut deck = Deck::standard_52();
        let top = *deck.cards.last().unwrap();
        assert_eq!(deck.draw_one(), Some(top));
        let three = deck.draw_n(3);
        assert_eq!(three.len(), 3);
        assert_eq!(deck.len(), 48);
        assert!(!three.contains(&top));
    }

    #[test]
    fn draw_n_past_the_bottom_returns_what_is_left() {
        let mut deck = Deck { cards: Deck::standard_52().cards[..2].to_vec() };
        assert_eq!(deck.draw_n(5).len(), 2);
        assert!(deck.is_empty());
        assert_eq!(deck.draw_one(), None);
    }

    #[test]
    fn empty_deck_pulls_discard_back_in() {
        let mut rng = DeterministicRng::from_u64(7);
        let mut deck = Deck { cards: Vec::new() };
        let mut discard = Deck::standard_52().cards[..5].to_vec();
        let before: HashSet<Card> = discard.iter().copied().collect();

        let card = deck.draw_or_reshuffle(&mut discard, &mut rng).unwrap();

        assert!(discard.is_empty());
        assert!(before.contains(&card));
        assert_eq!(deck.len(), 4);
    }

    #[test]
    fn nothing_to_draw_anywhere() {
        let mut rng = DeterministicRng::from_u64(7);
        let mut deck = Deck { cards: Vec::new() };
        assert_eq!(deck.draw_or_reshuffle(&mut Vec::new(), &mut rng), None);
    }
}
