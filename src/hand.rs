//! Hand representation and the hand-value engine.

use serde::{Deserialize, Serialize};

use crate::card::Card;

const fn card_value(rank: u8) -> u8 {
    match rank {
        1 => 11,
        2..=10 => rank,
        11..=13 => 10,
        _ => 0,
    }
}

/// Scores a card sequence: face cards count 10, Aces count 11 and are
/// demoted to 1 one at a time while the total exceeds 21.
///
/// Returns `(value, is_soft)` where `is_soft` means an Ace is still
/// counted as 11. Order-independent.
#[must_use]
pub fn evaluate_cards(cards: &[Card]) -> (u8, bool) {
    let mut value: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        value = value.saturating_add(card_value(card.rank));
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= 21;
    (value, is_soft)
}

/// Hand status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    /// Hand is active and can take actions.
    Active,
    /// Player has stood (or the hand was closed by a double-down or
    /// single-card split-ace rule).
    Stand,
    /// Hand has busted (over 21).
    Bust,
    /// Hand is a natural blackjack. Never set on a split hand.
    Blackjack,
}

/// An ordered sequence of cards belonging to one player or one split
/// sub-hand, plus its resolution status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    status: HandStatus,
    from_split: bool,
}

impl Hand {
    /// Creates a new empty hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            status: HandStatus::Active,
            from_split: false,
        }
    }

    /// Creates a new hand from a split, seeded with a single card.
    ///
    /// Split hands are permanently excluded from the natural-blackjack
    /// bonus: reaching 21 with two cards leaves the status `Active`.
    #[must_use]
    pub fn from_split(card: Card) -> Self {
        Self {
            cards: vec![card],
            status: HandStatus::Active,
            from_split: true,
        }
    }

    /// Adds a card and re-scores the hand.
    ///
    /// Busting sets [`HandStatus::Bust`]; a two-card 21 on a non-split
    /// hand sets [`HandStatus::Blackjack`].
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);

        let (value, _) = evaluate_cards(&self.cards);

        if value > 21 {
            self.status = HandStatus::Bust;
        } else if self.cards.len() == 2 && value == 21 && !self.from_split {
            self.status = HandStatus::Blackjack;
        }
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the current status of the hand.
    #[must_use]
    pub const fn status(&self) -> HandStatus {
        self.status
    }

    /// Marks the hand as stood, closing it for further actions.
    pub const fn stand(&mut self) {
        self.status = HandStatus::Stand;
    }

    /// Returns whether this hand came from a split.
    #[must_use]
    pub const fn is_from_split(&self) -> bool {
        self.from_split
    }

    /// Returns whether the hand is resolved (no further actions).
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        !matches!(self.status, HandStatus::Active)
    }

    /// Calculates the value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        evaluate_cards(&self.cards).0
    }

    /// Returns whether the hand is soft (an Ace counted as 11).
    #[must_use]
    pub fn is_soft(&self) -> bool {
        evaluate_cards(&self.cards).1
    }

    /// Returns whether the hand is bust.
    #[must_use]
    pub fn is_busted(&self) -> bool {
        matches!(self.status, HandStatus::Bust)
    }

    /// Returns whether the hand is a natural blackjack.
    ///
    /// Always `false` for a hand produced by a split, regardless of its
    /// cards.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        matches!(self.status, HandStatus::Blackjack)
    }

    /// Returns whether the hand is a pair of equal rank.
    #[must_use]
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank == self.cards[1].rank
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns the second card of a pair (for splitting).
    pub fn take_split_card(&mut self) -> Option<Card> {
        if self.cards.len() == 2 {
            self.cards.pop()
        } else {
            None
        }
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    const fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn ace_king_is_natural_blackjack() {
        let mut hand = Hand::new();
        hand.add_card(card(Suit::Hearts, 1));
        hand.add_card(card(Suit::Spades, 13));
        assert_eq!(hand.value(), 21);
        assert!(hand.is_blackjack());
        assert!(hand.is_soft());
    }

    #[test]
    fn ace_ace_nine_is_soft_twenty_one() {
        let (value, soft) = evaluate_cards(&[
            card(Suit::Hearts, 1),
            card(Suit::Spades, 1),
            card(Suit::Clubs, 9),
        ]);
        assert_eq!(value, 21);
        assert!(soft);
    }

    #[test]
    fn ten_ten_five_busts() {
        let mut hand = Hand::new();
        hand.add_card(card(Suit::Hearts, 10));
        hand.add_card(card(Suit::Spades, 10));
        hand.add_card(card(Suit::Diamonds, 5));
        assert_eq!(hand.value(), 25);
        assert!(hand.is_busted());
    }

    #[test]
    fn value_is_order_independent() {
        let forward = evaluate_cards(&[
            card(Suit::Hearts, 1),
            card(Suit::Spades, 10),
            card(Suit::Clubs, 5),
        ]);
        let backward = evaluate_cards(&[
            card(Suit::Clubs, 5),
            card(Suit::Spades, 10),
            card(Suit::Hearts, 1),
        ]);
        assert_eq!(forward, backward);
        assert_eq!(forward.0, 16);
    }

    #[test]
    fn split_hand_twenty_one_is_not_blackjack() {
        let mut hand = Hand::from_split(card(Suit::Hearts, 1));
        hand.add_card(card(Suit::Clubs, 13));
        assert_eq!(hand.value(), 21);
        assert!(!hand.is_blackjack());
        assert_eq!(hand.status(), HandStatus::Active);
    }

    #[test]
    fn pair_detection() {
        let mut hand = Hand::new();
        hand.add_card(card(Suit::Hearts, 8));
        hand.add_card(card(Suit::Diamonds, 8));
        assert!(hand.is_pair());
        hand.add_card(card(Suit::Clubs, 2));
        assert!(!hand.is_pair());
    }
}
