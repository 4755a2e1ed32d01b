//! Seats and split-hand management.
//!
//! A seat turns one player's hand into an ordered list of
//! independently played hands. The outer turn loop treats a split
//! player as a sub-sequence via [`Seat::has_more_hands`] and
//! [`Seat::advance_hand`] without special-casing splits.

use serde::{Deserialize, Serialize};

use crate::betting::Bet;
use crate::card::Card;
use crate::hand::Hand;

/// A hand paired with the bet that backs it.
///
/// After a split every hand carries its own bet and settles
/// independently against the dealer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHand {
    /// The cards.
    pub hand: Hand,
    /// The wager backing this hand.
    pub bet: Bet,
}

impl PlayerHand {
    /// Returns whether the hand still awaits play.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.hand.is_complete()
    }
}

/// One player's position at the table for a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    name: String,
    hands: Vec<PlayerHand>,
    current: usize,
}

impl Seat {
    /// Creates a seat with a single empty hand backed by the bet.
    #[must_use]
    pub fn new(name: String, bet: Bet) -> Self {
        Self {
            name,
            hands: vec![PlayerHand {
                hand: Hand::new(),
                bet,
            }],
            current: 0,
        }
    }

    /// Returns the player's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all hands, in play order.
    #[must_use]
    pub fn hands(&self) -> &[PlayerHand] {
        &self.hands
    }

    /// Returns the index of the hand currently being played.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Returns the hand currently being played.
    #[must_use]
    pub fn current_hand(&self) -> Option<&PlayerHand> {
        self.hands.get(self.current)
    }

    /// Returns the hand currently being played, mutably.
    pub fn current_hand_mut(&mut self) -> Option<&mut PlayerHand> {
        self.hands.get_mut(self.current)
    }

    pub(crate) fn hands_mut(&mut self) -> &mut [PlayerHand] {
        &mut self.hands
    }

    /// Returns whether an active split sub-hand follows the current one.
    #[must_use]
    pub fn has_more_hands(&self) -> bool {
        self.hands
            .iter()
            .skip(self.current + 1)
            .any(PlayerHand::is_active)
    }

    /// Advances to the player's next active hand. Returns `true` if one
    /// was found.
    pub fn advance_hand(&mut self) -> bool {
        for index in (self.current + 1)..self.hands.len() {
            if self.hands[index].is_active() {
                self.current = index;
                return true;
            }
        }
        self.current = self.hands.len();
        false
    }

    /// Returns whether every hand at this seat is resolved.
    #[must_use]
    pub fn all_resolved(&self) -> bool {
        self.hands.iter().all(|h| !h.is_active())
    }

    /// Returns whether any hand at this seat is not busted.
    #[must_use]
    pub fn any_live(&self) -> bool {
        self.hands.iter().any(|h| !h.hand.is_busted())
    }

    /// Splits the current hand into two, each seeded with one of the
    /// original cards and backed by its own bet.
    ///
    /// The caller validates eligibility and supplies the replacement
    /// bets; returns `None` when the current hand is not a pair.
    pub fn split_current(&mut self, first_bet: Bet, second_bet: Bet) -> Option<(Card, Card)> {
        let index = self.current;
        let player_hand = self.hands.get_mut(index)?;
        let second_card = player_hand.hand.take_split_card()?;
        let first_card = player_hand.hand.cards().first().copied()?;

        self.hands[index] = PlayerHand {
            hand: Hand::from_split(first_card),
            bet: first_bet,
        };
        self.hands.insert(
            index + 1,
            PlayerHand {
                hand: Hand::from_split(second_card),
                bet: second_bet,
            },
        );
        Some((first_card, second_card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::{BetKind, BettingRound};
    use crate::card::Suit;
    use crate::money::{Currency, Money};

    fn bet_of(amount: i64) -> Bet {
        let player = "amy".to_owned();
        let bankrolls = [(player.clone(), Money::from_major(1000, Currency::Usd))]
            .into_iter()
            .collect();
        let mut round = BettingRound::new(vec![player], bankrolls);
        round
            .place_bet("amy", Money::from_major(amount, Currency::Usd), BetKind::Standard)
            .unwrap();
        round.take_bet("amy").unwrap()
    }

    fn seat_with_pair(rank: u8) -> Seat {
        let mut seat = Seat::new("amy".to_owned(), bet_of(10));
        let hand = &mut seat.current_hand_mut().unwrap().hand;
        hand.add_card(Card::new(Suit::Hearts, rank));
        hand.add_card(Card::new(Suit::Diamonds, rank));
        seat
    }

    #[test]
    fn split_seeds_each_hand_with_one_original_card() {
        let mut seat = seat_with_pair(8);
        let (first, second) = seat.split_current(bet_of(10), bet_of(10)).unwrap();

        assert_eq!(first.rank, 8);
        assert_eq!(second.rank, 8);
        assert_eq!(seat.hands().len(), 2);
        for player_hand in seat.hands() {
            assert_eq!(player_hand.hand.len(), 1);
            assert!(player_hand.hand.is_from_split());
        }
    }

    #[test]
    fn advance_skips_resolved_hands() {
        let mut seat = seat_with_pair(8);
        seat.split_current(bet_of(10), bet_of(10)).unwrap();

        // Resolve the second hand out of band; advancing finds nothing.
        seat.hands_mut()[1].hand.stand();
        seat.hands_mut()[0].hand.stand();
        assert!(!seat.advance_hand());
        assert!(seat.all_resolved());
    }

    #[test]
    fn has_more_hands_after_split() {
        let mut seat = seat_with_pair(9);
        assert!(!seat.has_more_hands());
        seat.split_current(bet_of(10), bet_of(10)).unwrap();
        assert!(seat.has_more_hands());
        assert!(seat.advance_hand());
        assert_eq!(seat.current_index(), 1);
        assert!(!seat.has_more_hands());
    }
}
