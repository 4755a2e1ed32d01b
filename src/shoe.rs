//! The shoe, its depletion tracking, and the reshuffle policy.

use core::fmt;
use std::time::SystemTime;

use log::{debug, info};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, DECK_SIZE, SUITS};

/// A shuffled multi-deck source of cards.
///
/// The engine asks the shoe for cards one at a time and asks it to
/// shuffle when the reshuffle policy says so. A shoe must not be shared
/// across two rounds running concurrently.
pub trait Shoe {
    /// Restores the shoe to a full, freshly shuffled state.
    fn shuffle(&mut self);

    /// Draws the next card, or `None` if the shoe is empty.
    fn draw(&mut self) -> Option<Card>;

    /// Returns the number of cards remaining.
    fn remaining_cards(&self) -> usize;

    /// Returns whether the shoe is empty.
    fn is_empty(&self) -> bool {
        self.remaining_cards() == 0
    }

    /// Returns the number of decks the shoe was built from.
    fn deck_count(&self) -> u8;

    /// Returns the fraction of the original card count remaining.
    fn remaining_percentage(&self) -> f64;
}

/// A standard multi-deck shoe shuffled by a seeded ChaCha RNG.
pub struct DeckShoe {
    cards: Vec<Card>,
    decks: u8,
    rng: ChaCha8Rng,
}

impl DeckShoe {
    /// Creates a new shuffled shoe with the given number of decks.
    #[must_use]
    pub fn new(decks: u8, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cards = Self::build(decks, &mut rng);
        Self { cards, decks, rng }
    }

    fn build(decks: u8, rng: &mut ChaCha8Rng) -> Vec<Card> {
        let mut cards = Vec::with_capacity(decks as usize * DECK_SIZE);

        for _ in 0..decks {
            for suit in SUITS {
                for rank in 1..=13 {
                    cards.push(Card::new(suit, rank));
                }
            }
        }

        cards.shuffle(rng);
        cards
    }
}

impl Shoe for DeckShoe {
    fn shuffle(&mut self) {
        self.cards = Self::build(self.decks, &mut self.rng);
    }

    fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    fn remaining_cards(&self) -> usize {
        self.cards.len()
    }

    fn deck_count(&self) -> u8 {
        self.decks
    }

    fn remaining_percentage(&self) -> f64 {
        let total = self.decks as usize * DECK_SIZE;
        if total == 0 {
            return 0.0;
        }
        self.cards.len() as f64 / total as f64
    }
}

/// A shoe that deals a fixed sequence of cards, in order.
///
/// This is the test-construction surface for deterministic rounds:
/// script the draws, build a game with [`GameBuilder::with_shoe`], and
/// drive the round. `shuffle` restores the original script.
///
/// [`GameBuilder::with_shoe`]: crate::GameBuilder::with_shoe
pub struct FixedShoe {
    script: Vec<Card>,
    next: usize,
}

impl FixedShoe {
    /// Creates a shoe dealing the given cards front to back.
    #[must_use]
    pub fn new(draws: Vec<Card>) -> Self {
        Self {
            script: draws,
            next: 0,
        }
    }
}

impl Shoe for FixedShoe {
    fn shuffle(&mut self) {
        self.next = 0;
    }

    fn draw(&mut self) -> Option<Card> {
        let card = self.script.get(self.next).copied()?;
        self.next += 1;
        Some(card)
    }

    fn remaining_cards(&self) -> usize {
        self.script.len() - self.next
    }

    fn deck_count(&self) -> u8 {
        self.script.len().div_ceil(DECK_SIZE).max(1) as u8
    }

    fn remaining_percentage(&self) -> f64 {
        if self.script.is_empty() {
            return 0.0;
        }
        self.remaining_cards() as f64 / self.script.len() as f64
    }
}

/// Why a reshuffle was triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReshuffleReason {
    /// Checked before dealing the initial cards.
    InitialDeal,
    /// Checked before a player draw (hit).
    PlayerDraw,
    /// Checked before drawing the double-down card.
    DoubleDown,
    /// Checked before dealing a fill card to a split hand.
    Split,
    /// Checked before a dealer draw.
    DealerDraw,
    /// Administrative reshuffle, with the operator's stated reason.
    Manual(String),
}

impl fmt::Display for ReshuffleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialDeal => f.write_str("initial deal"),
            Self::PlayerDraw => f.write_str("player draw"),
            Self::DoubleDown => f.write_str("double down"),
            Self::Split => f.write_str("split"),
            Self::DealerDraw => f.write_str("dealer draw"),
            Self::Manual(reason) => write!(f, "manual: {reason}"),
        }
    }
}

/// Notification emitted for every actual reshuffle.
///
/// Returned from the mutating call that triggered it; the engine keeps
/// no subscriber list and never waits on delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshuffleEvent {
    /// Fraction of the shoe remaining when the reshuffle triggered.
    pub remaining_at_trigger: f64,
    /// The penetration threshold in force.
    pub threshold: f64,
    /// Why the reshuffle happened.
    pub reason: ReshuffleReason,
    /// When the reshuffle happened.
    pub timestamp: SystemTime,
}

/// Derived snapshot of the shoe and reshuffle policy, recomputed on
/// demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoeStatus {
    /// Number of decks the shoe was built from.
    pub deck_count: u8,
    /// Cards remaining in the shoe.
    pub remaining_cards: usize,
    /// Fraction of the original card count remaining.
    pub remaining_percentage: f64,
    /// The penetration threshold in force.
    pub penetration_threshold: f64,
    /// Whether a reshuffle is currently due.
    pub needs_reshuffle: bool,
    /// Whether the engine reshuffles automatically.
    pub auto_reshuffle_enabled: bool,
}

/// Tracks shoe depletion and decides when to reshuffle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshufflePolicy {
    threshold: f64,
    auto_enabled: bool,
}

impl ReshufflePolicy {
    /// Creates a policy with the given penetration threshold.
    ///
    /// A threshold of 0 means a reshuffle is never due.
    #[must_use]
    pub const fn new(threshold: f64, auto_enabled: bool) -> Self {
        Self {
            threshold,
            auto_enabled,
        }
    }

    /// Returns whether a reshuffle is due for the given shoe.
    #[must_use]
    pub fn needs_reshuffle<S: Shoe + ?Sized>(&self, shoe: &S) -> bool {
        self.threshold > 0.0 && shoe.remaining_percentage() < self.threshold
    }

    /// Returns a derived snapshot of the shoe against this policy.
    #[must_use]
    pub fn status<S: Shoe + ?Sized>(&self, shoe: &S) -> ShoeStatus {
        ShoeStatus {
            deck_count: shoe.deck_count(),
            remaining_cards: shoe.remaining_cards(),
            remaining_percentage: shoe.remaining_percentage(),
            penetration_threshold: self.threshold,
            needs_reshuffle: self.needs_reshuffle(shoe),
            auto_reshuffle_enabled: self.auto_enabled,
        }
    }

    /// Checks the shoe before a draw and reshuffles if due and
    /// auto-reshuffle is enabled. Returns the event if one occurred.
    pub fn check_before_draw<S: Shoe + ?Sized>(
        &self,
        shoe: &mut S,
        reason: ReshuffleReason,
    ) -> Option<ReshuffleEvent> {
        if !self.auto_enabled || !self.needs_reshuffle(shoe) {
            debug!(
                "shoe at {:.1}% of {} decks, no reshuffle",
                shoe.remaining_percentage() * 100.0,
                shoe.deck_count()
            );
            return None;
        }
        Some(self.reshuffle_now(shoe, reason))
    }

    /// Unconditionally reshuffles the shoe and returns the event.
    pub fn reshuffle_now<S: Shoe + ?Sized>(
        &self,
        shoe: &mut S,
        reason: ReshuffleReason,
    ) -> ReshuffleEvent {
        let remaining_at_trigger = shoe.remaining_percentage();
        shoe.shuffle();
        info!(
            "reshuffled shoe ({reason}), was at {:.1}%",
            remaining_at_trigger * 100.0
        );
        ReshuffleEvent {
            remaining_at_trigger,
            threshold: self.threshold,
            reason,
            timestamp: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    #[test]
    fn deck_shoe_holds_all_cards() {
        let shoe = DeckShoe::new(6, 42);
        assert_eq!(shoe.remaining_cards(), 6 * DECK_SIZE);
        assert_eq!(shoe.deck_count(), 6);
        assert!((shoe.remaining_percentage() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deck_shoe_shuffle_restores_full_shoe() {
        let mut shoe = DeckShoe::new(2, 7);
        for _ in 0..30 {
            shoe.draw();
        }
        assert_eq!(shoe.remaining_cards(), 2 * DECK_SIZE - 30);
        shoe.shuffle();
        assert_eq!(shoe.remaining_cards(), 2 * DECK_SIZE);
    }

    #[test]
    fn fixed_shoe_deals_in_script_order() {
        let mut shoe = FixedShoe::new(vec![
            Card::new(Suit::Hearts, 10),
            Card::new(Suit::Spades, 8),
        ]);
        assert_eq!(shoe.draw(), Some(Card::new(Suit::Hearts, 10)));
        assert_eq!(shoe.draw(), Some(Card::new(Suit::Spades, 8)));
        assert_eq!(shoe.draw(), None);
        assert!(shoe.is_empty());
    }

    #[test]
    fn needs_reshuffle_below_threshold() {
        // 125 of 2600 cards remaining is about 4.8%.
        let mut shoe = DeckShoe::new(50, 3);
        for _ in 0..(50 * DECK_SIZE - 125) {
            shoe.draw();
        }
        let expected = 125.0 / 2600.0;
        let policy = ReshufflePolicy::new(0.25, true);
        assert!((shoe.remaining_percentage() - expected).abs() < 1e-9);
        assert!(policy.needs_reshuffle(&shoe));

        let event = policy
            .check_before_draw(&mut shoe, ReshuffleReason::InitialDeal)
            .expect("reshuffle due");
        assert!((event.remaining_at_trigger - expected).abs() < 1e-9);
        assert_eq!(event.threshold, 0.25);
        assert_eq!(shoe.remaining_cards(), 50 * DECK_SIZE);

        // Not due any more, so no second event.
        assert!(
            policy
                .check_before_draw(&mut shoe, ReshuffleReason::PlayerDraw)
                .is_none()
        );
    }

    #[test]
    fn auto_reshuffle_disabled_never_shuffles() {
        let mut shoe = FixedShoe::new(vec![Card::new(Suit::Clubs, 2); 4]);
        for _ in 0..3 {
            shoe.draw();
        }
        let policy = ReshufflePolicy::new(0.5, false);
        assert!(policy.needs_reshuffle(&shoe));
        assert!(
            policy
                .check_before_draw(&mut shoe, ReshuffleReason::PlayerDraw)
                .is_none()
        );
        assert_eq!(shoe.remaining_cards(), 1);
    }

    #[test]
    fn status_is_a_derived_snapshot() {
        let shoe = DeckShoe::new(1, 9);
        let policy = ReshufflePolicy::new(0.25, true);
        let status = policy.status(&shoe);
        assert_eq!(status.deck_count, 1);
        assert_eq!(status.remaining_cards, DECK_SIZE);
        assert!(!status.needs_reshuffle);
        assert!(status.auto_reshuffle_enabled);
    }
}
