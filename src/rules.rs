//! Table rules: action legality, dealer play, and outcome comparison.

use serde::{Deserialize, Serialize};

use crate::hand::Hand;
use crate::options::TableOptions;

/// A player decision during their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Draw one card.
    Hit,
    /// Keep the current hand and end the turn.
    Stand,
    /// Double the bet, draw exactly one card, and end the turn.
    DoubleDown,
    /// Split a pair into two independently played hands.
    Split,
}

/// Outcome of one hand against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Player wins even money.
    Win,
    /// Player loses the stake.
    Lose,
    /// Tie; stake returned.
    Push,
    /// Natural blackjack; pays the bonus multiplier.
    Blackjack,
}

/// The rules collaborator consulted by the game engine.
pub trait Rules {
    /// Returns whether the action is legal for the given hand.
    fn is_valid_action(&self, action: PlayerAction, hand: &Hand) -> bool;

    /// Returns whether the dealer must draw at the given hand value.
    fn should_dealer_hit(&self, value: u8, is_soft: bool) -> bool;

    /// Compares a player hand against the dealer's final hand.
    fn determine_result(&self, player_hand: &Hand, dealer_hand: &Hand) -> GameResult;

    /// Returns whether the hand is an eligible split pair.
    fn can_split(&self, hand: &Hand) -> bool;
}

/// Standard table rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRules {
    /// Whether the dealer stands on soft 17.
    pub stand_on_soft_17: bool,
    /// Whether double down is allowed after a split.
    pub double_after_split: bool,
}

impl StandardRules {
    /// Las Vegas strip rules: dealer stands on soft 17, double after
    /// split allowed.
    #[must_use]
    pub const fn vegas() -> Self {
        Self {
            stand_on_soft_17: true,
            double_after_split: true,
        }
    }

    /// Common European rules: dealer stands on soft 17, no double
    /// after split.
    #[must_use]
    pub const fn european() -> Self {
        Self {
            stand_on_soft_17: true,
            double_after_split: false,
        }
    }

    /// Derives rules from table options.
    #[must_use]
    pub const fn from_options(options: &TableOptions) -> Self {
        Self {
            stand_on_soft_17: options.stand_on_soft_17,
            double_after_split: options.double_after_split,
        }
    }
}

impl Default for StandardRules {
    fn default() -> Self {
        Self::vegas()
    }
}

fn is_natural(dealer_hand: &Hand) -> bool {
    dealer_hand.len() == 2 && dealer_hand.value() == 21
}

impl Rules for StandardRules {
    fn is_valid_action(&self, action: PlayerAction, hand: &Hand) -> bool {
        if hand.is_complete() {
            return false;
        }
        match action {
            PlayerAction::Hit | PlayerAction::Stand => true,
            PlayerAction::DoubleDown => {
                hand.len() == 2 && (!hand.is_from_split() || self.double_after_split)
            }
            PlayerAction::Split => self.can_split(hand),
        }
    }

    fn should_dealer_hit(&self, value: u8, is_soft: bool) -> bool {
        if value < 17 {
            return true;
        }
        value == 17 && is_soft && !self.stand_on_soft_17
    }

    fn determine_result(&self, player_hand: &Hand, dealer_hand: &Hand) -> GameResult {
        if player_hand.is_busted() {
            return GameResult::Lose;
        }

        let dealer_natural = is_natural(dealer_hand);

        // Split hands never qualify for the natural bonus, which
        // is_blackjack() already encodes.
        if player_hand.is_blackjack() {
            return if dealer_natural {
                GameResult::Push
            } else {
                GameResult::Blackjack
            };
        }

        if dealer_natural {
            return GameResult::Lose;
        }

        let dealer_value = dealer_hand.value();
        if dealer_value > 21 {
            return GameResult::Win;
        }

        let player_value = player_hand.value();
        if player_value > dealer_value {
            GameResult::Win
        } else if player_value < dealer_value {
            GameResult::Lose
        } else {
            GameResult::Push
        }
    }

    fn can_split(&self, hand: &Hand) -> bool {
        !hand.is_complete() && hand.is_pair()
    }
}
