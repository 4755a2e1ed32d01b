//! Converts round outcomes into payouts and returns.

use serde::{Deserialize, Serialize};

use crate::betting::Bet;
use crate::money::{Currency, Money};
use crate::rules::GameResult;

/// Settled outcome of one hand: the bet behind it, the game result,
/// and the money movement it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutResult {
    /// The player who played the hand.
    pub player: String,
    /// Index of the hand within the player's hands (post-split).
    pub hand_index: usize,
    /// The settled bet backing the hand.
    pub bet: Bet,
    /// The outcome against the dealer.
    pub result: GameResult,
    /// Winnings on top of the stake.
    pub payout: Money,
    /// Stake plus winnings returned to the player.
    pub total_return: Money,
}

/// Aggregate settlement for the round.
///
/// Outcome determination and payout processing are separable: if the
/// external payout service fails, `payout_error` is set and the
/// per-hand results remain intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSummary {
    /// Per-hand settled results, in seat order.
    pub results: Vec<PayoutResult>,
    /// Number of winning hands.
    pub wins: usize,
    /// Number of losing hands.
    pub losses: usize,
    /// Number of pushed hands.
    pub pushes: usize,
    /// Number of natural blackjacks.
    pub blackjacks: usize,
    /// Sum of all winnings.
    pub total_payout: Money,
    /// Sum of all returns (stakes plus winnings).
    pub total_return: Money,
    /// Set when the external payout service failed; the outcomes above
    /// are still valid.
    pub payout_error: Option<String>,
}

impl PayoutSummary {
    /// Aggregates per-hand results into a round summary.
    #[must_use]
    pub fn from_results(results: Vec<PayoutResult>, currency: Currency) -> Self {
        let mut summary = Self {
            results: Vec::new(),
            wins: 0,
            losses: 0,
            pushes: 0,
            blackjacks: 0,
            total_payout: Money::zero(currency),
            total_return: Money::zero(currency),
            payout_error: None,
        };

        for result in &results {
            match result.result {
                GameResult::Win => summary.wins += 1,
                GameResult::Lose => summary.losses += 1,
                GameResult::Push => summary.pushes += 1,
                GameResult::Blackjack => summary.blackjacks += 1,
            }
            // All amounts share the table currency by construction.
            summary.total_payout = Money::from_cents(
                summary.total_payout.cents() + result.payout.cents(),
                currency,
            );
            summary.total_return = Money::from_cents(
                summary.total_return.cents() + result.total_return.cents(),
                currency,
            );
        }

        summary.results = results;
        summary
    }

    /// Marks the payout portion unavailable after a service failure.
    pub fn mark_payouts_unavailable(&mut self, reason: String) {
        self.payout_error = Some(reason);
    }

    /// Returns the results for one player (multiple hands post-split).
    #[must_use]
    pub fn for_player(&self, player: &str) -> Vec<&PayoutResult> {
        self.results.iter().filter(|r| r.player == player).collect()
    }
}

/// The terminal summary of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_busted: bool,
    /// Whether the dealer held a natural blackjack.
    pub dealer_blackjack: bool,
    /// Per-hand settlement and aggregates.
    pub payouts: PayoutSummary,
}
