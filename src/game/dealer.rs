//! Dealer play and round settlement.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::bank::BankService;
use crate::card::Card;
use crate::error::{DealerError, ResultsError};
use crate::hand::evaluate_cards;
use crate::payout::{PayoutResult, PayoutSummary, RoundSummary};
use crate::rules::Rules;
use crate::shoe::{ReshuffleEvent, ReshuffleReason, Shoe};

use super::state::{GamePhase, TurnCursor};
use super::Game;

/// Result of the dealer playing out their hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerOutcome {
    /// Cards the dealer drew.
    pub cards_drawn: Vec<Card>,
    /// The dealer's final hand value.
    pub final_value: u8,
    /// Whether the dealer busted.
    pub busted: bool,
    /// Turn cursor after the transition to results.
    pub cursor: TurnCursor,
    /// Reshuffle notifications emitted while drawing.
    pub events: Vec<ReshuffleEvent>,
}

impl<S: Shoe, R: Rules, B: BankService> Game<S, R, B> {
    /// Plays the dealer's hand: draws while the rules say to hit,
    /// checking the reshuffle policy before each draw, then moves to
    /// [`GamePhase::Results`].
    pub fn play_dealer_turn(&mut self) -> Result<DealerOutcome, DealerError> {
        if !matches!(self.cursor.phase, GamePhase::DealerTurn) {
            return Err(DealerError::WrongPhase {
                phase: self.cursor.phase,
            });
        }

        let mut events = Vec::new();
        let mut cards_drawn = Vec::new();

        loop {
            let (value, is_soft) = evaluate_cards(self.dealer_hand.cards());
            if value > 21 || !self.rules.should_dealer_hit(value, is_soft) {
                break;
            }
            let card = self
                .draw_checked(ReshuffleReason::DealerDraw, &mut events)
                .ok_or(DealerError::ShoeExhausted)?;
            self.dealer_hand.add_card(card);
            cards_drawn.push(card);
        }

        let final_value = self.dealer_hand.value();
        let busted = final_value > 21;
        debug!(
            "dealer finished at {final_value} after {} draws",
            cards_drawn.len()
        );

        self.cursor = TurnCursor::idle(GamePhase::Results);

        Ok(DealerOutcome {
            cards_drawn,
            final_value,
            busted,
            cursor: self.cursor,
            events,
        })
    }

    /// Computes each hand's outcome against the dealer, settles the
    /// bets, and applies payouts through the betting service.
    ///
    /// Terminal: the phase moves to [`GamePhase::GameOver`] and the
    /// summary is retained, so calling this again returns the same
    /// summary. If the payout service fails, the outcome determination
    /// is still returned intact with only the payout portion marked
    /// unavailable.
    pub fn results(&mut self) -> Result<RoundSummary, ResultsError> {
        match self.cursor.phase {
            GamePhase::Results => {}
            GamePhase::GameOver => {
                return self.summary.clone().ok_or(ResultsError::WrongPhase {
                    phase: self.cursor.phase,
                });
            }
            phase => return Err(ResultsError::WrongPhase { phase }),
        }

        let multiplier = self.bank.blackjack_multiplier();
        let rounding = self.options.rounding_blackjack;
        let dealer_value = self.dealer_hand.value();
        let dealer_busted = dealer_value > 21;
        let dealer_blackjack = self.dealer_hand.len() == 2 && dealer_value == 21;

        let mut results: Vec<PayoutResult> = Vec::new();
        for seat in &mut self.seats {
            let player = seat.name().to_owned();
            for (hand_index, player_hand) in seat.hands_mut().iter_mut().enumerate() {
                let result = self
                    .rules
                    .determine_result(&player_hand.hand, &self.dealer_hand);
                let settlement = player_hand.bet.settle(result, multiplier, rounding)?;
                results.push(PayoutResult {
                    player: player.clone(),
                    hand_index,
                    bet: player_hand.bet.clone(),
                    result,
                    payout: settlement.payout,
                    total_return: settlement.total_return,
                });
            }
        }

        let mut payouts = PayoutSummary::from_results(results, self.options.currency);
        if let Err(err) = self.bank.process_payouts(&payouts.results) {
            warn!("payout service failed, outcomes preserved: {err}");
            payouts.mark_payouts_unavailable(err.to_string());
        }

        let summary = RoundSummary {
            dealer_value,
            dealer_busted,
            dealer_blackjack,
            payouts,
        };
        self.summary = Some(summary.clone());
        self.cursor = TurnCursor::idle(GamePhase::GameOver);
        Ok(summary)
    }
}
