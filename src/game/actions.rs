//! Player actions and the turn-advance loop.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bank::BankService;
use crate::betting::BetKind;
use crate::card::Card;
use crate::error::{ActionError, BetError};
use crate::hand::HandStatus;
use crate::rules::{PlayerAction, Rules};
use crate::shoe::{ReshuffleEvent, ReshuffleReason, Shoe};

use super::seat::Seat;
use super::state::{GamePhase, TurnCursor};
use super::Game;

/// Result of one player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The acting player.
    pub player: String,
    /// The action taken.
    pub action: PlayerAction,
    /// Cards drawn by the action (one for hit/double, two fill cards
    /// for a split, none for stand).
    pub cards_drawn: Vec<Card>,
    /// Value of the acted-on hand afterwards.
    pub hand_value: u8,
    /// Status of the acted-on hand afterwards.
    pub hand_status: HandStatus,
    /// Turn cursor after any advance.
    pub cursor: TurnCursor,
    /// Reshuffle notifications emitted while drawing.
    pub events: Vec<ReshuffleEvent>,
}

impl<S: Shoe, R: Rules, B: BankService> Game<S, R, B> {
    /// Finds the next turn starting from `from_seat`, or the phase the
    /// round moves to when no active hand remains: the dealer plays
    /// when any hand is still live, otherwise results follow directly.
    pub(super) fn locate_turn(&mut self, from_seat: usize) -> TurnCursor {
        let mut index = from_seat;
        while index < self.seats.len() {
            let seat = &mut self.seats[index];
            if seat.current_hand().is_some_and(super::seat::PlayerHand::is_active) {
                return TurnCursor::at(index, seat.current_index());
            }
            if seat.advance_hand() {
                return TurnCursor::at(index, seat.current_index());
            }
            index += 1;
        }

        if self.seats.iter().any(Seat::any_live) {
            TurnCursor::idle(GamePhase::DealerTurn)
        } else {
            TurnCursor::idle(GamePhase::Results)
        }
    }

    /// Advances past the just-resolved hand: first to the acting
    /// player's next active split sub-hand, then to the next player
    /// with an unresolved hand, then out of the player-turns phase.
    pub(super) fn advance_turn(&mut self) -> TurnCursor {
        let index = self.cursor.player_index;
        if let Some(seat) = self.seats.get_mut(index) {
            if seat.advance_hand() {
                return TurnCursor::at(index, seat.current_index());
            }
        }
        self.locate_turn(index + 1)
    }

    /// Processes a player's decision for the hand under the cursor.
    ///
    /// Hit draws one card (after a reshuffle check) and ends the turn
    /// automatically on bust or 21; stand ends the turn; double down
    /// and split adjust the betting ledger clear-then-place and always
    /// end the acting sub-turn.
    ///
    /// # Errors
    ///
    /// Phase violations and domain rejections (wrong turn, resolved
    /// hand, illegal action, insufficient funds) are returned as
    /// [`ActionError`] values carrying the offending detail.
    pub fn process_player_action(
        &mut self,
        player: &str,
        action: PlayerAction,
    ) -> Result<ActionOutcome, ActionError> {
        if !matches!(self.cursor.phase, GamePhase::PlayerTurns) {
            return Err(ActionError::WrongPhase {
                phase: self.cursor.phase,
            });
        }

        let seat_index = self.cursor.player_index;
        let Some(seat) = self.seats.get(seat_index) else {
            return Err(ActionError::WrongPhase {
                phase: self.cursor.phase,
            });
        };
        if seat.name() != player {
            return Err(if self.seats.iter().any(|s| s.name() == player) {
                ActionError::NotYourTurn {
                    player: player.to_owned(),
                }
            } else {
                ActionError::UnknownPlayer {
                    player: player.to_owned(),
                }
            });
        }

        let Some(player_hand) = seat.current_hand() else {
            return Err(ActionError::NotYourTurn {
                player: player.to_owned(),
            });
        };
        if !player_hand.is_active() {
            return Err(ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            });
        }
        if !self.rules.is_valid_action(action, &player_hand.hand) {
            return Err(ActionError::IllegalAction { action });
        }

        debug!("{player} plays {action:?}");
        match action {
            PlayerAction::Hit => self.hit(seat_index, player),
            PlayerAction::Stand => self.stand(seat_index, player),
            PlayerAction::DoubleDown => self.double_down(seat_index, player),
            PlayerAction::Split => self.split(seat_index, player),
        }
    }

    fn hit(&mut self, seat_index: usize, player: &str) -> Result<ActionOutcome, ActionError> {
        let mut events = Vec::new();
        let card = self
            .draw_checked(ReshuffleReason::PlayerDraw, &mut events)
            .ok_or(ActionError::ShoeExhausted)?;

        let seat = &mut self.seats[seat_index];
        let Some(player_hand) = seat.current_hand_mut() else {
            return Err(ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            });
        };
        player_hand.hand.add_card(card);
        if player_hand.hand.status() == HandStatus::Active && player_hand.hand.value() == 21 {
            player_hand.hand.stand();
        }
        let hand_value = player_hand.hand.value();
        let hand_status = player_hand.hand.status();

        if hand_status != HandStatus::Active {
            self.cursor = self.advance_turn();
        }

        Ok(ActionOutcome {
            player: player.to_owned(),
            action: PlayerAction::Hit,
            cards_drawn: vec![card],
            hand_value,
            hand_status,
            cursor: self.cursor,
            events,
        })
    }

    fn stand(&mut self, seat_index: usize, player: &str) -> Result<ActionOutcome, ActionError> {
        let seat = &mut self.seats[seat_index];
        let Some(player_hand) = seat.current_hand_mut() else {
            return Err(ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            });
        };
        player_hand.hand.stand();
        let hand_value = player_hand.hand.value();

        self.cursor = self.advance_turn();

        Ok(ActionOutcome {
            player: player.to_owned(),
            action: PlayerAction::Stand,
            cards_drawn: Vec::new(),
            hand_value,
            hand_status: HandStatus::Stand,
            cursor: self.cursor,
            events: Vec::new(),
        })
    }

    /// Checks the snapshot bankroll can cover `amount`, with the typed
    /// insufficient-funds rejection.
    fn ensure_funds(
        &self,
        player: &str,
        amount: crate::money::Money,
    ) -> Result<(), ActionError> {
        let bankroll = self
            .ledger
            .as_ref()
            .and_then(|l| l.bankroll(player))
            .ok_or_else(|| ActionError::UnknownPlayer {
                player: player.to_owned(),
            })?;
        let ordering = bankroll
            .try_cmp(&amount)
            .map_err(|e| ActionError::Bet(BetError::Money(e)))?;
        if ordering.is_lt() {
            return Err(ActionError::InsufficientFunds {
                player: player.to_owned(),
                bankroll,
                amount,
            });
        }
        Ok(())
    }

    fn double_down(
        &mut self,
        seat_index: usize,
        player: &str,
    ) -> Result<ActionOutcome, ActionError> {
        let player_hand = self.seats[seat_index]
            .current_hand()
            .ok_or_else(|| ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            })?;
        // Split-backed bets may double when the rules allowed the
        // action; only an already-doubled bet is unconditionally out.
        if player_hand.bet.kind() == BetKind::DoubleDown {
            return Err(ActionError::IllegalAction {
                action: PlayerAction::DoubleDown,
            });
        }
        let amount = player_hand.bet.amount();
        self.ensure_funds(player, amount)?;

        // Mirror the extra stake into the persistent bankroll first;
        // the snapshot operations below cannot fail after the funds
        // check.
        self.bank
            .place_bet(player, amount)
            .map_err(|e| ActionError::Bet(BetError::Bank(e)))?;

        // Clear-then-place: refund the original stake, then debit the
        // doubled replacement. Never mutates the existing bet in place.
        let refund = self.seats[seat_index]
            .current_hand_mut()
            .ok_or_else(|| ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            })?
            .bet
            .clear()?;
        let ledger = self.ledger.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.cursor.phase,
        })?;
        ledger.credit(player, refund)?;
        let doubled = ledger.place_replacement(player, amount.times(2), BetKind::DoubleDown)?;

        let mut events = Vec::new();
        let card = self
            .draw_checked(ReshuffleReason::DoubleDown, &mut events)
            .ok_or(ActionError::ShoeExhausted)?;

        let seat = &mut self.seats[seat_index];
        let Some(player_hand) = seat.current_hand_mut() else {
            return Err(ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            });
        };
        player_hand.bet = doubled;
        player_hand.hand.add_card(card);
        if player_hand.hand.status() == HandStatus::Active {
            player_hand.hand.stand();
        }
        let hand_value = player_hand.hand.value();
        let hand_status = player_hand.hand.status();

        self.cursor = self.advance_turn();

        Ok(ActionOutcome {
            player: player.to_owned(),
            action: PlayerAction::DoubleDown,
            cards_drawn: vec![card],
            hand_value,
            hand_status,
            cursor: self.cursor,
            events,
        })
    }

    fn split(&mut self, seat_index: usize, player: &str) -> Result<ActionOutcome, ActionError> {
        let seat = &self.seats[seat_index];
        if seat.hands().len() > usize::from(self.options.max_splits) {
            return Err(ActionError::MaxSplitsReached {
                max: self.options.max_splits,
            });
        }
        let player_hand = seat
            .current_hand()
            .ok_or_else(|| ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            })?;
        let amount = player_hand.bet.amount();
        let is_ace_pair = player_hand.hand.cards().first().is_some_and(Card::is_ace);
        self.ensure_funds(player, amount)?;

        self.bank
            .place_bet(player, amount)
            .map_err(|e| ActionError::Bet(BetError::Bank(e)))?;

        // Clear-then-place: the original stake comes back, then one
        // Split bet per resulting hand is debited.
        let refund = self.seats[seat_index]
            .current_hand_mut()
            .ok_or_else(|| ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            })?
            .bet
            .clear()?;
        let ledger = self.ledger.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.cursor.phase,
        })?;
        ledger.credit(player, refund)?;
        let first_bet = ledger.place_replacement(player, amount, BetKind::Split)?;
        let second_bet = ledger.place_replacement(player, amount, BetKind::Split)?;

        let base_index = self.seats[seat_index].current_index();
        if self.seats[seat_index]
            .split_current(first_bet, second_bet)
            .is_none()
        {
            return Err(ActionError::IllegalAction {
                action: PlayerAction::Split,
            });
        }

        // Each new hand receives exactly one fresh card. A pair of
        // aces closes both hands after that single card.
        let mut events = Vec::new();
        let mut cards_drawn = Vec::with_capacity(2);
        for offset in 0..2 {
            let card = self
                .draw_checked(ReshuffleReason::Split, &mut events)
                .ok_or(ActionError::ShoeExhausted)?;
            let hand = &mut self.seats[seat_index].hands_mut()[base_index + offset].hand;
            hand.add_card(card);
            if !hand.is_complete() && (hand.value() == 21 || is_ace_pair) {
                hand.stand();
            }
            cards_drawn.push(card);
        }

        let seat = &self.seats[seat_index];
        let current = seat
            .current_hand()
            .ok_or_else(|| ActionError::HandAlreadyResolved {
                player: player.to_owned(),
            })?;
        let hand_value = current.hand.value();
        let hand_status = current.hand.status();

        if hand_status != HandStatus::Active {
            self.cursor = self.advance_turn();
        }

        Ok(ActionOutcome {
            player: player.to_owned(),
            action: PlayerAction::Split,
            cards_drawn,
            hand_value,
            hand_status,
            cursor: self.cursor,
            events,
        })
    }
}
