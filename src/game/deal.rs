//! Round start, betting passthrough, and the initial deal.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bank::BankService;
use crate::betting::{BetKind, BettingRound};
use crate::card::Card;
use crate::error::{BankError, BetError, DealError, MoneyError, StartError};
use crate::hand::Hand;
use crate::money::Money;
use crate::rules::Rules;
use crate::shoe::{ReshuffleEvent, ReshuffleReason, Shoe};

use super::seat::Seat;
use super::state::{GamePhase, TurnCursor};
use super::Game;

/// Result of dealing the initial cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealOutcome {
    /// The dealer's visible card.
    pub dealer_up_card: Card,
    /// Turn cursor after auto-advancing past naturals.
    pub cursor: TurnCursor,
    /// Reshuffle notifications emitted during the deal.
    pub events: Vec<ReshuffleEvent>,
}

impl<S: Shoe, R: Rules, B: BankService> Game<S, R, B> {
    /// Starts a new round for the named players.
    ///
    /// Resets all round-scoped state, snapshots each player's bankroll
    /// from the betting service, and transitions to
    /// [`GamePhase::Betting`].
    ///
    /// # Errors
    ///
    /// Rejects if a round is already active, if the name list is empty
    /// or contains a blank name, if two names collide
    /// case-insensitively, or if a bankroll lookup fails.
    pub fn start_round(&mut self, players: &[&str]) -> Result<(), StartError> {
        if !matches!(self.cursor.phase, GamePhase::Setup | GamePhase::GameOver) {
            return Err(StartError::RoundInProgress {
                phase: self.cursor.phase,
            });
        }
        if players.is_empty() {
            return Err(StartError::NoPlayers);
        }

        let mut seen: Vec<String> = Vec::with_capacity(players.len());
        for name in players {
            if name.trim().is_empty() {
                return Err(StartError::BlankName);
            }
            let folded = name.to_lowercase();
            if seen.contains(&folded) {
                return Err(StartError::DuplicateName {
                    name: (*name).to_owned(),
                });
            }
            seen.push(folded);
        }

        let mut bankrolls: HashMap<String, Money> = HashMap::with_capacity(players.len());
        for name in players {
            let bankroll = self.bank.bankroll(name)?;
            if bankroll.currency() != self.options.currency {
                return Err(StartError::Bank(BankError::Money(
                    MoneyError::CurrencyMismatch {
                        left: bankroll.currency(),
                        right: self.options.currency,
                    },
                )));
            }
            bankrolls.insert((*name).to_owned(), bankroll);
        }

        let names: Vec<String> = players.iter().map(|&n| n.to_owned()).collect();
        info!("starting round with {} players", names.len());

        self.seats.clear();
        self.dealer_hand = Hand::new();
        self.summary = None;
        self.ledger = Some(BettingRound::new(names, bankrolls));
        self.cursor = TurnCursor::idle(GamePhase::Betting);
        Ok(())
    }

    fn close_betting_if_complete(&mut self) {
        if self.ledger.as_ref().is_some_and(BettingRound::is_complete)
            && matches!(self.cursor.phase, GamePhase::Betting)
        {
            self.cursor = TurnCursor::idle(GamePhase::InitialDeal);
        }
    }

    /// Places a bet for a player during the betting phase.
    ///
    /// Validates against the table limits, debits the round's bankroll
    /// snapshot, then debits the persistent bankroll at the betting
    /// service. When every player has a bet (or was skipped), the phase
    /// moves to [`GamePhase::InitialDeal`].
    pub fn place_bet(&mut self, player: &str, amount: Money) -> Result<(), BetError> {
        if !matches!(self.cursor.phase, GamePhase::Betting) {
            return Err(BetError::WrongPhase {
                phase: self.cursor.phase,
            });
        }

        self.bank.validate_bet(player, amount)?;

        let ledger = self.ledger.as_mut().ok_or(BetError::WrongPhase {
            phase: self.cursor.phase,
        })?;
        ledger.place_bet(player, amount, BetKind::Standard)?;

        // Mirror the stake into the persistent bankroll; on failure,
        // undo the ledger entry so the snapshot stays consistent.
        if let Err(err) = self.bank.place_bet(player, amount) {
            if let Some(mut bet) = ledger.take_bet(player) {
                if let Ok(refund) = bet.clear() {
                    let _ = ledger.credit(player, refund);
                }
            }
            return Err(err.into());
        }

        debug!("{player} bet {amount}");
        self.close_betting_if_complete();
        Ok(())
    }

    /// Skips the current bettor (timeout or operator override); they
    /// sit the round out.
    pub fn skip_current_bettor(&mut self) -> Result<(), BetError> {
        if !matches!(self.cursor.phase, GamePhase::Betting) {
            return Err(BetError::WrongPhase {
                phase: self.cursor.phase,
            });
        }
        if let Some(ledger) = self.ledger.as_mut() {
            ledger.skip_current_player();
        }
        self.close_betting_if_complete();
        Ok(())
    }

    /// Forces betting to complete (forced round start).
    pub fn force_betting_complete(&mut self) -> Result<(), BetError> {
        if !matches!(self.cursor.phase, GamePhase::Betting) {
            return Err(BetError::WrongPhase {
                phase: self.cursor.phase,
            });
        }
        if let Some(ledger) = self.ledger.as_mut() {
            ledger.force_complete();
        }
        self.close_betting_if_complete();
        Ok(())
    }

    /// Deals the initial cards: one card to each player then the
    /// dealer, twice, dealer last each pass.
    ///
    /// Checks the reshuffle policy before any card leaves the shoe and
    /// transitions to [`GamePhase::PlayerTurns`], auto-advancing past
    /// any player holding a natural blackjack.
    ///
    /// # Errors
    ///
    /// Fails outside [`GamePhase::InitialDeal`], when no bets were
    /// placed, or when the shoe cannot supply `2 * (players + 1)` cards
    /// even after a reshuffle attempt.
    pub fn deal_initial_cards(&mut self) -> Result<DealOutcome, DealError> {
        if !matches!(self.cursor.phase, GamePhase::InitialDeal) {
            return Err(DealError::WrongPhase {
                phase: self.cursor.phase,
            });
        }

        let mut events: Vec<ReshuffleEvent> = Vec::new();
        if let Some(event) = self
            .policy
            .check_before_draw(&mut self.shoe, ReshuffleReason::InitialDeal)
        {
            events.push(event);
        }

        let Some(ledger) = self.ledger.as_ref() else {
            return Err(DealError::NoBets);
        };
        let betting_players: Vec<String> = ledger
            .players()
            .iter()
            .filter(|p| ledger.bet(p).is_some())
            .cloned()
            .collect();
        if betting_players.is_empty() {
            return Err(DealError::NoBets);
        }

        let needed = 2 * (betting_players.len() + 1);
        if self.shoe.remaining_cards() < needed {
            // Capacity reshuffle, independent of the penetration check.
            if self.options.auto_reshuffle && events.is_empty() {
                events.push(
                    self.policy
                        .reshuffle_now(&mut self.shoe, ReshuffleReason::InitialDeal),
                );
            }
            if self.shoe.remaining_cards() < needed {
                return Err(DealError::NotEnoughCards {
                    needed,
                    remaining: self.shoe.remaining_cards(),
                });
            }
        }

        let ledger = self.ledger.as_mut().ok_or(DealError::NoBets)?;
        let mut seats = Vec::with_capacity(betting_players.len());
        for name in &betting_players {
            let bet = ledger.take_bet(name).ok_or(DealError::NoBets)?;
            seats.push(Seat::new(name.clone(), bet));
        }
        self.seats = seats;

        for _pass in 0..2 {
            for index in 0..self.seats.len() {
                let card = self.draw_for_deal(needed)?;
                if let Some(player_hand) = self.seats[index].current_hand_mut() {
                    player_hand.hand.add_card(card);
                }
            }
            let card = self.draw_for_deal(needed)?;
            self.dealer_hand.add_card(card);
        }

        let dealer_up_card = self.dealer_hand.cards()[0];
        self.cursor = self.locate_turn(0);
        debug!(
            "initial deal complete, {} seats, cursor {:?}",
            self.seats.len(),
            self.cursor
        );

        Ok(DealOutcome {
            dealer_up_card,
            cursor: self.cursor,
            events,
        })
    }

    fn draw_for_deal(&mut self, needed: usize) -> Result<Card, DealError> {
        self.shoe.draw().ok_or(DealError::NotEnoughCards {
            needed,
            remaining: 0,
        })
    }
}
