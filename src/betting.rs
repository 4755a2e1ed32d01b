//! The per-round betting ledger.
//!
//! Collects one bet per player against a bankroll snapshot taken at
//! round start, tracks the "current bettor" cursor, and owns the
//! settlement math for individual bets. Persistent bankrolls live in
//! the external [`BankService`](crate::BankService); the ledger only
//! mutates its round-local snapshot.

use std::collections::HashMap;
use std::time::SystemTime;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::BetError;
use crate::money::{Money, RoundingMode};
use crate::rules::GameResult;

/// The type of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetKind {
    /// Ordinary bet placed during the betting phase.
    Standard,
    /// Replacement bet placed by a double down, at twice the stake.
    DoubleDown,
    /// Replacement bet backing one split hand.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum BetState {
    Active,
    Cleared,
    Settled,
}

/// Payout and total return produced by settling a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Winnings on top of the stake (zero for push and lose).
    pub payout: Money,
    /// Stake plus winnings returned to the player.
    pub total_return: Money,
}

/// A wager backing one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    amount: Money,
    player: String,
    kind: BetKind,
    placed_at: SystemTime,
    state: BetState,
}

impl Bet {
    fn new(player: String, amount: Money, kind: BetKind) -> Self {
        Self {
            amount,
            player,
            kind,
            placed_at: SystemTime::now(),
            state: BetState::Active,
        }
    }

    /// Returns the staked amount.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Returns the player who placed the bet.
    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Returns the bet type.
    #[must_use]
    pub const fn kind(&self) -> BetKind {
        self.kind
    }

    /// Returns when the bet was placed.
    #[must_use]
    pub const fn placed_at(&self) -> SystemTime {
        self.placed_at
    }

    /// Returns whether the bet is still live (not cleared or settled).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, BetState::Active)
    }

    /// Winnings for a result: the stake for a win, the stake times the
    /// multiplier for a blackjack, zero for push or lose.
    #[must_use]
    pub fn payout(&self, result: GameResult, multiplier: f64, rounding: RoundingMode) -> Money {
        match result {
            GameResult::Win => self.amount,
            GameResult::Blackjack => self.amount.mul_ratio(multiplier, rounding),
            GameResult::Push | GameResult::Lose => Money::zero(self.amount.currency()),
        }
    }

    /// Stake plus winnings returned: stake + payout for win/blackjack,
    /// the stake for a push, zero for a loss.
    #[must_use]
    pub fn total_return(&self, result: GameResult, multiplier: f64, rounding: RoundingMode) -> Money {
        match result {
            GameResult::Win | GameResult::Blackjack => {
                let payout = self.payout(result, multiplier, rounding);
                // Same currency by construction.
                Money::from_cents(
                    self.amount.cents() + payout.cents(),
                    self.amount.currency(),
                )
            }
            GameResult::Push => self.amount,
            GameResult::Lose => Money::zero(self.amount.currency()),
        }
    }

    /// Settles the bet against a result. One-shot: a settled or cleared
    /// bet cannot be settled again.
    pub fn settle(
        &mut self,
        result: GameResult,
        multiplier: f64,
        rounding: RoundingMode,
    ) -> Result<Settlement, BetError> {
        if !self.is_active() {
            return Err(BetError::BetAlreadyTerminal {
                player: self.player.clone(),
            });
        }
        self.state = BetState::Settled;
        Ok(Settlement {
            payout: self.payout(result, multiplier, rounding),
            total_return: self.total_return(result, multiplier, rounding),
        })
    }

    /// Clears the bet, returning the refundable stake. One-shot.
    pub fn clear(&mut self) -> Result<Money, BetError> {
        if !self.is_active() {
            return Err(BetError::BetAlreadyTerminal {
                player: self.player.clone(),
            });
        }
        self.state = BetState::Cleared;
        Ok(self.amount)
    }
}

/// Phase of the betting ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BettingPhase {
    /// At least one listed player still needs to bet or be skipped.
    WaitingForBets,
    /// Every listed player has a bet or was skipped.
    Complete,
}

/// One round's bet collection against a bankroll snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingRound {
    players: Vec<String>,
    bets: HashMap<String, Bet>,
    bankrolls: HashMap<String, Money>,
    skipped: Vec<String>,
    cursor: usize,
    phase: BettingPhase,
}

impl BettingRound {
    /// Creates a ledger for the listed players with their bankroll
    /// snapshots.
    #[must_use]
    pub fn new(players: Vec<String>, bankrolls: HashMap<String, Money>) -> Self {
        let mut round = Self {
            players,
            bets: HashMap::new(),
            bankrolls,
            skipped: Vec::new(),
            cursor: 0,
            phase: BettingPhase::WaitingForBets,
        };
        round.refresh_cursor();
        round
    }

    /// Returns the ledger phase.
    #[must_use]
    pub const fn phase(&self) -> BettingPhase {
        self.phase
    }

    /// Returns whether every listed player has a bet or was skipped.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.phase, BettingPhase::Complete)
    }

    /// Returns the player whose bet is awaited.
    #[must_use]
    pub fn current_bettor(&self) -> Option<&str> {
        if self.is_complete() {
            return None;
        }
        self.players.get(self.cursor).map(String::as_str)
    }

    /// Returns the ordered player list.
    #[must_use]
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// Returns the player's bankroll snapshot.
    #[must_use]
    pub fn bankroll(&self, player: &str) -> Option<Money> {
        self.bankrolls.get(player).copied()
    }

    /// Returns the player's bet, if placed.
    #[must_use]
    pub fn bet(&self, player: &str) -> Option<&Bet> {
        self.bets.get(player)
    }

    fn needs_bet(&self, player: &str) -> bool {
        !self.bets.contains_key(player) && !self.skipped.iter().any(|s| s == player)
    }

    /// Moves the cursor forward to the next player lacking a bet. The
    /// cursor never regresses; when nobody remains the phase flips to
    /// [`BettingPhase::Complete`].
    fn refresh_cursor(&mut self) {
        while let Some(player) = self.players.get(self.cursor) {
            if self.needs_bet(player) {
                return;
            }
            self.cursor += 1;
        }
        self.phase = BettingPhase::Complete;
        debug!("betting complete, {} bets placed", self.bets.len());
    }

    /// Places a bet for a player, debiting the bankroll snapshot.
    pub fn place_bet(
        &mut self,
        player: &str,
        amount: Money,
        kind: BetKind,
    ) -> Result<(), BetError> {
        if self.is_complete() {
            return Err(BetError::BettingClosed);
        }
        if !self.players.iter().any(|p| p == player) {
            return Err(BetError::UnknownPlayer {
                player: player.to_owned(),
            });
        }
        if self.bets.contains_key(player) {
            return Err(BetError::AlreadyBet {
                player: player.to_owned(),
            });
        }
        if !amount.is_positive() {
            return Err(BetError::NonPositiveAmount { amount });
        }

        self.debit(player, amount)?;
        self.bets
            .insert(player.to_owned(), Bet::new(player.to_owned(), amount, kind));
        self.refresh_cursor();
        Ok(())
    }

    /// Skips the current bettor (timeout or operator decision); they
    /// sit this round out.
    pub fn skip_current_player(&mut self) {
        if let Some(player) = self.players.get(self.cursor).cloned() {
            self.skipped.push(player);
        }
        self.refresh_cursor();
    }

    /// Forces the ledger into the complete phase (forced round start).
    pub fn force_complete(&mut self) {
        self.phase = BettingPhase::Complete;
    }

    /// Debits the player's bankroll snapshot after a funds check.
    pub fn debit(&mut self, player: &str, amount: Money) -> Result<(), BetError> {
        let bankroll = self
            .bankrolls
            .get(player)
            .copied()
            .ok_or_else(|| BetError::UnknownPlayer {
                player: player.to_owned(),
            })?;
        if bankroll.try_cmp(&amount)?.is_lt() {
            return Err(BetError::InsufficientFunds {
                player: player.to_owned(),
                bankroll,
                amount,
            });
        }
        self.bankrolls
            .insert(player.to_owned(), bankroll.try_sub(amount)?);
        Ok(())
    }

    /// Credits the player's bankroll snapshot (refunds, returns).
    pub fn credit(&mut self, player: &str, amount: Money) -> Result<(), BetError> {
        let bankroll = self
            .bankrolls
            .get(player)
            .copied()
            .ok_or_else(|| BetError::UnknownPlayer {
                player: player.to_owned(),
            })?;
        self.bankrolls
            .insert(player.to_owned(), bankroll.try_add(amount)?);
        Ok(())
    }

    /// Moves the player's placed bet out of the ledger, transferring
    /// ownership to the hand it backs.
    pub fn take_bet(&mut self, player: &str) -> Option<Bet> {
        self.bets.remove(player)
    }

    /// Creates a replacement bet (double down or split), debiting the
    /// bankroll snapshot for the new stake.
    pub fn place_replacement(
        &mut self,
        player: &str,
        amount: Money,
        kind: BetKind,
    ) -> Result<Bet, BetError> {
        self.debit(player, amount)?;
        Ok(Bet::new(player.to_owned(), amount, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn usd(major: i64) -> Money {
        Money::from_major(major, Currency::Usd)
    }

    fn ledger(names: &[&str], bankroll: Money) -> BettingRound {
        let players: Vec<String> = names.iter().map(|&n| n.to_owned()).collect();
        let bankrolls = players.iter().map(|p| (p.clone(), bankroll)).collect();
        BettingRound::new(players, bankrolls)
    }

    #[test]
    fn second_bet_for_same_player_is_rejected() {
        let mut round = ledger(&["amy", "bob"], usd(100));
        round.place_bet("amy", usd(10), BetKind::Standard).unwrap();
        assert!(matches!(
            round.place_bet("amy", usd(10), BetKind::Standard),
            Err(BetError::AlreadyBet { .. })
        ));
    }

    #[test]
    fn phase_completes_exactly_when_all_have_bet() {
        let mut round = ledger(&["amy", "bob"], usd(100));
        assert_eq!(round.current_bettor(), Some("amy"));

        round.place_bet("amy", usd(10), BetKind::Standard).unwrap();
        assert_eq!(round.phase(), BettingPhase::WaitingForBets);
        assert_eq!(round.current_bettor(), Some("bob"));

        round.place_bet("bob", usd(20), BetKind::Standard).unwrap();
        assert_eq!(round.phase(), BettingPhase::Complete);
        assert_eq!(round.current_bettor(), None);
        assert!(matches!(
            round.place_bet("bob", usd(5), BetKind::Standard),
            Err(BetError::BettingClosed)
        ));
    }

    #[test]
    fn out_of_order_bet_keeps_cursor_on_earliest_unbet_player() {
        let mut round = ledger(&["amy", "bob", "cal"], usd(100));
        round.place_bet("bob", usd(10), BetKind::Standard).unwrap();
        assert_eq!(round.current_bettor(), Some("amy"));

        round.place_bet("amy", usd(10), BetKind::Standard).unwrap();
        // Cursor jumps straight past bob's existing bet.
        assert_eq!(round.current_bettor(), Some("cal"));
    }

    #[test]
    fn bet_rejects_unknown_player_and_bad_amounts() {
        let mut round = ledger(&["amy"], usd(15));
        assert!(matches!(
            round.place_bet("zed", usd(10), BetKind::Standard),
            Err(BetError::UnknownPlayer { .. })
        ));
        assert!(matches!(
            round.place_bet("amy", usd(0), BetKind::Standard),
            Err(BetError::NonPositiveAmount { .. })
        ));
        assert!(matches!(
            round.place_bet("amy", usd(20), BetKind::Standard),
            Err(BetError::InsufficientFunds { .. })
        ));
        // Failures leave the snapshot untouched.
        assert_eq!(round.bankroll("amy"), Some(usd(15)));
    }

    #[test]
    fn skip_and_force_complete() {
        let mut round = ledger(&["amy", "bob"], usd(100));
        round.skip_current_player();
        assert_eq!(round.current_bettor(), Some("bob"));

        round.place_bet("bob", usd(10), BetKind::Standard).unwrap();
        assert!(round.is_complete());

        let mut forced = ledger(&["amy", "bob"], usd(100));
        forced.force_complete();
        assert!(forced.is_complete());
    }

    #[test]
    fn settlement_math() {
        let mut round = ledger(&["amy"], usd(100));
        round.place_bet("amy", usd(10), BetKind::Standard).unwrap();
        let bet = round.bet("amy").unwrap().clone();

        assert_eq!(bet.payout(GameResult::Win, 1.5, RoundingMode::Down), usd(10));
        assert_eq!(
            bet.payout(GameResult::Blackjack, 1.5, RoundingMode::Down),
            usd(15)
        );
        assert_eq!(bet.payout(GameResult::Push, 1.5, RoundingMode::Down), usd(0));
        assert_eq!(bet.payout(GameResult::Lose, 1.5, RoundingMode::Down), usd(0));

        assert_eq!(bet.total_return(GameResult::Win, 1.5, RoundingMode::Down), usd(20));
        assert_eq!(
            bet.total_return(GameResult::Blackjack, 1.5, RoundingMode::Down),
            usd(25)
        );
        assert_eq!(bet.total_return(GameResult::Push, 1.5, RoundingMode::Down), usd(10));
        assert_eq!(bet.total_return(GameResult::Lose, 1.5, RoundingMode::Down), usd(0));
    }

    #[test]
    fn settle_is_one_shot() {
        let mut round = ledger(&["amy"], usd(100));
        round.place_bet("amy", usd(10), BetKind::Standard).unwrap();
        let mut bet = round.take_bet("amy").unwrap();

        bet.settle(GameResult::Win, 1.5, RoundingMode::Down).unwrap();
        assert!(matches!(
            bet.settle(GameResult::Win, 1.5, RoundingMode::Down),
            Err(BetError::BetAlreadyTerminal { .. })
        ));
        assert!(matches!(bet.clear(), Err(BetError::BetAlreadyTerminal { .. })));
    }

    #[test]
    fn clear_then_replace_keeps_snapshot_consistent() {
        let mut round = ledger(&["amy"], usd(30));
        round.place_bet("amy", usd(10), BetKind::Standard).unwrap();
        assert_eq!(round.bankroll("amy"), Some(usd(20)));

        // Double-down sequence: refund the stake, then place 2x.
        let mut original = round.take_bet("amy").unwrap();
        let refund = original.clear().unwrap();
        round.credit("amy", refund).unwrap();
        assert_eq!(round.bankroll("amy"), Some(usd(30)));

        let doubled = round
            .place_replacement("amy", usd(20), BetKind::DoubleDown)
            .unwrap();
        assert_eq!(doubled.amount(), usd(20));
        assert_eq!(doubled.kind(), BetKind::DoubleDown);
        assert_eq!(round.bankroll("amy"), Some(usd(10)));
    }
}
