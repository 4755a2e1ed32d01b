//! The external betting/payout service contract and an in-memory
//! implementation backing tests and single-process tables.

use std::collections::HashMap;

use log::debug;

use crate::error::BankError;
use crate::money::{Currency, Money};
use crate::payout::PayoutResult;

/// The betting/payout collaborator consumed by the engine.
///
/// Owns the persistent bankrolls that outlive a round. Calls may incur
/// I/O in real implementations; `process_payouts` in particular may
/// fail independently of the round's outcome determination.
pub trait BankService {
    /// The table's minimum bet.
    fn minimum_bet(&self) -> Money;

    /// The table's maximum bet.
    fn maximum_bet(&self) -> Money;

    /// The natural-blackjack payout multiplier.
    fn blackjack_multiplier(&self) -> f64;

    /// Looks up the player's persistent bankroll.
    fn bankroll(&self, player: &str) -> Result<Money, BankError>;

    /// Validates a bet against table limits and the player's bankroll.
    fn validate_bet(&self, player: &str, amount: Money) -> Result<(), BankError>;

    /// Debits the player's persistent bankroll for a placed stake.
    fn place_bet(&mut self, player: &str, amount: Money) -> Result<(), BankError>;

    /// Applies the round's total returns to the persistent bankrolls.
    fn process_payouts(&mut self, results: &[PayoutResult]) -> Result<(), BankError>;
}

/// An in-memory betting/payout service.
pub struct InMemoryBank {
    bankrolls: HashMap<String, Money>,
    minimum: Money,
    maximum: Money,
    blackjack_multiplier: f64,
}

impl InMemoryBank {
    /// Creates a bank with default limits (5.00 to 500.00) and a 3:2
    /// blackjack multiplier.
    #[must_use]
    pub fn new(currency: Currency) -> Self {
        Self {
            bankrolls: HashMap::new(),
            minimum: Money::from_major(5, currency),
            maximum: Money::from_major(500, currency),
            blackjack_multiplier: 1.5,
        }
    }

    /// Seeds a player bankroll.
    #[must_use]
    pub fn with_player(mut self, name: &str, bankroll: Money) -> Self {
        self.bankrolls.insert(name.to_owned(), bankroll);
        self
    }

    /// Sets the table limits.
    #[must_use]
    pub const fn with_limits(mut self, minimum: Money, maximum: Money) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Sets the blackjack multiplier.
    #[must_use]
    pub const fn with_blackjack_multiplier(mut self, multiplier: f64) -> Self {
        self.blackjack_multiplier = multiplier;
        self
    }
}

impl BankService for InMemoryBank {
    fn minimum_bet(&self) -> Money {
        self.minimum
    }

    fn maximum_bet(&self) -> Money {
        self.maximum
    }

    fn blackjack_multiplier(&self) -> f64 {
        self.blackjack_multiplier
    }

    fn bankroll(&self, player: &str) -> Result<Money, BankError> {
        self.bankrolls
            .get(player)
            .copied()
            .ok_or_else(|| BankError::UnknownPlayer {
                player: player.to_owned(),
            })
    }

    fn validate_bet(&self, player: &str, amount: Money) -> Result<(), BankError> {
        if amount.try_cmp(&self.minimum)?.is_lt() {
            return Err(BankError::BelowMinimum {
                amount,
                minimum: self.minimum,
            });
        }
        if amount.try_cmp(&self.maximum)?.is_gt() {
            return Err(BankError::AboveMaximum {
                amount,
                maximum: self.maximum,
            });
        }
        let bankroll = self.bankroll(player)?;
        if bankroll.try_cmp(&amount)?.is_lt() {
            return Err(BankError::Unavailable(format!(
                "bankroll {bankroll} cannot cover {amount}"
            )));
        }
        Ok(())
    }

    fn place_bet(&mut self, player: &str, amount: Money) -> Result<(), BankError> {
        let bankroll = self.bankroll(player)?;
        let debited = bankroll.try_sub(amount)?;
        self.bankrolls.insert(player.to_owned(), debited);
        debug!("debited {amount} from {player}, bankroll now {debited}");
        Ok(())
    }

    fn process_payouts(&mut self, results: &[PayoutResult]) -> Result<(), BankError> {
        for result in results {
            let bankroll = self.bankroll(&result.player)?;
            let credited = bankroll.try_add(result.total_return)?;
            self.bankrolls.insert(result.player.clone(), credited);
        }
        Ok(())
    }
}
