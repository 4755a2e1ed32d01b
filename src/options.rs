//! Table configuration options.

use serde::{Deserialize, Serialize};

use crate::money::{Currency, RoundingMode};

/// Configuration options for one blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use twentyone::TableOptions;
///
/// let options = TableOptions::default()
///     .with_decks(8)
///     .with_blackjack_pays(1.5)
///     .with_penetration_threshold(0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Number of decks in the shoe.
    pub decks: u8,
    /// Fraction of the shoe remaining below which a reshuffle is due.
    pub penetration_threshold: f64,
    /// Whether the engine reshuffles automatically when due.
    pub auto_reshuffle: bool,
    /// Blackjack payout ratio (typically 1.5 for 3:2 tables).
    pub blackjack_pays: f64,
    /// Rounding mode for the blackjack bonus.
    pub rounding_blackjack: RoundingMode,
    /// Whether the dealer stands on soft 17.
    pub stand_on_soft_17: bool,
    /// Whether double down is allowed after a split.
    pub double_after_split: bool,
    /// Maximum number of splits per player per round.
    pub max_splits: u8,
    /// Table currency. All bets and bankrolls must match it.
    pub currency: Currency,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            decks: 6,
            penetration_threshold: 0.25,
            auto_reshuffle: true,
            blackjack_pays: 1.5,
            rounding_blackjack: RoundingMode::Down,
            stand_on_soft_17: true,
            double_after_split: true,
            max_splits: 3,
            currency: Currency::Usd,
        }
    }
}

impl TableOptions {
    /// Sets the number of decks.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::TableOptions;
    ///
    /// let options = TableOptions::default().with_decks(2);
    /// assert_eq!(options.decks, 2);
    /// ```
    #[must_use]
    pub const fn with_decks(mut self, decks: u8) -> Self {
        self.decks = decks;
        self
    }

    /// Sets the penetration threshold (fraction of the shoe remaining
    /// below which a reshuffle is due). 0 disables reshuffling.
    #[must_use]
    pub const fn with_penetration_threshold(mut self, threshold: f64) -> Self {
        self.penetration_threshold = threshold;
        self
    }

    /// Sets whether the engine reshuffles automatically when due.
    #[must_use]
    pub const fn with_auto_reshuffle(mut self, auto: bool) -> Self {
        self.auto_reshuffle = auto;
        self
    }

    /// Sets the blackjack payout ratio.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::TableOptions;
    ///
    /// let options = TableOptions::default().with_blackjack_pays(1.2);
    /// assert_eq!(options.blackjack_pays, 1.2);
    /// ```
    #[must_use]
    pub const fn with_blackjack_pays(mut self, ratio: f64) -> Self {
        self.blackjack_pays = ratio;
        self
    }

    /// Sets the rounding mode for the blackjack bonus.
    #[must_use]
    pub const fn with_rounding_blackjack(mut self, mode: RoundingMode) -> Self {
        self.rounding_blackjack = mode;
        self
    }

    /// Sets whether the dealer stands on soft 17.
    #[must_use]
    pub const fn with_stand_on_soft_17(mut self, stand: bool) -> Self {
        self.stand_on_soft_17 = stand;
        self
    }

    /// Sets whether double down is allowed after a split.
    #[must_use]
    pub const fn with_double_after_split(mut self, allowed: bool) -> Self {
        self.double_after_split = allowed;
        self
    }

    /// Sets the maximum number of splits per player per round.
    #[must_use]
    pub const fn with_max_splits(mut self, max_splits: u8) -> Self {
        self.max_splits = max_splits;
        self
    }

    /// Sets the table currency.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::{Currency, TableOptions};
    ///
    /// let options = TableOptions::default().with_currency(Currency::Eur);
    /// assert_eq!(options.currency, Currency::Eur);
    /// ```
    #[must_use]
    pub const fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}
