//! Error types for engine operations.
//!
//! Each operation group has its own enum. Variants carrying a
//! [`GamePhase`] are phase violations: the operation was invoked
//! outside its valid phase and may be retried later. The remaining
//! variants are either invariant violations (blank names, mismatched
//! currencies) or domain rule rejections (illegal action, insufficient
//! funds), each carrying the offending player, amount, or phase so an
//! outer layer can render a message.

use thiserror::Error;

use crate::game::GamePhase;
use crate::money::{Currency, Money};
use crate::rules::PlayerAction;

/// Errors from monetary arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Two amounts of different currencies were combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },
}

/// Errors reported by the external betting/payout service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The service has no bankroll for the player.
    #[error("unknown player {player:?}")]
    UnknownPlayer {
        /// The offending player name.
        player: String,
    },
    /// The bet is below the table minimum.
    #[error("bet {amount} is below the table minimum {minimum}")]
    BelowMinimum {
        /// The rejected amount.
        amount: Money,
        /// The table minimum.
        minimum: Money,
    },
    /// The bet is above the table maximum.
    #[error("bet {amount} is above the table maximum {maximum}")]
    AboveMaximum {
        /// The rejected amount.
        amount: Money,
        /// The table maximum.
        maximum: Money,
    },
    /// The service could not be reached or failed internally.
    #[error("betting service unavailable: {0}")]
    Unavailable(String),
    /// Monetary arithmetic failed inside the service.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors that can occur when starting a round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// A round is already active.
    #[error("a round is already active (phase {phase:?})")]
    RoundInProgress {
        /// The phase the engine was in.
        phase: GamePhase,
    },
    /// No player names were given.
    #[error("no players")]
    NoPlayers,
    /// A player name is empty or blank.
    #[error("blank player name")]
    BlankName,
    /// Two player names collide case-insensitively.
    #[error("duplicate player name {name:?}")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },
    /// The bankroll lookup failed.
    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Errors that can occur during betting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BetError {
    /// The engine is not in the betting phase.
    #[error("invalid phase for betting: {phase:?}")]
    WrongPhase {
        /// The phase the engine was in.
        phase: GamePhase,
    },
    /// Betting for this round is already complete.
    #[error("betting is already complete")]
    BettingClosed,
    /// The player is not seated this round.
    #[error("unknown player {player:?}")]
    UnknownPlayer {
        /// The offending player name.
        player: String,
    },
    /// The player already has an active bet this round.
    #[error("player {player:?} already has a bet this round")]
    AlreadyBet {
        /// The offending player name.
        player: String,
    },
    /// The bet amount is not strictly positive.
    #[error("bet amount {amount} is not positive")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: Money,
    },
    /// The player's bankroll cannot cover the bet.
    #[error("player {player:?} has {bankroll}, cannot cover {amount}")]
    InsufficientFunds {
        /// The offending player name.
        player: String,
        /// The player's bankroll snapshot.
        bankroll: Money,
        /// The required amount.
        amount: Money,
    },
    /// The bet was already settled or cleared.
    #[error("bet for player {player:?} is already terminal")]
    BetAlreadyTerminal {
        /// The offending player name.
        player: String,
    },
    /// The service rejected the bet.
    #[error(transparent)]
    Bank(#[from] BankError),
    /// Monetary arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors that can occur when dealing initial cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DealError {
    /// The engine is not in the initial-deal phase.
    #[error("invalid phase for dealing: {phase:?}")]
    WrongPhase {
        /// The phase the engine was in.
        phase: GamePhase,
    },
    /// No bets were placed this round.
    #[error("no bets placed")]
    NoBets,
    /// The shoe cannot supply the initial deal even after a reshuffle.
    #[error("shoe has {remaining} cards, initial deal needs {needed}")]
    NotEnoughCards {
        /// Cards required for the deal.
        needed: usize,
        /// Cards remaining in the shoe.
        remaining: usize,
    },
}

/// Errors that can occur during player actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The engine is not in the player-turns phase.
    #[error("invalid phase for player actions: {phase:?}")]
    WrongPhase {
        /// The phase the engine was in.
        phase: GamePhase,
    },
    /// It is not this player's turn.
    #[error("not {player:?}'s turn")]
    NotYourTurn {
        /// The player who tried to act.
        player: String,
    },
    /// The player is not seated this round.
    #[error("unknown player {player:?}")]
    UnknownPlayer {
        /// The offending player name.
        player: String,
    },
    /// The hand is already blackjack, busted, or stood.
    #[error("hand for player {player:?} is already resolved")]
    HandAlreadyResolved {
        /// The offending player name.
        player: String,
    },
    /// The table rules reject this action for the current hand.
    #[error("action {action:?} is not legal for this hand")]
    IllegalAction {
        /// The rejected action.
        action: PlayerAction,
    },
    /// The player has already split the maximum number of times.
    #[error("maximum of {max} splits reached")]
    MaxSplitsReached {
        /// The table's split limit.
        max: u8,
    },
    /// The player's bankroll cannot cover the extra stake.
    #[error("player {player:?} has {bankroll}, cannot cover {amount}")]
    InsufficientFunds {
        /// The offending player name.
        player: String,
        /// The player's bankroll snapshot.
        bankroll: Money,
        /// The required amount.
        amount: Money,
    },
    /// The shoe ran out of cards and reshuffling did not free capacity.
    #[error("shoe exhausted")]
    ShoeExhausted,
    /// The ledger rejected the bet adjustment.
    #[error(transparent)]
    Bet(#[from] BetError),
}

/// Errors that can occur during the dealer's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DealerError {
    /// The engine is not in the dealer-turn phase.
    #[error("invalid phase for dealer turn: {phase:?}")]
    WrongPhase {
        /// The phase the engine was in.
        phase: GamePhase,
    },
    /// The shoe ran out of cards and reshuffling did not free capacity.
    #[error("shoe exhausted")]
    ShoeExhausted,
}

/// Errors that can occur when collecting results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResultsError {
    /// The engine is not in the results phase.
    #[error("invalid phase for results: {phase:?}")]
    WrongPhase {
        /// The phase the engine was in.
        phase: GamePhase,
    },
    /// A bet could not be settled.
    #[error(transparent)]
    Bet(#[from] BetError),
}
