//! A blackjack table engine.
//!
//! The crate models one table's worth of play end to end: wagering
//! against per-player bankrolls, dealing from a finite shoe with a
//! penetration-based reshuffle policy, per-player decision turns
//! (hit/stand/double/split, with independently settled split hands),
//! automatic dealer play, and financial settlement.
//!
//! The [`Game`] type drives the round through a strict phase order;
//! the shoe, table rules, and betting/payout service are trait seams
//! ([`Shoe`], [`Rules`], [`BankService`]) so callers can plug in their
//! own collaborators. Reshuffle notifications are plain values carried
//! in operation outcomes, never callbacks.
//!
//! # Example
//!
//! ```no_run
//! use twentyone::{Game, TableOptions};
//!
//! let mut game = Game::new(TableOptions::default(), 42);
//! let _ = game.start_round(&["alice", "bob"]);
//! ```

pub mod bank;
pub mod betting;
pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod money;
pub mod options;
pub mod payout;
pub mod rules;
pub mod shoe;

// Re-export main types
pub use bank::{BankService, InMemoryBank};
pub use betting::{Bet, BetKind, BettingPhase, BettingRound, Settlement};
pub use card::{Card, DECK_SIZE, Suit};
pub use error::{
    ActionError, BankError, BetError, DealError, DealerError, MoneyError, ResultsError, StartError,
};
pub use game::{
    ActionOutcome, DealOutcome, DealerOutcome, Game, GameBuilder, GamePhase, PlayerHand, Seat,
    TurnCursor,
};
pub use hand::{Hand, HandStatus, evaluate_cards};
pub use money::{Currency, Money, RoundingMode};
pub use options::TableOptions;
pub use payout::{PayoutResult, PayoutSummary, RoundSummary};
pub use rules::{GameResult, PlayerAction, Rules, StandardRules};
pub use shoe::{
    DeckShoe, FixedShoe, ReshuffleEvent, ReshufflePolicy, ReshuffleReason, Shoe, ShoeStatus,
};
