//! The game engine: one table, one round at a time.

use log::info;

use crate::bank::{BankService, InMemoryBank};
use crate::betting::BettingRound;
use crate::hand::Hand;
use crate::money::Currency;
use crate::options::TableOptions;
use crate::payout::RoundSummary;
use crate::rules::{Rules, StandardRules};
use crate::shoe::{DeckShoe, ReshuffleEvent, ReshufflePolicy, ReshuffleReason, Shoe, ShoeStatus};

mod actions;
mod deal;
mod dealer;
pub mod seat;
pub mod state;

pub use actions::ActionOutcome;
pub use deal::DealOutcome;
pub use dealer::DealerOutcome;
pub use seat::{PlayerHand, Seat};
pub use state::{GamePhase, TurnCursor};

/// A blackjack table engine driving one round end to end: wagering,
/// dealing from a finite shoe, per-player decision turns, automatic
/// dealer play, and settlement.
///
/// The engine is single-threaded and takes `&mut self` for every
/// mutating operation; a surrounding session owner is responsible for
/// serializing access to one active round. Collaborators are trait
/// seams: the [`Shoe`], the [`Rules`], and the [`BankService`] owning
/// persistent bankrolls.
///
/// # Example
///
/// ```no_run
/// use twentyone::{Game, TableOptions};
///
/// let game = Game::new(TableOptions::default(), 42);
/// let _ = game;
/// ```
pub struct Game<S = DeckShoe, R = StandardRules, B = InMemoryBank> {
    pub(crate) shoe: S,
    pub(crate) rules: R,
    pub(crate) bank: B,
    pub(crate) options: TableOptions,
    pub(crate) policy: ReshufflePolicy,
    pub(crate) cursor: TurnCursor,
    pub(crate) seats: Vec<Seat>,
    pub(crate) dealer_hand: Hand,
    pub(crate) ledger: Option<BettingRound>,
    pub(crate) summary: Option<RoundSummary>,
}

impl Game {
    /// Creates an engine with the default collaborators: a seeded
    /// [`DeckShoe`], [`StandardRules`] derived from the options, and an
    /// empty [`InMemoryBank`].
    #[must_use]
    pub fn new(options: TableOptions, seed: u64) -> Self {
        GameBuilder::new(options, seed).build()
    }

    /// Starts building an engine with custom collaborators.
    #[must_use]
    pub fn builder(options: TableOptions, seed: u64) -> GameBuilder {
        GameBuilder::new(options, seed)
    }
}

impl<S: Shoe, R: Rules, B: BankService> Game<S, R, B> {
    /// Returns the current round phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.cursor.phase
    }

    /// Returns the current turn cursor.
    #[must_use]
    pub const fn cursor(&self) -> TurnCursor {
        self.cursor
    }

    /// Returns the table options.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the table currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.options.currency
    }

    /// Returns the player whose turn it is, if player turns are active.
    #[must_use]
    pub fn current_player(&self) -> Option<&str> {
        if !matches!(self.cursor.phase, GamePhase::PlayerTurns) {
            return None;
        }
        self.seats.get(self.cursor.player_index).map(Seat::name)
    }

    /// Returns the seats dealt into the current round.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Returns the seat for a player, if dealt in.
    #[must_use]
    pub fn seat(&self, player: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.name() == player)
    }

    /// Returns the dealer's hand.
    #[must_use]
    pub const fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    /// Returns the betting ledger for the current round.
    #[must_use]
    pub const fn betting(&self) -> Option<&BettingRound> {
        self.ledger.as_ref()
    }

    /// Returns the external betting/payout service.
    #[must_use]
    pub const fn bank(&self) -> &B {
        &self.bank
    }

    /// Returns a derived snapshot of the shoe against the reshuffle
    /// policy.
    #[must_use]
    pub fn shoe_status(&self) -> ShoeStatus {
        self.policy.status(&self.shoe)
    }

    /// Returns whether a reshuffle is currently due.
    #[must_use]
    pub fn needs_reshuffle(&self) -> bool {
        self.policy.needs_reshuffle(&self.shoe)
    }

    /// Administrative reshuffle (e.g. between rounds). Always shuffles
    /// and returns the notification event.
    pub fn trigger_manual_reshuffle(&mut self, reason: &str) -> ReshuffleEvent {
        info!("manual reshuffle requested: {reason}");
        self.policy
            .reshuffle_now(&mut self.shoe, ReshuffleReason::Manual(reason.to_owned()))
    }

    /// Draws one card, attempting a policy reshuffle first. An empty
    /// shoe gets a capacity reshuffle before the draw is allowed to
    /// fail. Pushes any reshuffle event onto `events`.
    pub(crate) fn draw_checked(
        &mut self,
        reason: ReshuffleReason,
        events: &mut Vec<ReshuffleEvent>,
    ) -> Option<crate::card::Card> {
        if let Some(event) = self.policy.check_before_draw(&mut self.shoe, reason.clone()) {
            events.push(event);
        } else if self.shoe.is_empty() && self.options.auto_reshuffle {
            events.push(self.policy.reshuffle_now(&mut self.shoe, reason));
        }
        self.shoe.draw()
    }
}

/// Builder assembling an engine from explicit collaborators.
///
/// This is the supported way to construct deterministic games in
/// tests: pass a [`FixedShoe`](crate::FixedShoe) script and a seeded
/// bank instead of reaching into engine internals.
///
/// ```
/// use twentyone::{Card, FixedShoe, Game, Suit, TableOptions};
///
/// let game = Game::builder(TableOptions::default(), 0)
///     .with_shoe(FixedShoe::new(vec![Card::new(Suit::Hearts, 10)]))
///     .build();
/// let _ = game;
/// ```
pub struct GameBuilder<S = DeckShoe, R = StandardRules, B = InMemoryBank> {
    options: TableOptions,
    shoe: S,
    rules: R,
    bank: B,
}

impl GameBuilder {
    /// Creates a builder with the default collaborators.
    #[must_use]
    pub fn new(options: TableOptions, seed: u64) -> Self {
        let shoe = DeckShoe::new(options.decks, seed);
        let rules = StandardRules::from_options(&options);
        let bank = InMemoryBank::new(options.currency);
        Self {
            options,
            shoe,
            rules,
            bank,
        }
    }
}

impl<S: Shoe, R: Rules, B: BankService> GameBuilder<S, R, B> {
    /// Replaces the shoe.
    #[must_use]
    pub fn with_shoe<S2: Shoe>(self, shoe: S2) -> GameBuilder<S2, R, B> {
        GameBuilder {
            options: self.options,
            shoe,
            rules: self.rules,
            bank: self.bank,
        }
    }

    /// Replaces the rules collaborator.
    #[must_use]
    pub fn with_rules<R2: Rules>(self, rules: R2) -> GameBuilder<S, R2, B> {
        GameBuilder {
            options: self.options,
            shoe: self.shoe,
            rules,
            bank: self.bank,
        }
    }

    /// Replaces the betting/payout service.
    #[must_use]
    pub fn with_bank<B2: BankService>(self, bank: B2) -> GameBuilder<S, R, B2> {
        GameBuilder {
            options: self.options,
            shoe: self.shoe,
            rules: self.rules,
            bank,
        }
    }

    /// Builds the engine in the [`GamePhase::Setup`] phase.
    #[must_use]
    pub fn build(self) -> Game<S, R, B> {
        let policy = ReshufflePolicy::new(
            self.options.penetration_threshold,
            self.options.auto_reshuffle,
        );
        Game {
            shoe: self.shoe,
            rules: self.rules,
            bank: self.bank,
            options: self.options,
            policy,
            cursor: TurnCursor::idle(GamePhase::Setup),
            seats: Vec::new(),
            dealer_hand: Hand::new(),
            ledger: None,
            summary: None,
        }
    }
}
