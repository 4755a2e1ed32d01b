//! Round phase and turn cursor types.

use serde::{Deserialize, Serialize};

/// Phase of one round, strictly ordered.
///
/// `PlayerTurns` moves straight to `Results` only when every hand in
/// play already busted; every other transition passes through the
/// intermediate phases in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round is active.
    Setup,
    /// Collecting bets.
    Betting,
    /// Bets are in; initial cards not yet dealt.
    InitialDeal,
    /// Players act in turn order.
    PlayerTurns,
    /// Dealer plays out their hand.
    DealerTurn,
    /// Outcomes can be computed.
    Results,
    /// Terminal; a new round must be started.
    GameOver,
}

/// The current turn position, replaced wholesale on every transition.
///
/// Bundling the phase with the player and hand indices means a split or
/// double-down can never leave the cursor half-updated: callers observe
/// either the cursor before the transition or the one after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCursor {
    /// Index into the seat list.
    pub player_index: usize,
    /// Index into the acting player's hands (for splits).
    pub hand_index: usize,
    /// The phase this cursor belongs to.
    pub phase: GamePhase,
}

impl TurnCursor {
    /// Cursor for a phase with no active turn.
    #[must_use]
    pub const fn idle(phase: GamePhase) -> Self {
        Self {
            player_index: 0,
            hand_index: 0,
            phase,
        }
    }

    /// Cursor pointing at a specific player hand during player turns.
    #[must_use]
    pub const fn at(player_index: usize, hand_index: usize) -> Self {
        Self {
            player_index,
            hand_index,
            phase: GamePhase::PlayerTurns,
        }
    }
}
